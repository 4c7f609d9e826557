//! Operations on tables themselves: list, create, drop, describe, existence.
//!
//! Nothing is cached; every call re-reads the engine's catalog.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::SqlAdminError;
use crate::gateway::Gateway;
use crate::results::CustomDbRow;
use crate::statement::{ColumnDef, build_create_table, build_drop_table};
use crate::types::RowValues;

lazy_static! {
    static ref IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid");
}

const LIST_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'";
const TABLE_EXISTS_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1";
const TABLE_INFO_SQL: &str =
    "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid";

#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Accept `name` as a table or column identifier.
///
/// # Errors
/// Returns `SqlAdminError::InvalidIdentifier` unless `name` is letters, digits and
/// underscores, not starting with a digit.
pub fn validate_identifier(name: &str) -> Result<(), SqlAdminError> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(SqlAdminError::InvalidIdentifier(name.to_string()))
    }
}

/// One column as the engine describes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: String,
    #[serde(rename = "notnull")]
    pub not_null: bool,
    #[serde(rename = "dflt_value")]
    pub default_value: Option<String>,
    /// 1-based position in the primary key, 0 when the column is not part of it.
    pub pk: i64,
}

impl ColumnInfo {
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.pk > 0
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SqlAdminError> {
        let int = |col: &str| {
            row.get(col).and_then(RowValues::as_int).copied().ok_or_else(|| {
                SqlAdminError::ExecutionError(format!("table_info column {col} is not an integer"))
            })
        };
        let text = |col: &str| row.get(col).and_then(RowValues::as_text).map(str::to_string);
        Ok(Self {
            cid: int("cid")?,
            name: text("name").unwrap_or_default(),
            sql_type: text("type").unwrap_or_default(),
            not_null: int("notnull")? != 0,
            default_value: text("dflt_value"),
            pk: int("pk")?,
        })
    }
}

/// Table-level operations over a [`Gateway`].
#[derive(Debug, Clone)]
pub struct SchemaService {
    gateway: Gateway,
}

impl SchemaService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Names of all user tables, in catalog order.
    ///
    /// # Errors
    /// Propagates engine errors.
    pub async fn list_tables(&self) -> Result<Vec<String>, SqlAdminError> {
        let rows = self.gateway.query(LIST_TABLES_SQL, &[]).await?;
        Ok(rows
            .results
            .iter()
            .filter_map(|row| row.get("name").and_then(RowValues::as_text))
            .map(str::to_string)
            .collect())
    }

    /// Exact-name catalog lookup. Any string is accepted; it is bound, not interpolated.
    ///
    /// # Errors
    /// Propagates engine errors.
    pub async fn table_exists(&self, name: &str) -> Result<bool, SqlAdminError> {
        let row = self
            .gateway
            .query_one(TABLE_EXISTS_SQL, &[RowValues::from(name)])
            .await?;
        Ok(row.is_some())
    }

    /// `CREATE TABLE IF NOT EXISTS`; re-creating an existing table is a no-op.
    ///
    /// # Errors
    /// - `InvalidIdentifier` for a bad table or column name
    /// - `MissingField` for an empty column list or a column without name or type
    /// - the engine error for anything the engine rejects (unknown constraint syntax, …)
    pub async fn create_table(&self, name: &str, columns: &[ColumnDef]) -> Result<(), SqlAdminError> {
        validate_identifier(name)?;
        if columns.is_empty() {
            return Err(SqlAdminError::MissingField("columns".to_string()));
        }
        for col in columns {
            if col.name.is_empty() || col.sql_type.trim().is_empty() {
                return Err(SqlAdminError::MissingField(format!(
                    "column name and type are required (got name {:?}, type {:?})",
                    col.name, col.sql_type
                )));
            }
            validate_identifier(&col.name)?;
        }

        let sql = build_create_table(name, columns);
        self.gateway.execute(&sql, &[]).await?;
        tracing::info!(table = name, columns = columns.len(), "table created");
        Ok(())
    }

    /// `DROP TABLE IF EXISTS`. Irreversible, no cascade handling; confirming intent is up
    /// to whoever calls this.
    ///
    /// # Errors
    /// `InvalidIdentifier` for a bad name, otherwise engine errors.
    pub async fn drop_table(&self, name: &str) -> Result<(), SqlAdminError> {
        validate_identifier(name)?;
        self.gateway.execute(&build_drop_table(name), &[]).await?;
        tracing::info!(table = name, "table dropped");
        Ok(())
    }

    /// Columns in declaration order, with not-null and primary-key flags.
    ///
    /// A table that does not exist yields an empty list; callers wanting a not-found error
    /// check [`table_exists`](Self::table_exists) first.
    ///
    /// # Errors
    /// `InvalidIdentifier` for a bad name, otherwise engine errors.
    pub async fn get_table_structure(&self, name: &str) -> Result<Vec<ColumnInfo>, SqlAdminError> {
        validate_identifier(name)?;
        let rows = self
            .gateway
            .query(TABLE_INFO_SQL, &[RowValues::from(name)])
            .await?;
        rows.results.iter().map(ColumnInfo::from_row).collect()
    }

    /// Name of the first primary-key column, if the table declares one.
    ///
    /// # Errors
    /// Same as [`get_table_structure`](Self::get_table_structure).
    pub async fn primary_key_column(&self, name: &str) -> Result<Option<String>, SqlAdminError> {
        let columns = self.get_table_structure(name).await?;
        Ok(columns
            .into_iter()
            .filter(ColumnInfo::is_primary_key)
            .min_by_key(|c| c.pk)
            .map(|c| c.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_pattern() {
        for ok in ["a", "_", "students", "Course_2025", "_x9"] {
            assert!(is_valid_identifier(ok), "{ok}");
        }
        for bad in ["", "1table", "bad-name", "has space", "t;drop", "naïve", "a.b"] {
            assert!(!is_valid_identifier(bad), "{bad}");
        }
    }

    #[test]
    fn validate_reports_offending_name() {
        match validate_identifier("1table") {
            Err(SqlAdminError::InvalidIdentifier(name)) => assert_eq!(name, "1table"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
