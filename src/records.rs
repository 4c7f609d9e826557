//! Generic CRUD over the rows of a named table.
//!
//! Payloads and filters are [`Record`]s. Filters are exact-match and AND-conjoined; an
//! empty filter matches every row, for updates and deletes too. That is deliberate: a
//! `delete_records(table, &Record::new())` wipes the table.
//!
//! Table existence is not checked here. Callers that want a not-found error ask
//! [`SchemaService::table_exists`](crate::schema::SchemaService::table_exists) first.

use crate::error::SqlAdminError;
use crate::gateway::Gateway;
use crate::results::{ExecOutcome, ResultSet};
use crate::schema::validate_identifier;
use crate::statement::{
    QueryAndParams, build_delete, build_insert, build_select, build_update, build_where,
};
use crate::types::{Record, RowValues};

/// What to select. Defaults to every column of every row.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub columns: Vec<String>,
    pub filter: Record,
}

impl QueryOptions {
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Record) -> Self {
        self.filter = filter;
        self
    }
}

fn validate_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<(), SqlAdminError> {
    columns.into_iter().try_for_each(validate_identifier)
}

/// Build `INSERT` for `record`, empty strings written as NULL.
///
/// # Errors
/// `MissingField` for an empty record, `InvalidIdentifier` for a bad table or column name.
pub fn insert_statement(table: &str, record: Record) -> Result<QueryAndParams, SqlAdminError> {
    validate_identifier(table)?;
    if record.is_empty() {
        return Err(SqlAdminError::MissingField("data".to_string()));
    }
    validate_columns(record.columns())?;
    let (columns, values) = record.into_parts();
    let params = values
        .into_iter()
        .map(RowValues::normalized_for_write)
        .collect();
    Ok(QueryAndParams::new(build_insert(table, &columns), params))
}

/// Build `UPDATE … SET <record> WHERE <filter>`; update values bind before filter values.
///
/// # Errors
/// `MissingField` for an empty record, `InvalidIdentifier` for a bad table or column name.
pub fn update_statement(
    table: &str,
    record: Record,
    filter: Record,
) -> Result<QueryAndParams, SqlAdminError> {
    validate_identifier(table)?;
    if record.is_empty() {
        return Err(SqlAdminError::MissingField("data".to_string()));
    }
    validate_columns(record.columns())?;
    validate_columns(filter.columns())?;

    let (set_columns, set_values) = record.into_parts();
    let (where_columns, where_values) = filter.into_parts();
    let where_clause = build_where(&where_columns, set_columns.len() + 1);

    let mut params: Vec<RowValues> = set_values
        .into_iter()
        .map(RowValues::normalized_for_write)
        .collect();
    params.extend(where_values);
    Ok(QueryAndParams::new(
        build_update(table, &set_columns, &where_clause),
        params,
    ))
}

/// Build `DELETE FROM … [WHERE <filter>]`.
///
/// # Errors
/// `InvalidIdentifier` for a bad table or column name.
pub fn delete_statement(table: &str, filter: Record) -> Result<QueryAndParams, SqlAdminError> {
    validate_identifier(table)?;
    validate_columns(filter.columns())?;
    let (where_columns, where_values) = filter.into_parts();
    let where_clause = build_where(&where_columns, 1);
    Ok(QueryAndParams::new(
        build_delete(table, &where_clause),
        where_values,
    ))
}

/// Build `SELECT <columns|*> FROM … [WHERE <filter>]`.
///
/// # Errors
/// `InvalidIdentifier` for a bad table or column name.
pub fn select_statement(table: &str, options: QueryOptions) -> Result<QueryAndParams, SqlAdminError> {
    validate_identifier(table)?;
    validate_columns(options.columns.iter().map(String::as_str))?;
    validate_columns(options.filter.columns())?;
    let (where_columns, where_values) = options.filter.into_parts();
    let where_clause = build_where(&where_columns, 1);
    Ok(QueryAndParams::new(
        build_select(table, &options.columns, &where_clause),
        where_values,
    ))
}

/// Row-level operations over a [`Gateway`].
#[derive(Debug, Clone)]
pub struct RecordService {
    gateway: Gateway,
}

impl RecordService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Insert one row; columns in the record's order.
    ///
    /// # Errors
    /// Validation errors from [`insert_statement`]; NOT NULL / UNIQUE / type violations come
    /// back as the engine error, untranslated.
    pub async fn insert_record(
        &self,
        table: &str,
        record: Record,
    ) -> Result<ExecOutcome, SqlAdminError> {
        let stmt = insert_statement(table, record)?;
        self.gateway.execute(&stmt.query, &stmt.params).await
    }

    /// Update every row matching `filter`. Matching nothing is `rows_affected == 0`, not an
    /// error.
    ///
    /// # Errors
    /// Validation errors from [`update_statement`], otherwise engine errors.
    pub async fn update_records(
        &self,
        table: &str,
        record: Record,
        filter: Record,
    ) -> Result<ExecOutcome, SqlAdminError> {
        if filter.is_empty() {
            tracing::warn!(table, "update without filter touches every row");
        }
        let stmt = update_statement(table, record, filter)?;
        self.gateway.execute(&stmt.query, &stmt.params).await
    }

    /// Delete every row matching `filter`; an empty filter deletes all rows.
    ///
    /// # Errors
    /// Validation errors from [`delete_statement`], otherwise engine errors.
    pub async fn delete_records(
        &self,
        table: &str,
        filter: Record,
    ) -> Result<ExecOutcome, SqlAdminError> {
        if filter.is_empty() {
            tracing::warn!(table, "delete without filter removes every row");
        }
        let stmt = delete_statement(table, filter)?;
        self.gateway.execute(&stmt.query, &stmt.params).await
    }

    /// Select rows. No ordering, pagination or limit.
    ///
    /// # Errors
    /// Validation errors from [`select_statement`], otherwise engine errors.
    pub async fn query_records(
        &self,
        table: &str,
        options: QueryOptions,
    ) -> Result<ResultSet, SqlAdminError> {
        let stmt = select_statement(table, options)?;
        self.gateway.query(&stmt.query, &stmt.params).await
    }
}
