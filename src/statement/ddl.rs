use serde::Deserialize;

/// A raw DDL fragment appended after a column's type, e.g. `PRIMARY KEY`, `NOT NULL`,
/// `DEFAULT 0`, `CHECK(score >= 0)`.
///
/// Not validated and not escaped. Only construct one from text you trust.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawDdl(pub String);

impl RawDdl {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self(fragment.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// One column of a table definition.
///
/// `name` and `sql_type` are mandatory; an empty string counts as missing. `sql_type` is not
/// checked against a fixed list: `TEXT`, `INTEGER`, `REAL`, `BLOB` or any type name the
/// engine accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColumnDef {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub sql_type: String,
    #[serde(default)]
    pub constraints: Option<RawDdl>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            constraints: None,
        }
    }

    #[must_use]
    pub fn constraints(mut self, fragment: RawDdl) -> Self {
        self.constraints = Some(fragment);
        self
    }

    fn definition(&self) -> String {
        match &self.constraints {
            Some(raw) if !raw.is_blank() => {
                format!("{} {} {}", self.name, self.sql_type, raw.as_str())
            }
            _ => format!("{} {}", self.name, self.sql_type),
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS <table> (<col> <type> [<constraints>], …)`
#[must_use]
pub fn build_create_table(table: &str, columns: &[ColumnDef]) -> String {
    let definitions = columns
        .iter()
        .map(ColumnDef::definition)
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {table} ({definitions})")
}

/// `DROP TABLE IF EXISTS <table>`
#[must_use]
pub fn build_drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_with_and_without_constraints() {
        let columns = vec![
            ColumnDef::new("id", "INTEGER").constraints(RawDdl::new("PRIMARY KEY")),
            ColumnDef::new("name", "TEXT"),
            ColumnDef::new("score", "REAL").constraints(RawDdl::new("DEFAULT 0")),
        ];
        assert_eq!(
            build_create_table("students", &columns),
            "CREATE TABLE IF NOT EXISTS students (id INTEGER PRIMARY KEY, name TEXT, score REAL DEFAULT 0)"
        );
    }

    #[test]
    fn blank_constraints_are_skipped() {
        let columns = vec![ColumnDef::new("a", "TEXT").constraints(RawDdl::new("  "))];
        assert_eq!(
            build_create_table("t", &columns),
            "CREATE TABLE IF NOT EXISTS t (a TEXT)"
        );
    }

    #[test]
    fn column_def_deserializes_from_admin_payload() {
        let col: ColumnDef =
            serde_json::from_str(r#"{"name":"id","type":"INTEGER","constraints":"PRIMARY KEY"}"#)
                .unwrap();
        assert_eq!(col.name, "id");
        assert_eq!(col.sql_type, "INTEGER");
        assert_eq!(col.constraints, Some(RawDdl::new("PRIMARY KEY")));

        let bare: ColumnDef = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert!(bare.sql_type.is_empty());
        assert!(bare.constraints.is_none());
    }

    #[test]
    fn drop_table_text() {
        assert_eq!(build_drop_table("t"), "DROP TABLE IF EXISTS t");
    }
}
