use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use sql_admin::prelude::{AdminRequest, JournalMode, SqliteOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Administer an embedded SQLite database")]
pub(crate) struct Args {
    #[arg(long, default_value = "admin.db")]
    pub(crate) db: String,
    #[arg(long, default_value_t = 4)]
    pub(crate) pool_size: u32,
    #[arg(long, value_enum, default_value = "wal")]
    pub(crate) journal_mode: JournalMode,
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    #[arg(long, short)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// List user tables
    Tables,
    /// Create a table from `name:type[:constraints]` column specs
    CreateTable {
        table: String,
        #[arg(long = "column", value_parser = parse_column, required = true)]
        columns: Vec<JsonValue>,
    },
    DropTable { table: String },
    /// Show column metadata
    Structure { table: String },
    /// List rows, optionally filtered by exact `column=value` matches
    Records {
        table: String,
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// Insert the JSON object as one row
    Insert {
        table: String,
        #[arg(value_parser = parse_json)]
        json: JsonValue,
    },
    /// Update rows: `{"where": {...}, "data": {...}}`
    Update {
        table: String,
        #[arg(value_parser = parse_json)]
        json: JsonValue,
    },
    /// Delete rows: `{"where": {...}}`; an empty `where` deletes everything
    Delete {
        table: String,
        #[arg(value_parser = parse_json)]
        json: JsonValue,
    },
    /// Run one raw SQL statement
    Sql { sql: String },
}

/// Resolved settings, logged at startup.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AdminConfig {
    pub(crate) db: String,
    pub(crate) pool_size: u32,
    pub(crate) journal_mode: String,
    pub(crate) log: Option<PathBuf>,
    pub(crate) verbose: bool,
}

impl AdminConfig {
    pub(crate) fn from_args(args: &Args) -> Self {
        Self {
            db: args.db.clone(),
            pool_size: args.pool_size.max(1),
            journal_mode: args
                .journal_mode
                .to_possible_value()
                .map(|v| v.get_name().to_string())
                .unwrap_or_default(),
            log: args.log.clone(),
            verbose: args.verbose,
        }
    }

    pub(crate) fn sqlite_options(args: &Args) -> SqliteOptions {
        let mut opts = SqliteOptions::new(args.db.clone());
        opts.pool_size = args.pool_size.max(1);
        opts.journal_mode = args.journal_mode;
        opts
    }
}

impl Command {
    pub(crate) fn into_request(self) -> AdminRequest {
        match self {
            Command::Tables => AdminRequest::ListTables,
            Command::CreateTable { table, columns } => AdminRequest::CreateTable {
                body: json!({ "tableName": table, "columns": columns }),
            },
            Command::DropTable { table } => AdminRequest::DropTable { table },
            Command::Structure { table } => AdminRequest::GetStructure { table },
            Command::Records { table, filters } => AdminRequest::ListRecords { table, filters },
            Command::Insert { table, json } => AdminRequest::CreateRecord { table, body: json },
            Command::Update { table, json } => AdminRequest::UpdateRecords { table, body: json },
            Command::Delete { table, json } => AdminRequest::DeleteRecords { table, body: json },
            Command::Sql { sql } => AdminRequest::RunSql {
                body: json!({ "sql": sql }),
            },
        }
    }
}

fn parse_column(raw: &str) -> Result<JsonValue, String> {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    let Some(sql_type) = parts.next() else {
        return Err(format!("expected name:type[:constraints], got {raw:?}"));
    };
    let mut column = json!({ "name": name, "type": sql_type });
    if let Some(constraints) = parts.next() {
        column["constraints"] = JsonValue::String(constraints.to_string());
    }
    Ok(column)
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected column=value, got {raw:?}"))
}

fn parse_json(raw: &str) -> Result<JsonValue, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_spec_splits_on_first_two_colons() {
        assert_eq!(
            parse_column("id:INTEGER:PRIMARY KEY").unwrap(),
            json!({"name": "id", "type": "INTEGER", "constraints": "PRIMARY KEY"})
        );
        assert_eq!(
            parse_column("note:TEXT").unwrap(),
            json!({"name": "note", "type": "TEXT"})
        );
        assert_eq!(
            parse_column("t:TEXT:DEFAULT 'a:b'").unwrap()["constraints"],
            json!("DEFAULT 'a:b'")
        );
        assert!(parse_column("just_a_name").is_err());
    }

    #[test]
    fn filter_keeps_equals_in_value() {
        assert_eq!(
            parse_filter("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert!(parse_filter("novalue").is_err());
    }

    #[test]
    fn subcommands_map_to_requests() {
        let args = Args::parse_from([
            "admin-cli",
            "--db",
            ":memory:",
            "create-table",
            "students",
            "--column",
            "id:INTEGER:PRIMARY KEY",
            "--column",
            "name:TEXT",
        ]);
        assert_eq!(args.db, ":memory:");
        let AdminRequest::CreateTable { body } = args.command.into_request() else {
            panic!("expected create table");
        };
        assert_eq!(body["tableName"], json!("students"));
        assert_eq!(body["columns"].as_array().map(Vec::len), Some(2));

        let args = Args::parse_from(["admin-cli", "sql", "SELECT 1"]);
        assert_eq!(
            args.command.into_request(),
            AdminRequest::RunSql {
                body: json!({"sql": "SELECT 1"})
            }
        );
    }
}
