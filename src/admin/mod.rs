//! Transport-agnostic admin facade.
//!
//! Each operation takes the inputs an HTTP route would hand it (path segments, query pairs,
//! a JSON body) and returns an [`AdminResponse`]: a status class plus the uniform
//! `{ok, data|message}` envelope. Failures never escape as `Err`; they are folded into the
//! envelope with status 400 (validation), 404 (missing table) or 500 (engine).
//!
//! The raw SQL operation and unfiltered bulk update/delete are passed through unguarded.

mod envelope;

pub use envelope::{AdminResponse, Envelope, Status};

use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use crate::conversion::{record_from_json, result_set_to_json};
use crate::error::SqlAdminError;
use crate::gateway::{Gateway, RawOutcome};
use crate::records::{QueryOptions, RecordService};
use crate::schema::SchemaService;
use crate::statement::ColumnDef;
use crate::types::{Record, RowValues};

/// One admin operation with its inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminRequest {
    ListTables,
    /// Body: `{"tableName": "...", "columns": [{"name", "type", "constraints"?}]}`
    CreateTable { body: JsonValue },
    DropTable { table: String },
    GetStructure { table: String },
    /// Query pairs become exact-match text filters.
    ListRecords {
        table: String,
        filters: Vec<(String, String)>,
    },
    /// Body: the record as a JSON object.
    CreateRecord { table: String, body: JsonValue },
    /// Body: `{"where": {...}, "data": {...}}`
    UpdateRecords { table: String, body: JsonValue },
    /// Body: `{"where": {...}}`; `{"where": {}}` deletes every row.
    DeleteRecords { table: String, body: JsonValue },
    /// Body: `{"sql": "..."}`
    RunSql { body: JsonValue },
}

impl AdminRequest {
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            AdminRequest::ListTables => "list tables",
            AdminRequest::CreateTable { .. } => "create table",
            AdminRequest::DropTable { .. } => "drop table",
            AdminRequest::GetStructure { .. } => "get structure",
            AdminRequest::ListRecords { .. } => "list records",
            AdminRequest::CreateRecord { .. } => "create record",
            AdminRequest::UpdateRecords { .. } => "update records",
            AdminRequest::DeleteRecords { .. } => "delete records",
            AdminRequest::RunSql { .. } => "run sql",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTableBody {
    #[serde(rename = "tableName")]
    table_name: Option<String>,
    columns: Option<Vec<ColumnDef>>,
}

/// Schema and record services behind one gateway, answering [`AdminRequest`]s.
#[derive(Debug, Clone)]
pub struct AdminConsole {
    gateway: Gateway,
    schema: SchemaService,
    records: RecordService,
}

impl AdminConsole {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            schema: SchemaService::new(gateway.clone()),
            records: RecordService::new(gateway.clone()),
            gateway,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &SchemaService {
        &self.schema
    }

    #[must_use]
    pub fn records(&self) -> &RecordService {
        &self.records
    }

    /// Route a request to its operation.
    pub async fn handle(&self, request: AdminRequest) -> AdminResponse {
        let operation = request.operation();
        let response = match request {
            AdminRequest::ListTables => self.list_tables().await,
            AdminRequest::CreateTable { body } => self.create_table(&body).await,
            AdminRequest::DropTable { table } => self.drop_table(&table).await,
            AdminRequest::GetStructure { table } => self.get_structure(&table).await,
            AdminRequest::ListRecords { table, filters } => {
                self.list_records(&table, &filters).await
            }
            AdminRequest::CreateRecord { table, body } => self.create_record(&table, &body).await,
            AdminRequest::UpdateRecords { table, body } => {
                self.update_records(&table, &body).await
            }
            AdminRequest::DeleteRecords { table, body } => {
                self.delete_records(&table, &body).await
            }
            AdminRequest::RunSql { body } => self.run_sql(&body).await,
        };
        tracing::debug!(operation, status = response.status.code(), "admin request handled");
        response
    }

    pub async fn list_tables(&self) -> AdminResponse {
        let result = self
            .schema
            .list_tables()
            .await
            .map(|names| Envelope::data(json!(names)));
        respond("list tables", result)
    }

    pub async fn create_table(&self, body: &JsonValue) -> AdminResponse {
        respond("create table", self.create_table_inner(body).await)
    }

    async fn create_table_inner(&self, body: &JsonValue) -> Result<Envelope, SqlAdminError> {
        let parsed: CreateTableBody = serde_json::from_value(body.clone())
            .map_err(|e| SqlAdminError::MissingField(format!("malformed create table body: {e}")))?;
        let name = parsed
            .table_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SqlAdminError::MissingField("tableName".to_string()))?;
        let columns = parsed
            .columns
            .ok_or_else(|| SqlAdminError::MissingField("columns".to_string()))?;
        self.schema.create_table(&name, &columns).await?;
        Ok(Envelope::message(format!("Table {name} created")))
    }

    pub async fn drop_table(&self, table: &str) -> AdminResponse {
        let result = self
            .schema
            .drop_table(table)
            .await
            .map(|()| Envelope::message(format!("Table {table} dropped")));
        respond("drop table", result)
    }

    pub async fn get_structure(&self, table: &str) -> AdminResponse {
        respond("get structure", self.get_structure_inner(table).await)
    }

    async fn get_structure_inner(&self, table: &str) -> Result<Envelope, SqlAdminError> {
        self.ensure_table(table).await?;
        let columns = self.schema.get_table_structure(table).await?;
        let data = serde_json::to_value(columns)
            .map_err(|e| SqlAdminError::ExecutionError(format!("structure serialization: {e}")))?;
        Ok(Envelope::data(data))
    }

    pub async fn list_records(&self, table: &str, filters: &[(String, String)]) -> AdminResponse {
        respond("list records", self.list_records_inner(table, filters).await)
    }

    async fn list_records_inner(
        &self,
        table: &str,
        filters: &[(String, String)],
    ) -> Result<Envelope, SqlAdminError> {
        self.ensure_table(table).await?;
        let filter: Record = filters
            .iter()
            .map(|(k, v)| (k.clone(), RowValues::Text(v.clone())))
            .collect();
        let rows = self
            .records
            .query_records(table, QueryOptions::default().filter(filter))
            .await?;
        Ok(Envelope::data(result_set_to_json(&rows)))
    }

    pub async fn create_record(&self, table: &str, body: &JsonValue) -> AdminResponse {
        respond("create record", self.create_record_inner(table, body).await)
    }

    async fn create_record_inner(
        &self,
        table: &str,
        body: &JsonValue,
    ) -> Result<Envelope, SqlAdminError> {
        self.ensure_table(table).await?;
        let record = record_from_json(Some(body), "data")?;
        let outcome = self.records.insert_record(table, record).await?;
        Ok(Envelope::data(json!(outcome)).with_message("Record created"))
    }

    pub async fn update_records(&self, table: &str, body: &JsonValue) -> AdminResponse {
        respond("update records", self.update_records_inner(table, body).await)
    }

    async fn update_records_inner(
        &self,
        table: &str,
        body: &JsonValue,
    ) -> Result<Envelope, SqlAdminError> {
        let filter = record_from_json(body.get("where"), "where")?;
        let data = record_from_json(body.get("data"), "data")?;
        self.ensure_table(table).await?;
        let outcome = self.records.update_records(table, data, filter).await?;
        Ok(Envelope::data(json!(outcome))
            .with_message(format!("{} record(s) updated", outcome.rows_affected)))
    }

    pub async fn delete_records(&self, table: &str, body: &JsonValue) -> AdminResponse {
        respond("delete records", self.delete_records_inner(table, body).await)
    }

    async fn delete_records_inner(
        &self,
        table: &str,
        body: &JsonValue,
    ) -> Result<Envelope, SqlAdminError> {
        let filter = record_from_json(body.get("where"), "where")?;
        self.ensure_table(table).await?;
        let outcome = self.records.delete_records(table, filter).await?;
        Ok(Envelope::data(json!(outcome))
            .with_message(format!("{} record(s) deleted", outcome.rows_affected)))
    }

    /// Raw SQL. On failure the envelope echoes the statement in `sql`.
    pub async fn run_sql(&self, body: &JsonValue) -> AdminResponse {
        let sql = body
            .get("sql")
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let Some(sql) = sql else {
            return respond(
                "run sql",
                Err(SqlAdminError::MissingField("sql".to_string())),
            );
        };

        match self.gateway.run_raw(sql).await {
            Ok(RawOutcome::Rows(rows)) => {
                let count = rows.len();
                let columns = rows
                    .get_column_names()
                    .map(|names| json!(names.as_slice()))
                    .unwrap_or_else(|| json!([]));
                AdminResponse::ok(
                    Envelope::data(json!({
                        "columns": columns,
                        "rows": result_set_to_json(&rows),
                    }))
                    .with_message(format!("{count} row(s) returned")),
                )
            }
            Ok(RawOutcome::Changes {
                outcome,
                refresh_tables,
            }) => AdminResponse::ok(
                Envelope::data(json!({
                    "changes": outcome.rows_affected,
                    "lastInsertId": outcome.last_insert_id,
                    "refreshTables": refresh_tables,
                }))
                .with_message(format!(
                    "Statement executed, {} row(s) affected",
                    outcome.rows_affected
                )),
            ),
            Err(err) => {
                let mut response = respond("run sql", Err(err));
                response.envelope.sql = Some(sql.to_string());
                response
            }
        }
    }

    async fn ensure_table(&self, table: &str) -> Result<(), SqlAdminError> {
        if self.schema.table_exists(table).await? {
            Ok(())
        } else {
            Err(SqlAdminError::NotFound(table.to_string()))
        }
    }
}

fn respond(operation: &str, result: Result<Envelope, SqlAdminError>) -> AdminResponse {
    match result {
        Ok(envelope) => AdminResponse::ok(envelope),
        Err(err) => {
            tracing::warn!(operation, error = %err, "admin operation failed");
            AdminResponse::error(&err)
        }
    }
}
