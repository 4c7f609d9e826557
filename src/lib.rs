//! Dynamic table administration over an embedded `SQLite` database.
//!
//! - [`statement`]: pure SQL text generation
//! - [`gateway`]: the pooled execution handle (`execute` / `query` / raw SQL)
//! - [`schema`] and [`records`]: table-level and row-level services
//! - [`admin`]: request → `{ok, data|message}` envelope facade
//!
//! ```rust,no_run
//! use sql_admin::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlAdminError> {
//! let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
//! let schema = SchemaService::new(gateway.clone());
//! schema
//!     .create_table(
//!         "students",
//!         &[
//!             ColumnDef::new("id", "INTEGER").constraints(RawDdl::new("PRIMARY KEY")),
//!             ColumnDef::new("name", "TEXT"),
//!         ],
//!     )
//!     .await?;
//!
//! let records = RecordService::new(gateway);
//! records
//!     .insert_record("students", Record::new().with("name", "Alice"))
//!     .await?;
//! # Ok(()) }
//! ```

pub mod admin;
pub mod conversion;
pub mod error;
pub mod gateway;
pub mod prelude;
pub mod records;
pub mod results;
pub mod schema;
pub mod sqlite;
pub mod statement;
pub mod types;

pub use error::SqlAdminError;
pub use gateway::{Gateway, RawOutcome};
pub use results::{CustomDbRow, ExecOutcome, ResultSet};
pub use types::{JournalMode, Record, RowValues};
