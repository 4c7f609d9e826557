//! Convenient imports for common functionality.

pub use crate::admin::{AdminConsole, AdminRequest, AdminResponse, Envelope, Status};
pub use crate::error::SqlAdminError;
pub use crate::gateway::{Gateway, RawOutcome};
pub use crate::records::{QueryOptions, RecordService};
pub use crate::results::{CustomDbRow, ExecOutcome, ResultSet};
pub use crate::schema::{ColumnInfo, SchemaService, validate_identifier};
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};
pub use crate::statement::{ColumnDef, QueryAndParams, RawDdl, StatementKind};
pub use crate::types::{JournalMode, Record, RowValues};
