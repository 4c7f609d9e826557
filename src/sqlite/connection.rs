use std::fmt;
use std::sync::Arc;

use crate::error::SqlAdminError;
use crate::results::{ExecOutcome, ResultSet};
use crate::types::JournalMode;

use super::config::{SharedSqliteConnection, SqlitePooledConnection};
use super::query::build_result_set;

/// Connection wrapper backed by a bb8 pooled `SQLite` connection.
///
/// Every call hops to the blocking thread pool; the async caller is free while rusqlite works.
pub struct SqliteConnection {
    pub(crate) conn: SqlitePooledConnection,
}

impl SqliteConnection {
    pub(crate) fn new(conn: SqlitePooledConnection) -> Self {
        Self { conn }
    }

    /// Execute a SELECT (or any row-returning statement) and materialize into a `ResultSet`.
    ///
    /// # Errors
    /// Returns `SqlAdminError` if preparing or executing the query fails.
    pub async fn execute_select(
        &mut self,
        query: &str,
        params: &[rusqlite::types::Value],
    ) -> Result<ResultSet, SqlAdminError> {
        let sql_owned = query.to_owned();
        let params_owned = params.to_vec();
        run_blocking(self.conn_handle(), move |guard| {
            let mut stmt = guard
                .prepare(&sql_owned)
                .map_err(SqlAdminError::SqliteError)?;
            build_result_set(&mut stmt, &params_owned)
        })
        .await
    }

    /// Execute a statement that returns no rows and report rows affected and the last rowid.
    ///
    /// # Errors
    /// Returns `SqlAdminError` if preparing or executing the statement fails, including when
    /// the statement unexpectedly returns rows.
    pub async fn execute_dml(
        &mut self,
        query: &str,
        params: &[rusqlite::types::Value],
    ) -> Result<ExecOutcome, SqlAdminError> {
        let sql_owned = query.to_owned();
        let params_owned = params.to_vec();
        run_blocking(self.conn_handle(), move |guard| {
            let mut stmt = guard
                .prepare(&sql_owned)
                .map_err(SqlAdminError::SqliteError)?;
            let refs: Vec<&dyn rusqlite::ToSql> = params_owned
                .iter()
                .map(|v| v as &dyn rusqlite::ToSql)
                .collect();
            let rows_affected = stmt
                .execute(&refs[..])
                .map_err(SqlAdminError::SqliteError)?;
            drop(stmt);
            Ok(ExecOutcome {
                last_insert_id: guard.last_insert_rowid(),
                rows_affected,
            })
        })
        .await
    }

    pub(crate) fn conn_handle(&self) -> SharedSqliteConnection {
        Arc::clone(&*self.conn)
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection").finish_non_exhaustive()
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlAdminError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlAdminError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlAdminError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

/// Apply the journal mode to a freshly opened connection.
///
/// # Errors
/// Returns `SqlAdminError` if the PRAGMA statements cannot be executed.
pub async fn apply_pragmas(
    conn: SharedSqliteConnection,
    journal_mode: JournalMode,
) -> Result<(), SqlAdminError> {
    run_blocking(conn, move |guard| {
        guard
            .execute_batch(journal_mode.pragma())
            .map_err(SqlAdminError::SqliteError)
    })
    .await
}
