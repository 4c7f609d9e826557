use std::fmt;

use bb8::Pool;

use crate::error::SqlAdminError;
use crate::results::{CustomDbRow, ExecOutcome, ResultSet};
use crate::sqlite::config::{SqliteManager, SqliteOptions, SqliteOptionsBuilder, build_pool};
use crate::sqlite::{Params, SqliteConnection};
use crate::statement::StatementKind;
use crate::types::RowValues;

/// Result of a raw statement routed by [`StatementKind`].
#[derive(Debug, Clone)]
pub enum RawOutcome {
    /// The statement started with `SELECT`.
    Rows(ResultSet),
    /// Anything else. `refresh_tables` is set when the statement was DDL.
    Changes {
        outcome: ExecOutcome,
        refresh_tables: bool,
    },
}

/// The execution gateway: an owned handle on the connection pool with two verbs,
/// [`execute`](Self::execute) for statements without a result set and
/// [`query`](Self::query) for statements that return rows.
///
/// Cloning is cheap and shares the pool. The pool, and every connection in it, is closed
/// when the last clone is dropped.
///
/// # Examples
/// ```rust,no_run
/// use sql_admin::prelude::*;
///
/// # async fn demo() -> Result<(), SqlAdminError> {
/// let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
/// gateway.execute("CREATE TABLE t (id INTEGER)", &[]).await?;
/// gateway.execute("INSERT INTO t (id) VALUES (?1)", &[RowValues::Int(7)]).await?;
/// let rows = gateway.query("SELECT id FROM t", &[]).await?;
/// assert_eq!(rows.len(), 1);
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct Gateway {
    pool: Pool<SqliteManager>,
}

impl Gateway {
    /// Build the pool described by `opts` and wrap it.
    ///
    /// # Errors
    /// Returns `SqlAdminError::ConnectionError` if the pool cannot be built, or the engine
    /// error if the initial pragma setup fails.
    pub async fn connect(opts: SqliteOptions) -> Result<Self, SqlAdminError> {
        let pool = build_pool(&opts).await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn sqlite_builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    #[must_use]
    pub fn from_pool(pool: Pool<SqliteManager>) -> Self {
        Self { pool }
    }

    /// Check out one pooled connection.
    ///
    /// # Errors
    /// Returns `SqlAdminError` if no connection becomes available or opening one fails.
    pub async fn checkout(&self) -> Result<SqliteConnection, SqlAdminError> {
        let conn = self.pool.get_owned().await?;
        Ok(SqliteConnection::new(conn))
    }

    /// Run a statement that returns no rows (INSERT/UPDATE/DELETE/DDL).
    ///
    /// # Errors
    /// Propagates the engine error verbatim: syntax, constraint violation, lock contention.
    pub async fn execute(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ExecOutcome, SqlAdminError> {
        tracing::debug!(sql, params = params.len(), "execute");
        let converted = Params::convert(params);
        let mut conn = self.checkout().await?;
        conn.execute_dml(sql, converted.as_values()).await
    }

    /// Run a statement and return every row. No match is an empty result set.
    ///
    /// # Errors
    /// Propagates the engine error verbatim.
    pub async fn query(&self, sql: &str, params: &[RowValues]) -> Result<ResultSet, SqlAdminError> {
        tracing::debug!(sql, params = params.len(), "query");
        let converted = Params::convert(params);
        let mut conn = self.checkout().await?;
        conn.execute_select(sql, converted.as_values()).await
    }

    /// First row of [`query`](Self::query), if there is one.
    ///
    /// # Errors
    /// Propagates the engine error verbatim.
    pub async fn query_one(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, SqlAdminError> {
        Ok(self.query(sql, params).await?.into_first())
    }

    /// Run caller-supplied SQL text with no parameters.
    ///
    /// Text starting with `SELECT` (any case) goes through [`query`](Self::query); everything
    /// else through [`execute`](Self::execute). DDL reports zero rows affected, since the
    /// engine's change counter only tracks INSERT/UPDATE/DELETE.
    ///
    /// # Errors
    /// Propagates the engine error verbatim.
    pub async fn run_raw(&self, sql: &str) -> Result<RawOutcome, SqlAdminError> {
        let kind = StatementKind::classify(sql);
        if kind.returns_rows() {
            return Ok(RawOutcome::Rows(self.query(sql, &[]).await?));
        }
        let mut outcome = self.execute(sql, &[]).await?;
        if kind.changes_catalog() {
            outcome.rows_affected = 0;
        }
        Ok(RawOutcome::Changes {
            outcome,
            refresh_tables: kind.changes_catalog(),
        })
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("connections", &self.pool.state().connections)
            .field("idle", &self.pool.state().idle_connections)
            .finish()
    }
}
