use std::future::Future;
use std::sync::Arc;

use bb8::{ManageConnection, Pool, PooledConnection};
use tokio::sync::Mutex;

use crate::error::SqlAdminError;
use crate::types::JournalMode;

use super::connection::apply_pragmas;

/// Path `SQLite` treats as a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// A rusqlite connection shared between the pool and the blocking worker that runs on it.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;
pub type SqlitePooledConnection = PooledConnection<'static, SqliteManager>;

/// Options for configuring a `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub pool_size: u32,
    pub journal_mode: JournalMode,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            pool_size: 4,
            journal_mode: JournalMode::default(),
        }
    }

    /// A private in-memory database behind exactly one connection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH.to_string())
    }

    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.db_path == MEMORY_PATH || self.db_path.is_empty()
    }

    /// Pool size actually used: an in-memory database lives and dies with its one connection.
    #[must_use]
    pub fn effective_pool_size(&self) -> u32 {
        if self.is_memory() {
            1
        } else {
            self.pool_size
        }
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn pool_size(mut self, pool_size: u32) -> Self {
        self.opts.pool_size = pool_size;
        self
    }

    #[must_use]
    pub fn journal_mode(mut self, journal_mode: JournalMode) -> Self {
        self.opts.journal_mode = journal_mode;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build the pool described by these options.
    ///
    /// # Errors
    ///
    /// Returns `SqlAdminError` if pool creation or the initial pragma setup fails.
    pub async fn build(self) -> Result<Pool<SqliteManager>, SqlAdminError> {
        build_pool(&self.finish()).await
    }
}

/// bb8 manager for rusqlite connections.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    db_path: String,
}

impl SqliteManager {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = rusqlite::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let db_path = self.db_path.clone();
        async move {
            tracing::debug!(db_path = %db_path, "opening sqlite connection");
            let conn = if db_path.is_empty() || db_path == MEMORY_PATH {
                rusqlite::Connection::open_in_memory()?
            } else {
                rusqlite::Connection::open(&db_path)?
            };
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move {
            let guard = conn.lock().await;
            guard.execute_batch("SELECT 1")
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Build a bb8 pool for `opts` and apply the journal mode on its first connection.
///
/// In-memory databases get a single connection that never idles out or expires, since
/// dropping it would drop the database with it.
///
/// # Errors
///
/// Returns `SqlAdminError::ConfigError` for a zero pool size on a file database,
/// `SqlAdminError::ConnectionError` if the pool cannot be built or the first connection
/// cannot be opened.
pub async fn build_pool(opts: &SqliteOptions) -> Result<Pool<SqliteManager>, SqlAdminError> {
    if opts.effective_pool_size() == 0 {
        return Err(SqlAdminError::ConfigError(
            "pool_size must be at least 1".to_string(),
        ));
    }
    let manager = SqliteManager::new(opts.db_path.clone());
    let mut builder = Pool::builder().max_size(opts.effective_pool_size());
    if opts.is_memory() {
        builder = builder.idle_timeout(None).max_lifetime(None);
    }
    let pool = builder.build(manager).await.map_err(|e| {
        SqlAdminError::ConnectionError(format!("Failed to create SQLite pool: {e}"))
    })?;

    {
        let conn = pool.get().await?;
        let handle = Arc::clone(&*conn);
        // An in-memory database has no journal file to switch.
        if !opts.is_memory() {
            apply_pragmas(handle, opts.journal_mode).await?;
        }
    }

    tracing::info!(
        db_path = %opts.db_path,
        pool_size = opts.effective_pool_size(),
        "sqlite pool ready"
    );
    Ok(pool)
}
