use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlAdminError {
    /// Anything the engine reports: syntax errors, constraint violations, lock contention.
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Invalid identifier: {0} (letters, digits and underscores only, not starting with a digit)")]
    InvalidIdentifier(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl SqlAdminError {
    /// True for failures caused by the caller's input rather than the engine.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SqlAdminError::InvalidIdentifier(_) | SqlAdminError::MissingField(_)
        )
    }
}

impl From<bb8::RunError<rusqlite::Error>> for SqlAdminError {
    fn from(err: bb8::RunError<rusqlite::Error>) -> Self {
        match err {
            bb8::RunError::User(e) => SqlAdminError::SqliteError(e),
            other => SqlAdminError::ConnectionError(format!("SQLite pool error: {other}")),
        }
    }
}
