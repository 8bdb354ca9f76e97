//! Database error types for hall-db.

use hall_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., illegal status transition).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Caller input was rejected before touching the database.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The acting user is not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CoreError> for DatabaseError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::NoResult,
            CoreError::InvalidTransition { .. } => Self::InvalidState(err.to_string()),
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Other(inner) => Self::Other(inner),
        }
    }
}
