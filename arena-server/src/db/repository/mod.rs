//! Repository Module
//!
//! One module per aggregate; free async functions taking `&SqlitePool`.
//! Repositories speak `i64` Unix millis only — date/timezone conversion
//! happens above this layer.

pub mod activity;
pub mod competition;
pub mod leaderboard;
pub mod raffle;
pub mod registry;
pub mod scoring;
pub mod sequence;
pub mod ticket;
pub mod turn;

use thiserror::Error;

/// Repository error types
///
/// Terminal variants map 1:1 onto the API taxonomy; `Database` is the
/// transient bucket (safe for the caller to retry the whole call).
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient: {0}")]
    Insufficient(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::InvalidState(msg) => AppError::InvalidState(msg),
            RepoError::Insufficient(msg) => AppError::Insufficient(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
