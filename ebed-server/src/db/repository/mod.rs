//! Repository Module
//!
//! Free async functions over `&SqlitePool`, one module per table group.
//! Functions that write take the timestamp as an argument so callers
//! (and tests) control time.

pub mod daily_menu;
pub mod food;
pub mod order;
pub mod statistics;
pub mod user;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain rule failure carrying its own error code
    #[error("{1}")]
    Business(ErrorCode, String),

    #[error("Store call timed out")]
    Timeout,
}

impl RepoError {
    pub fn business(code: ErrorCode) -> Self {
        Self::Business(code, code.message().to_string())
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut => RepoError::Timeout,
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Business(code, msg) => AppError::with_message(code, msg),
            RepoError::Timeout => AppError::timeout(),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a write transaction that takes the SQLite write lock up front.
///
/// A deferred `BEGIN` that reads before writing cannot upgrade its snapshot
/// once another connection commits; SQLite then fails with `SQLITE_BUSY`
/// without consulting `busy_timeout`. `BEGIN IMMEDIATE` waits instead.
pub(crate) async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
