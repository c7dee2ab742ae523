//! Repository Module
//!
//! Per-entity data access over the SQLite pool. Every state transition is a
//! single conditional write (`UPDATE ... WHERE status = ?` or a guarded
//! `INSERT ... SELECT`); a transition lost to a concurrent writer shows up
//! as zero rows affected and is reported, never retried.

pub mod dining_table;
pub mod order_item;
pub mod register;

use crate::utils::AppError;
use thiserror::Error;

/// Repository error types
///
/// Domain rule failures are distinct variants so the API layer can map each
/// one to its own error code.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing reason: {0}")]
    MissingReason(String),

    #[error("Already open: {0}")]
    AlreadyOpen(String),

    #[error("Already closed: {0}")]
    AlreadyClosed(String),

    #[error("Session closed: {0}")]
    SessionClosed(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::InvalidTransition(msg) => AppError::InvalidTransition(msg),
            RepoError::InvalidAmount(msg) => AppError::InvalidAmount(msg),
            RepoError::MissingReason(msg) => AppError::MissingReason(msg),
            RepoError::AlreadyOpen(msg) => AppError::AlreadyOpen(msg),
            RepoError::AlreadyClosed(msg) => AppError::AlreadyClosed(msg),
            RepoError::SessionClosed(msg) => AppError::SessionClosed(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}
