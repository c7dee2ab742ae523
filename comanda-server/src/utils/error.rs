//! Unified error handling
//!
//! Application-level error type and response envelope:
//! - [`AppError`] - error enum covering the domain taxonomy
//! - [`AppResponse`] - API response structure
//!
//! # Error code convention
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | Generic request errors | E0003 not found |
//! | E1xxx  | Domain rule errors | E1001 invalid transition |
//! | E3xxx  | Identity errors | E3001 missing identity |
//! | E9xxx  | System errors | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Error response envelope
///
/// ```json
/// {
///   "code": "E1001",
///   "message": "Illegal status transition: ..."
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code
    pub code: String,
    /// Message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type AppResult<T> = Result<T, AppError>;

/// Application error enum
///
/// Every variant is a terminal failure for the single operation that raised
/// it; nothing is retried. The message is resurfaced to the operator to
/// correct and resubmit.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Identity (401) ==========
    #[error("Identity required")]
    Unauthorized,

    // ========== Generic request errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== Domain rule errors (4xx) ==========
    #[error("Illegal status transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing reason: {0}")]
    MissingReason(String),

    #[error("Register already open: {0}")]
    AlreadyOpen(String),

    #[error("Register already closed: {0}")]
    AlreadyClosed(String),

    #[error("Session is closed: {0}")]
    SessionClosed(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Identity headers required".to_string(),
            ),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            AppError::InvalidTransition(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E1001", msg.clone())
            }
            AppError::InvalidAmount(msg) => (StatusCode::BAD_REQUEST, "E1002", msg.clone()),
            AppError::MissingReason(msg) => (StatusCode::BAD_REQUEST, "E1003", msg.clone()),
            AppError::AlreadyOpen(msg) => (StatusCode::CONFLICT, "E1004", msg.clone()),
            AppError::AlreadyClosed(msg) => (StatusCode::CONFLICT, "E1005", msg.clone()),
            AppError::SessionClosed(msg) => (StatusCode::CONFLICT, "E1006", msg.clone()),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
