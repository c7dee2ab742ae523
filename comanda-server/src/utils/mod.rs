//! Utility module — common helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error surface
//! - [`AppResponse`] - API response envelope
//! - validation, time and logging helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
