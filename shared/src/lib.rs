//! Shared types for the Comanda POS core
//!
//! Entity models, status enums (with their transition rules), request
//! payloads and small utilities used by both the server and any in-process
//! consumers (printer/notification subscribers).

pub mod message;
pub mod models;
pub mod util;

pub use message::SyncPayload;
