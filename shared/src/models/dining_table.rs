//! Dining Table Model
//!
//! Table status is derived from the active order items plus an explicit
//! checkout marker; `total` is the denormalized sum of active non-cancelled
//! items, recomputed on every item mutation.

use serde::{Deserialize, Serialize};

/// Derived table status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TableStatus {
    Free,
    Occupied,
    AwaitingPayment,
}

impl Default for TableStatus {
    fn default() -> Self {
        Self::Free
    }
}

impl TableStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Occupied => "OCCUPIED",
            Self::AwaitingPayment => "AWAITING_PAYMENT",
        }
    }
}

/// Dining table entity
///
/// Invariant: `FREE` tables have no `opened_at`, no `server_name` and a
/// zero `total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub tenant_id: String,
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    /// When the current service started (first item added)
    pub opened_at: Option<i64>,
    /// Server assigned to the current service
    pub server_name: Option<String>,
    /// Sum of active non-cancelled items
    pub total: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i32,
    pub capacity: Option<i32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub number: Option<i32>,
    pub capacity: Option<i32>,
    pub server_name: Option<String>,
    pub is_active: Option<bool>,
}
