//! Cash Register Models
//!
//! A register session is a bounded period of recorded cash movements
//! between an explicit open and close. Movements form an append-only
//! ledger; the session balance is always recomputed from it, never stored
//! while the session is open.

use serde::{Deserialize, Serialize};

/// Register session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SessionStatus {
    Open,
    Closed,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Direction of a cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    /// Sign applied to the amount when accumulating the session balance.
    pub fn sign(self) -> i64 {
        match self {
            Self::In => 1,
            Self::Out => -1,
        }
    }
}

/// Register session entity
///
/// At most one `OPEN` session per tenant; `closing_balance` and
/// `system_balance` stay NULL while open. Once closed the session is
/// immutable and accepts no further movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RegisterSession {
    pub id: i64,
    pub tenant_id: String,
    /// User who opened the register
    pub opened_by: String,
    pub opening_balance: f64,
    /// Counted balance recorded at close
    pub closing_balance: Option<f64>,
    /// Ledger balance captured at close, for reconciliation
    pub system_balance: Option<f64>,
    pub status: SessionStatus,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
    pub note: Option<String>,
}

/// Cash movement entity (append-only ledger entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashMovement {
    pub id: i64,
    pub session_id: i64,
    pub direction: MovementDirection,
    pub amount: f64,
    pub reason: String,
    pub note: Option<String>,
    /// Payment method tag ("cash", "card", ...), free-form
    pub method: Option<String>,
    pub recorded_by: String,
    pub created_at: i64,
}

/// Open register payload (POST /api/registers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterOpen {
    /// Counted cash in the drawer at open (default 0)
    #[serde(default)]
    pub opening_balance: f64,
    pub note: Option<String>,
}

/// Close register payload (POST /api/registers/:id/close)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClose {
    /// Physically counted cash at close
    pub counted_balance: f64,
    pub note: Option<String>,
}

/// Record movement payload (POST /api/registers/:id/movements)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashMovementCreate {
    pub direction: MovementDirection,
    pub amount: f64,
    pub reason: String,
    pub note: Option<String>,
    pub method: Option<String>,
}
