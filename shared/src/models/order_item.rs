//! Order Item Model
//!
//! One product line within a table's current service. Items move forward
//! through a fixed fulfillment sequence and are never deleted; cancellation
//! and delivery are terminal statuses.

use serde::{Deserialize, Serialize};

/// Fulfillment status of an order item.
///
/// Forward sequence: `PENDING → PREPARING → READY → DELIVERED`.
/// `CANCELLED` is reachable only from `PENDING` or `PREPARING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ItemStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl ItemStatus {
    /// The immediate successor in the forward sequence, if any.
    pub fn next(self) -> Option<ItemStatus> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether `target` is a legal single transition from `self`.
    ///
    /// Legal moves: the immediate successor, or `CANCELLED` while the item
    /// is still `PENDING`/`PREPARING`. No skipping, no moving backwards,
    /// nothing out of a terminal status.
    pub fn can_transition_to(self, target: ItemStatus) -> bool {
        if target == Self::Cancelled {
            return matches!(self, Self::Pending | Self::Preparing);
        }
        self.next() == Some(target)
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Display priority for aggregate views: the least-fulfilled status
    /// wins, so a table with one `PENDING` item shows `PENDING`.
    pub fn urgency(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Preparing => 1,
            Self::Ready => 2,
            Self::Delivered => 3,
            Self::Cancelled => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Order item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub tenant_id: String,
    pub table_id: i64,
    pub product_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub unit_price: f64,
    pub note: Option<String>,
    pub status: ItemStatus,
    /// Set when the owning table is settled; active items have NULL here
    pub settled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderItem {
    /// Whether the item still belongs to the table's active service and
    /// counts toward its total and derived status.
    pub fn is_active(&self) -> bool {
        self.settled_at.is_none() && self.status != ItemStatus::Cancelled
    }
}

/// Add item payload (POST /api/tables/:id/items)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub unit_price: f64,
    pub note: Option<String>,
}

/// Advance status payload (POST /api/order-items/:id/status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemAdvance {
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_sequence_is_single_step() {
        assert!(ItemStatus::Pending.can_transition_to(ItemStatus::Preparing));
        assert!(ItemStatus::Preparing.can_transition_to(ItemStatus::Ready));
        assert!(ItemStatus::Ready.can_transition_to(ItemStatus::Delivered));

        // No skipping
        assert!(!ItemStatus::Pending.can_transition_to(ItemStatus::Ready));
        assert!(!ItemStatus::Pending.can_transition_to(ItemStatus::Delivered));
        // No moving backwards
        assert!(!ItemStatus::Ready.can_transition_to(ItemStatus::Preparing));
        // No self-transition
        assert!(!ItemStatus::Preparing.can_transition_to(ItemStatus::Preparing));
    }

    #[test]
    fn cancellation_only_from_pending_or_preparing() {
        assert!(ItemStatus::Pending.can_transition_to(ItemStatus::Cancelled));
        assert!(ItemStatus::Preparing.can_transition_to(ItemStatus::Cancelled));
        assert!(!ItemStatus::Ready.can_transition_to(ItemStatus::Cancelled));
        assert!(!ItemStatus::Delivered.can_transition_to(ItemStatus::Cancelled));
        assert!(!ItemStatus::Cancelled.can_transition_to(ItemStatus::Cancelled));
    }

    #[test]
    fn terminal_statuses_are_immutable() {
        for target in [
            ItemStatus::Pending,
            ItemStatus::Preparing,
            ItemStatus::Ready,
            ItemStatus::Delivered,
            ItemStatus::Cancelled,
        ] {
            assert!(!ItemStatus::Delivered.can_transition_to(target));
            assert!(!ItemStatus::Cancelled.can_transition_to(target));
        }
        assert!(ItemStatus::Delivered.is_terminal());
        assert!(ItemStatus::Cancelled.is_terminal());
        assert!(!ItemStatus::Ready.is_terminal());
    }

    #[test]
    fn urgency_orders_least_fulfilled_first() {
        assert!(ItemStatus::Pending.urgency() < ItemStatus::Preparing.urgency());
        assert!(ItemStatus::Preparing.urgency() < ItemStatus::Ready.urgency());
        assert!(ItemStatus::Ready.urgency() < ItemStatus::Delivered.urgency());
    }
}
