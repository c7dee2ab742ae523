//! Order-item and table state-machine rules
//!
//! Pure functions over the shared status enums. The repository layer calls
//! these before touching the database, so an illegal transition never
//! reaches the store.

use shared::models::{ItemStatus, OrderItem, TableStatus};
use thiserror::Error;

/// An illegal status move, reported with both endpoints.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot move item from {from} to {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// Check a single item transition.
///
/// Legal: the immediate successor in
/// `PENDING → PREPARING → READY → DELIVERED`, or `CANCELLED` from
/// `PENDING`/`PREPARING`. Everything else fails and nothing is mutated.
pub fn ensure_transition(current: ItemStatus, target: ItemStatus) -> Result<(), TransitionError> {
    if current.can_transition_to(target) {
        Ok(())
    } else {
        Err(TransitionError {
            from: current.as_str(),
            to: target.as_str(),
        })
    }
}

/// The least-fulfilled status among a table's active items, for aggregate
/// views: `PENDING > PREPARING > READY > DELIVERED`, first match wins.
/// Cancelled and settled items are ignored.
pub fn most_urgent_status(items: &[OrderItem]) -> Option<ItemStatus> {
    items
        .iter()
        .filter(|i| i.is_active())
        .map(|i| i.status)
        .min_by_key(|s| s.urgency())
}

/// Derive a table's status from its active items and the checkout marker.
///
/// A table holding only cancelled (or settled) items counts as free; a
/// table marked for checkout stays `AWAITING_PAYMENT` until settlement
/// regardless of its items.
pub fn derive_table_status(items: &[OrderItem], checkout_requested: bool) -> TableStatus {
    if checkout_requested {
        return TableStatus::AwaitingPayment;
    }
    if items.iter().any(|i| i.is_active()) {
        TableStatus::Occupied
    } else {
        TableStatus::Free
    }
}
