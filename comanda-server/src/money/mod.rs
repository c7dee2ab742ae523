//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64` (REAL) and serialized as plain JSON numbers,
//! but every calculation runs on `Decimal` and is rounded to 2 decimal
//! places half-up on the way out.

use rust_decimal::prelude::*;
use shared::models::{CashMovement, OrderItem};

/// Rounding for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Convert an f64 into a Decimal (NaN/Infinity collapse to zero; callers
/// validate finiteness before any value gets this far)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64, rounded to 2 dp half-up
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Sum of `unit_price × quantity` over a table's active non-cancelled
/// items. Zero for a table with no items.
pub fn table_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .filter(|i| i.is_active())
        .map(|i| to_decimal(i.unit_price) * Decimal::from(i.quantity))
        .sum()
}

/// Ledger balance: `opening + Σin − Σout`.
///
/// Recomputed from the full movement list on every call — an O(n) scan, but
/// the balance is always consistent with the ledger no matter how movements
/// interleave.
pub fn session_balance(opening_balance: f64, movements: &[CashMovement]) -> Decimal {
    movements
        .iter()
        .fold(to_decimal(opening_balance), |acc, m| {
            acc + to_decimal(m.amount) * Decimal::from(m.direction.sign())
        })
}

/// Counted minus computed; surfaced to the operator, never enforced.
pub fn discrepancy(counted_balance: f64, system_balance: f64) -> f64 {
    to_f64(to_decimal(counted_balance) - to_decimal(system_balance))
}

#[cfg(test)]
mod tests;
