//! Input validation helpers
//!
//! Centralized text length constants and validation functions. SQLite TEXT
//! has no built-in length enforcement, so limits are applied here before
//! any write.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product line names, server names, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, reasons (movement reason, closing note, item note, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: payment method tags, category labels, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Upper bound for any single monetary amount
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Upper bound for an item quantity
pub const MAX_QUANTITY: i32 = 9999;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let chars = value.chars().count();
    if chars > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({chars} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate a cash amount is finite, non-negative and within bounds.
pub fn validate_cash(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::invalid_amount(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::invalid_amount(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::invalid_amount(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate an item quantity is positive and within bounds.
pub fn validate_quantity(value: i32, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    if value > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_QUANTITY}), got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_rejects_nan_and_negative() {
        assert!(validate_cash(f64::NAN, "opening_balance").is_err());
        assert!(validate_cash(f64::INFINITY, "opening_balance").is_err());
        assert!(validate_cash(-0.01, "opening_balance").is_err());
        assert!(validate_cash(0.0, "opening_balance").is_ok());
        assert!(validate_cash(100.0, "opening_balance").is_ok());
    }

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("  ", "reason", MAX_NOTE_LEN).is_err());
        assert!(validate_required_text("venda", "reason", MAX_NOTE_LEN).is_ok());
        assert!(validate_required_text(&"x".repeat(501), "reason", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        // At the character limit, over it in bytes
        let name = "pão".chars().cycle().take(MAX_NAME_LEN).collect::<String>();
        assert!(name.len() > MAX_NAME_LEN);
        assert!(validate_required_text(&name, "name", MAX_NAME_LEN).is_ok());

        let over = "ã".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&over, "name", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&Some(over), "name", MAX_NAME_LEN).is_err());
        assert!(
            validate_optional_text(&Some("café".repeat(25)), "category", MAX_SHORT_TEXT_LEN)
                .is_ok()
        );
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(0, "quantity").is_err());
        assert!(validate_quantity(-1, "quantity").is_err());
        assert!(validate_quantity(1, "quantity").is_ok());
        assert!(validate_quantity(10_000, "quantity").is_err());
    }
}
