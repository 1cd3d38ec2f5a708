//! # Validation Module
//!
//! Input validation utilities for MedPlus POS.
//!
//! ## Validation Strategy
//! Validation happens before business logic runs: the checkout entry guard
//! calls [`validate_phone`], cart mutations call the quantity/pack-size
//! checks, the stock-entry workflow calls [`validate_stock_delta`], and
//! catalog search calls [`validate_search_query`] before touching the
//! database. A validation failure blocks the action and changes no state.
//!
//! ## Usage
//! ```rust
//! use medplus_core::validation::{validate_phone, validate_quantity};
//!
//! // Phone: non-digits stripped, must leave exactly 10 digits
//! assert_eq!(validate_phone("98765-43210").unwrap(), "9876543210");
//!
//! // Quantity must be positive
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Phone Validation
// =============================================================================

/// Validates a customer phone number.
///
/// ## Rules
/// - Non-digit characters are stripped first (spaces, dashes, "+91" noise)
/// - What remains must be exactly 10 digits
///
/// ## Returns
/// The cleaned 10-digit string, which is what gets persisted and what the
/// SMS providers receive.
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let clean: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if clean.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if clean.len() != 10 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be exactly 10 digits".to_string(),
        });
    }

    Ok(clean)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity value: must be positive (> 0).
///
/// Zero is not an error at the cart-operation level (it means "remove the
/// line"); this validator is for contexts where a real quantity is required.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a pack size: must be at least 1.
pub fn validate_pack_size(pack_size: i64) -> ValidationResult<()> {
    if pack_size < 1 {
        return Err(ValidationError::MustBePositive {
            field: "pack size".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock-adjustment delta: must be strictly positive.
///
/// The stock-entry workflow only adds stock; decrements happen implicitly
/// through sales elsewhere.
pub fn validate_stock_delta(delta: i64) -> ValidationResult<()> {
    if delta <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "stock delta".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns the bounded "browse" listing)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_strips_non_digits() {
        assert_eq!(validate_phone("9876543210").unwrap(), "9876543210");
        assert_eq!(validate_phone("98765 43210").unwrap(), "9876543210");
        assert_eq!(validate_phone("98-76-54-32-10").unwrap(), "9876543210");
    }

    #[test]
    fn test_validate_phone_rejects_wrong_length() {
        // 9 digits
        assert!(validate_phone("987654321").is_err());
        // 11 digits
        assert!(validate_phone("19876543210").is_err());
        // Empty / all noise
        assert!(validate_phone("").is_err());
        assert!(validate_phone("abc-def").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_pack_size() {
        assert!(validate_pack_size(1).is_ok());
        assert!(validate_pack_size(10).is_ok());
        assert!(validate_pack_size(0).is_err());
        assert!(validate_pack_size(-3).is_err());
    }

    #[test]
    fn test_validate_stock_delta() {
        assert!(validate_stock_delta(5).is_ok());
        assert!(validate_stock_delta(0).is_err());
        assert!(validate_stock_delta(-5).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  dolo ").unwrap(), "dolo");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }
}
