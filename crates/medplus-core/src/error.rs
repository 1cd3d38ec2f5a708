//! # Error Types
//!
//! Domain-specific error types for medplus-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medplus-core errors (this file)                                       │
//! │  ├── ValidationError   - Bad input: blocks the action, no state change │
//! │  └── CoreError         - Business rule violations                      │
//! │      └── InsufficientStock - "capacity" warnings: block one mutation   │
//! │                                                                         │
//! │  medplus-store errors (separate crate)                                 │
//! │  └── StoreError        - Collaborator failures: logged, degraded       │
//! │                                                                         │
//! │  apps/pos errors                                                       │
//! │  └── PosError          - What the operator sees (code + message)       │
//! │                                                                         │
//! │  Nothing in this core is fatal to the process; every failure is        │
//! │  scoped to the operation that raised it.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity exceeds the stock snapshot taken at search time.
    ///
    /// Surfaced as a warning: it blocks the specific cart mutation and
    /// nothing else. The stock figure is advisory (not re-validated against
    /// concurrent sales), which is an accepted limitation of the design.
    #[error("Only {available} units of {name} available (requested {requested})")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// The cart has no line for the given product id.
    #[error("Product not in cart: {0}")]
    LineNotFound(String),

    /// Checkout was attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when operator input doesn't meet requirements. They are
/// surfaced immediately, block the action, and cause no state change.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., a phone number that isn't 10 digits).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Dolo 650".to_string(),
            available: 3,
            requested: 4,
        };
        assert_eq!(
            err.to_string(),
            "Only 3 units of Dolo 650 available (requested 4)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "phone is required");

        let err = ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be exactly 10 digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "phone has invalid format: must be exactly 10 digits"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "phone".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
