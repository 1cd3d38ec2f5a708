//! # Terminal Error Type
//!
//! Unified error type for operator-facing operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Error Flow in MedPlus POS                              │
//! │                                                                         │
//! │  Operator action                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Checkout / cart / catalog call                                  │  │
//! │  │  Result<T, PosError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store error?  ──── StoreError::QueryFailed("...") ──┐          │  │
//! │  │         │                                            │          │  │
//! │  │         ▼                                            ▼          │  │
//! │  │  Bad input? ─────── ValidationError ────────────── PosError ──► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The terminal prints `message` and keeps running; `code` decides       │
//! │  whether the line is rendered as a warning or an error.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use medplus_core::{CoreError, ValidationError};
use medplus_store::StoreError;

/// Error surfaced to the operator.
///
/// Carries both a machine-readable `code` for programmatic handling and a
/// human-readable `message` for display at the terminal.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct PosError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for operator-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Storage operation failed
    StorageError,

    /// Cart operation failed
    CartError,

    /// Requested quantity exceeds available stock
    InsufficientStock,

    /// Payment flow error (wrong state, link generation failure)
    PaymentError,

    /// Internal error
    Internal,
}

impl PosError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        PosError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a payment flow error.
    pub fn payment(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::PaymentError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::Internal, message)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for PosError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::LineNotFound(_) => ErrorCode::NotFound,
            CoreError::EmptyCart => ErrorCode::CartError,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        PosError::new(code, err.to_string())
    }
}

impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::validation(err.to_string())
    }
}

impl From<StoreError> for PosError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::NonPositiveDelta(_) | StoreError::InvalidQuery(_) => {
                ErrorCode::ValidationError
            }
            _ => ErrorCode::StorageError,
        };
        PosError::new(code, err.to_string())
    }
}

/// Result type for terminal operations.
pub type PosResult<T> = Result<T, PosError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: PosError = CoreError::InsufficientStock {
            name: "Dolo 650".to_string(),
            available: 3,
            requested: 4,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Dolo 650"));
    }

    #[test]
    fn test_display_renders_message() {
        let err = PosError::validation("Discount must be a number");
        assert_eq!(err.to_string(), "Discount must be a number");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert_eq!(boxed.to_string(), "Discount must be a number");
    }

    #[test]
    fn test_store_error_mapping() {
        let err: PosError = StoreError::NonPositiveDelta(0).into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: PosError = StoreError::InvalidQuery("too long".to_string()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: PosError = StoreError::QueryFailed("boom".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
    }
}
