//! # UPI Deep Links
//!
//! Builds NPCI-style UPI deep links for QR display at the counter.
//!
//! ## Link Format
//! ```text
//! upi://pay?pa=<VPA>&pn=<NAME>&am=<AMOUNT>&tn=<NOTE>&tr=<REF>&cu=INR
//! ```
//!
//! The customer scans the rendered QR with any UPI app (GPay, PhonePe,
//! Paytm). The link is a payment *request*; completion is never observed
//! here. Whether money actually moved is attested by the operator at the
//! terminal.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Merchant Configuration
// =============================================================================

/// Merchant identity embedded in every payment link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpiConfig {
    /// Payee display name (`pn` parameter).
    pub merchant_name: String,

    /// Virtual payment address (`pa` parameter), e.g. "medplus@paytm".
    pub merchant_vpa: String,

    /// Internal merchant code, not part of the link.
    pub merchant_code: String,
}

impl Default for UpiConfig {
    fn default() -> Self {
        UpiConfig {
            merchant_name: "MedPlus Pharmacy".to_string(),
            merchant_vpa: "medplus@paytm".to_string(),
            merchant_code: "PHM001".to_string(),
        }
    }
}

// =============================================================================
// Payment Request
// =============================================================================

/// One payment request: the amount due plus the reference that ties the
/// eventual bank-side entry back to this bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount payable; rendered as a bare decimal ("57.60") in `am`.
    pub amount: Money,

    /// Human note shown in the payer's UPI app (`tn` parameter).
    pub note: String,

    /// Unique bill reference (`tr` parameter), e.g. "PHM1724500000000".
    pub reference: String,
}

/// Builds the UPI deep link for a payment request.
///
/// All parameter values are percent-encoded; the amount uses the two-decimal
/// form UPI apps expect.
pub fn build_upi_link(config: &UpiConfig, request: &PaymentRequest) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&tn={}&tr={}&cu=INR",
        urlencoding::encode(&config.merchant_vpa),
        urlencoding::encode(&config.merchant_name),
        request.amount.to_decimal_string(),
        urlencoding::encode(&request.note),
        urlencoding::encode(&request.reference),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_structure() {
        let config = UpiConfig::default();
        let request = PaymentRequest {
            amount: Money::from_paise(5760),
            note: "Pharmacy Bill".to_string(),
            reference: "PHM1724500000000".to_string(),
        };

        let link = build_upi_link(&config, &request);
        assert!(link.starts_with("upi://pay?"));
        assert!(link.contains("pa=medplus%40paytm"));
        assert!(link.contains("pn=MedPlus%20Pharmacy"));
        assert!(link.contains("am=57.60"));
        assert!(link.contains("tr=PHM1724500000000"));
        assert!(link.ends_with("&cu=INR"));
    }

    #[test]
    fn test_amount_always_two_decimals() {
        let config = UpiConfig::default();
        let request = PaymentRequest {
            amount: Money::from_paise(10000),
            note: "Bill".to_string(),
            reference: "PHM1".to_string(),
        };
        assert!(build_upi_link(&config, &request).contains("am=100.00"));
    }

    #[test]
    fn test_note_is_encoded() {
        let config = UpiConfig::default();
        let request = PaymentRequest {
            amount: Money::from_paise(100),
            note: "Bill & receipt".to_string(),
            reference: "PHM2".to_string(),
        };
        let link = build_upi_link(&config, &request);
        assert!(link.contains("tn=Bill%20%26%20receipt"));
    }
}
