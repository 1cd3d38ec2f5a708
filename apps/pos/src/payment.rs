//! # UPI Link Provider
//!
//! Provisions UPI deep links for QR display. Link construction is local
//! (no gateway involved), so the only failure mode is a misconfigured
//! merchant identity.

use medplus_core::upi::{build_upi_link, PaymentRequest, UpiConfig};

use crate::checkout::PaymentLinkProvider;
use crate::error::{PosError, PosResult};

/// Builds NPCI-style deep links from the configured merchant identity.
#[derive(Debug, Clone)]
pub struct UpiLinkProvider {
    config: UpiConfig,
}

impl UpiLinkProvider {
    pub fn new(config: UpiConfig) -> Self {
        UpiLinkProvider { config }
    }
}

impl PaymentLinkProvider for UpiLinkProvider {
    async fn create_link(&self, request: &PaymentRequest) -> PosResult<String> {
        if self.config.merchant_vpa.trim().is_empty() {
            return Err(PosError::payment("Merchant VPA is not configured"));
        }
        Ok(build_upi_link(&self.config, request))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use medplus_core::money::Money;

    #[tokio::test]
    async fn test_link_from_default_merchant() {
        let provider = UpiLinkProvider::new(UpiConfig::default());
        let link = provider
            .create_link(&PaymentRequest {
                amount: Money::from_paise(5760),
                note: "Pharmacy Bill".to_string(),
                reference: "PHM1".to_string(),
            })
            .await
            .unwrap();

        assert!(link.starts_with("upi://pay?pa=medplus%40paytm"));
        assert!(link.contains("am=57.60"));
    }

    #[tokio::test]
    async fn test_blank_vpa_rejected() {
        let provider = UpiLinkProvider::new(UpiConfig {
            merchant_vpa: "  ".to_string(),
            ..UpiConfig::default()
        });

        let err = provider
            .create_link(&PaymentRequest {
                amount: Money::from_paise(100),
                note: "Bill".to_string(),
                reference: "PHM2".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.message.contains("VPA"));
    }
}
