//! Terminal configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults that work for a demo counter out of the box.

use std::env;

use medplus_core::upi::UpiConfig;

use crate::sms::{SmsConfig, SmsProvider};

/// Terminal configuration.
#[derive(Debug, Clone)]
pub struct PosConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// UPI merchant identity for payment links
    pub upi: UpiConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,
}

impl PosConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Variables
    /// - `MEDPLUS_DB_PATH` - SQLite file path (default `./medplus.db`)
    /// - `MERCHANT_VPA` - UPI virtual payment address
    /// - `MERCHANT_NAME` - UPI payee display name
    /// - `FAST2SMS_API_KEY` / `MSG91_API_KEY` - SMS credentials; the first
    ///   one present wins the provider choice. Neither set means SMS runs
    ///   in simulation mode.
    /// - `MSG91_TEMPLATE_ID` - transactional template for MSG91
    pub fn load() -> Self {
        let default_upi = UpiConfig::default();
        let upi = UpiConfig {
            merchant_vpa: env::var("MERCHANT_VPA").unwrap_or(default_upi.merchant_vpa),
            merchant_name: env::var("MERCHANT_NAME").unwrap_or(default_upi.merchant_name),
            merchant_code: default_upi.merchant_code,
        };

        let fast2sms_key = env::var("FAST2SMS_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let msg91_key = env::var("MSG91_API_KEY").ok().filter(|k| !k.trim().is_empty());

        let (provider, api_key) = match (fast2sms_key, msg91_key) {
            (Some(key), _) => (SmsProvider::Fast2Sms, key),
            (None, Some(key)) => (SmsProvider::Msg91, key),
            (None, None) => (SmsProvider::Msg91, String::new()),
        };

        let sms = SmsConfig {
            provider,
            api_key,
            sender_id: env::var("SMS_SENDER_ID").unwrap_or_else(|_| "MEDPLS".to_string()),
            template_id: env::var("MSG91_TEMPLATE_ID").unwrap_or_default(),
        };

        PosConfig {
            database_path: env::var("MEDPLUS_DB_PATH").unwrap_or_else(|_| "./medplus.db".to_string()),
            upi,
            sms,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Env vars may leak between tests; only assert the stable defaults.
        let config = PosConfig::load();
        assert!(!config.upi.merchant_vpa.is_empty());
        assert!(!config.database_path.is_empty());
    }
}
