//! # SMS Receipt Service
//!
//! Sends the post-sale receipt over SMS via an Indian bulk-SMS provider.
//!
//! ## Delivery Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     SMS Receipt Dispatch                                │
//! │                                                                         │
//! │  Sale completes                                                        │
//! │       │                                                                 │
//! │       ▼  (fire-and-forget: spawned task, sale never waits)             │
//! │  SmsNotifier::dispatch(phone, receipt)                                 │
//! │       │                                                                 │
//! │       ├── API key configured? ──► MSG91 or Fast2SMS over HTTPS         │
//! │       │                              │                                  │
//! │       │                              ├── 2xx + provider ack → sent     │
//! │       │                              └── anything else → logged, done  │
//! │       │                                                                 │
//! │       └── No key / DEMO_KEY ──► simulation: log the message, succeed   │
//! │                                                                         │
//! │  Delivery outcome NEVER affects the sale.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::json;
use tracing::{info, warn};

use medplus_core::receipt::{format_receipt_short, ReceiptData};
use medplus_core::validation::validate_phone;

use crate::checkout::ReceiptNotifier;

// =============================================================================
// Configuration
// =============================================================================

/// Which bulk-SMS provider to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsProvider {
    /// MSG91 transactional flow API.
    Msg91,
    /// Fast2SMS bulk quick route.
    Fast2Sms,
}

/// SMS provider configuration.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub provider: SmsProvider,

    /// Empty or "DEMO_KEY" switches the service into simulation mode.
    pub api_key: String,

    /// Sender id registered with the provider (6 chars for India DLT).
    pub sender_id: String,

    /// MSG91 transactional template id.
    pub template_id: String,
}

impl SmsConfig {
    /// Whether delivery should be simulated instead of calling a provider.
    pub fn is_simulation(&self) -> bool {
        let key = self.api_key.trim();
        key.is_empty() || key == "DEMO_KEY"
    }
}

/// Delivery outcome, for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsOutcome {
    Sent,
    Simulated,
    Failed,
}

// =============================================================================
// Service
// =============================================================================

/// SMS delivery over HTTPS.
#[derive(Debug, Clone)]
pub struct SmsService {
    config: SmsConfig,
    client: reqwest::Client,
}

impl SmsService {
    /// Creates a new SMS service.
    pub fn new(config: SmsConfig) -> Self {
        SmsService {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Formats and sends a receipt. Never panics and never returns an
    /// error: every failure mode collapses to an outcome for the log line.
    ///
    /// The phone is re-validated here (exactly 10 digits after stripping
    /// non-digits); a bad number fails fast without touching a provider.
    pub async fn send_receipt(&self, phone: &str, receipt: &ReceiptData) -> SmsOutcome {
        let phone = match validate_phone(phone) {
            Ok(clean) => clean,
            Err(e) => {
                warn!(error = %e, "Refusing SMS to invalid phone");
                return SmsOutcome::Failed;
            }
        };
        let phone = phone.as_str();

        let message = format_receipt_short(receipt);

        if self.config.is_simulation() {
            info!(to = %phone, "[SMS SIMULATION] {}", message);
            return SmsOutcome::Simulated;
        }

        let sent = match self.config.provider {
            SmsProvider::Msg91 => self.send_via_msg91(phone, &message).await,
            SmsProvider::Fast2Sms => self.send_via_fast2sms(phone, &message).await,
        };

        if sent {
            info!(to = %phone, provider = ?self.config.provider, "Receipt SMS sent");
            SmsOutcome::Sent
        } else {
            warn!(to = %phone, provider = ?self.config.provider, "Receipt SMS delivery failed");
            SmsOutcome::Failed
        }
    }

    /// MSG91 flow request body.
    fn msg91_body(&self, phone: &str, message: &str) -> serde_json::Value {
        // MSG91 wants the 91 country prefix on the 10-digit number, and the
        // DLT-registered sender id on every transactional send
        json!({
            "template_id": self.config.template_id,
            "sender": self.config.sender_id,
            "short_url": "0",
            "recipients": [{
                "mobiles": format!("91{}", phone),
                "var": message,
            }],
        })
    }

    /// MSG91 transactional flow API.
    async fn send_via_msg91(&self, phone: &str, message: &str) -> bool {
        let body = self.msg91_body(phone, message);

        let response = self
            .client
            .post("https://api.msg91.com/api/v5/flow/")
            .header("authkey", &self.config.api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) => match resp.json::<serde_json::Value>().await {
                Ok(data) => data["type"] == "success",
                Err(e) => {
                    warn!(error = %e, "MSG91 returned unparseable response");
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "MSG91 request failed");
                false
            }
        }
    }

    /// Fast2SMS bulk quick route.
    async fn send_via_fast2sms(&self, phone: &str, message: &str) -> bool {
        let body = json!({
            "route": "q",
            "message": message,
            "language": "english",
            "flash": 0,
            "numbers": phone,
        });

        let response = self
            .client
            .post("https://www.fast2sms.com/dev/bulkV2")
            .header("authorization", &self.config.api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) => match resp.json::<serde_json::Value>().await {
                Ok(data) => data["return"] == true,
                Err(e) => {
                    warn!(error = %e, "Fast2SMS returned unparseable response");
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "Fast2SMS request failed");
                false
            }
        }
    }
}

// =============================================================================
// Notifier Adapter
// =============================================================================

/// Fire-and-forget adapter: spawns the send onto the runtime so the
/// checkout never waits on the network.
#[derive(Debug, Clone)]
pub struct SmsNotifier {
    service: SmsService,
}

impl SmsNotifier {
    pub fn new(config: SmsConfig) -> Self {
        SmsNotifier {
            service: SmsService::new(config),
        }
    }
}

impl ReceiptNotifier for SmsNotifier {
    fn dispatch(&self, phone: &str, receipt: ReceiptData) {
        let service = self.service.clone();
        let phone = phone.to_string();
        tokio::spawn(async move {
            service.send_receipt(&phone, &receipt).await;
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use medplus_core::money::Money;
    use medplus_core::receipt::ReceiptItem;
    use medplus_core::types::PaymentMethod;

    fn sample_receipt() -> ReceiptData {
        ReceiptData {
            bill_number: "PHM1".to_string(),
            customer_name: Some("Asha".to_string()),
            items: vec![ReceiptItem {
                name: "Dolo 650".to_string(),
                quantity: 2,
                unit_price: Money::from_paise(3200),
            }],
            total: Money::from_paise(5760),
            payment_method: PaymentMethod::Cash,
            date: "24/08/2026".to_string(),
        }
    }

    fn config(api_key: &str) -> SmsConfig {
        SmsConfig {
            provider: SmsProvider::Msg91,
            api_key: api_key.to_string(),
            sender_id: "MEDPLS".to_string(),
            template_id: String::new(),
        }
    }

    #[test]
    fn test_simulation_detection() {
        assert!(config("").is_simulation());
        assert!(config("  ").is_simulation());
        assert!(config("DEMO_KEY").is_simulation());
        assert!(!config("real-key").is_simulation());
    }

    #[tokio::test]
    async fn test_missing_key_simulates_success() {
        let service = SmsService::new(config(""));
        let outcome = service.send_receipt("9876543210", &sample_receipt()).await;
        assert_eq!(outcome, SmsOutcome::Simulated);
    }

    #[test]
    fn test_msg91_body_carries_sender_id() {
        let service = SmsService::new(config("real-key"));
        let body = service.msg91_body("9876543210", "MedPlus Bill PHM1");

        assert_eq!(body["sender"], "MEDPLS");
        assert_eq!(body["recipients"][0]["mobiles"], "919876543210");
        assert_eq!(body["recipients"][0]["var"], "MedPlus Bill PHM1");
    }

    #[tokio::test]
    async fn test_invalid_phone_fails_fast() {
        let service = SmsService::new(config(""));
        let outcome = service.send_receipt("98765", &sample_receipt()).await;
        assert_eq!(outcome, SmsOutcome::Failed);
    }
}
