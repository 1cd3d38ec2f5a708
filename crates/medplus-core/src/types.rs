//! # Domain Types
//!
//! Core domain types used throughout MedPlus POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Transaction   │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (stable)    │   │  id ("TXN…")    │   │  phone (key)    │       │
//! │  │  name           │   │  bill_number    │   │  visit_count    │       │
//! │  │  mrp (Money)    │   │  items snapshot │   │  total_purchases│       │
//! │  │  stock_quantity │   │  totals + GST   │   │  last_visit     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DiscountPercent │   │ PaymentMethod   │   │ PaymentStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (i64)      │   │  Cash           │   │  Completed      │       │
//! │  │  UNCLAMPED      │   │  UpiQr          │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::money::Money;

// =============================================================================
// Discount Percent
// =============================================================================

/// Operator-supplied discount rate in basis points (1 bps = 0.01%).
///
/// ## Deliberately Unclamped
/// Operator-entered rates are not clamped to [0, 100]; negative values
/// (a surcharge) and rates above 100% pass through the bill math unchanged.
/// The operator is trusted here, so there is no validation on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPercent(i64);

impl DiscountPercent {
    /// Creates a discount rate from basis points (1000 = 10%).
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        DiscountPercent(bps)
    }

    /// Creates a discount rate from a percentage (for operator input).
    pub fn from_percent(pct: f64) -> Self {
        DiscountPercent((pct * 100.0).round() as i64)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountPercent(0)
    }
}

impl Default for DiscountPercent {
    fn default() -> Self {
        DiscountPercent::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product returned by the catalog lookup.
///
/// Read-only from the billing engine's point of view; the cart takes a
/// snapshot of the fields it needs when a line is added. The stock figure
/// is advisory: captured at search time, never re-checked against
/// concurrent sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: String,

    /// Display name shown to the operator and on the receipt.
    pub name: String,

    /// Product category ("Medicine" for the whole catalog today).
    pub category: String,

    /// Unit retail price; used directly as the line price.
    pub mrp: Money,

    /// Pack cost, when known. Required for pack-size repricing.
    pub cost_price: Option<Money>,

    /// Available stock at lookup time (non-negative).
    pub stock_quantity: i64,

    /// Units per purchasable pack (>= 1).
    pub pack_size: i64,

    /// Batch identifier, displayed on search results and cart lines.
    pub batch_id: Option<String>,

    /// Expiry date, displayed but not validated.
    pub expiry_date: Option<String>,
}

impl Product {
    /// Checks whether at least `quantity` units are in stock.
    ///
    /// Snapshot-based: trusts the figure captured at search time.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Whether this product should raise a low-stock warning in the cart.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < crate::LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Payment Method & Status
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash, trusted on operator confirmation.
    Cash,
    /// UPI push payment via scanned QR; completion is operator-attested.
    UpiQr,
}

impl PaymentMethod {
    /// Stable wire/storage form ("CASH" / "UPI_QR").
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::UpiQr => "UPI_QR",
        }
    }

    /// Parses the storage form back into the enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(PaymentMethod::Cash),
            "UPI_QR" => Some(PaymentMethod::UpiQr),
            _ => None,
        }
    }

    /// Human form used in receipts ("CASH" / "UPI QR").
    pub const fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::UpiQr => "UPI QR",
        }
    }
}

/// Status of a recorded payment.
///
/// Only `Completed` exists today: a transaction is constructed exactly once,
/// at payment confirmation time. The enum leaves room for refunds later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "COMPLETED",
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale. Immutable once constructed.
///
/// ## Lifecycle
/// Constructed at payment confirmation, handed to the transaction ledger
/// and the receipt notifier, after which the in-memory cart and customer
/// fields reset. The line items are frozen snapshots; later catalog edits
/// never touch a recorded transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier ("TXN{millis}").
    pub id: String,

    /// Bill number shown to the customer ("PHM{millis}").
    pub bill_number: String,

    /// Customer name, may be empty for walk-ins.
    pub customer_name: String,

    /// Customer phone, validated to exactly 10 digits before checkout.
    pub customer_phone: String,

    /// Frozen cart lines at the moment of payment.
    pub items: Vec<CartLine>,

    /// Sum of line totals before discount.
    pub subtotal: Money,

    /// Discount rate applied (unclamped basis points).
    pub discount: DiscountPercent,

    /// Informational GST decomposition; NOT included in `total`.
    pub gst_amount: Money,

    /// Amount payable: subtotal minus discount amount.
    pub total: Money,

    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,

    /// Method-specific reference: a "UPI…" id for QR payments, "N/A" for cash.
    pub payment_reference: String,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer directory record, keyed by phone number.
///
/// Aggregates are updated on every completed sale: visit count increments,
/// lifetime spend accumulates the transaction total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,
    pub name: String,
    pub visit_count: i64,
    pub total_purchases: Money,
    pub last_visit: DateTime<Utc>,
    pub joined_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_from_percent() {
        let d = DiscountPercent::from_percent(10.0);
        assert_eq!(d.bps(), 1000);

        let fractional = DiscountPercent::from_percent(7.5);
        assert_eq!(fractional.bps(), 750);
    }

    #[test]
    fn test_discount_unclamped() {
        assert_eq!(DiscountPercent::from_percent(-5.0).bps(), -500);
        assert_eq!(DiscountPercent::from_percent(150.0).bps(), 15000);
    }

    #[test]
    fn test_payment_method_round_trip() {
        assert_eq!(PaymentMethod::Cash.as_str(), "CASH");
        assert_eq!(PaymentMethod::UpiQr.as_str(), "UPI_QR");
        assert_eq!(PaymentMethod::parse("UPI_QR"), Some(PaymentMethod::UpiQr));
        assert_eq!(PaymentMethod::parse("CARD"), None);
    }

    #[test]
    fn test_can_sell_is_snapshot_based() {
        let product = Product {
            id: "1".to_string(),
            name: "Dolo 650".to_string(),
            category: "Medicine".to_string(),
            mrp: Money::from_paise(3200),
            cost_price: None,
            stock_quantity: 3,
            pack_size: 1,
            batch_id: None,
            expiry_date: None,
        };
        assert!(product.can_sell(3));
        assert!(!product.can_sell(4));
    }
}
