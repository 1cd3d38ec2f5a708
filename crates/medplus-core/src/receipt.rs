//! # Receipt Formatting
//!
//! Pure text formatting for SMS receipts. The short form is sized for a
//! single 160-character SMS; the detailed form spans multiple messages and
//! itemizes the sale. Actual delivery lives in the app layer; this module
//! only builds strings.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{PaymentMethod, Transaction};

// =============================================================================
// Receipt Data
// =============================================================================

/// One itemized line on a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl ReceiptItem {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Everything a receipt needs, decoupled from the transaction record so
/// the formatter stays independent of storage concerns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptData {
    pub bill_number: String,
    /// `None` renders as "Guest" in the detailed form.
    pub customer_name: Option<String>,
    pub items: Vec<ReceiptItem>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    /// Pre-formatted date string, e.g. "24/08/2026".
    pub date: String,
}

impl ReceiptData {
    /// Builds receipt data from a completed transaction.
    pub fn from_transaction(txn: &Transaction) -> Self {
        ReceiptData {
            bill_number: txn.bill_number.clone(),
            customer_name: if txn.customer_name.trim().is_empty() {
                None
            } else {
                Some(txn.customer_name.clone())
            },
            items: txn
                .items
                .iter()
                .map(|line| ReceiptItem {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            total: txn.total,
            payment_method: txn.payment_method,
            date: txn.created_at.format("%d/%m/%Y").to_string(),
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Short receipt, fits a single SMS.
pub fn format_receipt_short(data: &ReceiptData) -> String {
    format!(
        "MedPlus Bill {}\nTotal: \u{20B9}{}\nPaid: {}\nItems: {}\nThank you! - MedPlus",
        data.bill_number,
        data.total.to_decimal_string(),
        data.payment_method.display_name(),
        data.items.len()
    )
}

/// Detailed receipt with per-item lines; spans multiple SMS segments.
pub fn format_receipt_detailed(data: &ReceiptData) -> String {
    let items_list = data
        .items
        .iter()
        .map(|item| {
            format!(
                "{} x{} - \u{20B9}{}",
                item.name,
                item.quantity,
                item.line_total().to_decimal_string()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "MedPlus Pharmacy\nBill: {}\nDate: {}\nCustomer: {}\n\nItems:\n{}\n\nTotal: \u{20B9}{}\nPayment: {}\n\nThank you for shopping!",
        data.bill_number,
        data.date,
        data.customer_name.as_deref().unwrap_or("Guest"),
        items_list,
        data.total.to_decimal_string(),
        data.payment_method.display_name()
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
