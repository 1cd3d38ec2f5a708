//! # Database Ledger Adapter
//!
//! Binds the checkout's ledger trait to the SQLite store: one call appends
//! the sale to the transactions table and bumps the customer's directory
//! aggregates.

use medplus_core::types::Transaction;
use medplus_store::{Database, StoreError};

use crate::checkout::TransactionLedger;

/// Ledger backed by the SQLite database.
#[derive(Debug, Clone)]
pub struct DatabaseLedger {
    db: Database,
}

impl DatabaseLedger {
    pub fn new(db: Database) -> Self {
        DatabaseLedger { db }
    }
}

impl TransactionLedger for DatabaseLedger {
    async fn record_sale(&self, txn: &Transaction) -> Result<(), StoreError> {
        self.db.record_sale(txn).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use medplus_core::money::Money;
    use medplus_core::types::{DiscountPercent, PaymentMethod, PaymentStatus};
    use medplus_store::DbConfig;

    #[tokio::test]
    async fn test_record_sale_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = DatabaseLedger::new(db.clone());

        let txn = Transaction {
            id: "TXN1".to_string(),
            bill_number: "PHM1".to_string(),
            customer_name: "Asha".to_string(),
            customer_phone: "9876543210".to_string(),
            items: vec![],
            subtotal: Money::from_paise(6400),
            discount: DiscountPercent::from_percent(10.0),
            gst_amount: Money::from_paise(691),
            total: Money::from_paise(5760),
            payment_method: PaymentMethod::UpiQr,
            payment_status: PaymentStatus::Completed,
            payment_reference: "UPI123".to_string(),
            created_at: Utc::now(),
        };

        ledger.record_sale(&txn).await.unwrap();

        let loaded = db.transactions().get_by_id("TXN1").await.unwrap().unwrap();
        assert_eq!(loaded.payment_reference, "UPI123");

        let customer = db.customers().get_by_phone("9876543210").await.unwrap().unwrap();
        assert_eq!(customer.visit_count, 1);
    }
}
