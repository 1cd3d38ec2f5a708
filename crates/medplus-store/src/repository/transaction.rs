//! # Transaction Repository
//!
//! Append-only ledger of completed sales.
//!
//! ## Ledger Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Transaction Ledger                                    │
//! │                                                                         │
//! │  append(txn) ──► INSERT only. No UPDATE or DELETE path exists.         │
//! │                                                                         │
//! │  Line items persist as a JSON snapshot inside the row: later catalog   │
//! │  edits (price changes, renames) never touch a recorded sale.           │
//! │                                                                         │
//! │  Reads: recent(), for_customer(phone) - both most-recent-first.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use medplus_core::cart::CartLine;
use medplus_core::money::Money;
use medplus_core::types::{DiscountPercent, PaymentMethod, PaymentStatus, Transaction};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    bill_number: String,
    customer_name: String,
    customer_phone: String,
    items: String,
    subtotal_paise: i64,
    discount_bps: i64,
    gst_paise: i64,
    total_paise: i64,
    payment_method: String,
    payment_status: String,
    payment_reference: String,
    created_at: String,
}

impl TransactionRow {
    fn into_transaction(self) -> StoreResult<Transaction> {
        let items: Vec<CartLine> = serde_json::from_str(&self.items)?;

        let payment_method = PaymentMethod::parse(&self.payment_method).ok_or_else(|| {
            StoreError::Internal(format!("Unknown payment method: {}", self.payment_method))
        })?;

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Internal(format!("Bad timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(Transaction {
            id: self.id,
            bill_number: self.bill_number,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items,
            subtotal: Money::from_paise(self.subtotal_paise),
            discount: DiscountPercent::from_bps(self.discount_bps),
            gst_amount: Money::from_paise(self.gst_paise),
            total: Money::from_paise(self.total_paise),
            payment_method,
            payment_status: PaymentStatus::Completed,
            payment_reference: self.payment_reference,
            created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, bill_number, customer_name, customer_phone, items, \
     subtotal_paise, discount_bps, gst_paise, total_paise, \
     payment_method, payment_status, payment_reference, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Appends a completed sale to the ledger.
    ///
    /// Line items serialize to JSON inside the row; the snapshot is frozen
    /// from this point on.
    pub async fn append(&self, txn: &Transaction) -> StoreResult<()> {
        let items_json = serde_json::to_string(&txn.items)?;

        sqlx::query(
            "INSERT INTO transactions \
             (id, bill_number, customer_name, customer_phone, items, \
              subtotal_paise, discount_bps, gst_paise, total_paise, \
              payment_method, payment_status, payment_reference, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&txn.id)
        .bind(&txn.bill_number)
        .bind(&txn.customer_name)
        .bind(&txn.customer_phone)
        .bind(&items_json)
        .bind(txn.subtotal.paise())
        .bind(txn.discount.bps())
        .bind(txn.gst_amount.paise())
        .bind(txn.total.paise())
        .bind(txn.payment_method.as_str())
        .bind(txn.payment_status.as_str())
        .bind(&txn.payment_reference)
        .bind(txn.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(id = %txn.id, bill = %txn.bill_number, "Transaction recorded");
        Ok(())
    }

    /// Returns the most recent sales, newest first.
    pub async fn recent(&self, limit: u32) -> StoreResult<Vec<Transaction>> {
        let sql = format!(
            "SELECT {} FROM transactions ORDER BY created_at DESC LIMIT ?1",
            SELECT_COLUMNS
        );

        let rows: Vec<TransactionRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    /// Returns one customer's purchase history, newest first.
    pub async fn for_customer(&self, phone: &str) -> StoreResult<Vec<Transaction>> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE customer_phone = ?1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows: Vec<TransactionRow> = sqlx::query_as(&sql)
            .bind(phone)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    /// Looks up a sale by id.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Transaction>> {
        let sql = format!("SELECT {} FROM transactions WHERE id = ?1", SELECT_COLUMNS);

        let row: Option<TransactionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TransactionRow::into_transaction).transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;

    fn sample_txn(id: &str, phone: &str, total_paise: i64, secs: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            bill_number: format!("PHM{}", id),
            customer_name: "Asha".to_string(),
            customer_phone: phone.to_string(),
            items: vec![CartLine {
                product_id: "p1".to_string(),
                name: "Dolo 650".to_string(),
                unit_price: Money::from_paise(3200),
                cost_price: None,
                stock_quantity: 10,
                quantity: 2,
                pack_size: 1,
                batch_id: Some("B42".to_string()),
                expiry_date: None,
            }],
            subtotal: Money::from_paise(6400),
            discount: DiscountPercent::from_percent(10.0),
            gst_amount: Money::from_paise(691),
            total: Money::from_paise(total_paise),
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Completed,
            payment_reference: "N/A".to_string(),
            created_at: Utc.timestamp_opt(1_724_500_000 + secs, 0).unwrap(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let db = test_db().await;
        let repo = db.transactions();

        let txn = sample_txn("TXN1", "9876543210", 5760, 0);
        repo.append(&txn).await.unwrap();

        let loaded = repo.get_by_id("TXN1").await.unwrap().unwrap();
        assert_eq!(loaded.bill_number, "PHMTXN1");
        assert_eq!(loaded.total, Money::from_paise(5760));
        assert_eq!(loaded.discount.bps(), 1000);
        assert_eq!(loaded.payment_method, PaymentMethod::Cash);

        // Line-item snapshot survives round trip
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].name, "Dolo 650");
        assert_eq!(loaded.items[0].quantity, 2);
        assert_eq!(loaded.items[0].batch_id.as_deref(), Some("B42"));
    }

    #[tokio::test]
    async fn test_for_customer_most_recent_first() {
        let db = test_db().await;
        let repo = db.transactions();

        repo.append(&sample_txn("TXN1", "9876543210", 1000, 0)).await.unwrap();
        repo.append(&sample_txn("TXN2", "9876543210", 2000, 60)).await.unwrap();
        repo.append(&sample_txn("TXN3", "9999999999", 3000, 120)).await.unwrap();

        let history = repo.for_customer("9876543210").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "TXN2");
        assert_eq!(history[1].id, "TXN1");
    }

    #[tokio::test]
    async fn test_recent_newest_first_with_limit() {
        let db = test_db().await;
        let repo = db.transactions();

        for i in 0..5 {
            repo.append(&sample_txn(&format!("TXN{}", i), "9876543210", 1000, i))
                .await
                .unwrap();
        }

        let recent = repo.recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, "TXN4");
        assert_eq!(recent[2].id, "TXN2");
    }
}
