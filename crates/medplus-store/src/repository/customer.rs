//! # Customer Repository
//!
//! Customer directory keyed by 10-digit phone number.
//!
//! ## Aggregate Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Customer Directory Upsert                               │
//! │                                                                         │
//! │  record_visit(phone, name, total)                                      │
//! │       │                                                                 │
//! │       ├── New phone: row created with visit_count = 1,                 │
//! │       │   total_purchases = total, joined_at = last_visit = now        │
//! │       │                                                                 │
//! │       └── Known phone: visit_count + 1,                                │
//! │           total_purchases + total, last_visit = now.                   │
//! │           A non-empty name overwrites; empty keeps the stored name.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use medplus_core::money::Money;
use medplus_core::types::Customer;

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    phone: String,
    name: String,
    visit_count: i64,
    total_purchases_paise: i64,
    last_visit: String,
    joined_at: String,
}

impl CustomerRow {
    fn into_customer(self) -> StoreResult<Customer> {
        let parse = |s: &str| -> StoreResult<DateTime<Utc>> {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StoreError::Internal(format!("Bad timestamp: {}", e)))
        };

        Ok(Customer {
            phone: self.phone,
            name: self.name,
            visit_count: self.visit_count,
            total_purchases: Money::from_paise(self.total_purchases_paise),
            last_visit: parse(&self.last_visit)?,
            joined_at: parse(&self.joined_at)?,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the customer directory.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Records a completed sale against a customer.
    ///
    /// Upsert keyed by phone: new customers are created, known customers
    /// get their aggregates bumped. An empty `name` never erases a stored
    /// name.
    pub async fn record_visit(&self, phone: &str, name: &str, total: Money) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO customers \
             (phone, name, visit_count, total_purchases_paise, last_visit, joined_at) \
             VALUES (?1, ?2, 1, ?3, ?4, ?4) \
             ON CONFLICT(phone) DO UPDATE SET \
                 visit_count = visit_count + 1, \
                 total_purchases_paise = total_purchases_paise + excluded.total_purchases_paise, \
                 last_visit = excluded.last_visit, \
                 name = CASE WHEN excluded.name = '' THEN customers.name ELSE excluded.name END",
        )
        .bind(phone)
        .bind(name)
        .bind(total.paise())
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(phone = %phone, total = %total, "Customer visit recorded");
        Ok(())
    }

    /// Looks up a customer by phone.
    pub async fn get_by_phone(&self, phone: &str) -> StoreResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "SELECT phone, name, visit_count, total_purchases_paise, last_visit, joined_at \
             FROM customers WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_customer).transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_visit_creates_customer() {
        let db = test_db().await;
        let repo = db.customers();

        repo.record_visit("9876543210", "Asha", Money::from_paise(5760))
            .await
            .unwrap();

        let customer = repo.get_by_phone("9876543210").await.unwrap().unwrap();
        assert_eq!(customer.name, "Asha");
        assert_eq!(customer.visit_count, 1);
        assert_eq!(customer.total_purchases, Money::from_paise(5760));
    }

    #[tokio::test]
    async fn test_repeat_visits_accumulate() {
        let db = test_db().await;
        let repo = db.customers();

        repo.record_visit("9876543210", "Asha", Money::from_paise(5760))
            .await
            .unwrap();
        repo.record_visit("9876543210", "Asha", Money::from_paise(1000))
            .await
            .unwrap();

        let customer = repo.get_by_phone("9876543210").await.unwrap().unwrap();
        assert_eq!(customer.visit_count, 2);
        assert_eq!(customer.total_purchases, Money::from_paise(6760));
    }

    #[tokio::test]
    async fn test_empty_name_keeps_stored_name() {
        let db = test_db().await;
        let repo = db.customers();

        repo.record_visit("9876543210", "Asha", Money::from_paise(1000))
            .await
            .unwrap();
        repo.record_visit("9876543210", "", Money::from_paise(500))
            .await
            .unwrap();

        let customer = repo.get_by_phone("9876543210").await.unwrap().unwrap();
        assert_eq!(customer.name, "Asha");
        assert_eq!(customer.visit_count, 2);
    }

    #[tokio::test]
    async fn test_unknown_phone_is_none() {
        let db = test_db().await;
        assert!(db.customers().get_by_phone("0000000000").await.unwrap().is_none());
    }
}
