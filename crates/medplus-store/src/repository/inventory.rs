//! # Inventory Repository
//!
//! Database operations for the medicine catalog.
//!
//! ## Key Operations
//! - Case-insensitive substring search with starts-with re-ranking
//! - Stock adjustments (add-only)
//! - Catalog row insertion
//!
//! ## Search Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   How Catalog Search Works                              │
//! │                                                                         │
//! │  Operator types: "dolo"                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQL: name LIKE '%dolo%' ORDER BY name LIMIT 100                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Re-rank (stable): names *starting* with "dolo" float to the top,      │
//! │  the rest keep their alphabetical order below them                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [Dolo 650, Dolo Cold, Amdolo Plus, ...]                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use medplus_core::money::Money;
use medplus_core::types::Product;
use medplus_core::validation::validate_search_query;
use medplus_core::MAX_SEARCH_RESULTS;

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw inventory row; money columns are integer paise.
#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: String,
    name: String,
    category: String,
    mrp_paise: i64,
    cost_paise: Option<i64>,
    stock_quantity: i64,
    pack_size: i64,
    batch_id: Option<String>,
    expiry_date: Option<String>,
}

impl From<InventoryRow> for Product {
    fn from(row: InventoryRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            mrp: Money::from_paise(row.mrp_paise),
            cost_price: row.cost_paise.map(Money::from_paise),
            stock_quantity: row.stock_quantity,
            pack_size: row.pack_size,
            batch_id: row.batch_id,
            expiry_date: row.expiry_date,
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, category, mrp_paise, cost_paise, \
     stock_quantity, pack_size, batch_id, expiry_date";

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// // Search the catalog
/// let results = repo.search("dolo").await?;
///
/// // Receive a stock delivery
/// repo.increase_stock("uuid-here", 50).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Searches the catalog by name substring, case-insensitively.
    ///
    /// ## How It Works
    /// 1. SQL LIKE over the name column (SQLite LIKE is case-insensitive
    ///    for ASCII), alphabetical order, capped at 100 rows
    /// 2. A stable client-side re-rank floats starts-with matches above
    ///    mid-word matches without disturbing alphabetical order within
    ///    each group
    ///
    /// An empty (or all-whitespace) query returns the browse listing: the
    /// first 100 products by name. Queries over 100 characters are rejected
    /// before touching the database.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let query =
            validate_search_query(query).map_err(|e| StoreError::InvalidQuery(e.to_string()))?;

        debug!(query = %query, "Searching catalog");

        if query.is_empty() {
            return self.list(MAX_SEARCH_RESULTS).await;
        }

        let pattern = format!("%{}%", query);
        let sql = format!(
            "SELECT {} FROM inventory WHERE name LIKE ?1 ORDER BY name LIMIT ?2",
            SELECT_COLUMNS
        );

        let rows: Vec<InventoryRow> = sqlx::query_as(&sql)
            .bind(&pattern)
            .bind(MAX_SEARCH_RESULTS)
            .fetch_all(&self.pool)
            .await?;

        let mut products: Vec<Product> = rows.into_iter().map(Product::from).collect();
        rerank_starts_with(&mut products, &query);

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists catalog rows alphabetically (the empty-query browse listing).
    async fn list(&self, limit: u32) -> StoreResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM inventory ORDER BY name LIMIT ?1",
            SELECT_COLUMNS
        );

        let rows: Vec<InventoryRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {} FROM inventory WHERE id = ?1", SELECT_COLUMNS);

        let row: Option<InventoryRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Adds stock to a catalog row (receiving a delivery).
    ///
    /// ## Rules
    /// - `delta <= 0` is rejected before any write
    /// - Read-then-write: the new level is current + delta. Concurrent
    ///   adjustments are last-writer-wins, which is accepted for a
    ///   single-terminal deployment.
    ///
    /// ## Returns
    /// The new stock level.
    pub async fn increase_stock(&self, id: &str, delta: i64) -> StoreResult<i64> {
        if delta <= 0 {
            return Err(StoreError::NonPositiveDelta(delta));
        }

        let current = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        let new_level = current.stock_quantity + delta;
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE inventory SET stock_quantity = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(new_level)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, delta = delta, new_level = new_level, "Stock increased");
        Ok(new_level)
    }

    /// Inserts a new catalog row, generating its id.
    ///
    /// ## Returns
    /// The generated product id.
    pub async fn insert(&self, product: &NewProduct) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO inventory \
             (id, name, category, mrp_paise, cost_paise, stock_quantity, \
              pack_size, batch_id, expiry_date, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        )
        .bind(&id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.mrp.paise())
        .bind(product.cost_price.map(|m| m.paise()))
        .bind(product.stock_quantity)
        .bind(product.pack_size)
        .bind(&product.batch_id)
        .bind(&product.expiry_date)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }
}

/// Fields for a new catalog row; the id and timestamps are generated.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub mrp: Money,
    pub cost_price: Option<Money>,
    pub stock_quantity: i64,
    pub pack_size: i64,
    pub batch_id: Option<String>,
    pub expiry_date: Option<String>,
}

/// Stable re-rank: starts-with matches first, alphabetical order preserved
/// within each group.
fn rerank_starts_with(products: &mut [Product], query: &str) {
    let needle = query.to_lowercase();
    products.sort_by_key(|p| !p.name.to_lowercase().starts_with(&needle));
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn new_product(name: &str, mrp_paise: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: "Medicine".to_string(),
            mrp: Money::from_paise(mrp_paise),
            cost_price: None,
            stock_quantity: stock,
            pack_size: 1,
            batch_id: None,
            expiry_date: None,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_search_substring_case_insensitive() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.insert(&new_product("Dolo 650", 3200, 10)).await.unwrap();
        repo.insert(&new_product("Crocin Advance", 2550, 5)).await.unwrap();

        let results = repo.search("DOLO").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Dolo 650");

        // Mid-word match also hits
        let results = repo.search("vance").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Crocin Advance");
    }

    #[tokio::test]
    async fn test_search_reranks_starts_with_first() {
        let db = test_db().await;
        let repo = db.inventory();

        // Alphabetically "Amdolo Plus" sorts before "Dolo 650", but the
        // starts-with match must float to the top.
        repo.insert(&new_product("Amdolo Plus", 1000, 10)).await.unwrap();
        repo.insert(&new_product("Dolo Cold", 1500, 10)).await.unwrap();
        repo.insert(&new_product("Dolo 650", 3200, 10)).await.unwrap();

        let results = repo.search("dolo").await.unwrap();
        let names: Vec<&str> = results.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Dolo 650", "Dolo Cold", "Amdolo Plus"]);
    }

    #[tokio::test]
    async fn test_empty_query_browses_alphabetically() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.insert(&new_product("Zincovit", 1200, 10)).await.unwrap();
        repo.insert(&new_product("Azithral 500", 9000, 10)).await.unwrap();

        let results = repo.search("   ").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Azithral 500");
    }

    #[tokio::test]
    async fn test_search_rejects_overlong_query() {
        let db = test_db().await;
        assert!(matches!(
            db.inventory().search(&"a".repeat(101)).await,
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty() {
        let db = test_db().await;
        let results = db.inventory().search("nonexistent").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_increase_stock() {
        let db = test_db().await;
        let repo = db.inventory();

        let id = repo.insert(&new_product("Dolo 650", 3200, 10)).await.unwrap();
        let new_level = repo.increase_stock(&id, 50).await.unwrap();
        assert_eq!(new_level, 60);

        let product = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 60);
    }

    #[tokio::test]
    async fn test_increase_stock_rejects_non_positive() {
        let db = test_db().await;
        let repo = db.inventory();
        let id = repo.insert(&new_product("Dolo 650", 3200, 10)).await.unwrap();

        assert!(matches!(
            repo.increase_stock(&id, 0).await,
            Err(StoreError::NonPositiveDelta(0))
        ));
        assert!(matches!(
            repo.increase_stock(&id, -5).await,
            Err(StoreError::NonPositiveDelta(-5))
        ));

        // Level unchanged
        let product = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_increase_stock_unknown_product() {
        let db = test_db().await;
        assert!(matches!(
            db.inventory().increase_stock("ghost", 5).await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
