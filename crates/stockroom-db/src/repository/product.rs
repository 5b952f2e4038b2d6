//! # Product Repository
//!
//! Every read and write of the product collection.
//!
//! ## Key Operations
//! - CRUD with upsert semantics on `update`
//! - Search, category filter, low/out-of-stock queries
//! - Live aggregate statistics
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Write Happens                                  │
//! │                                                                         │
//! │  Product form: "Save"                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repo.update(&product)                                                 │
//! │       │  shape check (id present, price >= 0)                          │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │   ├── read stored created_at / updated_at (if any)                     │
//! │   └── INSERT ... ON CONFLICT(id) DO UPDATE                             │
//! │  COMMIT  ← nothing is visible before this                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreEvent::Updated(id) → subscribers refresh                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use stockroom_core::validation::validate_price;
use stockroom_core::{
    matches_search, normalize_description, InventoryStats, Money, NewProduct, Product, StoreEvent,
    ValidationError,
};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::record::{decode_all, ProductRow, PRODUCT_COLUMNS, PRODUCT_RECORD_VERSION};

/// Repository for product operations.
///
/// Obtained from [`ProductStore::products`](crate::ProductStore::products).
/// Cheap to clone; all clones share the store's pool and event channel.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// let widget = repo.create(NewProduct::new("Widget", 5, price, "Other")).await?;
/// let found = repo.search("widg").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    events: broadcast::Sender<StoreEvent>,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub(crate) fn new(pool: SqlitePool, events: broadcast::Sender<StoreEvent>) -> Self {
        ProductRepository { pool, events }
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Creates a product.
    ///
    /// Assigns a fresh UUID and sets both timestamps to now. Human-facing
    /// rules (non-empty name etc.) belong to the caller; see
    /// `stockroom_core::validation`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The persisted record
    /// * `Err(DbError::Validation)` - Negative price
    pub async fn create(&self, new: NewProduct) -> DbResult<Product> {
        validate_price(new.price)?;

        let product = new.into_product(generate_product_id(), Utc::now());

        debug!(id = %product.id, name = %product.name, "Creating product");

        let sql = format!(
            "INSERT INTO products ({PRODUCT_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        );

        sqlx::query(&sql)
            .bind(&product.id)
            .bind(&product.name)
            .bind(i64::from(product.quantity))
            .bind(product.price.cents())
            .bind(&product.category)
            .bind(i64::from(product.low_stock_threshold))
            .bind(&product.description)
            .bind(product.created_at)
            .bind(product.updated_at)
            .bind(PRODUCT_RECORD_VERSION)
            .execute(&self.pool)
            .await?;

        self.notify(StoreEvent::Created(product.id.clone()));
        Ok(product)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product that must exist.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No product with this id
    pub async fn require(&self, id: &str) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Returns every product. Order is creation order; callers sort.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at, id");

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Loaded all products");
        decode_all(rows)
    }

    /// Writes `product` under its id (upsert).
    ///
    /// - Existing id: all mutable fields are replaced; the stored
    ///   `created_at` is kept.
    /// - Unknown id: the product is inserted with its own `created_at`
    ///   (clamped to now).
    ///
    /// `updated_at` is set to now unconditionally, never earlier than the
    /// stored `updated_at` or `created_at`. Name and description are trimmed.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The record as persisted
    /// * `Err(DbError::Validation)` - Blank id or negative price
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        if product.id.trim().is_empty() {
            return Err(ValidationError::required("id").into());
        }
        validate_price(product.price)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let stored: Option<(DateTime<Utc>, DateTime<Utc>)> =
            sqlx::query_as("SELECT created_at, updated_at FROM products WHERE id = ?1")
                .bind(&product.id)
                .fetch_optional(&mut *tx)
                .await?;

        let (created_at, updated_at) = match stored {
            Some((created_at, previous)) => (created_at, now.max(previous).max(created_at)),
            None => {
                let created_at = product.created_at.min(now);
                (created_at, now)
            }
        };

        let saved = Product {
            id: product.id.clone(),
            name: product.name.trim().to_string(),
            quantity: product.quantity,
            price: product.price,
            category: product.category.clone(),
            low_stock_threshold: product.low_stock_threshold,
            description: normalize_description(product.description.clone()),
            created_at,
            updated_at,
        };

        debug!(id = %saved.id, inserted = stored.is_none(), "Writing product");

        let sql = format!(
            "INSERT INTO products ({PRODUCT_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
             ON CONFLICT(id) DO UPDATE SET \
                 name = excluded.name, \
                 quantity = excluded.quantity, \
                 price_cents = excluded.price_cents, \
                 category = excluded.category, \
                 low_stock_threshold = excluded.low_stock_threshold, \
                 description = excluded.description, \
                 updated_at = excluded.updated_at, \
                 record_version = excluded.record_version"
        );

        sqlx::query(&sql)
            .bind(&saved.id)
            .bind(&saved.name)
            .bind(i64::from(saved.quantity))
            .bind(saved.price.cents())
            .bind(&saved.category)
            .bind(i64::from(saved.low_stock_threshold))
            .bind(&saved.description)
            .bind(saved.created_at)
            .bind(saved.updated_at)
            .bind(PRODUCT_RECORD_VERSION)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.notify(StoreEvent::Updated(saved.id.clone()));
        Ok(saved)
    }

    /// Puts a deleted product back under its original id.
    ///
    /// Keeps `id` and `created_at` from `product`; `updated_at` advances to
    /// now. Pair with the value returned by [`delete`](Self::delete) to undo
    /// a deletion without changing the product's identity.
    pub async fn restore(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, "Restoring product");
        self.update(product).await
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - The removed record (for undo)
    /// * `Ok(None)` - No such id; nothing changed
    pub async fn delete(&self, id: &str) -> DbResult<Option<Product>> {
        debug!(id = %id, "Deleting product");

        let sql = format!("DELETE FROM products WHERE id = ?1 RETURNING {PRODUCT_COLUMNS}");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                self.notify(StoreEvent::Deleted(id.to_string()));
                Product::try_from(row).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Removes every product. Irreversible.
    ///
    /// ## Returns
    /// Number of products removed.
    pub async fn clear_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;

        debug!(removed = result.rows_affected(), "Cleared all products");

        self.notify(StoreEvent::Cleared);
        Ok(result.rows_affected())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Case-insensitive substring search over name and category.
    ///
    /// The query is matched literally, surrounding whitespace included; an
    /// empty query returns the whole collection. Callers that want trimming
    /// run input through `validate_search_query` first. Matching happens in
    /// Rust so case folding covers non-ASCII text, which SQLite's LIKE does
    /// not.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        debug!(query = %query, "Searching products");

        let mut products = self.get_all().await?;
        if !query.is_empty() {
            products.retain(|p| matches_search(p, query));
        }

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Products whose category equals `category` exactly (case-sensitive).
    pub async fn filter_by_category(&self, category: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ?1 ORDER BY created_at, id"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        decode_all(rows)
    }

    /// Products at or below their low-stock threshold, out-of-stock included.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE quantity <= low_stock_threshold ORDER BY quantity, created_at, id"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        decode_all(rows)
    }

    /// Products with quantity zero.
    pub async fn out_of_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE quantity = 0 ORDER BY created_at, id"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        decode_all(rows)
    }

    /// Distinct categories currently in use, sorted. Feeds the category
    /// filter chips.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Number of products in the collection.
    pub async fn count(&self) -> DbResult<u64> {
        self.scalar("SELECT COUNT(*) FROM products").await
    }

    /// Same as [`count`](Self::count); the dashboard's "Total products".
    pub async fn total_product_count(&self) -> DbResult<u64> {
        self.count().await
    }

    /// Σ quantity × price over all products, clamped at [`Money::MAX`].
    pub async fn total_inventory_value(&self) -> DbResult<Money> {
        inventory_value(&self.pool).await
    }

    /// Number of products returned by [`low_stock`](Self::low_stock).
    pub async fn low_stock_count(&self) -> DbResult<u64> {
        self.scalar("SELECT COUNT(*) FROM products WHERE quantity <= low_stock_threshold")
            .await
    }

    /// Number of products returned by [`out_of_stock`](Self::out_of_stock).
    pub async fn out_of_stock_count(&self) -> DbResult<u64> {
        self.scalar("SELECT COUNT(*) FROM products WHERE quantity = 0")
            .await
    }

    /// Σ quantity over all products.
    pub async fn total_quantity(&self) -> DbResult<u64> {
        self.scalar("SELECT COALESCE(SUM(quantity), 0) FROM products")
            .await
    }

    /// Number of distinct categories present.
    pub async fn category_count(&self) -> DbResult<u64> {
        self.scalar("SELECT COUNT(DISTINCT category) FROM products")
            .await
    }

    /// Every dashboard figure from one read transaction (one consistent
    /// snapshot).
    pub async fn stats(&self) -> DbResult<InventoryStats> {
        let mut tx = self.pool.begin().await?;

        let row: StatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_products,
                COALESCE(SUM(CASE WHEN quantity <= low_stock_threshold THEN 1 ELSE 0 END), 0)
                    AS low_stock_count,
                COALESCE(SUM(CASE WHEN quantity = 0 THEN 1 ELSE 0 END), 0) AS out_of_stock_count,
                COALESCE(SUM(quantity), 0) AS total_quantity,
                COUNT(DISTINCT category) AS category_count
            FROM products
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;
        let total_inventory_value = inventory_value(&mut *tx).await?;

        tx.commit().await?;

        Ok(InventoryStats {
            total_products: non_negative(row.total_products),
            total_inventory_value,
            low_stock_count: non_negative(row.low_stock_count),
            out_of_stock_count: non_negative(row.out_of_stock_count),
            total_quantity: non_negative(row.total_quantity),
            category_count: non_negative(row.category_count),
        })
    }

    async fn scalar(&self, sql: &'static str) -> DbResult<u64> {
        let value: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(non_negative(value))
    }

    fn notify(&self, event: StoreEvent) {
        // Err only means nobody is subscribed.
        let _ = self.events.send(event);
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_products: i64,
    low_stock_count: i64,
    out_of_stock_count: i64,
    total_quantity: i64,
    category_count: i64,
}

/// Σ quantity × price folded with `Money`'s saturating arithmetic.
///
/// SQLite turns an overflowing `quantity * price_cents` into a REAL, so the
/// product is never computed in SQL.
async fn inventory_value<'e, E>(executor: E) -> DbResult<Money>
where
    E: Executor<'e, Database = Sqlite>,
{
    let lines: Vec<(i64, i64)> = sqlx::query_as("SELECT quantity, price_cents FROM products")
        .fetch_all(executor)
        .await?;

    Ok(lines
        .into_iter()
        .map(|(quantity, price_cents)| Money::from_cents(price_cents).multiply_quantity(quantity))
        .sum())
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Generates a new product ID (UUID v4).
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_store, seeded_store};
    use std::collections::HashSet;
    use std::time::Duration;

    fn widget() -> NewProduct {
        NewProduct::new("Widget", 5, Money::parse("2.50").unwrap(), "Other")
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = empty_store().await;
        let repo = store.products();

        let created = repo
            .create(widget().with_description("  blue  "))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.low_stock_threshold, 10);
        assert_eq!(created.description.as_deref(), Some("blue"));

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let store = empty_store().await;
        let created = store
            .products()
            .create(NewProduct::new("  Widget \n", 1, Money::zero(), "Other"))
            .await
            .unwrap();

        assert_eq!(created.name, "Widget");
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let store = empty_store().await;
        let err = store
            .products()
            .create(NewProduct::new("Widget", 1, Money::from_cents(-1), "Other"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(store.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = empty_store().await;
        let repo = store.products();

        let mut ids = HashSet::new();
        for _ in 0..25 {
            ids.insert(repo.create(widget()).await.unwrap().id);
        }

        assert_eq!(ids.len(), 25);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let store = empty_store().await;
        assert!(store.products().get_by_id("nope").await.unwrap().is_none());

        let err = store.products().require("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_widget_scenario() {
        let store = empty_store().await;
        let repo = store.products();

        let created = repo.create(widget()).await.unwrap();
        assert!(created.is_low_stock());
        assert!(!created.is_out_of_stock());
        assert_eq!(created.total_value(), Money::from_cents(1250));
        let count_before = repo.total_product_count().await.unwrap();

        let mut edited = created.clone();
        edited.quantity = 0;
        let saved = repo.update(&edited).await.unwrap();
        assert!(saved.is_out_of_stock());
        assert!(repo.get_by_id(&created.id).await.unwrap().unwrap().is_out_of_stock());

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert_eq!(repo.total_product_count().await.unwrap(), count_before - 1);
    }

    #[tokio::test]
    async fn test_update_preserves_identity_and_advances_updated_at() {
        let store = empty_store().await;
        let repo = store.products();
        let created = repo.create(widget()).await.unwrap();

        std::thread::sleep(Duration::from_millis(5));

        // A stale created_at from the caller must not overwrite the stored one.
        let mut edited = created.clone();
        edited.name = "Widget Pro".to_string();
        edited.created_at = created.created_at - chrono::Duration::days(3);
        let saved = repo.update(&edited).await.unwrap();

        assert_eq!(saved.id, created.id);
        assert_eq!(saved.created_at, created.created_at);
        assert!(saved.updated_at > created.updated_at);

        let stored = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, saved);
        assert_eq!(stored.name, "Widget Pro");
    }

    #[tokio::test]
    async fn test_update_without_changes_still_bumps_updated_at() {
        let store = empty_store().await;
        let repo = store.products();
        let created = repo.create(widget()).await.unwrap();

        std::thread::sleep(Duration::from_millis(5));
        let saved = repo.update(&created).await.unwrap();

        assert!(saved.updated_at > created.updated_at);
        assert!(saved.updated_at >= saved.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_inserts() {
        let store = empty_store().await;
        let repo = store.products();

        let product = widget().into_product("custom-id".to_string(), Utc::now());
        let saved = repo.update(&product).await.unwrap();

        assert_eq!(saved.id, "custom-id");
        assert_eq!(saved.created_at, product.created_at);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_clamps_future_created_at() {
        let store = empty_store().await;
        let future = Utc::now() + chrono::Duration::days(1);
        let product = widget().into_product("from-the-future".to_string(), future);

        let saved = store.products().update(&product).await.unwrap();

        assert!(saved.created_at < future);
        assert!(saved.updated_at >= saved.created_at);
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let store = empty_store().await;
        let product = widget().into_product("  ".to_string(), Utc::now());

        let err = store.products().update(&product).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = empty_store().await;
        let repo = store.products();
        let keep = repo.create(widget()).await.unwrap();
        let gone = repo.create(widget()).await.unwrap();

        let removed = repo.delete(&gone.id).await.unwrap();
        assert_eq!(removed, Some(gone.clone()));

        let again = repo.delete(&gone.id).await.unwrap();
        assert_eq!(again, None);

        let remaining = repo.get_all().await.unwrap();
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test]
    async fn test_restore_keeps_original_identity() {
        let store = empty_store().await;
        let repo = store.products();
        let created = repo.create(widget()).await.unwrap();

        let removed = repo.delete(&created.id).await.unwrap().unwrap();
        let restored = repo.restore(&removed).await.unwrap();

        assert_eq!(restored.id, created.id);
        assert_eq!(restored.created_at, created.created_at);
        assert!(restored.updated_at >= created.updated_at);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = seeded_store().await;
        let repo = store.products();

        assert_eq!(repo.clear_all().await.unwrap(), 10);
        assert!(repo.get_all().await.unwrap().is_empty());
        assert_eq!(repo.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search() {
        let store = seeded_store().await;
        let repo = store.products();

        let shirts = repo.search("shirt").await.unwrap();
        assert_eq!(shirts.len(), 1);
        assert_eq!(shirts[0].name, "Classic Blue T-Shirt");

        // Category matches too
        let electronics = repo.search("ELECTRON").await.unwrap();
        assert_eq!(electronics.len(), 3);

        assert!(repo.search("ZZZ").await.unwrap().is_empty());
        assert_eq!(repo.search("").await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_search_matches_whitespace_literally() {
        let store = seeded_store().await;
        let repo = store.products();

        assert!(repo.search("Hoodie ").await.unwrap().is_empty());
        assert!(repo.search("   ").await.unwrap().is_empty());

        let hoodies = repo.search("cotton hoodie").await.unwrap();
        assert_eq!(hoodies.len(), 1);
        assert_eq!(hoodies[0].name, "Cotton Hoodie");
    }

    #[tokio::test]
    async fn test_filter_by_category_is_exact() {
        let store = seeded_store().await;
        let repo = store.products();

        let clothing = repo.filter_by_category("Clothing").await.unwrap();
        assert_eq!(clothing.len(), 2);
        assert!(clothing.iter().all(|p| p.category == "Clothing"));

        assert!(repo.filter_by_category("clothing").await.unwrap().is_empty());
        assert!(repo.filter_by_category("Cloth").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hoodie_is_low_and_out_of_stock() {
        let store = seeded_store().await;
        let repo = store.products();

        let low: Vec<String> = repo.low_stock().await.unwrap().into_iter().map(|p| p.name).collect();
        let out: Vec<String> = repo.out_of_stock().await.unwrap().into_iter().map(|p| p.name).collect();

        assert!(low.contains(&"Cotton Hoodie".to_string()));
        assert_eq!(out, vec!["Cotton Hoodie".to_string()]);
        assert_eq!(low.len(), 5);
    }

    #[tokio::test]
    async fn test_low_stock_threshold_is_inclusive() {
        let store = empty_store().await;
        let repo = store.products();
        repo.create(widget().with_threshold(5)).await.unwrap();
        repo.create(NewProduct::new("Plenty", 6, Money::zero(), "Other").with_threshold(5))
            .await
            .unwrap();

        let low = repo.low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Widget");
    }

    #[tokio::test]
    async fn test_categories_reflect_collection() {
        let store = empty_store().await;
        let repo = store.products();
        repo.create(widget()).await.unwrap();
        repo.create(NewProduct::new("Gnome", 2, Money::zero(), "Garden Gnomes"))
            .await
            .unwrap();
        repo.create(widget()).await.unwrap();

        assert_eq!(
            repo.categories().await.unwrap(),
            vec!["Garden Gnomes".to_string(), "Other".to_string()]
        );
        assert_eq!(repo.category_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_aggregates_on_empty_collection() {
        let store = empty_store().await;

        let stats = store.products().stats().await.unwrap();

        assert_eq!(stats, InventoryStats::default());
        assert!(store.products().total_inventory_value().await.unwrap().is_zero());
    }

    #[tokio::test]
    async fn test_aggregates_stay_consistent_with_get_all() {
        let store = seeded_store().await;
        let repo = store.products();

        let created = repo.create(widget()).await.unwrap();
        let mut edited = created.clone();
        edited.quantity = 40;
        edited.price = Money::parse("0.99").unwrap();
        repo.update(&edited).await.unwrap();
        let hoodie = repo.search("hoodie").await.unwrap().remove(0);
        repo.delete(&hoodie.id).await.unwrap();

        let all = repo.get_all().await.unwrap();
        let expected = InventoryStats::from_products(&all);

        assert_eq!(repo.stats().await.unwrap(), expected);
        assert_eq!(repo.total_product_count().await.unwrap(), all.len() as u64);
        assert_eq!(
            repo.total_inventory_value().await.unwrap(),
            all.iter().map(Product::total_value).sum::<Money>()
        );
        assert_eq!(
            repo.low_stock_count().await.unwrap(),
            repo.low_stock().await.unwrap().len() as u64
        );
        assert_eq!(
            repo.out_of_stock_count().await.unwrap(),
            repo.out_of_stock().await.unwrap().len() as u64
        );
        assert_eq!(repo.total_quantity().await.unwrap(), expected.total_quantity);
        assert_eq!(repo.category_count().await.unwrap(), expected.category_count);
    }

    #[tokio::test]
    async fn test_huge_stock_value_saturates() {
        let store = empty_store().await;
        let repo = store.products();
        let gold = repo
            .create(NewProduct::new(
                "Gold",
                4_000_000_000,
                Money::from_cents(1_000_000_000_000),
                "Other",
            ))
            .await
            .unwrap();
        repo.create(widget()).await.unwrap();

        assert_eq!(gold.total_value(), Money::MAX);
        assert_eq!(repo.total_inventory_value().await.unwrap(), Money::MAX);

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_inventory_value, Money::MAX);
        assert_eq!(stats, InventoryStats::from_products(&repo.get_all().await.unwrap()));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_stored_record() {
        let store = empty_store().await;
        let repo = store.products();
        let created = repo.create(widget()).await.unwrap();

        sqlx::query(
            "CREATE TRIGGER reject_product_update BEFORE UPDATE ON products \
             BEGIN SELECT RAISE(ABORT, 'disk unavailable'); END",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let mut events = store.subscribe();
        std::thread::sleep(Duration::from_millis(5));

        let mut edited = created.clone();
        edited.name = "Widget Pro".to_string();
        edited.quantity = 0;
        let err = repo.update(&edited).await.unwrap_err();

        assert!(matches!(err, DbError::Storage(_)));
        assert!(err.is_storage_io());

        let stored = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
        assert_eq!(stored.updated_at, created.updated_at);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_price_round_trips_exactly() {
        let store = empty_store().await;
        let repo = store.products();
        let created = repo
            .create(NewProduct::new("Penny Candy", 3, Money::parse("0.01").unwrap(), "Other"))
            .await
            .unwrap();

        let stored = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.price.cents(), 1);
        assert_eq!(stored.total_value(), Money::from_cents(3));
    }

    #[tokio::test]
    async fn test_writes_publish_events() {
        let store = empty_store().await;
        let repo = store.products();
        let mut events = store.subscribe();

        let created = repo.create(widget()).await.unwrap();
        repo.update(&created).await.unwrap();
        repo.delete(&created.id).await.unwrap();
        repo.delete(&created.id).await.unwrap();
        repo.clear_all().await.unwrap();

        assert_eq!(events.recv().await.unwrap(), StoreEvent::Created(created.id.clone()));
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Updated(created.id.clone()));
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Deleted(created.id.clone()));
        // The second delete was a no-op and published nothing.
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Cleared);
    }
}
