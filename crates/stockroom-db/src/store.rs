//! # Product Store
//!
//! The single owner of the product collection.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Lifecycle                                    │
//! │                                                                         │
//! │   (no value)  ── ProductStore::initialize(config) ──►  ProductStore     │
//! │       ▲            1. open SQLite (create file)          (ready)        │
//! │       │            2. run migrations                        │           │
//! │       │            3. seed if empty                         │           │
//! │       │                                                     │           │
//! │       └──────────────── store.close() ◄────────────────────┘           │
//! │                                                                         │
//! │  Uninitialized is "no ProductStore value": operations on a store that  │
//! │  doesn't exist can't be written. Repository handles kept past close()  │
//! │  fail with DbError::Closed.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Composition
//! The application builds one store at startup and hands `&ProductStore`
//! (or a cloned [`ProductRepository`]) to each screen. There is no global.
//!
//! ```rust,ignore
//! let store = ProductStore::initialize(StoreConfig::default_location()?).await?;
//!
//! let dashboard = Dashboard::new(store.products(), store.subscribe());
//! let list = ProductList::new(store.products());
//! ```

use sqlx::SqlitePool;
use stockroom_core::StoreEvent;
use tokio::sync::broadcast;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::pool::{self, StoreConfig};
use crate::repository::product::ProductRepository;
use crate::seed;

/// Handle to an initialized (ready) product collection.
#[derive(Debug)]
pub struct ProductStore {
    pool: SqlitePool,
    config: StoreConfig,
    events: broadcast::Sender<StoreEvent>,
}

impl ProductStore {
    /// Opens the store and brings it to the ready state.
    ///
    /// ## What This Does
    /// 1. Opens or creates the SQLite file
    /// 2. Applies pending migrations (if enabled)
    /// 3. Inserts the sample products when the collection is empty
    ///    (if enabled). Never duplicates them on a later initialize.
    ///
    /// ## Returns
    /// * `Ok(ProductStore)` - Ready to use
    /// * `Err(DbError::Initialization)` - Storage could not be opened,
    ///   migrated or seeded; the application should not continue
    pub async fn initialize(config: StoreConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing product store"
        );

        let pool = pool::connect(&config).await?;

        if config.run_migrations {
            if let Err(e) = migrations::run_migrations(&pool).await {
                pool.close().await;
                return Err(DbError::initialization(&config.database_path, e));
            }
        }

        let (events, _) = broadcast::channel(config.event_capacity);
        let store = ProductStore {
            pool,
            config,
            events,
        };

        if store.config.seed_on_init {
            if let Err(e) = store.seed_if_empty().await {
                store.pool.close().await;
                return Err(DbError::initialization(&store.config.database_path, e));
            }
        }

        info!("Product store ready");
        Ok(store)
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let low = store.products().low_stock().await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone(), self.events.clone())
    }

    /// Subscribes to change notifications.
    ///
    /// Events are sent after the write committed. A subscriber that falls
    /// more than `event_capacity` events behind receives
    /// `RecvError::Lagged` and should reload its snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Inserts the sample products if the collection is empty.
    ///
    /// ## Returns
    /// Number of products inserted (0 when the collection had data).
    pub async fn seed_if_empty(&self) -> DbResult<u32> {
        let inserted = seed::insert_samples(&self.pool, true).await?;

        if inserted > 0 {
            info!(count = inserted, "Seeded sample products");
            let _ = self.events.send(StoreEvent::Seeded(inserted as u32));
        }

        Ok(inserted as u32)
    }

    /// Replaces the whole collection with the sample products.
    ///
    /// Delete and insert commit together: a failure leaves the previous
    /// collection untouched.
    pub async fn reset_to_sample_data(&self) -> DbResult<u32> {
        info!("Resetting product collection to sample data");

        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM products")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let inserted = seed::insert_samples(&mut *tx, false).await?;
        tx.commit().await?;

        info!(removed, inserted, "Product collection reset");

        let _ = self.events.send(StoreEvent::Cleared);
        let _ = self.events.send(StoreEvent::Seeded(inserted as u32));
        Ok(inserted as u32)
    }

    /// Returns `(embedded_migrations, applied_migrations)`.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Configuration the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns a reference to the connection pool.
    ///
    /// For diagnostics; prefer repository methods.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Releases the storage handle.
    ///
    /// Consumes the store; open it again with [`ProductStore::initialize`].
    pub async fn close(self) {
        info!("Closing product store");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_store, init_test_tracing, seeded_store};
    use stockroom_core::{Money, NewProduct};

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = seeded_store().await;

        assert!(store.health_check().await);
        assert_eq!(store.migration_status().await.unwrap(), (1, 1));
    }

    #[tokio::test]
    async fn test_initialize_seeds_ten_products() {
        let store = seeded_store().await;
        assert_eq!(store.products().count().await.unwrap(), 10);
        assert_eq!(store.products().category_count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_seed_if_empty_does_not_duplicate() {
        let store = seeded_store().await;

        assert_eq!(store.seed_if_empty().await.unwrap(), 0);
        assert_eq!(store.products().count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_user_data_exists() {
        let store = empty_store().await;
        store
            .products()
            .create(NewProduct::new("Widget", 1, Money::zero(), "Other"))
            .await
            .unwrap();

        assert_eq!(store.seed_if_empty().await.unwrap(), 0);
        assert_eq!(store.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reset_to_sample_data() {
        let store = seeded_store().await;
        let repo = store.products();
        repo.create(NewProduct::new("Widget", 1, Money::zero(), "Other"))
            .await
            .unwrap();
        let old_ids: Vec<String> = repo.get_all().await.unwrap().into_iter().map(|p| p.id).collect();

        let mut events = store.subscribe();
        assert_eq!(store.reset_to_sample_data().await.unwrap(), 10);

        let products = repo.get_all().await.unwrap();
        assert_eq!(products.len(), 10);
        assert!(products.iter().all(|p| !old_ids.contains(&p.id)));
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Cleared);
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Seeded(10));
    }

    #[tokio::test]
    async fn test_clear_then_seed_if_empty_reseeds() {
        let store = seeded_store().await;
        store.products().clear_all().await.unwrap();

        assert_eq!(store.seed_if_empty().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");

        let store = ProductStore::initialize(StoreConfig::new(&path)).await.unwrap();
        let created = store
            .products()
            .create(
                NewProduct::new("Widget", 5, Money::parse("2.50").unwrap(), "Other")
                    .with_description("keeps its description"),
            )
            .await
            .unwrap();
        store.close().await;

        let reopened = ProductStore::initialize(StoreConfig::new(&path)).await.unwrap();
        let repo = reopened.products();

        // Ten samples plus the widget; the second initialize did not reseed.
        assert_eq!(repo.count().await.unwrap(), 11);
        let stored = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);

        reopened.close().await;
    }

    #[tokio::test]
    async fn test_reinitialize_after_clear_reseeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");

        let store = ProductStore::initialize(StoreConfig::new(&path)).await.unwrap();
        store.products().clear_all().await.unwrap();
        store.close().await;

        let store = ProductStore::initialize(StoreConfig::new(&path)).await.unwrap();
        assert_eq!(store.products().count().await.unwrap(), 10);
        store.close().await;
    }

    #[tokio::test]
    async fn test_concurrent_initialize_on_fresh_file() {
        init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");

        let (first, second) = tokio::join!(
            ProductStore::initialize(StoreConfig::new(&path)),
            ProductStore::initialize(StoreConfig::new(&path)),
        );
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first.migration_status().await.unwrap(), (1, 1));
        assert_eq!(first.products().count().await.unwrap(), 10);
        assert_eq!(second.products().count().await.unwrap(), 10);

        first.close().await;
        second.close().await;
    }

    #[tokio::test]
    async fn test_repository_fails_after_close() {
        let store = seeded_store().await;
        let repo = store.products();
        store.close().await;

        let err = repo.count().await.unwrap_err();
        assert!(matches!(err, DbError::Closed));
    }

    #[tokio::test]
    async fn test_corrupted_file_is_initialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");
        std::fs::write(&path, vec![0xAB_u8; 4096]).unwrap();

        let err = ProductStore::initialize(StoreConfig::new(&path))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Initialization { .. }));
    }

    #[tokio::test]
    async fn test_initialize_without_seeding() {
        let store = empty_store().await;
        assert_eq!(store.products().count().await.unwrap(), 0);
        assert!(!store.config().seed_on_init);
    }
}
