//! # stockroom-db: The Product Store
//!
//! This crate owns the canonical product collection and its durable storage.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  Dashboard / Product list / Product form / Settings                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   │   │
//! │  │   │ ProductStore  │   │  Repository   │   │  Migrations   │   │   │
//! │  │   │  (store.rs)   │──►│ (product.rs)  │   │  (embedded)   │   │   │
//! │  │   │ open / close  │   │ CRUD, queries │   │ 001_create_   │   │   │
//! │  │   │ seed / reset  │   │ aggregates    │   │ products.sql  │   │   │
//! │  │   │ events        │   │               │   │               │   │   │
//! │  │   └───────────────┘   └───────┬───────┘   └───────────────┘   │   │
//! │  │                               │ record.rs (row ⇄ Product)      │   │
//! │  └───────────────────────────────┼─────────────────────────────────┘   │
//! │                                  ▼                                      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        <platform data dir>/stockroom/inventory.db               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Store lifecycle, seeding, change notifications
//! - [`pool`] - Configuration and connection pool
//! - [`repository`] - Product CRUD, queries and aggregates
//! - [`record`] - Versioned row codec
//! - [`seed`] - Sample product set
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_core::{Money, NewProduct};
//! use stockroom_db::{ProductStore, StoreConfig};
//!
//! let store = ProductStore::initialize(StoreConfig::default_location()?).await?;
//!
//! let widget = store
//!     .products()
//!     .create(NewProduct::new("Widget", 5, Money::parse("2.50")?, "Other"))
//!     .await?;
//!
//! let stats = store.products().stats().await?;
//! store.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod record;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::StoreConfig;
pub use record::PRODUCT_RECORD_VERSION;
pub use repository::product::ProductRepository;
pub use seed::{sample_products, SAMPLE_PRODUCT_COUNT};
pub use store::ProductStore;
