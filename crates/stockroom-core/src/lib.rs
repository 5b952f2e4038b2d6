//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! This crate contains the product model and every rule that can be
//! expressed without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI collaborators (external)                        │   │
//! │  │    Dashboard ──► Product list ──► Product form ──► Settings     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               stockroom-db (Product Store)                      │   │
//! │  │        SQLite, migrations, CRUD, queries, seeding               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │query/stats│  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  search   │  │   form    │  │   │
//! │  │   │NewProduct │  │   parse   │  │  sorting  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, NewProduct, StoreEvent, category catalog
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`query`] - Search predicate and list ordering
//! - [`stats`] - Dashboard statistics over a snapshot
//! - [`validation`] - Product form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use stockroom_core::{Money, NewProduct};
//!
//! let widget = NewProduct::new("Widget", 5, Money::parse("2.50").unwrap(), "Other")
//!     .into_product("some-id".to_string(), Utc::now());
//!
//! assert!(widget.is_low_stock());
//! assert!(!widget.is_out_of_stock());
//! assert_eq!(widget.total_value().to_string(), "$12.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod query;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use query::{matches_search, sort_products, SortKey, SortOrder};
pub use stats::InventoryStats;
pub use types::*;
