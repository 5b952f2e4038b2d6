//! # Repository Module
//!
//! Storage access for Stockroom, behind typed methods.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  UI collaborator                                                       │
//! │       │                                                                 │
//! │       │  store.products().search("shirt")                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── create / get_by_id / get_all / update / delete / clear_all        │
//! │  ├── search / filter_by_category / low_stock / out_of_stock            │
//! │  └── count / total_inventory_value / stats / ...                       │
//! │       │                                                                 │
//! │       │  SQL + record codec                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL is isolated here; callers only see Product and Money.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD, queries and aggregates

pub mod product;
