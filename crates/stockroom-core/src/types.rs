//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │    NewProduct       │   │      Product        │                     │
//! │  │  ─────────────────  │──►│  ─────────────────  │                     │
//! │  │  name               │   │  id (UUID v4)       │                     │
//! │  │  quantity           │   │  ...NewProduct      │                     │
//! │  │  price (Money)      │   │  created_at         │                     │
//! │  │  category           │   │  updated_at         │                     │
//! │  │  low_stock_threshold│   │                     │                     │
//! │  │  description        │   │  is_low_stock()     │  derived, never     │
//! │  └─────────────────────┘   │  is_out_of_stock()  │  stored             │
//! │                            │  total_value()      │                     │
//! │                            └─────────────────────┘                     │
//! │                                                                         │
//! │  ┌─────────────────────┐                                               │
//! │  │    StoreEvent       │  Created / Updated / Deleted / Cleared / Seeded│
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Low-stock threshold used when the form leaves the field untouched.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// The canonical category list offered by the product form.
///
/// Stored products are not checked against this list; filtering uses the
/// categories actually present in the collection.
pub const CATEGORIES: [&str; 10] = [
    "Electronics",
    "Clothing",
    "Food & Beverages",
    "Home & Garden",
    "Sports",
    "Office Supplies",
    "Health & Beauty",
    "Toys",
    "Books",
    "Other",
];

/// Returns true if `category` is one of [`CATEGORIES`] (exact match).
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

// =============================================================================
// Product
// =============================================================================

/// A single inventory line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4). Assigned once, never changes.
    pub id: String,

    /// Display name, trimmed.
    pub name: String,

    /// Units currently on hand.
    pub quantity: u32,

    /// Unit price.
    pub price: Money,

    /// Category label, usually one of [`CATEGORIES`].
    pub category: String,

    /// Quantity at or below which the product counts as low stock.
    pub low_stock_threshold: u32,

    /// Optional free-form notes.
    pub description: Option<String>,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last written.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Quantity is at or below the threshold (inclusive). Out-of-stock
    /// products are always low stock.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    /// Quantity is exactly zero.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Value of the stock on hand: `price × quantity`, clamped at
    /// [`Money::MAX`].
    #[inline]
    pub fn total_value(&self) -> Money {
        self.price.multiply_quantity(i64::from(self.quantity))
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Input for creating a product. The store assigns id and timestamps.
///
/// ## Example
/// ```rust
/// use stockroom_core::{Money, NewProduct};
///
/// let widget = NewProduct::new("Widget", 5, Money::from_cents(250), "Other")
///     .with_description("Blue, medium");
/// assert_eq!(widget.low_stock_threshold, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub quantity: u32,
    pub price: Money,
    pub category: String,
    pub low_stock_threshold: u32,
    pub description: Option<String>,
}

impl NewProduct {
    /// Creates a payload with the default threshold and no description.
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        NewProduct {
            name: name.into(),
            quantity,
            price,
            category: category.into(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            description: None,
        }
    }

    /// Sets the low-stock threshold.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the stored record: trims text fields, stamps both timestamps
    /// with `now`. A blank description becomes `None`.
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            price: self.price,
            category: self.category,
            low_stock_threshold: self.low_stock_threshold,
            description: normalize_description(self.description),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trims a description and drops it if nothing is left.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

// =============================================================================
// Store Events
// =============================================================================

/// Change notification published by the store after a write committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A product was created.
    Created(String),
    /// A product was replaced or upserted.
    Updated(String),
    /// A product was removed.
    Deleted(String),
    /// The whole collection was emptied.
    Cleared,
    /// Sample data was inserted (number of products).
    Seeded(u32),
}

// =============================================================================
// Unit Tests
// =============================================================================
