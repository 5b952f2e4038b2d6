//! # Query Helpers
//!
//! Pure predicates and orderings over products. The store applies the search
//! predicate; list screens apply the ordering to whatever snapshot they hold.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::types::Product;

/// Case-insensitive substring match against name OR category.
///
/// The query is used as typed, whitespace included; only the empty string
/// matches everything. `validation::validate_search_query` trims form input.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stockroom_core::{matches_search, Money, NewProduct};
///
/// let shirt = NewProduct::new("Classic Blue T-Shirt", 120, Money::from_cents(1999), "Clothing")
///     .into_product("id".to_string(), Utc::now());
///
/// assert!(matches_search(&shirt, "shirt"));
/// assert!(matches_search(&shirt, "CLOTH"));
/// assert!(!matches_search(&shirt, "ZZZ"));
/// ```
pub fn matches_search(product: &Product, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    product.name.to_lowercase().contains(&needle)
        || product.category.to_lowercase().contains(&needle)
}

/// Field a product list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Quantity,
    Category,
}

/// Direction of a [`SortKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Sorts products in place. Text keys compare case-insensitively; ties
/// fall back to name, then id, so the order is total and stable across
/// refreshes.
pub fn sort_products(products: &mut [Product], key: SortKey, order: SortOrder) {
    products.sort_by(|a, b| {
        let primary = match key {
            SortKey::Name => Ordering::Equal,
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::Quantity => a.quantity.cmp(&b.quantity),
            SortKey::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        };
        let ordering = primary
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id));

        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

// =============================================================================
// Unit Tests
// =============================================================================
