//! # Inventory Statistics
//!
//! Dashboard figures over a product snapshot.
//!
//! The store computes the same figures live in SQL; this type is what both
//! paths produce, so a UI holding a snapshot and a UI asking the store agree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryStats {
    /// Number of products in the collection.
    pub total_products: u64,
    /// Σ quantity × price, clamped at [`Money::MAX`].
    pub total_inventory_value: Money,
    /// Products at or below their threshold (includes out of stock).
    pub low_stock_count: u64,
    /// Products with quantity zero.
    pub out_of_stock_count: u64,
    /// Σ quantity.
    pub total_quantity: u64,
    /// Distinct category labels present.
    pub category_count: u64,
}

impl InventoryStats {
    /// Computes every figure in one pass over `products`.
    pub fn from_products(products: &[Product]) -> Self {
        let mut stats = InventoryStats::default();
        let mut categories = BTreeSet::new();

        for product in products {
            stats.total_products += 1;
            stats.total_inventory_value += product.total_value();
            stats.total_quantity = stats
                .total_quantity
                .saturating_add(u64::from(product.quantity));
            if product.is_low_stock() {
                stats.low_stock_count += 1;
            }
            if product.is_out_of_stock() {
                stats.out_of_stock_count += 1;
            }
            categories.insert(product.category.as_str());
        }

        stats.category_count = categories.len() as u64;
        stats
    }
}
