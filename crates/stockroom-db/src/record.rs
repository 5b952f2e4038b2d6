//! # Product Record Codec
//!
//! The explicit mapping between a `products` row and [`Product`].
//!
//! ```text
//!   Product ──encode──► bind values (i64 cents, i64 counts, RFC 3339 text)
//!   Row ──FromRow──► ProductRow ──TryFrom──► Product
//!                                   │
//!                                   └── rejects unknown record_version,
//!                                       negative or oversized counts
//! ```

use chrono::{DateTime, Utc};
use stockroom_core::{Money, Product};

use crate::error::{DbError, DbResult};

/// Layout version written into every row.
pub const PRODUCT_RECORD_VERSION: i64 = 1;

/// Column list shared by every SELECT and RETURNING clause.
pub(crate) const PRODUCT_COLUMNS: &str = "id, name, quantity, price_cents, category, \
     low_stock_threshold, description, created_at, updated_at, record_version";

/// A `products` row exactly as SQLite returns it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub category: String,
    pub low_stock_threshold: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record_version: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        if row.record_version > PRODUCT_RECORD_VERSION || row.record_version < 1 {
            return Err(DbError::decode(
                row.id,
                format!(
                    "record version {} is not supported (expected 1..={})",
                    row.record_version, PRODUCT_RECORD_VERSION
                ),
            ));
        }

        let quantity = u32::try_from(row.quantity).map_err(|_| {
            DbError::decode(&row.id, format!("quantity {} out of range", row.quantity))
        })?;
        let low_stock_threshold = u32::try_from(row.low_stock_threshold).map_err(|_| {
            DbError::decode(
                &row.id,
                format!("low_stock_threshold {} out of range", row.low_stock_threshold),
            )
        })?;
        if row.price_cents < 0 {
            return Err(DbError::decode(
                row.id,
                format!("price_cents {} is negative", row.price_cents),
            ));
        }

        Ok(Product {
            id: row.id,
            name: row.name,
            quantity,
            price: Money::from_cents(row.price_cents),
            category: row.category,
            low_stock_threshold,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Decodes a batch of rows, failing on the first unreadable one.
pub(crate) fn decode_all(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}
