//! # Sample Data
//!
//! The fixed product set loaded into an empty collection on first run and by
//! "reset to sample data".
//!
//! ## Coverage
//! Ten products across six categories, chosen so the dashboard has
//! something to show in every tile:
//! - five products at or below their threshold
//! - one product ("Cotton Hoodie") at exactly zero
//!
//! ## Why One Statement?
//! ```text
//! WITH seed(...) AS (VALUES (...), (...), ...)
//! INSERT INTO products (...) SELECT ... FROM seed
//! WHERE NOT EXISTS (SELECT 1 FROM products)
//! ```
//! The emptiness check and the insert are a single SQLite statement, so a
//! second initialize can never add a second copy of the samples.

use chrono::{DateTime, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};
use stockroom_core::{Money, NewProduct, Product};

use crate::error::DbResult;
use crate::record::PRODUCT_RECORD_VERSION;
use crate::repository::product::generate_product_id;

struct SampleProduct {
    name: &'static str,
    category: &'static str,
    quantity: u32,
    price_cents: i64,
    low_stock_threshold: u32,
    description: &'static str,
}

const SAMPLE_PRODUCTS: [SampleProduct; 10] = [
    SampleProduct {
        name: "Wireless Bluetooth Headphones",
        category: "Electronics",
        quantity: 45,
        price_cents: 7999,
        low_stock_threshold: 10,
        description: "Over-ear, 30 hour battery",
    },
    SampleProduct {
        name: "USB-C Charging Cable",
        category: "Electronics",
        quantity: 8,
        price_cents: 1299,
        low_stock_threshold: 20,
        description: "1 m braided cable",
    },
    SampleProduct {
        name: "Portable Power Bank",
        category: "Electronics",
        quantity: 3,
        price_cents: 3499,
        low_stock_threshold: 10,
        description: "10,000 mAh",
    },
    SampleProduct {
        name: "Classic Blue T-Shirt",
        category: "Clothing",
        quantity: 120,
        price_cents: 1999,
        low_stock_threshold: 25,
        description: "100% cotton, unisex",
    },
    SampleProduct {
        name: "Cotton Hoodie",
        category: "Clothing",
        quantity: 0,
        price_cents: 4499,
        low_stock_threshold: 10,
        description: "Heather grey, pullover",
    },
    SampleProduct {
        name: "Organic Green Tea",
        category: "Food & Beverages",
        quantity: 60,
        price_cents: 849,
        low_stock_threshold: 15,
        description: "Box of 40 bags",
    },
    SampleProduct {
        name: "Dark Roast Coffee Beans",
        category: "Food & Beverages",
        quantity: 12,
        price_cents: 1599,
        low_stock_threshold: 15,
        description: "Whole bean, 500 g",
    },
    SampleProduct {
        name: "Ceramic Plant Pot",
        category: "Home & Garden",
        quantity: 30,
        price_cents: 1450,
        low_stock_threshold: 10,
        description: "15 cm, drainage hole",
    },
    SampleProduct {
        name: "Spiral Notebook A5",
        category: "Office Supplies",
        quantity: 200,
        price_cents: 399,
        low_stock_threshold: 50,
        description: "80 ruled sheets",
    },
    SampleProduct {
        name: "Yoga Mat",
        category: "Sports",
        quantity: 5,
        price_cents: 2999,
        low_stock_threshold: 10,
        description: "6 mm, non-slip",
    },
];

/// Number of products in the sample set.
pub const SAMPLE_PRODUCT_COUNT: usize = SAMPLE_PRODUCTS.len();

/// Builds the sample products with fresh ids, all stamped with `now`.
pub fn sample_products(now: DateTime<Utc>) -> Vec<Product> {
    SAMPLE_PRODUCTS
        .iter()
        .map(|s| {
            NewProduct::new(s.name, s.quantity, Money::from_cents(s.price_cents), s.category)
                .with_threshold(s.low_stock_threshold)
                .with_description(s.description)
                .into_product(generate_product_id(), now)
        })
        .collect()
}

/// Inserts the sample set through `executor` (pool or open transaction).
///
/// With `only_if_empty`, nothing is inserted when the collection already
/// holds any product. Returns the number of rows inserted.
pub(crate) async fn insert_samples<'e, E>(executor: E, only_if_empty: bool) -> DbResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let products = sample_products(Utc::now());

    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        "WITH seed (id, name, quantity, price_cents, category, low_stock_threshold, \
         description, created_at, updated_at, record_version) AS (",
    );

    builder.push_values(products, |mut row, p| {
        row.push_bind(p.id)
            .push_bind(p.name)
            .push_bind(i64::from(p.quantity))
            .push_bind(p.price.cents())
            .push_bind(p.category)
            .push_bind(i64::from(p.low_stock_threshold))
            .push_bind(p.description)
            .push_bind(p.created_at)
            .push_bind(p.updated_at)
            .push_bind(PRODUCT_RECORD_VERSION);
    });

    builder.push(
        ") INSERT INTO products (id, name, quantity, price_cents, category, \
         low_stock_threshold, description, created_at, updated_at, record_version) \
         SELECT id, name, quantity, price_cents, category, low_stock_threshold, \
         description, created_at, updated_at, record_version FROM seed",
    );

    if only_if_empty {
        builder.push(" WHERE NOT EXISTS (SELECT 1 FROM products)");
    }

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}
