//! # Database Migrations
//!
//! Embedded SQL migrations for the product collection.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  ProductStore::initialize                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (create if missing)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                │
//! │       │                                                                 │
//! │       ├── 001_create_products.sql ✓ (already applied)                 │
//! │       └── 002_...                 ⬜ (NEW - needs to run)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record each one                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. **NEVER** modify existing migrations - always add new ones
//! 3. If the row layout changes, bump `PRODUCT_RECORD_VERSION` in
//!    `record.rs` and upgrade old rows in the same migration

use sqlx::migrate::MigrateError;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Passes over the migrator before giving up.
const MIGRATION_ATTEMPTS: u32 = 3;

/// Runs all pending database migrations.
///
/// Idempotent: each migration runs once, inside its own transaction.
///
/// ## Concurrent Openers
/// Two handles opening a fresh file both see migration 001 as pending.
/// SQLite serializes their transactions; the second one fails on the
/// `_sqlx_migrations` version insert and rolls back. Running the migrator
/// again then finds the migration applied and only verifies its checksum.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    info!("Checking for pending migrations");

    let mut attempt = 1;
    loop {
        match MIGRATOR.run(pool).await {
            Ok(()) => break,
            Err(e) if attempt < MIGRATION_ATTEMPTS => {
                warn!(attempt, error = %e, "Migration pass failed, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(embedded_migrations, applied_migrations)`.
///
/// For diagnostics; a fresh database that was never migrated reports zero
/// applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let table_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if table_exists == 0 {
        return Ok((total, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
