//! # Store Error Types
//!
//! Error types for Product Store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error) ─┐                                         │
//! │  MigrateError ───────────────┤                                         │
//! │  ValidationError (core) ─────┤                                         │
//! │                              ▼                                          │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UI collaborator decides: message, disabled action, retry button       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never logs-and-drops an error and never retries a product
//! operation on its own.

use std::path::Path;

use stockroom_core::ValidationError;
use thiserror::Error;

/// Product Store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The store could not be opened.
    ///
    /// ## When This Occurs
    /// - Database file can't be created (permissions, missing directory)
    /// - File is not a SQLite database / is corrupted
    /// - A migration failed
    ///
    /// Fatal to application start: no screen that needs the store should be
    /// shown.
    #[error("Failed to initialize store at {path}: {reason}")]
    Initialization { path: String, reason: String },

    /// A record that must exist does not.
    ///
    /// Only raised by lookups that require existence
    /// (`ProductRepository::require`). `get_by_id`, `delete` and `update`
    /// treat a missing id as `None`, a no-op and an insert respectively.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Input could not represent a product field.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Id collision on insert.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A read or write failed after the store was opened.
    #[error("Storage operation failed: {0}")]
    Storage(String),

    /// A persisted row could not be turned back into a product.
    ///
    /// ## When This Occurs
    /// - Row written by a newer build (`record_version` too high)
    /// - Numeric column outside the range of the Rust field
    #[error("Stored product {id} is unreadable: {reason}")]
    Decode { id: String, reason: String },

    /// The store was closed; only `ProductStore::initialize` is valid now.
    #[error("Store is closed")]
    Closed,

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Wraps any open/migrate failure for `path` as an initialization error.
    pub fn initialization(path: &Path, reason: impl ToString) -> Self {
        DbError::Initialization {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a Decode error for the row with the given id.
    pub fn decode(id: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::Decode {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// True for failures of durable I/O after the store was opened.
    pub fn is_storage_io(&self) -> bool {
        matches!(
            self,
            DbError::Storage(_) | DbError::Decode { .. } | DbError::Closed | DbError::PoolExhausted
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (UNIQUE)  → DbError::UniqueViolation
/// sqlx::Error::Database (other)   → DbError::Storage
/// sqlx::Error::PoolTimedOut       → DbError::PoolExhausted
/// sqlx::Error::PoolClosed         → DbError::Closed
/// Other                           → DbError::Storage
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite: "UNIQUE constraint failed: <table>.<column>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::Storage(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::Closed,

            _ => DbError::Storage(err.to_string()),
        }
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;
