//! # Store Configuration & Connection Pool
//!
//! Where the product collection lives and how SQLite is opened.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Opening the Store                                  │
//! │                                                                         │
//! │  Composition root                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::default_location() / ::new(path) / ::in_memory()         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  connect(&config) ← WAL, NORMAL sync, busy timeout                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  one writer at a time, readers in WAL   │                           │
//! │  └─────────────────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use directories::ProjectDirs;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const IN_MEMORY: &str = ":memory:";

/// File name of the collection inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "inventory.db";

// =============================================================================
// Configuration
// =============================================================================

/// Product Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/inventory.db")
///     .max_connections(2)
///     .seed_on_init(false);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file (`:memory:` for tests).
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a connection from the pool.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle time before a connection is closed. `None` keeps it forever.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Maximum lifetime of a connection. `None` keeps it forever.
    /// Default: 30 minutes
    pub max_lifetime: Option<Duration>,

    /// How long SQLite waits on a locked database before failing.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on initialize.
    /// Default: true
    pub run_migrations: bool,

    /// Whether initialize seeds sample products into an empty collection.
    /// Default: true
    pub seed_on_init: bool,

    /// Buffered change events per subscriber before the slowest lags.
    /// Default: 64
    pub event_capacity: usize,
}

impl StoreConfig {
    /// Creates a configuration for the database file at `path`. The file is
    /// created on first open; its directory must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
            seed_on_init: true,
            event_capacity: 64,
        }
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// Uses a single connection that is never recycled: every SQLite
    /// connection to `:memory:` is a separate, empty database.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            ..StoreConfig::new(IN_MEMORY)
        }
    }

    /// Configuration for the platform's per-user data directory.
    ///
    /// - **macOS**: `~/Library/Application Support/com.stockroom.stockroom/inventory.db`
    /// - **Windows**: `%APPDATA%\stockroom\stockroom\data\inventory.db`
    /// - **Linux**: `~/.local/share/stockroom/inventory.db`
    ///
    /// Creates the directory if it doesn't exist.
    pub fn default_location() -> DbResult<Self> {
        let dirs = ProjectDirs::from("com", "stockroom", "stockroom").ok_or_else(|| {
            DbError::Initialization {
                path: DATABASE_FILE_NAME.to_string(),
                reason: "could not determine application data directory".to_string(),
            }
        })?;

        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| DbError::initialization(data_dir, e))?;

        Ok(StoreConfig::new(data_dir.join(DATABASE_FILE_NAME)))
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on initialize.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets whether initialize seeds an empty collection.
    pub fn seed_on_init(mut self, seed: bool) -> Self {
        self.seed_on_init = seed;
        self
    }

    /// Sets the change-event buffer size.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// True when this configuration points at a throwaway in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }
}

// =============================================================================
// Pool
// =============================================================================

/// Opens the connection pool described by `config`.
///
/// ## What This Does
/// 1. Creates the database file if it doesn't exist
/// 2. Configures SQLite:
///    - WAL mode (readers don't block the writer)
///    - NORMAL synchronous (committed data survives an app crash)
///    - Busy timeout instead of immediate SQLITE_BUSY
/// 3. Opens the pool, which establishes one connection immediately so a
///    bad path or a corrupted file fails here
///
/// Every failure is reported as [`DbError::Initialization`].
pub(crate) async fn connect(config: &StoreConfig) -> DbResult<SqlitePool> {
    let path = &config.database_path;

    info!(path = %path.display(), "Opening product database");

    let base = if config.is_in_memory() {
        SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::initialization(path, e))?
    } else {
        SqliteConnectOptions::new().filename(path)
    };

    let connect_options = base
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(config.busy_timeout)
        .create_if_missing(true);

    debug!("Connection options configured");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_with(connect_options)
        .await
        .map_err(|e| DbError::initialization(path, e))?;

    info!(
        max_connections = config.max_connections,
        "Database pool created"
    );

    Ok(pool)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/inventory.db")
            .max_connections(10)
            .min_connections(2)
            .seed_on_init(false)
            .event_capacity(0);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.seed_on_init);
        assert!(config.run_migrations);
        assert_eq!(config.event_capacity, 1);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_in_memory_keeps_its_single_connection() {
        let config = StoreConfig::in_memory();

        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.idle_timeout, None);
        assert_eq!(config.max_lifetime, None);
        assert!(config.seed_on_init);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_default_location_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_home = dir.path().join("xdg-data");
        std::env::set_var("XDG_DATA_HOME", &data_home);

        let config = StoreConfig::default_location().unwrap();

        let expected_dir = data_home.join("stockroom");
        assert!(expected_dir.is_dir());
        assert_eq!(config.database_path, expected_dir.join(DATABASE_FILE_NAME));
        assert!(config.seed_on_init);

        let pool = connect(&config).await.unwrap();
        pool.close().await;
        assert!(config.database_path.is_file());
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let pool = connect(&StoreConfig::in_memory()).await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn test_connect_missing_directory_is_initialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("no/such/dir/inventory.db"));

        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DbError::Initialization { .. }));
    }
}
