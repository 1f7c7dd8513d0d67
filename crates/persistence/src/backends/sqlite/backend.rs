//! SQLite backend implementation.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use serde::{Deserialize, Serialize};

use crate::backends::ConnectionDescriptor;
use crate::error::{BackendError, StorageError, StorageResult};

use super::schema;

/// SQLite store for members and teams.
pub struct SqliteBackend {
    pool: Pool<SqliteConnectionManager>,
    config: SqliteBackendConfig,
    is_memory: bool,
}

impl Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("config", &self.config)
            .field("is_memory", &self.is_memory)
            .field("pool_size", &self.pool.state().connections)
            .finish_non_exhaustive()
    }
}

/// Configuration for the SQLite backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteBackendConfig {
    /// Maximum number of connections in the pool. In-memory databases
    /// always use a single connection.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,

    /// Enable WAL mode for file databases.
    #[serde(default = "default_true")]
    pub enable_wal: bool,

    /// Enable foreign key constraints.
    #[serde(default = "default_true")]
    pub enable_foreign_keys: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout_ms() -> u64 {
    30000
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for SqliteBackendConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_ms: default_connection_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

/// Where a SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    /// Private in-memory database.
    Memory,
    /// Database file.
    File(PathBuf),
}

impl SqliteLocation {
    /// Parses a connection URL.
    ///
    /// Accepts `:memory:`, `sqlite::memory:`, `sqlite://<path>`,
    /// `sqlite:<path>` and bare paths.
    pub fn parse(url: &str) -> Result<Self, BackendError> {
        let url = url.trim();
        let rest = if let Some(rest) = url.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = url.strip_prefix("sqlite:") {
            rest
        } else if let Some((scheme, _)) = url.split_once("://") {
            return Err(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: format!("unsupported URL scheme '{}'", scheme),
            });
        } else {
            url
        };

        match rest {
            "" => Err(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: "database URL has no path".to_string(),
            }),
            ":memory:" | "memory:" => Ok(SqliteLocation::Memory),
            path => Ok(SqliteLocation::File(PathBuf::from(path))),
        }
    }
}

impl SqliteBackend {
    /// Creates a new in-memory SQLite backend.
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_location(SqliteLocation::Memory, SqliteBackendConfig::default())
    }

    /// Opens or creates a file-based SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(path, SqliteBackendConfig::default())
    }

    /// Opens a database file with custom configuration. `:memory:` opens an
    /// in-memory database.
    pub fn with_config<P: AsRef<Path>>(
        path: P,
        config: SqliteBackendConfig,
    ) -> StorageResult<Self> {
        let location = if path.as_ref().as_os_str() == ":memory:" {
            SqliteLocation::Memory
        } else {
            SqliteLocation::File(path.as_ref().to_path_buf())
        };
        Self::with_location(location, config)
    }

    /// Opens the database described by `descriptor`.
    ///
    /// SQLite has no authentication; user and password are accepted and
    /// ignored.
    pub fn connect(
        descriptor: &ConnectionDescriptor,
        config: SqliteBackendConfig,
    ) -> StorageResult<Self> {
        if descriptor.user.is_some() || descriptor.password.is_some() {
            tracing::debug!("SQLite ignores database credentials");
        }
        let location = SqliteLocation::parse(&descriptor.url)?;
        Self::with_location(location, config)
    }

    /// Opens `location`.
    pub fn with_location(
        location: SqliteLocation,
        config: SqliteBackendConfig,
    ) -> StorageResult<Self> {
        let busy_timeout = Duration::from_millis(u64::from(config.busy_timeout_ms));
        let foreign_keys = config.enable_foreign_keys;

        let (manager, is_memory) = match &location {
            SqliteLocation::Memory => (SqliteConnectionManager::memory(), true),
            SqliteLocation::File(path) => (SqliteConnectionManager::file(path), false),
        };
        let manager = manager.with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            if foreign_keys {
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            }
            Ok(())
        });

        // Every connection to `:memory:` is a separate database, so an
        // in-memory pool holds exactly one connection for its whole life.
        let builder = Pool::builder().connection_timeout(Duration::from_millis(
            config.connection_timeout_ms,
        ));
        let builder = if is_memory {
            builder
                .max_size(1)
                .min_idle(Some(1))
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            builder
                .max_size(config.max_connections.max(1))
                .min_idle(Some(config.min_connections.min(config.max_connections)))
        };

        let pool = builder.build(manager).map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: e.to_string(),
            })
        })?;

        let backend = Self {
            pool,
            config,
            is_memory,
        };

        backend.configure_journal()?;

        tracing::info!(location = ?location, "Opened SQLite database");
        Ok(backend)
    }

    /// Initialize the database schema.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        schema::initialize_schema(&conn)
    }

    /// Get a connection from the pool.
    pub(crate) fn get_connection(
        &self,
    ) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: e.to_string(),
            })
        })
    }

    fn configure_journal(&self) -> StorageResult<()> {
        if !self.config.enable_wal || self.is_memory {
            return Ok(());
        }
        let conn = self.get_connection()?;
        // journal_mode answers with the resulting mode, so it is read as a row.
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(|e| {
                StorageError::Backend(BackendError::Internal {
                    backend_name: "sqlite".to_string(),
                    message: format!("Failed to enable WAL mode: {}", e),
                    source: None,
                })
            })?;
        Ok(())
    }

    /// Returns whether this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &SqliteBackendConfig {
        &self.config
    }
}
