//! Database backend implementations.
//!
//! Each backend is gated behind a feature flag and implements
//! [`SqlSession`](crate::core::SqlSession).
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | SQLite | `sqlite` | Embedded database, in-memory or file based |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! use roster_persistence::backends::{ConnectionDescriptor, sqlite::{SqliteBackend, SqliteBackendConfig}};
//!
//! # #[cfg(feature = "sqlite")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//!
//! let descriptor = ConnectionDescriptor::new("sqlite://./data/roster.db");
//! let backend = SqliteBackend::connect(&descriptor, SqliteBackendConfig::default())?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// How to reach a database.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Connection URL.
    pub url: String,
    /// User name, for backends that authenticate.
    #[serde(default)]
    pub user: Option<String>,
    /// Password, for backends that authenticate.
    #[serde(default)]
    pub password: Option<String>,
}

impl ConnectionDescriptor {
    /// A descriptor without credentials.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
        }
    }

    /// Adds credentials.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
