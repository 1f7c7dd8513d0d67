//! Server configuration for the member search API.
//!
//! Configuration comes from command line arguments, environment variables,
//! or code.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ROSTER_SERVER_PORT` | 8080 | Server port |
//! | `ROSTER_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `ROSTER_LOG_LEVEL` | info | Log level |
//! | `ROSTER_MAX_BODY_SIZE` | 65536 | Max request body (bytes) |
//! | `ROSTER_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `ROSTER_ENABLE_CORS` | true | Enable CORS |
//! | `ROSTER_CORS_ORIGINS` | * | Allowed origins |
//! | `ROSTER_CORS_METHODS` | GET,POST,OPTIONS | Allowed methods |
//! | `ROSTER_CORS_HEADERS` | Content-Type,Accept | Allowed headers |
//! | `ROSTER_DATABASE_URL` | sqlite::memory: | Database URL |
//! | `ROSTER_DATABASE_USER` | | Database user |
//! | `ROSTER_DATABASE_PASSWORD` | | Database password |
//! | `ROSTER_DEFAULT_PAGE_SIZE` | 20 | Page size when `size` is absent |
//! | `ROSTER_MAX_PAGE_SIZE` | 2000 | Upper bound for `size` |
//! | `ROSTER_SEED_FIXTURE` | true | Load the demo roster into an empty database |
//!
//! # Example
//!
//! ```rust
//! use roster_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     max_page_size: 100,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;

use clap::Parser;
use roster_persistence::backends::ConnectionDescriptor;

/// Server configuration for the member search API.
#[derive(Clone, Parser)]
#[command(name = "roster")]
#[command(about = "Member search API over the roster query composer")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "ROSTER_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "ROSTER_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ROSTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "ROSTER_MAX_BODY_SIZE", default_value = "65536")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "ROSTER_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "ROSTER_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "ROSTER_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "ROSTER_CORS_METHODS", default_value = "GET,POST,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "ROSTER_CORS_HEADERS", default_value = "Content-Type,Accept")]
    pub cors_headers: String,

    /// Database URL (`sqlite::memory:`, `sqlite://<path>` or a file path).
    #[arg(long, env = "ROSTER_DATABASE_URL", default_value = "sqlite::memory:")]
    pub database_url: String,

    /// Database user.
    #[arg(long, env = "ROSTER_DATABASE_USER")]
    pub database_user: Option<String>,

    /// Database password.
    #[arg(long, env = "ROSTER_DATABASE_PASSWORD")]
    pub database_password: Option<String>,

    /// Page size used when a request gives none.
    #[arg(long, env = "ROSTER_DEFAULT_PAGE_SIZE", default_value = "20")]
    pub default_page_size: u32,

    /// Largest page size a request may ask for; larger requests are capped.
    #[arg(long, env = "ROSTER_MAX_PAGE_SIZE", default_value = "2000")]
    pub max_page_size: u32,

    /// Load the demo roster when the database holds no teams.
    #[arg(long, env = "ROSTER_SEED_FIXTURE", default_value = "true")]
    pub seed_fixture: bool,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("log_level", &self.log_level)
            .field("max_body_size", &self.max_body_size)
            .field("request_timeout", &self.request_timeout)
            .field("enable_cors", &self.enable_cors)
            .field("cors_origins", &self.cors_origins)
            .field("cors_methods", &self.cors_methods)
            .field("cors_headers", &self.cors_headers)
            .field("database_url", &self.database_url)
            .field("database_user", &self.database_user)
            .field(
                "database_password",
                &self.database_password.as_ref().map(|_| "***"),
            )
            .field("default_page_size", &self.default_page_size)
            .field("max_page_size", &self.max_page_size)
            .field("seed_fixture", &self.seed_fixture)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 64 * 1024,
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept".to_string(),
            database_url: "sqlite::memory:".to_string(),
            database_user: None,
            database_password: None,
            default_page_size: 20,
            max_page_size: 2000,
            seed_fixture: true,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The database connection descriptor.
    pub fn connection_descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor {
            url: self.database_url.clone(),
            user: self.database_user.clone(),
            password: self.database_password.clone(),
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            seed_fixture: false,
            ..Default::default()
        }
    }
}
