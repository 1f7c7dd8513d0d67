//! # roster-rest - Member search HTTP API
//!
//! Exposes the roster repository over HTTP: filtered member search, paged
//! search with sorting, plain listing, age reports, a bulk relabel command
//! and a health check.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use roster_persistence::backends::sqlite::SqliteBackend;
//! use roster_persistence::repository::SqlMemberRepository;
//! use roster_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::in_memory()?;
//!     backend.init_schema()?;
//!     backend.seed_demo()?;
//!
//!     let repository = SqlMemberRepository::new(Arc::new(backend));
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(repository, config.clone());
//!
//!     roster_rest::serve(app, &config).await
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | search | GET | `/v1/members?username=&teamName=&ageGoe=&ageLoe=&usernameContains=` |
//! | paged search | GET | `/v2/members?...&page=&size=&sort=field,dir` |
//! | list | GET | `/v3/members` |
//! | stats | GET | `/v1/members/stats` |
//! | oldest members | GET | `/v1/members/oldest` |
//! | at least average age | GET | `/v1/members/at-least-average-age` |
//! | joined team | GET | `/v1/members/joined-team/{team_name}` |
//! | team averages | GET | `/v1/teams/age-averages` |
//! | relabel | POST | `/admin/members/relabel` |
//! | health | GET | `/health` |
//!
//! Empty query parameter values count as absent. `sort` may repeat.
//!
//! ## Error Handling
//!
//! Errors are JSON bodies `{ "status", "code", "message" }`:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | invalid | Bad parameter, invalid page request or unknown sort field |
//! | 500 | exception | Storage or row mapping failure |
//! | 503 | unavailable | Health check failed |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their HTTP rendering
//! - [`config`] - Server configuration
//! - [`state`] - Application state (repository, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Query string extractors
//! - [`routing`] - Route configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;

pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit};
use http::StatusCode;
use roster_persistence::repository::MemberRepository;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
pub fn create_app<R>(repository: R) -> Router
where
    R: MemberRepository + 'static,
{
    create_app_with_config(repository, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use roster_rest::{create_app_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     max_page_size: 100,
///     enable_cors: false,
///     ..Default::default()
/// };
/// let app = create_app_with_config(repository, config);
/// ```
pub fn create_app_with_config<R>(repository: R, config: ServerConfig) -> Router
where
    R: MemberRepository + 'static,
{
    info!(
        backend = repository.backend_name(),
        "Creating member search API"
    );

    let state = AppState::new(Arc::new(repository), config.clone());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Binds the configured address and serves `app` until the process stops.
pub async fn serve(app: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %listener.local_addr()?, "Server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "roster_server={level},roster_rest={level},roster_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
