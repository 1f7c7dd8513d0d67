//! Roster member search server.

use std::sync::Arc;

use clap::Parser;
use roster_rest::{ServerConfig, create_app_with_config, init_logging, serve};
use tracing::info;

#[cfg(feature = "sqlite")]
use roster_persistence::backends::sqlite::{SqliteBackend, SqliteBackendConfig};
#[cfg(feature = "sqlite")]
use roster_persistence::repository::SqlMemberRepository;

/// Opens the configured SQLite database, creates the schema and loads the
/// demo roster when asked to.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let descriptor = config.connection_descriptor();
    info!(database = %descriptor.url, "Initializing SQLite backend");

    let backend = SqliteBackend::connect(&descriptor, SqliteBackendConfig::default())?;
    backend.init_schema()?;

    if config.seed_fixture && backend.seed_demo()? {
        info!("Loaded demo roster");
    }

    Ok(backend)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        default_page_size = config.default_page_size,
        max_page_size = config.max_page_size,
        "Starting roster server"
    );

    start(config).await
}

#[cfg(feature = "sqlite")]
async fn start(config: ServerConfig) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;
    let repository = SqlMemberRepository::new(Arc::new(backend));
    let app = create_app_with_config(repository, config.clone());
    serve(app, &config).await
}

#[cfg(not(feature = "sqlite"))]
compile_error!("At least one database backend feature must be enabled");
