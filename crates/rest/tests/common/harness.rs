//! Test servers over an in-memory roster.

use std::sync::Arc;

use axum_test::TestServer;
use roster_persistence::backends::sqlite::SqliteBackend;
use roster_persistence::repository::SqlMemberRepository;
use roster_rest::{ServerConfig, create_app, create_app_with_config};

/// A test server and the backend behind it.
pub struct TestApp {
    /// The test server instance.
    pub server: TestServer,
    /// The storage backend, for seeding extra rows.
    pub backend: Arc<SqliteBackend>,
}

/// An in-memory backend with the demo roster.
pub fn seeded_backend() -> Arc<SqliteBackend> {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to init schema");
    backend.seed_demo().expect("Failed to seed demo roster");
    Arc::new(backend)
}

/// A server over the demo roster with the test configuration.
pub fn seeded_app() -> TestApp {
    seeded_app_with_config(ServerConfig::for_testing())
}

/// A server over the demo roster with `config`.
pub fn seeded_app_with_config(config: ServerConfig) -> TestApp {
    let backend = seeded_backend();
    let repository = SqlMemberRepository::new(Arc::clone(&backend));
    let app = create_app_with_config(repository, config);
    let server = TestServer::new(app).expect("Failed to create test server");
    TestApp { server, backend }
}

/// A server with the default configuration whose database has no schema,
/// so every query fails.
pub fn broken_app() -> TestApp {
    let backend =
        Arc::new(SqliteBackend::in_memory().expect("Failed to create SQLite backend"));
    let repository = SqlMemberRepository::new(Arc::clone(&backend));
    let app = create_app(repository);
    let server = TestServer::new(app).expect("Failed to create test server");
    TestApp { server, backend }
}
