//! Application state for the member search API.
//!
//! Handlers share the member repository and the server configuration.

use std::sync::Arc;

use roster_persistence::repository::MemberRepository;

use crate::config::ServerConfig;

/// Shared application state.
///
/// # Type Parameters
///
/// * `R` - The member repository (must implement [`MemberRepository`])
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use roster_persistence::backends::sqlite::SqliteBackend;
/// use roster_persistence::repository::SqlMemberRepository;
/// use roster_rest::{AppState, ServerConfig};
///
/// let backend = SqliteBackend::in_memory()?;
/// let repository = SqlMemberRepository::new(Arc::new(backend));
/// let state = AppState::new(Arc::new(repository), ServerConfig::default());
/// ```
pub struct AppState<R> {
    repository: Arc<R>,
    config: Arc<ServerConfig>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R: MemberRepository> AppState<R> {
    /// Creates a new AppState with the given repository and configuration.
    pub fn new(repository: Arc<R>, config: ServerConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the member repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Page size used when a request gives none.
    pub fn default_page_size(&self) -> u32 {
        self.config.default_page_size
    }

    /// Upper bound for requested page sizes.
    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }
}
