//! Roster persistence layer.
//!
//! A typed query composer for a small member/team schema, a pagination
//! engine with an elidable count query, and a repository facade over a
//! pluggable SQL execution capability.
//!
//! # Architecture
//!
//! - [`schema`] - Static table, column and association model
//! - [`predicate`] - Null-skipping predicate algebra over typed columns
//! - [`query`] - SELECT/UPDATE plans, SQL rendering and the member search plans
//! - [`pagination`] - Page execution with count elision
//! - [`repository`] - The operation set exposed to the HTTP layer
//! - [`core`] - The [`SqlSession`] capability and row mapping
//! - [`backends`] - Backend implementations (SQLite)
//! - [`types`] - Entities, search input, read models and page types
//! - [`error`] - Error types for all operations
//!
//! # Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use roster_persistence::backends::sqlite::SqliteBackend;
//! use roster_persistence::repository::{MemberRepository, SqlMemberRepository};
//! use roster_persistence::types::{Pageable, SearchCondition, SortOrder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! backend.seed_demo()?;
//!
//! let repository = SqlMemberRepository::new(Arc::new(backend));
//!
//! let cond = SearchCondition::new().with_team_name("teamB").with_age_goe(35);
//! let members = repository.search(&cond).await?;
//! assert_eq!(members.len(), 1);
//!
//! let pageable = Pageable::new(0, 2).with_sort(SortOrder::desc("age"));
//! let page = repository.search_page(&SearchCondition::new(), &pageable).await?;
//! assert_eq!(page.total_elements, 4);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod pagination;
pub mod predicate;
pub mod query;
pub mod repository;
pub mod schema;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use types::{
    Member, MemberStats, MemberTeamDto, Page, Pageable, SearchCondition, SortDirection, SortOrder,
    TeamAgeAverage,
};

// Re-export core traits
pub use crate::core::{FromSqlRow, SqlSession};
pub use repository::{MemberRepository, SqlMemberRepository};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
