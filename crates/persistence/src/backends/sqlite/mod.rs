//! SQLite backend implementation.
//!
//! Supports in-memory databases (one shared connection) and file databases
//! (pooled, WAL journal). Statements run synchronously on a pooled
//! connection; each read is a single autocommit statement and each write
//! runs in its own transaction.
//!
//! # Example
//!
//! ```no_run
//! use roster_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! backend.seed_demo()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE team (
//!     team_id INTEGER PRIMARY KEY,
//!     name TEXT NOT NULL
//! );
//!
//! CREATE TABLE member (
//!     member_id INTEGER PRIMARY KEY,
//!     username TEXT,
//!     age INTEGER NOT NULL CHECK (age >= 0),
//!     team_id INTEGER REFERENCES team(team_id)
//! );
//! ```

mod backend;
mod fixtures;
mod schema;
mod session;

pub use backend::{SqliteBackend, SqliteBackendConfig, SqliteLocation};
pub use schema::SCHEMA_VERSION;
