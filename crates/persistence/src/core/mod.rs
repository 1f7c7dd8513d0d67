//! Storage abstractions.
//!
//! - [`SqlSession`] - the execution capability the repository is built on
//! - [`SqlRow`], [`SqlValue`] - backend-neutral result rows
//! - [`FromSqlRow`], [`FromSqlValue`] - positional, typed projection

mod row;
mod session;

pub use row::{FromSqlRow, FromSqlValue, SqlRow, SqlValue, map_rows};
pub use session::SqlSession;
