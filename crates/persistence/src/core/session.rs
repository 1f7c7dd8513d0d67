//! The SQL execution capability consumed by the repository.

use async_trait::async_trait;

use crate::error::{MappingError, StorageResult};
use crate::query::SqlFragment;

use super::row::{SqlRow, SqlValue};

/// Executes parameterized SQL and returns backend-neutral rows.
///
/// Implementations own connection handling. Each call runs in at most one
/// transaction: reads in a read transaction, [`SqlSession::execute`] in a
/// write transaction that commits on success.
///
/// # Example
///
/// ```ignore
/// use roster_persistence::core::SqlSession;
/// use roster_persistence::query::SqlFragment;
///
/// async fn count_members<S: SqlSession>(session: &S) -> i64 {
///     let value = session
///         .query_scalar(&SqlFragment::new("SELECT COUNT(*) FROM member"))
///         .await
///         .unwrap();
///     match value {
///         roster_persistence::core::SqlValue::Integer(n) => n,
///         _ => 0,
///     }
/// }
/// ```
#[async_trait]
pub trait SqlSession: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Runs a SELECT and returns every row in order.
    async fn query(&self, sql: &SqlFragment) -> StorageResult<Vec<SqlRow>>;

    /// Runs a statement that modifies rows and returns how many were affected.
    async fn execute(&self, sql: &SqlFragment) -> StorageResult<u64>;

    /// Runs a SELECT that yields a single value.
    ///
    /// Fails with [`MappingError::EmptyResult`] when no row comes back.
    async fn query_scalar(&self, sql: &SqlFragment) -> StorageResult<SqlValue> {
        let rows = self.query(sql).await?;
        let row = rows.into_iter().next().ok_or(MappingError::EmptyResult)?;
        let value = row
            .into_values()
            .into_iter()
            .next()
            .ok_or(MappingError::MissingColumn { index: 0, width: 0 })?;
        Ok(value)
    }

    /// Round-trips a trivial query.
    async fn ping(&self) -> StorageResult<()> {
        self.query(&SqlFragment::new("SELECT 1")).await.map(|_| ())
    }
}
