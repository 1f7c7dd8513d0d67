//! A session double that records statements and can fail on demand.

use std::sync::Mutex;

use async_trait::async_trait;

use roster_persistence::backends::sqlite::SqliteBackend;
use roster_persistence::core::{SqlRow, SqlSession};
use roster_persistence::error::{BackendError, StorageError, StorageResult};
use roster_persistence::query::SqlFragment;

/// Which statements the recording session rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    /// Nothing fails.
    Nothing,
    /// SELECT statements other than the count query.
    Content,
    /// The count query.
    Count,
}

/// Wraps a real backend and records every statement it is asked to run.
pub struct RecordingSession {
    inner: SqliteBackend,
    statements: Mutex<Vec<String>>,
    fail_on: FailOn,
}

impl RecordingSession {
    pub fn new(inner: SqliteBackend) -> Self {
        Self::failing(inner, FailOn::Nothing)
    }

    pub fn failing(inner: SqliteBackend, fail_on: FailOn) -> Self {
        Self {
            inner,
            statements: Mutex::new(Vec::new()),
            fail_on,
        }
    }

    /// Statements issued so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    /// Number of count queries issued so far.
    pub fn count_queries(&self) -> usize {
        self.statements()
            .iter()
            .filter(|sql| is_count(sql))
            .count()
    }

    fn record(&self, sql: &SqlFragment) -> StorageResult<()> {
        self.statements.lock().unwrap().push(sql.sql.clone());
        let rejected = match self.fail_on {
            FailOn::Nothing => false,
            FailOn::Content => !is_count(&sql.sql),
            FailOn::Count => is_count(&sql.sql),
        };
        if rejected {
            return Err(StorageError::Backend(BackendError::Internal {
                backend_name: "recording".to_string(),
                message: "injected failure".to_string(),
                source: None,
            }));
        }
        Ok(())
    }
}

// The page count statement; aggregate reports also start with COUNT.
fn is_count(sql: &str) -> bool {
    sql.starts_with("SELECT COUNT(") && sql.contains(" AS total FROM ")
}

#[async_trait]
impl SqlSession for RecordingSession {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn query(&self, sql: &SqlFragment) -> StorageResult<Vec<SqlRow>> {
        self.record(sql)?;
        self.inner.query(sql).await
    }

    async fn execute(&self, sql: &SqlFragment) -> StorageResult<u64> {
        self.record(sql)?;
        self.inner.execute(sql).await
    }
}
