//! Error types for the persistence layer.
//!
//! Errors are split by the stage that produced them: building a query from
//! caller input, projecting rows into typed records, and the storage backend
//! itself. None of them are recovered inside this crate.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all repository operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The caller asked for a query that cannot be planned.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A row could not be projected into the target record.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The storage backend failed; wrapped verbatim.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while planning a query from caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Page size is zero or the offset does not fit the store's index range.
    #[error("invalid page request (page {page_index}, size {page_size}): {reason}")]
    InvalidPage {
        page_index: u32,
        page_size: u32,
        reason: String,
    },

    /// The sort field is not part of the projection or the direction is unknown.
    #[error("invalid sort '{field}': {message}")]
    InvalidSort { field: String, message: String },
}

/// Errors raised while projecting a result row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// A non-nullable column came back as NULL.
    #[error("unexpected null in non-nullable column '{column}'")]
    UnexpectedNull { column: &'static str },

    /// The stored value has a different type than the target field.
    #[error("column '{column}' holds {found}, expected {expected}")]
    TypeMismatch {
        column: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The stored integer does not fit the target field.
    #[error("value {value} in column '{column}' is out of range")]
    OutOfRange { column: &'static str, value: i64 },

    /// The row is narrower than the projection.
    #[error("row has {width} columns, no column at index {index}")]
    MissingColumn { index: usize, width: usize },

    /// A scalar query returned no row at all.
    #[error("scalar query returned no rows")]
    EmptyResult,
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema creation failed.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for repository operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Returns true when the error was caused by the caller's request rather
    /// than by the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StorageError::Query(_))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}
