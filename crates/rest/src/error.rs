//! Error types for the member search API.
//!
//! Every error is rendered as a JSON body:
//!
//! ```json
//! { "status": 400, "code": "invalid", "message": "invalid sort 'salary': ..." }
//! ```
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | Query (InvalidPage, InvalidSort) | 400 | invalid |
//! | Mapping | 500 | exception |
//! | Backend | 500 | exception |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_persistence::error::{QueryError, StorageError};
use tracing::{error, warn};

/// The error type for REST API operations.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Malformed or invalid request (HTTP 400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// The store cannot be reached (HTTP 503).
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    #[error("Internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Shorthand for [`RestError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// The HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::BadRequest { .. } => "invalid",
            RestError::ServiceUnavailable { .. } => "unavailable",
            RestError::InternalError { .. } => "exception",
        }
    }

    fn message(&self) -> &str {
        match self {
            RestError::BadRequest { message }
            | RestError::ServiceUnavailable { message }
            | RestError::InternalError { message } => message,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %self, "Rejected request");
        } else {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = serde_json::json!({
            "status": status.as_u16(),
            "code": self.code(),
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Query(e) => e.into(),
            StorageError::Mapping(_) | StorageError::Backend(_) => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;
