//! Health check endpoint handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_persistence::repository::MemberRepository;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Runs a trivial statement against the store.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Store answered
/// - `503 Service Unavailable` - Store did not answer
pub async fn health_handler<R>(State(state): State<AppState<R>>) -> RestResult<Response>
where
    R: MemberRepository,
{
    debug!("Processing health check request");

    let backend_name = state.repository().backend_name();
    state
        .repository()
        .health_check()
        .await
        .map_err(|e| RestError::ServiceUnavailable {
            message: format!("{} is not answering: {}", backend_name, e),
        })?;

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": backend_name,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}
