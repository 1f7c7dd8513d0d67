//! Administrative member updates.

use axum::{Json, extract::State};
use roster_persistence::repository::MemberRepository;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Body of a relabel request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelabelRequest {
    /// Members strictly younger than this are relabeled.
    pub age_threshold: i32,
    /// The new username.
    pub replacement: String,
}

/// Result of a relabel request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelabelResponse {
    /// Number of members changed.
    pub updated: u64,
}

/// Handler renaming every member below an age threshold.
///
/// # HTTP Request
///
/// `POST [base]/admin/members/relabel` with `{ "ageThreshold": 28, "replacement": "guest" }`
///
/// # Response
///
/// - `200 OK` - `{ "updated": n }`
/// - `400 Bad Request` - Empty replacement
pub async fn relabel_members_handler<R>(
    State(state): State<AppState<R>>,
    Json(request): Json<RelabelRequest>,
) -> RestResult<Json<RelabelResponse>>
where
    R: MemberRepository,
{
    if request.replacement.trim().is_empty() {
        return Err(RestError::bad_request("replacement cannot be empty"));
    }

    let updated = state
        .repository()
        .bulk_relabel_below_age(request.age_threshold, &request.replacement)
        .await?;

    info!(
        age_threshold = request.age_threshold,
        updated, "Relabel request completed"
    );
    Ok(Json(RelabelResponse { updated }))
}
