//! Team report handlers.

use axum::{Json, extract::State};
use roster_persistence::repository::MemberRepository;
use roster_persistence::types::TeamAgeAverage;

use crate::error::RestResult;
use crate::state::AppState;

/// Average member age per team, ordered by team name.
///
/// # HTTP Request
///
/// `GET [base]/v1/teams/age-averages`
pub async fn team_age_averages_handler<R>(
    State(state): State<AppState<R>>,
) -> RestResult<Json<Vec<TeamAgeAverage>>>
where
    R: MemberRepository,
{
    let averages = state.repository().team_age_averages().await?;
    Ok(Json(averages))
}
