//! Member search route configuration.

use axum::{
    Router,
    routing::{get, post},
};
use roster_persistence::repository::MemberRepository;

use crate::handlers;
use crate::state::AppState;

/// Creates all API routes.
///
/// # Routes
///
/// - `GET /v1/members` - Member search
/// - `GET /v1/members/stats` - Age statistics
/// - `GET /v1/members/oldest` - Members of the highest age
/// - `GET /v1/members/at-least-average-age` - Members at or above the average age
/// - `GET /v1/members/joined-team/{team_name}` - All members, team joined only when it matches
/// - `GET /v2/members` - Paged member search
/// - `GET /v3/members` - All members
/// - `GET /v1/teams/age-averages` - Average age per team
/// - `POST /admin/members/relabel` - Bulk relabel
/// - `GET /health` - Health check
pub fn create_routes<R>(state: AppState<R>) -> Router
where
    R: MemberRepository + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler::<R>))
        .route("/v1/members", get(handlers::search_members_handler::<R>))
        .route("/v1/members/stats", get(handlers::member_stats_handler::<R>))
        .route("/v1/members/oldest", get(handlers::oldest_members_handler::<R>))
        .route(
            "/v1/members/at-least-average-age",
            get(handlers::members_at_least_average_age_handler::<R>),
        )
        .route(
            "/v1/members/joined-team/{team_name}",
            get(handlers::members_with_joined_team_handler::<R>),
        )
        .route("/v2/members", get(handlers::search_members_page_handler::<R>))
        .route("/v3/members", get(handlers::list_members_handler::<R>))
        .route(
            "/v1/teams/age-averages",
            get(handlers::team_age_averages_handler::<R>),
        )
        .route(
            "/admin/members/relabel",
            post(handlers::relabel_members_handler::<R>),
        )
        .with_state(state)
}
