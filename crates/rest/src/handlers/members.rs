//! Member search handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use roster_persistence::repository::MemberRepository;
use roster_persistence::types::{Member, MemberStats, MemberTeamDto, Page};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{MemberSearch, PageParams, SortParams};
use crate::state::AppState;

/// Handler for the unpaged member search.
///
/// # HTTP Request
///
/// `GET [base]/v1/members?username=&teamName=&ageGoe=&ageLoe=&usernameContains=`
///
/// # Response
///
/// - `200 OK` - JSON array of members with their team, ordered by member id
/// - `400 Bad Request` - A filter value could not be parsed
///
/// A `sort` parameter orders the result as in the paged search.
pub async fn search_members_handler<R>(
    State(state): State<AppState<R>>,
    MemberSearch(cond): MemberSearch,
    SortParams(sort): SortParams,
) -> RestResult<Json<Vec<MemberTeamDto>>>
where
    R: MemberRepository,
{
    debug!(condition = ?cond, "Processing member search");

    let members = if sort.is_empty() {
        state.repository().search(&cond).await?
    } else {
        state.repository().search_sorted(&cond, &sort).await?
    };
    Ok(Json(members))
}

/// Handler for the paged member search.
///
/// # HTTP Request
///
/// `GET [base]/v2/members?<filters>&page=&size=&sort=field,dir`
///
/// # Response
///
/// - `200 OK` - A page: `content`, `number`, `size`, `totalElements`, `totalPages`
/// - `400 Bad Request` - Invalid page request or unknown sort field
pub async fn search_members_page_handler<R>(
    State(state): State<AppState<R>>,
    MemberSearch(cond): MemberSearch,
    params: PageParams,
) -> RestResult<Json<Page<MemberTeamDto>>>
where
    R: MemberRepository,
{
    let pageable = params.to_pageable(state.default_page_size(), state.max_page_size());
    debug!(condition = ?cond, pageable = ?pageable, "Processing paged member search");

    let page = state.repository().search_page(&cond, &pageable).await?;
    Ok(Json(page))
}

/// Handler listing every member in entity shape.
///
/// # HTTP Request
///
/// `GET [base]/v3/members`
pub async fn list_members_handler<R>(
    State(state): State<AppState<R>>,
) -> RestResult<Json<Vec<Member>>>
where
    R: MemberRepository,
{
    let members = state.repository().find_all().await?;
    Ok(Json(members))
}

/// Handler for member age statistics.
///
/// # HTTP Request
///
/// `GET [base]/v1/members/stats`
pub async fn member_stats_handler<R>(
    State(state): State<AppState<R>>,
) -> RestResult<Json<MemberStats>>
where
    R: MemberRepository,
{
    let stats = state.repository().member_stats().await?;
    Ok(Json(stats))
}

/// Handler listing the members of the highest age.
///
/// # HTTP Request
///
/// `GET [base]/v1/members/oldest`
pub async fn oldest_members_handler<R>(
    State(state): State<AppState<R>>,
) -> RestResult<Json<Vec<Member>>>
where
    R: MemberRepository,
{
    let members = state.repository().oldest_members().await?;
    Ok(Json(members))
}

/// Handler listing members at least as old as the average member.
///
/// # HTTP Request
///
/// `GET [base]/v1/members/at-least-average-age`
pub async fn members_at_least_average_age_handler<R>(
    State(state): State<AppState<R>>,
) -> RestResult<Json<Vec<Member>>>
where
    R: MemberRepository,
{
    let members = state.repository().members_at_least_average_age().await?;
    Ok(Json(members))
}

/// Handler listing every member, with team fields present only for members
/// of the named team.
///
/// # HTTP Request
///
/// `GET [base]/v1/members/joined-team/{team_name}`
///
/// # Response
///
/// - `200 OK` - Every member; `teamId` and `teamName` are null outside the team
pub async fn members_with_joined_team_handler<R>(
    State(state): State<AppState<R>>,
    Path(team_name): Path<String>,
) -> RestResult<Json<Vec<MemberTeamDto>>>
where
    R: MemberRepository,
{
    debug!(team_name = %team_name, "Listing members with joined team");

    let members = state.repository().members_with_joined_team(&team_name).await?;
    Ok(Json(members))
}
