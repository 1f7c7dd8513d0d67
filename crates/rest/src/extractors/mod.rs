//! Axum extractors for member search requests.
//!
//! - [`MemberSearch`] - Search filters from the query string
//! - [`PageParams`] - `page`, `size` and repeatable `sort` parameters
//! - [`SortParams`] - Repeatable `sort` parameters alone
//!
//! All read the raw query pairs so a key may repeat. A parameter present
//! with an empty value is treated as absent.

mod member_search;
mod pagination;

pub use member_search::MemberSearch;
pub use pagination::{PageParams, SortParams};

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::error::RestError;

/// Query string pairs in order, with empty values dropped.
async fn query_pairs<S>(parts: &mut Parts, state: &S) -> Result<Vec<(String, String)>, RestError>
where
    S: Send + Sync,
{
    let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
        .await
        .map_err(|e| RestError::bad_request(format!("Invalid query string: {}", e)))?;

    Ok(pairs
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect())
}

/// Parses a numeric parameter, naming it in the error.
fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, RestError> {
    value.trim().parse().map_err(|_| {
        RestError::bad_request(format!("Parameter '{}' has invalid value '{}'", name, value))
    })
}
