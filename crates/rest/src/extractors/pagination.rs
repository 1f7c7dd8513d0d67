//! Pagination and ordering extractors.
//!
//! [`PageParams`] extracts `page`, `size` and `sort`; [`SortParams`] extracts
//! only `sort`, for endpoints that order but do not page.

use axum::{extract::FromRequestParts, http::request::Parts};
use roster_persistence::types::{Pageable, SortOrder};

use super::{parse_number, query_pairs};
use crate::error::RestError;

/// Axum extractor for page parameters.
///
/// `page` is zero-based. `sort` may repeat; each value is `field[,field...][,asc|desc]`.
/// Sort fields are checked when the query is planned.
///
/// # Example
///
/// ```rust,ignore
/// use roster_rest::extractors::PageParams;
///
/// async fn list_handler(params: PageParams) {
///     let pageable = params.to_pageable(20, 2000);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    /// Requested page index.
    pub page: Option<u32>,
    /// Requested page size.
    pub size: Option<u32>,
    /// Sort terms in request order.
    pub sort: Vec<SortOrder>,
}

/// Axum extractor for repeatable `sort` parameters alone.
///
/// `page` and `size` are ignored, whatever their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortParams(pub Vec<SortOrder>);

impl SortParams {
    /// Reads the sort terms from query pairs, in request order.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, RestError> {
        let mut sort = Vec::new();
        for (_, value) in pairs.iter().filter(|(name, _)| name == "sort") {
            sort.extend(SortOrder::parse_param(value)?);
        }
        Ok(Self(sort))
    }
}

impl<S> FromRequestParts<S> for SortParams
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(parts, state).await?;
        Self::from_pairs(&pairs)
    }
}

impl PageParams {
    /// Reads the page parameters from query pairs.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, RestError> {
        let SortParams(sort) = SortParams::from_pairs(pairs)?;
        let mut params = Self {
            sort,
            ..Self::default()
        };
        for (name, value) in pairs {
            match name.as_str() {
                "page" => params.page = Some(parse_number(name, value)?),
                "size" => params.size = Some(parse_number(name, value)?),
                _ => {}
            }
        }
        Ok(params)
    }

    /// Builds the page request. A missing size falls back to
    /// `default_size`; a size above `max_size` is capped.
    pub fn to_pageable(&self, default_size: u32, max_size: u32) -> Pageable {
        let size = self.size.unwrap_or(default_size).min(max_size);
        Pageable {
            page_index: self.page.unwrap_or(0),
            page_size: size,
            sort: self.sort.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(parts, state).await?;
        Self::from_pairs(&pairs)
    }
}
