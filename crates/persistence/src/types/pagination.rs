//! Page requests and page results.
//!
//! [`Pageable`] is the request side (0-based page index, page size, sort
//! orders); [`Page`] is the result side. A page serializes as
//! `{ content, number, size, totalElements, totalPages }`.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Sort direction for an ORDER BY term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Descending order.
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Parses `asc`/`desc`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Ascending)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Descending)
        } else {
            None
        }
    }

    /// SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A single sort term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    /// Projection field name (`age`, `teamName`, ...).
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parses a `sort` request parameter.
    ///
    /// The value is a comma separated list of fields optionally ending in a
    /// direction that applies to all of them: `age,desc`, `username`,
    /// `teamName,age,asc`. An empty value yields no orders. Field names are
    /// not checked here; that happens when the query is planned.
    pub fn parse_param(value: &str) -> Result<Vec<SortOrder>, QueryError> {
        let mut parts: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let explicit = parts.last().and_then(|last| SortDirection::parse(last));
        if explicit.is_some() {
            parts.pop();
            if parts.is_empty() {
                return Err(QueryError::InvalidSort {
                    field: value.to_string(),
                    message: "sort direction given without a field".to_string(),
                });
            }
        }
        let direction = explicit.unwrap_or_default();

        Ok(parts
            .into_iter()
            .map(|field| SortOrder {
                field: field.to_string(),
                direction,
            })
            .collect())
    }
}

/// A page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    /// 0-based page number.
    pub page_index: u32,
    /// Maximum number of rows per page. Must be greater than zero.
    pub page_size: u32,
    /// Sort terms, most significant first.
    #[serde(default)]
    pub sort: Vec<SortOrder>,
}

impl Pageable {
    /// Creates an unsorted page request.
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
            sort: Vec::new(),
        }
    }

    /// Appends a sort term.
    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Checks the page size and returns the row offset of this page.
    pub fn offset(&self) -> Result<i64, QueryError> {
        if self.page_size == 0 {
            return Err(self.invalid("page size must be greater than zero"));
        }
        let offset = u64::from(self.page_index) * u64::from(self.page_size);
        i64::try_from(offset).map_err(|_| self.invalid("offset exceeds the signed 64-bit range"))
    }

    /// Page size as a LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    fn invalid(&self, reason: &str) -> QueryError {
        QueryError::InvalidPage {
            page_index: self.page_index,
            page_size: self.page_size,
            reason: reason.to_string(),
        }
    }
}

/// A page of results with its position in the full result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items in this page.
    pub content: Vec<T>,
    /// 0-based page number.
    #[serde(rename = "number")]
    pub page_index: u32,
    /// Requested page size.
    #[serde(rename = "size")]
    pub page_size: u32,
    /// Total matching rows across all pages.
    pub total_elements: u64,
    /// `ceil(total_elements / page_size)`; zero when nothing matched.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Creates a page and derives `total_pages`.
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        Self {
            content,
            page_index: pageable.page_index,
            page_size: pageable.page_size,
            total_elements,
            total_pages: total_pages(total_elements, pageable.page_size),
        }
    }

    /// Returns true if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true when a later page holds more rows.
    pub fn has_next(&self) -> bool {
        u64::from(self.page_index) + 1 < u64::from(self.total_pages)
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(total / size)`, saturating at `u32::MAX`.
pub fn total_pages(total_elements: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_elements.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
