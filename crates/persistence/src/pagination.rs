//! Page execution with count elision.
//!
//! A page is fetched in two steps. The content query always runs first. The
//! count query runs only when the content does not already pin down the
//! total:
//!
//! | page index | rows returned        | total                         |
//! |------------|----------------------|-------------------------------|
//! | 0          | fewer than page size | rows returned                 |
//! | > 0        | 1 ..< page size      | index * size + rows returned  |
//! | any        | otherwise            | result of the count query     |
//!
//! An empty page past the first runs the count, because an empty page says
//! nothing about how many rows precede it.

use tracing::debug;

use crate::core::{FromSqlRow, FromSqlValue, SqlSession, map_rows};
use crate::error::StorageResult;
use crate::query::PagePlan;
use crate::types::{Page, Pageable};

/// The total implied by the content alone, if any.
pub fn derived_total(pageable: &Pageable, content_len: usize) -> Option<u64> {
    let len = content_len as u64;
    let size = u64::from(pageable.page_size);
    if len >= size {
        return None;
    }
    if pageable.page_index == 0 {
        Some(len)
    } else if len > 0 {
        Some(u64::from(pageable.page_index) * size + len)
    } else {
        None
    }
}

/// Runs `plan` against `session` and assembles the page.
///
/// The count statement is never issued when the content statement fails.
/// Any failure fails the whole page.
pub async fn execute_page<S, T>(
    session: &S,
    plan: &PagePlan,
    pageable: &Pageable,
) -> StorageResult<Page<T>>
where
    S: SqlSession + ?Sized,
    T: FromSqlRow,
{
    let rows = session.query(&plan.content.to_sql()).await?;
    let mut content: Vec<T> = map_rows(&rows)?;
    content.truncate(pageable.page_size as usize);

    let total = match derived_total(pageable, content.len()) {
        Some(total) => {
            debug!(total, "Count query elided");
            total
        }
        None => {
            let value = session.query_scalar(&plan.count.to_sql()).await?;
            u64::from_sql_value(&value, "total")?
        }
    };

    Ok(Page::new(content, pageable, total))
}
