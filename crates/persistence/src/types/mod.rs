//! Core types for the persistence layer.
//!
//! - [`Member`], [`Team`] - stored entities
//! - [`SearchCondition`] - optional search filters
//! - [`MemberTeamDto`], [`MemberStats`], [`TeamAgeAverage`] - read models
//! - [`Pageable`], [`Page`], [`SortOrder`] - pagination
//!
//! # Example
//!
//! ```
//! use roster_persistence::types::{Pageable, SearchCondition, SortOrder};
//!
//! let cond = SearchCondition::new().with_team_name("teamA").with_age_goe(15);
//! let pageable = Pageable::new(0, 20).with_sort(SortOrder::desc("age"));
//!
//! assert!(!cond.is_empty());
//! assert_eq!(pageable.offset().unwrap(), 0);
//! ```

mod member;
mod pagination;

pub use member::{Member, MemberStats, MemberTeamDto, SearchCondition, Team, TeamAgeAverage};
pub use pagination::{Page, Pageable, SortDirection, SortOrder, total_pages};
