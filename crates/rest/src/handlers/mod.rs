//! HTTP request handlers.
//!
//! - [`members`] - Member search, listing, statistics and age/team reports
//! - [`teams`] - Team reports
//! - [`admin`] - Bulk member updates
//! - [`health`] - Health check endpoint

pub mod admin;
pub mod health;
pub mod members;
pub mod teams;

pub use admin::relabel_members_handler;
pub use health::health_handler;
pub use members::{
    list_members_handler, member_stats_handler, members_at_least_average_age_handler,
    members_with_joined_team_handler, oldest_members_handler, search_members_handler,
    search_members_page_handler,
};
pub use teams::team_age_averages_handler;
