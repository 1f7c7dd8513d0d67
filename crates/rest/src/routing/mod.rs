//! Route configuration for the member search API.

pub mod member_routes;

pub use member_routes::create_routes;
