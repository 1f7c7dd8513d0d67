//! Shared helpers for the persistence integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod recording;

pub use fixtures::*;
pub use recording::*;
