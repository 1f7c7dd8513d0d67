//! Common test utilities for the member search API.
//!
//! - [`harness`] - Test servers over an in-memory roster
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod harness;
