//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server over an in-memory backend
//! - [`fixtures`] - Request bodies

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
