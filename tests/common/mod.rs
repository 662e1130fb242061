//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory application harness driven through `tower::ServiceExt`
//! - Database test fixtures for the Postgres store tests
//! - Authentication test helpers
//! - Custom assertion macros

// Each test crate uses a different subset
#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod database;
pub mod harness;

pub use auth_helpers::*;
pub use database::*;
pub use harness::*;
