//! Shared Module
//!
//! Runtime-independent pieces used by the backend handlers: validation of
//! request fields and the error type those checks produce.
//!
//! - **`error`** - `SharedError` (validation failures)
//! - **`validation`** - email/password checks and email normalization

/// Shared error types
pub mod error;

/// Request field validation
pub mod validation;

pub use error::SharedError;
