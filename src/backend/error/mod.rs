//! Backend Error Module
//!
//! Error types the auth core surfaces to HTTP handlers.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - AuthError taxonomy and status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! Layer-specific errors (`StoreError`, `TokenError`, `PasswordError`,
//! `RotateError`, `MailError`) live next to the code that raises them and
//! convert into `AuthError` via `From`, collapsing internal distinctions so a
//! caller can never tell an expired token from a forged one.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::AuthError;
