//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - bearer-token guard for protected routes

pub mod auth;

pub use auth::{auth_middleware, extract_bearer, AuthGuard, AuthUser, AuthenticatedUser};
