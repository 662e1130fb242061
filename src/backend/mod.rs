//! Backend Module
//!
//! Server-side code for the reelbase authentication service: an Axum HTTP
//! server in front of the session-token lifecycle.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Route configuration and router assembly
//! - **`auth`** - Credential store, hashing, tokens, session manager, handlers
//! - **`middleware`** - Bearer-token guard
//! - **`mail`** - Outbound delivery of reset links
//! - **`error`** - `AuthError` and its HTTP rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports
//! ├── main.rs         - Binary entry point
//! ├── server/         - Configuration and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── mail/           - Mail delivery
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! Handlers deserialize JSON, call one `SessionManager` method and serialize
//! the result. Protected routes run `auth_middleware` first, which resolves
//! the bearer token to a live user. Every failure is an `AuthError`, rendered
//! as `{"error": ..., "status": ...}` with a generic message.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and session management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Outbound mail
pub mod mail;

pub use auth::SessionManager;
pub use error::AuthError;
pub use server::create_app;
