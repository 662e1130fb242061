//! Reelbase - Authentication Service
//!
//! The authentication and session-token subsystem of the reelbase catalog
//! backend: registration, login, short-lived signed access tokens, opaque
//! single-use refresh tokens, logout and password reset.
//!
//! # Module Structure
//!
//! - **`shared`** - Validation rules and errors usable without the server stack
//! - **`backend`** - Axum server, stores, session manager and handlers
//!
//! # Usage
//!
//! ```rust,no_run
//! use reelbase::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and validation
pub mod shared;

/// Backend server-side code
pub mod backend;
