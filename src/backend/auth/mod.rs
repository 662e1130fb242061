//! Authentication Module
//!
//! Account registration, credential verification, and the session-token
//! lifecycle.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs             - Module exports
//! ├── users.rs           - User model, CredentialStore, Postgres store
//! ├── passwords.rs       - bcrypt hashing
//! ├── sessions.rs        - Signed access and reset tokens
//! ├── refresh_tokens.rs  - Opaque refresh tokens and rotation
//! ├── memory.rs          - In-memory stores
//! ├── manager.rs         - SessionManager flows
//! └── handlers/          - HTTP handlers
//! ```
//!
//! # Token Model
//!
//! - **Access token**: HS256 JWT, 30 minutes by default, never stored
//! - **Refresh token**: 512-bit random value, 7 days by default, single use
//! - **Reset token**: HS256 JWT with `type = "reset"`, 15 minutes by default

/// User data model and credential store
pub mod users;

/// Password hashing
pub mod passwords;

/// Access and reset token codec
pub mod sessions;

/// Refresh token store
pub mod refresh_tokens;

/// In-memory store implementations
pub mod memory;

/// Session manager
pub mod manager;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use manager::{LoginOutcome, SessionManager, TokenPair};
pub use users::{CredentialStore, StoreError, User};
