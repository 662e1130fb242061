//! Authentication Handlers Module
//!
//! HTTP handlers for the authentication endpoints. Each handler is a thin
//! adapter from JSON bodies to a `SessionManager` call; errors render through
//! `AuthError`.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs             - Module exports
//! ├── types.rs           - Request and response types
//! ├── register.rs        - POST /api/register
//! ├── login.rs           - POST /api/login
//! ├── refresh.rs         - POST /api/refresh, POST /api/logout
//! ├── password_reset.rs  - POST /api/forgot-password, POST /api/reset-password
//! └── me.rs              - GET /api/me
//! ```

/// Request and response types
pub mod types;

pub mod register;
pub mod login;
pub mod refresh;
pub mod password_reset;
pub mod me;

pub use types::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RefreshRequest,
    RegisterRequest, ResetPasswordRequest, TokenResponse, UserResponse,
};

pub use login::login;
pub use me::get_me;
pub use password_reset::{forgot_password, reset_password};
pub use refresh::{logout, refresh};
pub use register::register;
