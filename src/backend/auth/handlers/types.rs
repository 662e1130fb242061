/**
 * Authentication Handler Types
 *
 * Request and response bodies for the authentication endpoints.
 *
 * Request types carrying passwords or tokens do not derive `Debug` so they
 * cannot end up in a log line by accident.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::manager::{LoginOutcome, TokenPair};
use crate::backend::auth::users::User;

/// Token type reported alongside every access token
pub const TOKEN_TYPE: &str = "bearer";

/// Registration request
#[derive(Deserialize, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    /// At least 8 characters; hashed before storage
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of refresh and logout
#[derive(Deserialize, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize, Serialize)]
pub struct ResetPasswordRequest {
    /// Reset token from the mailed link
    pub token: String,
    pub new_password: String,
}

/// Public projection of a user (no password hash)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// Login response
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            access_token: outcome.tokens.access_token,
            refresh_token: outcome.tokens.refresh_token,
            token_type: TOKEN_TYPE.to_string(),
            user: outcome.user.into(),
        }
    }
}

/// Refresh response; `refresh_token` is always the rotated value
#[derive(Serialize, Deserialize, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: TOKEN_TYPE.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
