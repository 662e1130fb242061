/**
 * Auth Error Types
 *
 * This module defines the error taxonomy the auth core exposes across the trust
 * boundary. Every variant maps to a stable HTTP status and a short, generic
 * message.
 *
 * # Error Categories
 *
 * ## Credential Errors
 *
 * - `InvalidCredentials` - unknown email and wrong password are the same error
 * - `DuplicateEmail` - registration against a taken email
 *
 * ## Token Errors
 *
 * - `InvalidRefreshToken` - expired, revoked, reused, or unknown refresh token
 * - `InvalidOrExpiredToken` - password-reset token failed to decode or has the
 *   wrong purpose
 *
 * ## Guard Errors
 *
 * - `MissingCredential` - no bearer credential on a protected request
 * - `InvalidCredential` - the access token failed to decode
 * - `UnknownSubject` - the token's subject no longer resolves to a user
 *
 * ## Other
 *
 * - `UserNotFound` - a reset token names a user that was deleted
 * - `Validation` - request field failed validation
 * - `Internal` - storage, hashing or signing failure; the detail is logged only
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::passwords::PasswordError;
use crate::backend::auth::refresh_tokens::RotateError;
use crate::backend::auth::sessions::TokenError;
use crate::backend::auth::users::StoreError;
use crate::shared::SharedError;

/// Errors returned by the session manager and the inbound auth guard
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Missing authorization header")]
    MissingCredential,

    #[error("Invalid token")]
    InvalidCredential,

    #[error("Unknown token subject")]
    UnknownSubject,

    #[error("User not found")]
    UserNotFound,

    /// Request field failed validation
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Message safe to show to the caller
        message: String,
    },

    /// Internal failure; `message` is for logs only
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error detail
        message: String,
    },
}

impl AuthError {
    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `DuplicateEmail`, `InvalidOrExpiredToken`, `Validation` - 400 Bad Request
    /// - `InvalidCredentials`, `InvalidRefreshToken`, guard errors - 401 Unauthorized
    /// - `UserNotFound` - 404 Not Found
    /// - `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateEmail | Self::InvalidOrExpiredToken | Self::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials
            | Self::InvalidRefreshToken
            | Self::MissingCredential
            | Self::InvalidCredential
            | Self::UnknownSubject => StatusCode::UNAUTHORIZED,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message shown to the caller
    ///
    /// Internal details never leave the process; `Internal` renders a fixed
    /// string.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SharedError> for AuthError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::ValidationError { field, message } => Self::Validation { field, message },
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::UserNotFound(_) => Self::UserNotFound,
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<RotateError> for AuthError {
    fn from(err: RotateError) -> Self {
        match err {
            RotateError::InvalidOrReused => Self::InvalidRefreshToken,
            RotateError::Store(store) => store.into(),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        Self::internal(format!("password hashing failed: {}", err))
    }
}

impl From<TokenError> for AuthError {
    /// Only reached on the signing path; decode failures are mapped by the
    /// caller to the flow-specific variant.
    fn from(err: TokenError) -> Self {
        Self::internal(format!("token signing failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::InvalidRefreshToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidOrExpiredToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::MissingCredential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UnknownSubject.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::internal("db down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let error = AuthError::internal("connection refused at 10.0.0.3:5432");
        assert_eq!(error.message(), "Internal server error");
        assert!(error.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_from_shared_error() {
        let error: AuthError = SharedError::validation("password", "too short").into();
        match &error {
            AuthError::Validation { field, message } => {
                assert_eq!(field, "password");
                assert_eq!(message, "too short");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
        assert_eq!(error.message(), "too short");
    }

    #[test]
    fn test_from_rotate_error() {
        let error: AuthError = RotateError::InvalidOrReused.into();
        assert!(matches!(error, AuthError::InvalidRefreshToken));
    }

    #[test]
    fn test_from_store_failure_keeps_detail_for_the_log() {
        let error: AuthError = StoreError::LifetimeOutOfRange(1_000_000_000).into();
        match &error {
            AuthError::Internal { message } => assert!(message.contains("1000000000")),
            other => panic!("Expected Internal, got {:?}", other),
        }
        assert_eq!(error.message(), "Internal server error");
    }

    #[test]
    fn test_from_store_duplicate_email() {
        let error: AuthError = StoreError::DuplicateEmail.into();
        assert!(matches!(error, AuthError::DuplicateEmail));
    }
}
