//! Shared Error Types
//!
//! Errors produced by input checks that are independent of the server runtime.
//! The backend wraps them into its own error taxonomy before they reach a client.
//!
//! # Usage
//!
//! ```rust
//! use reelbase::shared::error::SharedError;
//!
//! let error = SharedError::validation("password", "Password must be at least 8 characters");
//! assert_eq!(error.field(), "password");
//! ```
use thiserror::Error;

/// Errors raised by shared validation helpers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A request field failed validation
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::ValidationError { field, .. } => field,
        }
    }

    /// Message safe to show to the caller
    pub fn user_message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Invalid email format");
        match &error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Invalid email format");
            }
        }
        assert_eq!(error.field(), "email");
        assert_eq!(error.user_message(), "Invalid email format");
    }

    #[test]
    fn test_validation_error_display() {
        let error = SharedError::validation("password", "too short");
        assert_eq!(
            error.to_string(),
            "Validation error in field 'password': too short"
        );
    }
}
