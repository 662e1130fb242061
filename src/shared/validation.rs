//! Request field validation shared by the auth handlers.

use crate::shared::error::SharedError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length, in bytes. bcrypt reads no further.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Upper bound for email addresses (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Normalize an email for storage and lookup.
///
/// Surrounding whitespace is dropped and the address is lowercased, so that
/// `Alice@Example.com ` and `alice@example.com` name the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Validate the shape of an email address.
///
/// This is a structural check only: exactly one `@`, a non-empty local part,
/// and a domain containing a dot that neither starts nor ends the domain.
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let invalid = || SharedError::validation("email", "Invalid email format");

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.find('.') {
        Some(_) if !domain.starts_with('.') && !domain.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validate password length.
///
/// The lower bound counts characters, the upper bound counts UTF-8 bytes.
pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
        ));
    }
    Ok(())
}
