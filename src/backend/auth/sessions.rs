/**
 * Access Token Codec
 *
 * Signed, self-contained JWTs (HS256) carrying the subject's user id, an
 * expiry, and a purpose claim. The same secret signs access tokens and
 * password-reset tokens, so every consuming path decodes with
 * `decode_for(token, purpose)` and a reset token can never pass as an access
 * token or the other way round.
 *
 * Access tokens are not persisted and there is no revocation list; their short
 * lifetime bounds the damage of a leaked token.
 */

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::server::config::AuthConfig;

/// What a signed token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// Bearer credential for protected endpoints
    Access,
    /// One-off credential for `reset-password`
    Reset,
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => f.write_str("access"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, as a decimal string
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Purpose discriminator
    #[serde(rename = "type")]
    pub purpose: TokenPurpose,
}

impl Claims {
    /// The numeric user id in `sub`
    pub fn subject_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

/// Why a token was rejected. Only for logs; callers collapse all variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("token purpose mismatch: expected {expected}, got {actual}")]
    WrongPurpose {
        expected: TokenPurpose,
        actual: TokenPurpose,
    },
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies signed tokens
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    reset_ttl: Duration,
}

impl fmt::Debug for AccessTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish_non_exhaustive()
    }
}

impl AccessTokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl: config.access_token_ttl,
            reset_ttl: config.reset_token_ttl,
        }
    }

    /// Sign a token for `subject_id` that expires `ttl` from now
    pub fn issue(
        &self,
        subject_id: i64,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing(format!("lifetime {} out of range", ttl)))?;
        let claims = Claims {
            sub: subject_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            purpose,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Sign an access token with the configured lifetime
    pub fn issue_access(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue(subject_id, TokenPurpose::Access, self.access_ttl)
    }

    /// Sign a password-reset token with the configured lifetime
    pub fn issue_reset(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue(subject_id, TokenPurpose::Reset, self.reset_ttl)
    }

    /// Verify signature and expiry
    ///
    /// A token is expired once the current time reaches its `exp` claim.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        let claims = data.claims;
        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        claims.subject_id()?;

        Ok(claims)
    }

    /// `decode` plus a purpose check
    pub fn decode_for(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.purpose != purpose {
            return Err(TokenError::WrongPurpose {
                expected: purpose,
                actual: claims.purpose,
            });
        }
        Ok(claims)
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }
}
