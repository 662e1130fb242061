/**
 * Refresh Token Store
 *
 * Durable table of opaque refresh tokens with single-use rotation.
 *
 * # Record Lifecycle
 *
 * 1. **Issue**: a record is created on login (and on every rotation) with
 *    `expires_at = created_at + ttl_days`.
 * 2. **Rotate**: presenting a live token flips it to `revoked` and inserts the
 *    successor for the same user in one transaction. A second presentation of
 *    the same token finds no live record and fails.
 * 3. **Revoke**: logout and password reset flip `revoked`; nothing else about a
 *    record ever changes.
 *
 * A record is live while `revoked = FALSE AND expires_at > now`. Expiry is a
 * read-time filter; rows are only deleted by cascade when their user goes, so
 * the history stays auditable.
 *
 * # Token Format
 *
 * The token value is 64 bytes from the OS RNG, URL-safe base64 without
 * padding. The `jti` is an independent random UUID used for bookkeeping and
 * logs; it cannot be turned back into the value or vice versa.
 */

use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sqlx::{PgExecutor, PgPool};
use thiserror::Error;

use crate::backend::auth::users::StoreError;
use crate::backend::server::config::AuthConfig;

/// Random bytes per refresh token value (512 bits)
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Refresh token row
#[derive(Clone, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub user_id: i64,
    /// Opaque token value as handed to the client
    pub token: String,
    /// Bookkeeping identifier, safe to log
    pub jti: String,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for RefreshTokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenRecord")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("jti", &self.jti)
            .field("revoked", &self.revoked)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl RefreshTokenRecord {
    /// Not revoked and not yet expired at `now`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// A freshly issued refresh token. `token` is shown to the client once.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    pub user_id: i64,
    pub token: String,
    pub jti: String,
}

impl fmt::Debug for IssuedRefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedRefreshToken")
            .field("user_id", &self.user_id)
            .field("jti", &self.jti)
            .finish_non_exhaustive()
    }
}

/// Rotation failures
#[derive(Debug, Error)]
pub enum RotateError {
    /// Unknown, expired, revoked, or already rotated. Deliberately one case.
    #[error("refresh token is invalid or already used")]
    InvalidOrReused,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for RotateError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(StoreError::Database(err))
    }
}

/// Generate an opaque refresh token value
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a record identifier independent of the token value
pub fn generate_jti() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Expiry instant for a record created at `now`
pub fn expiry_after(now: DateTime<Utc>, ttl_days: i64) -> Result<DateTime<Utc>, StoreError> {
    Duration::try_days(ttl_days)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(StoreError::LifetimeOutOfRange(ttl_days))
}

/// Interface to the refresh token table
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Create a live record for `user_id`
    async fn issue(&self, user_id: i64) -> Result<IssuedRefreshToken, StoreError>;

    /// Consume a live token and issue its successor atomically
    async fn rotate(&self, presented: &str) -> Result<IssuedRefreshToken, RotateError>;

    /// Revoke a token; `Ok(false)` when it was unknown or already revoked
    async fn revoke(&self, presented: &str) -> Result<bool, StoreError>;

    /// Revoke every live token of a user, returning how many were revoked
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, StoreError>;

    /// Look a record up regardless of state (audit only, never for validity)
    async fn find_by_token(&self, presented: &str) -> Result<Option<RefreshTokenRecord>, StoreError>;
}

/// Postgres-backed refresh token store
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
    ttl_days: i64,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool, config: &AuthConfig) -> Self {
        Self::with_ttl_days(pool, config.refresh_token_ttl_days)
    }

    pub fn with_ttl_days(pool: PgPool, ttl_days: i64) -> Self {
        Self { pool, ttl_days }
    }
}

async fn insert_record<'e, E>(
    executor: E,
    user_id: i64,
    now: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<IssuedRefreshToken, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let issued = IssuedRefreshToken {
        user_id,
        token: generate_token_value(),
        jti: generate_jti(),
    };

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, token, jti, revoked, created_at, expires_at)
        VALUES ($1, $2, $3, FALSE, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(&issued.token)
    .bind(&issued.jti)
    .bind(now)
    .bind(expires_at)
    .execute(executor)
    .await?;

    Ok(issued)
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn issue(&self, user_id: i64) -> Result<IssuedRefreshToken, StoreError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, self.ttl_days)?;
        let issued = insert_record(&self.pool, user_id, now, expires_at).await?;
        tracing::debug!(user_id, jti = %issued.jti, "Issued refresh token");
        Ok(issued)
    }

    async fn rotate(&self, presented: &str) -> Result<IssuedRefreshToken, RotateError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, self.ttl_days)?;
        let mut tx = self.pool.begin().await?;

        // The row lock taken by UPDATE serializes concurrent rotations of the
        // same token; the loser re-reads `revoked = TRUE` and matches nothing.
        let consumed: Option<(i64, String)> = sqlx::query_as(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token = $1 AND revoked = FALSE AND expires_at > $2
            RETURNING user_id, jti
            "#,
        )
        .bind(presented)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id, old_jti)) = consumed else {
            tx.rollback().await?;
            return Err(RotateError::InvalidOrReused);
        };

        let issued = insert_record(&mut *tx, user_id, now, expires_at).await?;
        tx.commit().await?;

        tracing::debug!(user_id, old_jti = %old_jti, new_jti = %issued.jti, "Rotated refresh token");
        Ok(issued)
    }

    async fn revoke(&self, presented: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token = $1 AND revoked = FALSE
            "#,
        )
        .bind(presented)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE user_id = $1 AND revoked = FALSE AND expires_at > $2
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_by_token(&self, presented: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            SELECT id, user_id, token, jti, revoked, created_at, expires_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(presented)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
