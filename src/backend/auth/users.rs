/**
 * User Model and Credential Store
 *
 * The credential store owns user identity: id, unique email, password hash
 * and active flag. The auth core reaches it only through `CredentialStore`;
 * `PgCredentialStore` is the production implementation.
 *
 * `User` is deliberately not `Serialize`: the password hash must not leave
 * the store boundary except towards the password hasher. Handlers convert to
 * `UserResponse` for output.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

/// User row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Stable numeric user ID
    pub id: i64,
    /// User email address (unique, normalized)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Optional public display name
    pub display_name: Option<String>,
    /// Inactive users cannot log in or use tokens
    pub is_active: bool,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

/// Storage-layer failures shared by the credential and refresh token stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error("refresh token lifetime of {0} days is out of range")]
    LifetimeOutOfRange(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Interface the auth core consumes from the user store
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Insert a user; `StoreError::DuplicateEmail` if the email is taken
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<User, StoreError>;

    /// Replace a user's password hash; `StoreError::UserNotFound` if absent
    async fn update_password_hash(&self, user_id: i64, new_hash: &str) -> Result<(), StoreError>;
}

/// Postgres-backed credential store
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, display_name, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, display_name, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, display_name, is_active, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            other => StoreError::Database(other),
        })
    }

    async fn update_password_hash(&self, user_id: i64, new_hash: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1
            WHERE id = $2
            "#,
        )
        .bind(new_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }
}
