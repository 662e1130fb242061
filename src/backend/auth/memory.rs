/**
 * In-Memory Stores
 *
 * Process-local implementations of `CredentialStore` and `RefreshTokenStore`.
 * The server falls back to them when no database is configured, and the test
 * suites run the whole auth core against them.
 *
 * When in use, `MemoryRefreshTokenStore` is the authoritative refresh token
 * store for the process, not a cache in front of one. Each operation runs
 * under a single lock acquisition, which gives rotation the same
 * exactly-one-winner behavior as the Postgres transaction.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::backend::auth::refresh_tokens::{
    expiry_after, generate_jti, generate_token_value, IssuedRefreshToken, RefreshTokenRecord,
    RefreshTokenStore, RotateError,
};
use crate::backend::auth::users::{CredentialStore, StoreError, User};
use crate::backend::server::config::AuthConfig;

#[derive(Debug, Default)]
struct UserTable {
    rows: Vec<User>,
    next_id: i64,
}

/// `CredentialStore` backed by a vector
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: Mutex<UserTable>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a user's active flag
    pub async fn set_active(&self, user_id: i64, active: bool) -> Result<(), StoreError> {
        let mut table = self.users.lock().await;
        let user = table
            .rows
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;
        user.is_active = active;
        Ok(())
    }

    /// Remove a user outright
    pub async fn delete_user(&self, user_id: i64) -> Result<(), StoreError> {
        let mut table = self.users.lock().await;
        let before = table.rows.len();
        table.rows.retain(|u| u.id != user_id);
        if table.rows.len() == before {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.users.lock().await;
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let table = self.users.lock().await;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<User, StoreError> {
        let mut table = self.users.lock().await;
        if table.rows.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            display_name: display_name.map(str::to_string),
            is_active: true,
            created_at: Utc::now(),
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, user_id: i64, new_hash: &str) -> Result<(), StoreError> {
        let mut table = self.users.lock().await;
        let user = table
            .rows
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;
        user.password_hash = new_hash.to_string();
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TokenTable {
    rows: Vec<RefreshTokenRecord>,
    next_id: i64,
}

impl TokenTable {
    fn insert(
        &mut self,
        user_id: i64,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> IssuedRefreshToken {
        self.next_id += 1;
        let record = RefreshTokenRecord {
            id: self.next_id,
            user_id,
            token: generate_token_value(),
            jti: generate_jti(),
            revoked: false,
            created_at: now,
            expires_at,
        };
        let issued = IssuedRefreshToken {
            user_id,
            token: record.token.clone(),
            jti: record.jti.clone(),
        };
        self.rows.push(record);
        issued
    }
}

/// `RefreshTokenStore` backed by a vector
#[derive(Debug)]
pub struct MemoryRefreshTokenStore {
    tokens: Mutex<TokenTable>,
    ttl_days: i64,
}

impl MemoryRefreshTokenStore {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_ttl_days(config.refresh_token_ttl_days)
    }

    /// A zero or negative lifetime issues records that are already expired.
    pub fn with_ttl_days(ttl_days: i64) -> Self {
        Self {
            tokens: Mutex::new(TokenTable::default()),
            ttl_days,
        }
    }

    /// Number of live records for a user
    pub async fn live_count(&self, user_id: i64) -> usize {
        let now = Utc::now();
        let table = self.tokens.lock().await;
        table
            .rows
            .iter()
            .filter(|r| r.user_id == user_id && r.is_live_at(now))
            .count()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn issue(&self, user_id: i64) -> Result<IssuedRefreshToken, StoreError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, self.ttl_days)?;
        let mut table = self.tokens.lock().await;
        Ok(table.insert(user_id, now, expires_at))
    }

    async fn rotate(&self, presented: &str) -> Result<IssuedRefreshToken, RotateError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, self.ttl_days)?;
        let mut table = self.tokens.lock().await;

        let record = table
            .rows
            .iter_mut()
            .find(|r| r.token == presented && r.is_live_at(now))
            .ok_or(RotateError::InvalidOrReused)?;
        record.revoked = true;
        let user_id = record.user_id;

        Ok(table.insert(user_id, now, expires_at))
    }

    async fn revoke(&self, presented: &str) -> Result<bool, StoreError> {
        let mut table = self.tokens.lock().await;
        match table.rows.iter_mut().find(|r| r.token == presented && !r.revoked) {
            Some(record) => {
                record.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut table = self.tokens.lock().await;
        let mut revoked = 0;
        for record in table
            .rows
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.is_live_at(now))
        {
            record.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn find_by_token(&self, presented: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let table = self.tokens.lock().await;
        Ok(table.rows.iter().find(|r| r.token == presented).cloned())
    }
}
