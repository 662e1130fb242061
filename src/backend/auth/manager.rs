/**
 * Session Manager
 *
 * Orchestrates the account and session flows on top of the credential store,
 * the password hasher, the token codec, the refresh token store and the mailer.
 *
 * # Flows
 *
 * - **register**: validate, reject taken emails, hash, create. No tokens.
 * - **authenticate**: verify credentials, issue an access token and a fresh
 *   refresh token.
 * - **refresh**: rotate the presented refresh token and issue a new access
 *   token for the same subject.
 * - **logout**: revoke the presented refresh token.
 * - **request_password_reset**: mail a reset link to an existing account,
 *   answering the same way whether or not the account exists.
 * - **reset_password**: consume a reset token, replace the hash, and revoke
 *   every live refresh token of the user.
 *
 * Failures that would let a caller probe for accounts collapse into one
 * variant: unknown email, wrong password and inactive account are all
 * `InvalidCredentials`.
 */

use std::fmt;
use std::sync::Arc;

use crate::backend::auth::passwords::PasswordHasher;
use crate::backend::auth::refresh_tokens::{RefreshTokenStore, RotateError};
use crate::backend::auth::sessions::{AccessTokenCodec, TokenPurpose};
use crate::backend::auth::users::{CredentialStore, User};
use crate::backend::error::AuthError;
use crate::backend::mail::Mailer;
use crate::backend::middleware::auth::AuthGuard;
use crate::backend::server::config::AuthConfig;
use crate::shared::validation::{normalize_email, validate_email, validate_password};

pub const RESET_MAIL_SUBJECT: &str = "Password Reset";

/// Access token plus the refresh token that replaces the one presented
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn CredentialStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    mailer: Arc<dyn Mailer>,
    codec: AccessTokenCodec,
    hasher: PasswordHasher,
    frontend_url: String,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("codec", &self.codec)
            .field("hasher", &self.hasher)
            .field("frontend_url", &self.frontend_url)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn CredentialStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            mailer,
            codec: AccessTokenCodec::new(config),
            hasher: PasswordHasher::new(config.bcrypt_cost),
            frontend_url: config.frontend_url.clone(),
        }
    }

    pub fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }

    /// Guard sharing this manager's codec and credential store
    pub fn guard(&self) -> AuthGuard {
        AuthGuard::new(self.codec.clone(), Arc::clone(&self.users))
    }

    /// Create an account
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            tracing::warn!("Registration rejected: email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash_blocking(password).await?;
        let display_name = display_name.map(str::trim).filter(|name| !name.is_empty());

        // A concurrent registration can still win the race; the store's
        // unique constraint maps to DuplicateEmail.
        let user = self
            .users
            .create_user(&email, &password_hash, display_name)
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and open a session
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            self.hasher.verify_dummy(password).await;
            tracing::warn!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify_blocking(password, &user.password_hash).await {
            tracing::warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(user_id = user.id, "Login rejected: account inactive");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.codec.issue_access(user.id)?;
        let refresh = self.refresh_tokens.issue(user.id).await?;

        tracing::info!(user_id = user.id, jti = %refresh.jti, "User logged in");
        Ok(LoginOutcome {
            user,
            tokens: TokenPair {
                access_token,
                refresh_token: refresh.token,
            },
        })
    }

    /// Exchange a refresh token for a new pair; the presented token is spent
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair, AuthError> {
        let issued = match self.refresh_tokens.rotate(presented).await {
            Ok(issued) => issued,
            Err(RotateError::InvalidOrReused) => {
                self.report_reuse(presented).await;
                return Err(AuthError::InvalidRefreshToken);
            }
            Err(err) => return Err(err.into()),
        };

        let access_token = self.codec.issue_access(issued.user_id)?;
        Ok(TokenPair {
            access_token,
            refresh_token: issued.token,
        })
    }

    /// A spent token coming back is a theft signal; the caller still only
    /// sees `InvalidRefreshToken`.
    async fn report_reuse(&self, presented: &str) {
        match self.refresh_tokens.find_by_token(presented).await {
            Ok(Some(record)) if record.revoked => {
                tracing::warn!(
                    user_id = record.user_id,
                    jti = %record.jti,
                    "Revoked refresh token presented again"
                );
            }
            Ok(Some(record)) => {
                tracing::debug!(user_id = record.user_id, jti = %record.jti, "Expired refresh token presented");
            }
            Ok(None) => tracing::debug!("Unknown refresh token presented"),
            Err(e) => tracing::error!("Refresh token audit lookup failed: {}", e),
        }
    }

    /// Revoke a refresh token. Unknown or already revoked tokens are not an error.
    pub async fn logout(&self, presented: &str) -> Result<(), AuthError> {
        if self.refresh_tokens.revoke(presented).await? {
            tracing::info!("Refresh token revoked");
        }
        Ok(())
    }

    /// Mail a reset link if the account exists; the result never says which
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);

        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::debug!("Password reset requested for unknown or inactive account");
                return Ok(());
            }
        };

        let token = self.codec.issue_reset(user.id)?;
        let link = self.reset_link(&token);
        let body = format!("Click here to reset your password: {}", link);

        let mailer = Arc::clone(&self.mailer);
        let recipient = user.email.clone();
        let user_id = user.id;
        tokio::spawn(async move {
            if let Err(e) = mailer.deliver(&recipient, RESET_MAIL_SUBJECT, &body).await {
                tracing::error!(user_id, "Failed to send password reset mail: {}", e);
            }
        });

        tracing::info!(user_id, "Password reset requested");
        Ok(())
    }

    /// Replace a user's password using a reset token
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let claims = self
            .codec
            .decode_for(token, TokenPurpose::Reset)
            .map_err(|e| {
                tracing::warn!("Reset token rejected: {}", e);
                AuthError::InvalidOrExpiredToken
            })?;
        let user_id = claims
            .subject_id()
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        validate_password(new_password)?;

        match self.users.find_user_by_id(user_id).await? {
            Some(user) if user.is_active => {}
            _ => {
                tracing::warn!(user_id, "Reset token names a missing or inactive user");
                return Err(AuthError::UserNotFound);
            }
        }

        let password_hash = self.hasher.hash_blocking(new_password).await?;
        self.users.update_password_hash(user_id, &password_hash).await?;
        let revoked = self.refresh_tokens.revoke_all_for_user(user_id).await?;

        tracing::info!(user_id, revoked, "Password reset");
        Ok(())
    }

    fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.frontend_url, token)
    }
}
