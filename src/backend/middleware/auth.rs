/**
 * Authentication Middleware
 *
 * This module protects routes that require an authenticated caller. It pulls
 * the bearer credential from the Authorization header, verifies it as an
 * access token, resolves the subject to a live user and hands that user to
 * handlers through request extensions.
 *
 * The guard is read-only: it never touches refresh token state.
 */

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::{AccessTokenCodec, TokenPurpose};
use crate::backend::auth::users::{CredentialStore, User};
use crate::backend::error::AuthError;

/// Authenticated user attached to request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// Pull the token out of an Authorization header value
///
/// Accepts `Bearer <token>` with a case-insensitive scheme and surrounding
/// whitespace. Anything else, including an empty token, yields `None`.
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let (scheme, token) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Resolves bearer credentials to users
#[derive(Clone)]
pub struct AuthGuard {
    codec: AccessTokenCodec,
    users: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AuthGuard {
    pub fn new(codec: AccessTokenCodec, users: Arc<dyn CredentialStore>) -> Self {
        Self { codec, users }
    }

    /// Turn an Authorization header value into the user it authenticates
    pub async fn resolve(&self, header: Option<&str>) -> Result<User, AuthError> {
        let token = extract_bearer(header).ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            AuthError::MissingCredential
        })?;

        let claims = self
            .codec
            .decode_for(token, TokenPurpose::Access)
            .map_err(|e| {
                tracing::warn!("Invalid access token: {}", e);
                AuthError::InvalidCredential
            })?;
        let user_id = claims.subject_id().map_err(|_| AuthError::InvalidCredential)?;

        match self.users.find_user_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => {
                tracing::warn!(user_id, "Access token subject no longer resolves");
                Err(AuthError::UnknownSubject)
            }
        }
    }
}

/// Authentication middleware
///
/// 1. Reads the Authorization header
/// 2. Resolves it through `AuthGuard`
/// 3. Attaches `AuthenticatedUser` to request extensions
///
/// Rejections render as 401 through `AuthError`.
pub async fn auth_middleware(
    State(guard): State<AuthGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user = guard.resolve(header).await?;
    request.extensions_mut().insert(AuthenticatedUser::from(user));

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                AuthError::MissingCredential
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::memory::MemoryCredentialStore;
    use crate::backend::server::config::AuthConfig;
    use assert_matches::assert_matches;

    #[test]
    fn test_extract_bearer_accepts_valid_forms() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer(Some("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer(Some("BEARER abc")), Some("abc"));
        assert_eq!(extract_bearer(Some("  Bearer   abc  ")), Some("abc"));
    }

    #[test]
    fn test_extract_bearer_rejects_malformed() {
        assert_eq!(extract_bearer(None), None);
        assert_eq!(extract_bearer(Some("")), None);
        assert_eq!(extract_bearer(Some("Bearer")), None);
        assert_eq!(extract_bearer(Some("Bearer ")), None);
        assert_eq!(extract_bearer(Some("abc.def.ghi")), None);
        assert_eq!(extract_bearer(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(Some("Bearerabc")), None);
        assert_eq!(extract_bearer(Some("Bearer a b")), None);
    }

    async fn guard_with_user() -> (AuthGuard, Arc<MemoryCredentialStore>, AccessTokenCodec, User) {
        let config = AuthConfig::builder().jwt_secret("guard-secret").build().unwrap();
        let codec = AccessTokenCodec::new(&config);
        let users = Arc::new(MemoryCredentialStore::new());
        let user = users
            .create_user("guarded@example.com", "hash", None)
            .await
            .unwrap();
        let guard = AuthGuard::new(codec.clone(), users.clone());
        (guard, users, codec, user)
    }

    #[tokio::test]
    async fn test_resolve_valid_token() {
        let (guard, _users, codec, user) = guard_with_user().await;
        let header = format!("Bearer {}", codec.issue_access(user.id).unwrap());
        let resolved = guard.resolve(Some(&header)).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_resolve_missing_credential() {
        let (guard, ..) = guard_with_user().await;
        assert_matches!(guard.resolve(None).await, Err(AuthError::MissingCredential));
        assert_matches!(guard.resolve(Some("Token x")).await, Err(AuthError::MissingCredential));
    }

    #[tokio::test]
    async fn test_resolve_rejects_reset_token() {
        let (guard, _users, codec, user) = guard_with_user().await;
        let header = format!("Bearer {}", codec.issue_reset(user.id).unwrap());
        assert_matches!(guard.resolve(Some(&header)).await, Err(AuthError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_resolve_rejects_garbage() {
        let (guard, ..) = guard_with_user().await;
        assert_matches!(
            guard.resolve(Some("Bearer not-a-jwt")).await,
            Err(AuthError::InvalidCredential)
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_and_inactive_subject() {
        let (guard, users, codec, user) = guard_with_user().await;
        let stranger = format!("Bearer {}", codec.issue_access(user.id + 100).unwrap());
        assert_matches!(guard.resolve(Some(&stranger)).await, Err(AuthError::UnknownSubject));

        let header = format!("Bearer {}", codec.issue_access(user.id).unwrap());
        users.set_active(user.id, false).await.unwrap();
        assert_matches!(guard.resolve(Some(&header)).await, Err(AuthError::UnknownSubject));
    }
}
