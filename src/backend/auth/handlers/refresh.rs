/**
 * Refresh and Logout Handlers
 *
 * - POST /api/refresh - trade a refresh token for a new access token and the
 *   refresh token that replaces it
 * - POST /api/logout - revoke a refresh token
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{MessageResponse, RefreshRequest, TokenResponse};
use crate::backend::auth::manager::SessionManager;
use crate::backend::error::AuthError;

/// Refresh handler
///
/// The presented token is spent by this call; clients must store the
/// `refresh_token` from the response.
///
/// # Errors
///
/// * `401 Unauthorized` - unknown, expired, revoked, or already used token
pub async fn refresh(
    State(sessions): State<SessionManager>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let pair = sessions.refresh(&request.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// Logout handler. Succeeds for unknown and already revoked tokens.
pub async fn logout(
    State(sessions): State<SessionManager>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    sessions.logout(&request.refresh_token).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}
