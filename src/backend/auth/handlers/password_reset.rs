/**
 * Password Reset Handlers
 *
 * - POST /api/forgot-password - mail a reset link. The response is the same
 *   whether or not the account exists.
 * - POST /api/reset-password - set a new password with the token from the link
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{
    ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::backend::auth::manager::SessionManager;
use crate::backend::error::AuthError;

pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If the account exists, a reset link has been sent to the email.";

pub async fn forgot_password(
    State(sessions): State<SessionManager>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    sessions.request_password_reset(&request.email).await?;
    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

/// Reset password handler
///
/// # Errors
///
/// * `400 Bad Request` - bad or expired token, or the new password is too short
/// * `404 Not Found` - the token's user no longer exists
pub async fn reset_password(
    State(sessions): State<SessionManager>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    sessions
        .reset_password(&request.token, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successful")))
}
