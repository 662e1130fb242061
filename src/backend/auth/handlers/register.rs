/**
 * Register Handler
 *
 * POST /api/register. Creates an account and returns its public projection.
 * No tokens are issued; the client logs in afterwards.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{RegisterRequest, UserResponse};
use crate::backend::auth::manager::SessionManager;
use crate::backend::error::AuthError;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid email, short password, or email already registered
/// * `500 Internal Server Error` - hashing or storage failure
pub async fn register(
    State(sessions): State<SessionManager>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    let user = sessions
        .register(
            &request.email,
            &request.password,
            request.display_name.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}
