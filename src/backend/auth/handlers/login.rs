/**
 * Login Handler
 *
 * POST /api/login. Verifies email and password and opens a session: a
 * short-lived access token plus an opaque refresh token.
 *
 * Unknown email, wrong password and inactive account all answer the same
 * 401 so the endpoint cannot be used to probe for accounts.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::manager::SessionManager;
use crate::backend::error::AuthError;

/// Login handler
///
/// # Example Response
///
/// ```json
/// {
///   "access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "refresh_token": "hX3r...",
///   "token_type": "bearer",
///   "user": { "id": 1, "email": "user@example.com", "display_name": null }
/// }
/// ```
pub async fn login(
    State(sessions): State<SessionManager>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let outcome = sessions
        .authenticate(&request.email, &request.password)
        .await?;
    Ok(Json(outcome.into()))
}
