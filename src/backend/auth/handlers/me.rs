/**
 * Get Current User Handler
 *
 * GET /api/me. Mounted behind `auth_middleware`, which has already resolved
 * the bearer token to a live user.
 */

use axum::response::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::auth::AuthUser;

pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        id: user.user_id,
        email: user.email,
        display_name: user.display_name,
    })
}
