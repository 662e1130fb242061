/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/register` - Create an account
 * - `POST /api/login` - Open a session
 * - `POST /api/refresh` - Rotate a refresh token
 * - `POST /api/logout` - Revoke a refresh token
 * - `POST /api/forgot-password` - Mail a reset link
 * - `POST /api/reset-password` - Set a new password
 *
 * ## Protected
 * - `GET /api/me` - Current user (requires a bearer access token)
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{
    forgot_password, get_me, login, logout, refresh, register, reset_password,
};
use crate::backend::middleware::auth::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Protected routes get `auth_middleware` through `route_layer`, so unknown
/// paths still fall through to 404 instead of 401.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/logout", post(logout))
        .route("/api/forgot-password", post(forgot_password))
        .route("/api/reset-password", post(reset_password))
        .merge(protected)
}
