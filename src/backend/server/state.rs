/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds the session manager and the guard built from it. Both are
 * cheap to clone: the stores and the mailer sit behind `Arc`s, so every clone
 * shares the same authoritative refresh token store.
 *
 * # State Extraction
 *
 * Handlers take `State<SessionManager>` and the auth middleware takes
 * `State<AuthGuard>` without needing the whole `AppState`.
 */

use axum::extract::FromRef;

use crate::backend::auth::manager::SessionManager;
use crate::backend::middleware::auth::AuthGuard;

/// Shared state for the Axum application
#[derive(Clone, Debug)]
pub struct AppState {
    /// Account and session flows
    pub sessions: SessionManager,

    /// Bearer-token guard for protected routes
    pub guard: AuthGuard,

    /// Whether sessions are persisted to Postgres or kept in memory
    pub persistent: bool,
}

impl AppState {
    pub fn new(sessions: SessionManager, persistent: bool) -> Self {
        let guard = sessions.guard();
        Self {
            sessions,
            guard,
            persistent,
        }
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AuthGuard {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.guard.clone()
    }
}
