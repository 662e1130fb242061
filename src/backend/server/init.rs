/**
 * Server Initialization
 *
 * This module wires the configuration into stores, the mailer, the session
 * manager and finally the router.
 *
 * # Initialization Process
 *
 * 1. Connect to Postgres and run migrations (optional)
 * 2. Pick the stores: Postgres when connected, in-memory otherwise
 * 3. Pick the mailer: SMTP when configured, log output otherwise
 * 4. Build `AppState` and the router
 *
 * Missing optional services never abort startup; each fallback is logged.
 */

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::backend::auth::manager::SessionManager;
use crate::backend::auth::memory::{MemoryCredentialStore, MemoryRefreshTokenStore};
use crate::backend::auth::refresh_tokens::{PgRefreshTokenStore, RefreshTokenStore};
use crate::backend::auth::users::{CredentialStore, PgCredentialStore};
use crate::backend::mail::{LogMailer, Mailer, SmtpMailer};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, AuthConfig, ServerConfig, SmtpConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing reelbase auth server");

    let db_pool = load_database(config.database_url.as_deref()).await;
    let mailer = build_mailer(config.smtp.as_ref());
    let app_state = build_app_state(&config.auth, db_pool, mailer);

    let app = create_router(app_state, &config.cors_origins);
    tracing::info!("Router configured");
    app
}

/// Assemble the state from an optional pool and a mailer
pub fn build_app_state(
    auth: &AuthConfig,
    db_pool: Option<PgPool>,
    mailer: Arc<dyn Mailer>,
) -> AppState {
    let persistent = db_pool.is_some();

    let (users, refresh_tokens): (Arc<dyn CredentialStore>, Arc<dyn RefreshTokenStore>) =
        match db_pool {
            Some(pool) => (
                Arc::new(PgCredentialStore::new(pool.clone())),
                Arc::new(PgRefreshTokenStore::new(pool, auth)),
            ),
            None => {
                tracing::warn!("Using in-memory stores; accounts and sessions end with the process");
                (
                    Arc::new(MemoryCredentialStore::new()),
                    Arc::new(MemoryRefreshTokenStore::new(auth)),
                )
            }
        };

    let sessions = SessionManager::new(auth, users, refresh_tokens, mailer);
    AppState::new(sessions, persistent)
}

fn build_mailer(smtp: Option<&SmtpConfig>) -> Arc<dyn Mailer> {
    let Some(smtp) = smtp else {
        tracing::warn!("SMTP_HOST not set. Reset mails will only be logged.");
        return Arc::new(LogMailer);
    };

    match SmtpMailer::new(smtp) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::error!("Failed to configure SMTP mailer: {}", e);
            tracing::warn!("Reset mails will only be logged.");
            Arc::new(LogMailer)
        }
    }
}
