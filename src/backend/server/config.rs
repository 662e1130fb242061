/**
 * Server Configuration
 *
 * This module loads the configuration value objects the server is built from:
 *
 * - `AuthConfig` - signing secret, token lifetimes, bcrypt cost, reset-link base URL
 * - `SmtpConfig` - outbound mail relay (optional)
 * - `ServerConfig` - port, database URL, CORS origins, plus the two above
 *
 * # Configuration Sources
 *
 * Values come from environment variables (after `.env` is loaded by the binary),
 * with defaults suitable for local development. Each object is built once at
 * startup and handed to the components that need it; nothing in the auth core
 * reads the environment on its own.
 *
 * # Error Handling
 *
 * Malformed values (a non-numeric port, a zero or oversized TTL) are reported
 * as `ConfigError` and abort startup. A missing database only disables
 * persistence: the server falls back to in-memory stores and says so in the log.
 */

use std::fmt;
use std::time::Duration as StdDuration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use rand::RngCore;
use sqlx::PgPool;
use thiserror::Error;

/// Default access token lifetime, in minutes.
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 30;
/// Default password-reset token lifetime, in minutes.
pub const DEFAULT_RESET_TOKEN_MINUTES: i64 = 15;
/// Default refresh token lifetime, in days.
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

/// Longest accepted access token lifetime (one week), in minutes.
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 7 * 24 * 60;
/// Longest accepted password-reset token lifetime (one day), in minutes.
pub const MAX_RESET_TOKEN_MINUTES: i64 = 24 * 60;
/// Longest accepted refresh token lifetime, in days.
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 365;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    BcryptCost(u32),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

/// Settings for token issuance and password hashing.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret shared by access and reset tokens
    pub jwt_secret: String,
    /// Lifetime of access tokens
    pub access_token_ttl: Duration,
    /// Lifetime of password-reset tokens
    pub reset_token_ttl: Duration,
    /// Lifetime of refresh tokens, in days
    pub refresh_token_ttl_days: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Base URL used to build password-reset links
    pub frontend_url: String,
}

// The secret stays out of logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("reset_token_ttl", &self.reset_token_ttl)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("frontend_url", &self.frontend_url)
            .finish()
    }
}

impl AuthConfig {
    /// Create a new AuthConfigBuilder
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Load from `JWT_SECRET`, `ACCESS_TOKEN_EXPIRE_MINUTES`,
    /// `RESET_TOKEN_EXPIRE_MINUTES`, `REFRESH_TOKEN_EXPIRE_DAYS`, `BCRYPT_COST`
    /// and `FRONTEND_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(secret) = env_string("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Some(minutes) = env_parse::<i64>("ACCESS_TOKEN_EXPIRE_MINUTES")? {
            builder = builder.access_token_minutes(minutes);
        }
        if let Some(minutes) = env_parse::<i64>("RESET_TOKEN_EXPIRE_MINUTES")? {
            builder = builder.reset_token_minutes(minutes);
        }
        if let Some(days) = env_parse::<i64>("REFRESH_TOKEN_EXPIRE_DAYS")? {
            builder = builder.refresh_token_days(days);
        }
        if let Some(cost) = env_parse::<u32>("BCRYPT_COST")? {
            builder = builder.bcrypt_cost(cost);
        }
        if let Some(url) = env_string("FRONTEND_URL") {
            builder = builder.frontend_url(url);
        }

        builder.build()
    }
}

/// Builder for AuthConfig
#[derive(Debug, Default)]
pub struct AuthConfigBuilder {
    jwt_secret: Option<String>,
    access_token_minutes: Option<i64>,
    reset_token_minutes: Option<i64>,
    refresh_token_days: Option<i64>,
    bcrypt_cost: Option<u32>,
    frontend_url: Option<String>,
}

impl AuthConfigBuilder {
    /// Set the signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    /// Set the access token lifetime in minutes
    pub fn access_token_minutes(mut self, minutes: i64) -> Self {
        self.access_token_minutes = Some(minutes);
        self
    }

    /// Set the reset token lifetime in minutes
    pub fn reset_token_minutes(mut self, minutes: i64) -> Self {
        self.reset_token_minutes = Some(minutes);
        self
    }

    /// Set the refresh token lifetime in days
    pub fn refresh_token_days(mut self, days: i64) -> Self {
        self.refresh_token_days = Some(days);
        self
    }

    /// Set the bcrypt cost
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Set the base URL for reset links
    pub fn frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = Some(url.into());
        self
    }

    /// Build the configuration
    ///
    /// Without a secret a random one is generated; tokens signed with it do not
    /// survive a restart.
    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        let access_minutes = bounded(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            self.access_token_minutes.unwrap_or(DEFAULT_ACCESS_TOKEN_MINUTES),
            MAX_ACCESS_TOKEN_MINUTES,
        )?;
        let reset_minutes = bounded(
            "RESET_TOKEN_EXPIRE_MINUTES",
            self.reset_token_minutes.unwrap_or(DEFAULT_RESET_TOKEN_MINUTES),
            MAX_RESET_TOKEN_MINUTES,
        )?;
        let refresh_days = bounded(
            "REFRESH_TOKEN_EXPIRE_DAYS",
            self.refresh_token_days.unwrap_or(DEFAULT_REFRESH_TOKEN_DAYS),
            MAX_REFRESH_TOKEN_DAYS,
        )?;

        let bcrypt_cost = self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::BcryptCost(bcrypt_cost));
        }

        let jwt_secret = match self.jwt_secret {
            Some(secret) if !secret.is_empty() => secret,
            Some(_) => return Err(ConfigError::MissingValue("JWT_SECRET")),
            None => {
                tracing::warn!("JWT_SECRET not set; using a random per-process secret");
                random_secret()
            }
        };

        let frontend_url = self
            .frontend_url
            .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(AuthConfig {
            jwt_secret,
            access_token_ttl: Duration::minutes(access_minutes),
            reset_token_ttl: Duration::minutes(reset_minutes),
            refresh_token_ttl_days: refresh_days,
            bcrypt_cost,
            frontend_url,
        })
    }
}

/// Outbound SMTP relay settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address, e.g. `Reelbase <no-reply@example.com>`
    pub from: String,
    /// Upper bound for a single delivery attempt
    pub timeout: StdDuration,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SmtpConfig {
    /// Load from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASSWORD`,
    /// `EMAIL_FROM` and `SMTP_TIMEOUT_SECS`.
    ///
    /// Returns `Ok(None)` when `SMTP_HOST` is unset.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(host) = env_string("SMTP_HOST") else {
            return Ok(None);
        };
        let from = env_string("EMAIL_FROM").ok_or(ConfigError::MissingValue("EMAIL_FROM"))?;
        let port = env_parse::<u16>("SMTP_PORT")?.unwrap_or(DEFAULT_SMTP_PORT);
        let timeout_secs = env_parse::<u64>("SMTP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS);

        Ok(Some(Self {
            host,
            port,
            username: env_string("SMTP_USER"),
            password: env_string("SMTP_PASSWORD"),
            from,
            timeout: StdDuration::from_secs(timeout_secs),
        }))
    }
}

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub smtp: Option<SmtpConfig>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load the full server configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse::<u16>("SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT);
        let cors_origins = match env_string("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            port,
            database_url: env_string("DATABASE_URL"),
            cors_origins,
            smtp: SmtpConfig::from_env()?,
            auth: AuthConfig::from_env()?,
        })
    }
}

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<PgPool>;

/// Connect to Postgres and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if no URL is configured or the connection fails
///
/// Migration failures are logged; the pool is still returned because the
/// schema may already be current.
pub async fn load_database(database_url: Option<&str>) -> DatabaseConfig {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Sessions will be kept in memory only.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Sessions will be kept in memory only.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

fn env_string(name: &'static str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env_string(name) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

fn bounded(name: &'static str, value: i64, max: i64) -> Result<i64, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositive(name));
    }
    if value > max {
        return Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn random_secret() -> String {
    let mut bytes = [0u8; 64];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
