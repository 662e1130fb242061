//! Outbound Mail Module
//!
//! Delivery collaborator for password-reset links. The session manager only
//! sees the `Mailer` trait and hands it a recipient, subject and body; it never
//! waits for the result on the request path.
//!
//! # Implementations
//!
//! - **`SmtpMailer`** - STARTTLS relay via lettre, used when `SMTP_HOST` is set
//! - **`LogMailer`** - writes deliveries to the log for local development
//! - **`MemoryMailer`** - keeps deliveries in a queue for tests to inspect

use async_trait::async_trait;
use thiserror::Error;

pub mod outbox;
pub mod smtp;

pub use outbox::{MemoryMailer, SentMail};
pub use smtp::SmtpMailer;

/// Delivery failures
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Outbound delivery collaborator
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Console fallback used when no SMTP relay is configured
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(recipient, subject, "SMTP not configured, mail not sent");
        // Development only: the body may carry a reset link
        tracing::debug!("Undelivered mail body:\n{}", body);
        Ok(())
    }
}
