/**
 * SMTP Delivery
 *
 * Sends plain-text mail through a STARTTLS relay. The transport is built once
 * at startup and shared; lettre pools the connections.
 */

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{MailError, Mailer};
use crate::backend::server::config::SmtpConfig;

/// `Mailer` backed by an SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .timeout(Some(config.timeout));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!("SMTP mailer configured for {}:{}", config.host, config.port);

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&config.from)?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(recipient)?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.transport.send(message).await?;
        tracing::debug!(recipient, "Mail delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(from: &str) -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
            from: from.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test]
    async fn test_build_mailer() {
        let mailer = SmtpMailer::new(&config("Reelbase <no-reply@example.com>")).unwrap();
        assert!(format!("{:?}", mailer).contains("no-reply@example.com"));
    }

    #[tokio::test]
    async fn test_invalid_sender_rejected() {
        let result = SmtpMailer::new(&config("not an address"));
        assert!(matches!(result, Err(MailError::Address { .. })));
    }

    #[tokio::test]
    async fn test_invalid_recipient_rejected_before_sending() {
        let mailer = SmtpMailer::new(&config("no-reply@example.com")).unwrap();
        let result = mailer.deliver("nobody", "subject", "body").await;
        assert!(matches!(result, Err(MailError::Address { .. })));
    }
}
