/**
 * In-Memory Outbox
 *
 * `Mailer` that queues every delivery instead of sending it. Deliveries are
 * made from detached tasks, so readers await `next_message` rather than
 * polling a list.
 */

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use super::{MailError, Mailer};

/// A captured delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug)]
pub struct MemoryMailer {
    sender: mpsc::UnboundedSender<SentMail>,
    receiver: Mutex<mpsc::UnboundedReceiver<SentMail>>,
}

impl Default for MemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMailer {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Wait for the next delivery
    pub async fn next_message(&self) -> Option<SentMail> {
        self.receiver.lock().await.recv().await
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError> {
        // The receiver lives as long as `self`
        let _ = self.sender.send(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_deliveries_are_queued_in_order() {
        let mailer = MemoryMailer::new();
        mailer.deliver("a@example.com", "one", "1").await.unwrap();
        mailer.deliver("b@example.com", "two", "2").await.unwrap();

        assert_eq!(mailer.next_message().await.unwrap().subject, "one");
        assert_eq!(mailer.next_message().await.unwrap().recipient, "b@example.com");
    }

    #[tokio::test]
    async fn test_empty_outbox_waits() {
        let mailer = MemoryMailer::new();
        let result = tokio::time::timeout(Duration::from_millis(50), mailer.next_message()).await;
        assert!(result.is_err());
    }
}
