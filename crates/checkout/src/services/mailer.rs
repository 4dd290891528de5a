//! Notification transport trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{CheckoutError, Result};

/// An outbound message for the notification transport.
#[derive(Debug, Clone)]
pub struct Email {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// Plaintext body.
    pub text: String,

    /// Optional HTML body.
    pub html: Option<String>,
}

/// Trait for the asynchronous mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a message. Callers treat failure as best-effort: it is
    /// logged, never surfaced to the buyer.
    async fn send(&self, email: Email) -> Result<()>;
}

#[derive(Debug, Default)]
struct MailerState {
    sent: Vec<Email>,
    fail_on_send: bool,
}

/// In-memory mailer for testing.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    state: Arc<RwLock<MailerState>>,
}

impl RecordingMailer {
    /// Creates a new recording mailer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the mailer to fail all sends.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the messages sent so far.
    pub fn sent(&self) -> Vec<Email> {
        self.state.read().unwrap().sent.clone()
    }

    /// Returns the number of messages sent.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(CheckoutError::Gateway(
                "simulated mail transport failure".to_string(),
            ));
        }

        state.sent.push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_records_message() {
        let mailer = RecordingMailer::new();
        mailer
            .send(Email {
                to: "meena@example.com".to_string(),
                subject: "Hello".to_string(),
                text: "Hi".to_string(),
                html: None,
            })
            .await
            .unwrap();

        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(mailer.sent()[0].to, "meena@example.com");
    }

    #[tokio::test]
    async fn test_fail_toggle() {
        let mailer = RecordingMailer::new();
        mailer.set_fail_on_send(true);

        let result = mailer
            .send(Email {
                to: "meena@example.com".to_string(),
                subject: "Hello".to_string(),
                text: "Hi".to_string(),
                html: None,
            })
            .await;

        assert!(result.is_err());
        assert_eq!(mailer.sent_count(), 0);
    }
}
