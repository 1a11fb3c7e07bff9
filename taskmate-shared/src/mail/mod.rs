/// Outbound mail seam
///
/// Actual delivery is an external collaborator: the production
/// implementation posts messages to an HTTP mail relay, and a null
/// implementation logs them for development and tests. Flows depend only on
/// the [`Mailer`] trait, so the transport can be swapped without touching
/// them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A rendered message ready for dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient address
    pub to: String,

    /// Subject line
    pub subject: String,

    /// Greeting shown above the body
    pub greeting: String,

    /// HTML body
    pub body: String,
}

impl MailMessage {
    /// Builds the verification-code message sent by the OTP flows
    ///
    /// `title` distinguishes the flavors ("Email Verification",
    /// "Password Reset"); the body carries the code prominently.
    pub fn verification_code(app_name: &str, to: &str, code: &str, title: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("{} {}", app_name, title),
            greeting: "You are almost there!".to_string(),
            body: format!(
                "<p style=\"text-align: left\">Your verification code is</p>\
                 <h1 style=\"text-align: left; font-size:20px\">{}</h1>",
                code
            ),
        }
    }
}

/// Error type for mail dispatch
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The relay could not be reached
    #[error("mail relay request failed: {0}")]
    Relay(#[from] reqwest::Error),

    /// The relay rejected the message
    #[error("mail relay returned status {0}")]
    RelayStatus(u16),
}

/// Dispatches rendered messages
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a message
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Mailer posting JSON to an HTTP mail relay
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    from_address: String,
}

impl HttpMailer {
    /// Creates a mailer for the given relay endpoint
    pub fn new(relay_url: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
            from_address,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let payload = serde_json::json!({
            "from": self.from_address,
            "to": message.to,
            "subject": message.subject,
            "greeting": message.greeting,
            "body": message.body,
        });

        let response = self
            .client
            .post(&self.relay_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::RelayStatus(response.status().as_u16()));
        }

        info!(to = %message.to, subject = %message.subject, "Mail dispatched");
        Ok(())
    }
}

/// Mailer that only logs, for development and tests
///
/// With no relay configured, verification codes show up in the server log
/// instead of an inbox.
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Mail relay not configured, logging message instead"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_code_message() {
        let message = MailMessage::verification_code(
            "Taskmate",
            "user@example.com",
            "123456",
            "Email Verification",
        );

        assert_eq!(message.to, "user@example.com");
        assert_eq!(message.subject, "Taskmate Email Verification");
        assert!(message.body.contains("123456"));
    }

    #[tokio::test]
    async fn test_null_mailer_always_succeeds() {
        let message = MailMessage::verification_code(
            "Taskmate",
            "user@example.com",
            "654321",
            "Password Reset",
        );

        assert!(NullMailer.send(&message).await.is_ok());
    }
}
