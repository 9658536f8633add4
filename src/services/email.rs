//! # Email Service
//!
//! Delivery of password-reset emails behind a trait so handlers and tests
//! can swap implementations: [`LogEmailer`] logs the code during local
//! development, [`ExternalEmailer`] hands the message to an HTTP mail
//! provider in production (selected by `APP_ENV`).

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Errors that can occur while delivering mail
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email provider rejected the message ({status}): {detail}")]
    Rejected {
        status: reqwest::StatusCode,
        detail: String,
    },
}

/// A password-reset email ready for delivery.
///
/// The subject and body are fixed by the reset flow; implementations only
/// decide how the message reaches the recipient.
#[derive(Debug, Clone)]
pub struct ResetCodeEmail {
    pub recipient: String,
    pub code: String,
}

impl ResetCodeEmail {
    pub fn new(recipient: String, code: String) -> Self {
        Self { recipient, code }
    }

    pub fn subject(&self) -> &'static str {
        "Password reset"
    }

    /// Plain-text body with the code at the end so it is easy to copy.
    pub fn body_text(&self) -> String {
        format!(
            "Copy and paste the following code to reset your password: {}",
            self.code
        )
    }
}

/// Trait for reset-email delivery services
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Delivers the reset email to its recipient.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the message cannot be handed over to the
    /// provider.
    async fn deliver(&self, mail: &ResetCodeEmail) -> Result<(), EmailError>;
}

/// Development/testing implementation that logs the reset code instead of
/// sending anything, so it shows up in the local console.
pub struct LogEmailer;

#[async_trait]
impl EmailService for LogEmailer {
    #[instrument(skip_all, fields(recipient = %mail.recipient))]
    async fn deliver(&self, mail: &ResetCodeEmail) -> Result<(), EmailError> {
        info!(code = %mail.code, "Mock reset email delivered");
        Ok(())
    }
}

/// Production implementation that posts messages to an HTTP mail provider.
///
/// # Configuration
///
/// Requires the following environment variables in production:
/// - `MAIL_API_URL` - Message endpoint of the mail provider
/// - `MAIL_API_KEY` - Bearer token for the provider
/// - `SENDER_EMAIL` - Address the reset emails are sent from
pub struct ExternalEmailer {
    api_url: String,
    api_key: String,
    sender_email: String,
    http_client: reqwest::Client,
}

/// Wire format the provider expects for a single plain-text message.
#[derive(Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

impl ExternalEmailer {
    pub fn new(api_url: String, api_key: String, sender_email: String) -> Self {
        info!(
            api_url = %api_url,
            sender_email = %sender_email,
            "Initializing external email service"
        );

        Self {
            api_url,
            api_key,
            sender_email,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailService for ExternalEmailer {
    #[instrument(
        skip_all,
        fields(
            recipient = %mail.recipient,
            sender = %self.sender_email
        )
    )]
    async fn deliver(&self, mail: &ResetCodeEmail) -> Result<(), EmailError> {
        let message = OutgoingMessage {
            from: &self.sender_email,
            to: &mail.recipient,
            subject: mail.subject(),
            text: mail.body_text(),
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, %detail, "Email provider rejected the reset email");
            return Err(EmailError::Rejected { status, detail });
        }

        info!("Reset email delivered");
        Ok(())
    }
}
