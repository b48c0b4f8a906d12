//! Email over the Resend HTTP API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::EmailMessage;
use crate::ports::EmailTransport;

const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

pub struct ResendEmailTransport {
    api_key: SecretString,
    from: String,
    api_url: String,
    http_client: reqwest::Client,
}

impl ResendEmailTransport {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            api_url: DEFAULT_API_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Builds a transport when the config carries an API key.
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        config
            .api_key()
            .map(|key| Self::new(key, config.from_header()))
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[async_trait]
impl EmailTransport for ResendEmailTransport {
    async fn send_email(&self, to: &str, message: &EmailMessage) -> Result<(), DomainError> {
        let body = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject: &message.subject,
            html: &message.html,
            text: &message.plain,
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::new(ErrorCode::TransportError, format!("Resend request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::TransportError,
                format!("Resend API error ({}): {}", status, error_text),
            ));
        }

        tracing::info!(to = %to, subject = %message.subject, "email sent");
        Ok(())
    }
}

impl std::fmt::Debug for ResendEmailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendEmailTransport")
            .field("from", &self.from)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
