//! SMS over the Semaphore gateway.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::SmsConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::SmsTransport;

pub struct SemaphoreSmsTransport {
    api_key: SecretString,
    sender_name: String,
    api_url: String,
    http_client: reqwest::Client,
}

impl SemaphoreSmsTransport {
    /// Builds a transport when the config carries an API key.
    pub fn from_config(config: &SmsConfig) -> Option<Self> {
        config.api_key().map(|key| Self {
            api_key: SecretString::new(key.to_string()),
            sender_name: config.sender_name.clone(),
            api_url: config.api_url.clone(),
            http_client: reqwest::Client::new(),
        })
    }

    fn form<'a>(&'a self, to: &'a str, body: &'a str) -> [(&'static str, &'a str); 4] {
        [
            ("apikey", self.api_key.expose_secret().as_str()),
            ("number", to),
            ("message", body),
            ("sendername", self.sender_name.as_str()),
        ]
    }
}

#[async_trait]
impl SmsTransport for SemaphoreSmsTransport {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), DomainError> {
        let response = self
            .http_client
            .post(&self.api_url)
            .form(&self.form(to, body))
            .send()
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::TransportError, format!("Semaphore request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::TransportError,
                format!("Semaphore API error ({}): {}", status, error_text),
            ));
        }

        tracing::info!(to = %to, "sms sent");
        Ok(())
    }
}

impl std::fmt::Debug for SemaphoreSmsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemaphoreSmsTransport")
            .field("sender_name", &self.sender_name)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
