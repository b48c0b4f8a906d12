//! Outbound message transports.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::EmailMessage;

#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send_email(&self, to: &str, message: &EmailMessage) -> Result<(), DomainError>;
}

#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), DomainError>;
}
