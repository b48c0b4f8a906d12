//! Transports used when no gateway key is configured: messages go to the log.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::EmailMessage;
use crate::ports::{EmailTransport, SmsTransport};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEmailTransport;

#[async_trait]
impl EmailTransport for LoggingEmailTransport {
    async fn send_email(&self, to: &str, message: &EmailMessage) -> Result<(), DomainError> {
        tracing::info!(
            to = %to,
            subject = %message.subject,
            body = %message.plain,
            "email not sent: no API key configured"
        );
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSmsTransport;

#[async_trait]
impl SmsTransport for LoggingSmsTransport {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), DomainError> {
        tracing::info!(to = %to, body = %body, "sms not sent: no API key configured");
        Ok(())
    }
}
