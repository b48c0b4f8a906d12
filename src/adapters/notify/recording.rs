//! Transports that keep what they were asked to send.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::EmailMessage;
use crate::ports::{EmailTransport, SmsTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub message: EmailMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct RecordingEmailTransport {
    sent: Mutex<Vec<SentEmail>>,
    fail: bool,
}

impl RecordingEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every send with a transport error.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl EmailTransport for RecordingEmailTransport {
    async fn send_email(&self, to: &str, message: &EmailMessage) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(ErrorCode::TransportError, "email gateway unavailable"));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentEmail {
                to: to.to_string(),
                message: message.clone(),
            });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingSmsTransport {
    sent: Mutex<Vec<SentSms>>,
    fail: bool,
}

impl RecordingSmsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl SmsTransport for RecordingSmsTransport {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(ErrorCode::TransportError, "sms gateway unavailable"));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentSms {
                to: to.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}
