//! Outbound email and SMS transports.
//!
//! - `ResendEmailTransport` / `SemaphoreSmsTransport` - HTTP gateways
//! - `LoggingEmailTransport` / `LoggingSmsTransport` - used when no key is set
//! - `RecordingEmailTransport` / `RecordingSmsTransport` - capture for tests

mod logging;
mod recording;
mod resend;
mod semaphore;

pub use logging::{LoggingEmailTransport, LoggingSmsTransport};
pub use recording::{RecordingEmailTransport, RecordingSmsTransport, SentEmail, SentSms};
pub use resend::ResendEmailTransport;
pub use semaphore::SemaphoreSmsTransport;

use std::sync::Arc;

use crate::config::{EmailConfig, SmsConfig};
use crate::ports::{EmailTransport, SmsTransport};

/// Resend when keyed, otherwise log-only.
pub fn email_transport(config: &EmailConfig) -> Arc<dyn EmailTransport> {
    match ResendEmailTransport::from_config(config) {
        Some(transport) => Arc::new(transport),
        None => {
            tracing::warn!("RESEND key not set; emails will be logged only");
            Arc::new(LoggingEmailTransport)
        }
    }
}

/// Semaphore when keyed, otherwise log-only.
pub fn sms_transport(config: &SmsConfig) -> Arc<dyn SmsTransport> {
    match SemaphoreSmsTransport::from_config(config) {
        Some(transport) => Arc::new(transport),
        None => {
            tracing::warn!("Semaphore key not set; SMS will be logged only");
            Arc::new(LoggingSmsTransport)
        }
    }
}
