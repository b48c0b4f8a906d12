//! SMS configuration

use serde::Deserialize;

use super::error::ValidationError;

/// SMS delivery through the Semaphore gateway
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub semaphore_api_key: Option<String>,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Comma-separated numbers alerted on new bookings
    pub staff_phones: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl SmsConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.semaphore_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn staff_phone_list(&self) -> Vec<String> {
        self.staff_phones
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.sender_name.chars().count();
        if len == 0 || len > 11 {
            return Err(ValidationError::InvalidSenderName);
        }
        Ok(())
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            semaphore_api_key: None,
            sender_name: default_sender_name(),
            staff_phones: None,
            api_url: default_api_url(),
        }
    }
}

fn default_sender_name() -> String {
    "GOLDENBAY".to_string()
}

fn default_api_url() -> String {
    "https://semaphore.co/api/v4/messages".to_string()
}
