//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email delivery through Resend
///
/// Without an API key, outgoing mail is written to the log instead of sent.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub resend_api_key: Option<String>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Inbox that receives new booking alerts
    pub staff_email: Option<String>,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// API key, treating a blank value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.resend_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = self.api_key() {
            if !key.starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidEmail("from_email"));
        }
        if let Some(staff) = &self.staff_email {
            if !staff.contains('@') {
                return Err(ValidationError::InvalidEmail("staff_email"));
            }
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
            staff_email: None,
        }
    }
}

fn default_from_email() -> String {
    "reservations@goldenbay.com.ph".to_string()
}

fn default_from_name() -> String {
    "Golden Bay Reservations".to_string()
}
