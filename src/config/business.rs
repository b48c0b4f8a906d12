//! Venue settings used in messages and the dashboard

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::BusinessClock;
use crate::domain::notification::MessageTemplates;

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    #[serde(default = "default_hotline")]
    pub hotline: String,

    /// Minutes east of UTC for the venue's local calendar
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,

    /// Assumed spend per guest for revenue estimates
    #[serde(default = "default_spend_per_pax")]
    pub spend_per_pax: u64,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl BusinessConfig {
    pub fn clock(&self) -> Result<BusinessClock, ValidationError> {
        BusinessClock::from_offset_minutes(self.utc_offset_minutes)
            .ok_or(ValidationError::InvalidUtcOffset)
    }

    pub fn templates(&self, sms_signature: &str) -> MessageTemplates {
        MessageTemplates {
            brand_name: self.brand_name.clone(),
            hotline: self.hotline.clone(),
            sms_signature: sms_signature.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.brand_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BUSINESS__BRAND_NAME"));
        }
        self.clock()?;
        Ok(())
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            brand_name: default_brand_name(),
            hotline: default_hotline(),
            utc_offset_minutes: default_utc_offset(),
            spend_per_pax: default_spend_per_pax(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_brand_name() -> String {
    "Golden Bay".to_string()
}

fn default_hotline() -> String {
    "(02) 8804-0332".to_string()
}

fn default_utc_offset() -> i32 {
    8 * 60
}

fn default_spend_per_pax() -> u64 {
    1500
}

fn default_currency_symbol() -> String {
    "₱".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_defaults() {
        let config = BusinessConfig::default();
        assert_eq!(config.brand_name, "Golden Bay");
        assert_eq!(config.utc_offset_minutes, 480);
        assert_eq!(config.spend_per_pax, 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let config = BusinessConfig {
            utc_offset_minutes: 60 * 30,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidUtcOffset)));
    }

    #[test]
    fn test_templates_carry_brand() {
        let templates = BusinessConfig::default().templates("GOLDENBAY");
        assert_eq!(templates.brand_name, "Golden Bay");
        assert_eq!(templates.hotline, "(02) 8804-0332");
        assert_eq!(templates.sms_signature, "GOLDENBAY");
    }
}
