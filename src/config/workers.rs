//! Background worker cadence

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct WorkersConfig {
    #[serde(default = "default_outbox_poll_ms")]
    pub outbox_poll_ms: u64,

    #[serde(default = "default_batch_size")]
    pub outbox_batch_size: u32,

    #[serde(default = "default_job_poll_ms")]
    pub job_poll_ms: u64,

    #[serde(default = "default_batch_size")]
    pub job_batch_size: u32,

    #[serde(default = "default_reminder_scan_secs")]
    pub reminder_scan_secs: u64,
}

impl WorkersConfig {
    pub fn outbox_poll_interval(&self) -> Duration {
        Duration::from_millis(self.outbox_poll_ms)
    }

    pub fn job_poll_interval(&self) -> Duration {
        Duration::from_millis(self.job_poll_ms)
    }

    pub fn reminder_scan_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_scan_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.outbox_poll_ms == 0 {
            return Err(ValidationError::ZeroWorkerSetting("outbox_poll_ms"));
        }
        if self.outbox_batch_size == 0 {
            return Err(ValidationError::ZeroWorkerSetting("outbox_batch_size"));
        }
        if self.job_poll_ms == 0 {
            return Err(ValidationError::ZeroWorkerSetting("job_poll_ms"));
        }
        if self.job_batch_size == 0 {
            return Err(ValidationError::ZeroWorkerSetting("job_batch_size"));
        }
        if self.reminder_scan_secs == 0 {
            return Err(ValidationError::ZeroWorkerSetting("reminder_scan_secs"));
        }
        Ok(())
    }
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            outbox_poll_ms: default_outbox_poll_ms(),
            outbox_batch_size: default_batch_size(),
            job_poll_ms: default_job_poll_ms(),
            job_batch_size: default_batch_size(),
            reminder_scan_secs: default_reminder_scan_secs(),
        }
    }
}

fn default_outbox_poll_ms() -> u64 {
    500
}

fn default_job_poll_ms() -> u64 {
    1000
}

fn default_batch_size() -> u32 {
    50
}

fn default_reminder_scan_secs() -> u64 {
    15 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_defaults() {
        let config = WorkersConfig::default();
        assert_eq!(config.outbox_poll_interval(), Duration::from_millis(500));
        assert_eq!(config.job_poll_interval(), Duration::from_secs(1));
        assert_eq!(config.reminder_scan_interval(), Duration::from_secs(900));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = WorkersConfig {
            job_batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ZeroWorkerSetting("job_batch_size"))
        ));
    }
}
