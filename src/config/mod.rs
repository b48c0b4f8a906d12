//! Application configuration module
//!
//! Configuration is read from environment variables with the `GOLDENBAY`
//! prefix, using `__` (double underscore) between nested keys. A `.env` file
//! is honoured in development.
//!
//! # Example
//!
//! ```no_run
//! use goldenbay_reservations::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod business;
mod database;
mod email;
mod error;
mod server;
mod sms;
mod workers;

pub use auth::AuthConfig;
pub use business::BusinessConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use sms::SmsConfig;
pub use workers::WorkersConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub sms: SmsConfig,

    #[serde(default)]
    pub business: BusinessConfig,

    #[serde(default)]
    pub workers: WorkersConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `GOLDENBAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GOLDENBAY__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GOLDENBAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic checks that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.email.validate()?;
        self.sms.validate()?;
        self.business.validate()?;
        self.workers.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "GOLDENBAY__DATABASE__URL",
        "GOLDENBAY__AUTH__JWT_SECRET",
        "GOLDENBAY__SERVER__PORT",
        "GOLDENBAY__SERVER__ENVIRONMENT",
        "GOLDENBAY__SMS__STAFF_PHONES",
        "GOLDENBAY__BUSINESS__SPEND_PER_PAX",
    ];

    fn set_minimal_env() {
        env::set_var("GOLDENBAY__DATABASE__URL", "postgresql://test@localhost/goldenbay");
        env::set_var("GOLDENBAY__AUTH__JWT_SECRET", "test-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/goldenbay");
        assert_eq!(config.business.brand_name, "Golden Bay");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_database_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GOLDENBAY__AUTH__JWT_SECRET", "test-secret");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GOLDENBAY__SERVER__PORT", "3000");
        env::set_var("GOLDENBAY__SMS__STAFF_PHONES", "09171234567,09181234567");
        env::set_var("GOLDENBAY__BUSINESS__SPEND_PER_PAX", "2000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sms.staff_phone_list().len(), 2);
        assert_eq!(config.business.spend_per_pax, 2000);
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GOLDENBAY__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(matches!(config.validate(), Err(ValidationError::WeakJwtSecret)));
    }
}
