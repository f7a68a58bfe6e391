//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `FOLIO` prefix and `__`
//! between nesting levels.
//!
//! # Example
//!
//! ```no_run
//! use folio::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod email;
mod error;
mod payment;
mod server;
mod storage;

pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `FOLIO` prefix
    /// 3. Splits nesting on `__`
    ///
    /// - `FOLIO__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FOLIO__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("FOLIO").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(self.server.environment)?;
        self.payment.validate()?;
        self.email.validate()?;
        self.storage.validate()?;
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
        "FOLIO__DATABASE__URL",
        "FOLIO__AUTH__JWT_SECRET",
        "FOLIO__SERVER__PORT",
        "FOLIO__SERVER__ENVIRONMENT",
        "FOLIO__PAYMENT__RAZORPAY_KEY_ID",
        "FOLIO__PAYMENT__RAZORPAY_KEY_SECRET",
    ];

    fn set_minimal_env() {
        env::set_var("FOLIO__DATABASE__URL", "postgresql://folio@localhost/folio");
        env::set_var("FOLIO__AUTH__JWT_SECRET", "a-development-secret-that-is-long-enough");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.database.url, "postgresql://folio@localhost/folio");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.payment.currency, "INR");
        assert!(!config.payment.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_apply() {
        let config = load_with(&[
            ("FOLIO__SERVER__PORT", "3000"),
            ("FOLIO__SERVER__ENVIRONMENT", "production"),
            ("FOLIO__PAYMENT__RAZORPAY_KEY_ID", "rzp_test_abc"),
            ("FOLIO__PAYMENT__RAZORPAY_KEY_SECRET", "shh"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert!(config.payment.is_configured());
    }
}
