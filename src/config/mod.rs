//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `VISA_COMPASS` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use visa_compass::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod server;
mod store;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use store::{SessionStoreBackend, SessionStoreConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Session store configuration (memory or Redis)
    #[serde(default)]
    pub session_store: SessionStoreConfig,

    /// LLM configuration (extraction + off-track answering)
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `VISA_COMPASS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `VISA_COMPASS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `VISA_COMPASS__SESSION_STORE__BACKEND=redis`
    /// - `VISA_COMPASS__AI__API_KEY=sk-...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VISA_COMPASS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.session_store.validate()?;
        self.ai.validate()?;
        Ok(())
    }

    /// Check if running in production environment.
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_config_uses_memory_store() {
        let config = AppConfig::default();
        assert_eq!(config.session_store.backend, SessionStoreBackend::Memory);
    }

    #[test]
    fn default_config_is_not_production() {
        let config = AppConfig::default();
        assert!(!config.is_production());
    }
}
