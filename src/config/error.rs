//! Configuration error types.

use thiserror::Error;

/// Errors during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors during configuration validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server port must be non-zero")]
    InvalidPort,

    #[error("timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("missing required setting: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL in setting: {0}")]
    InvalidUrl(&'static str),
}
