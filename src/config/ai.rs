//! LLM configuration (field extraction and off-track answering).

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// LLM configuration.
///
/// The engine runs fully without a key: extraction degrades to light
/// parsing and off-track asides fall back to canned or generic redirects.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the OpenAI-compatible endpoint. Empty disables LLM use.
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the completion API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum completion tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl AiConfig {
    /// Get timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate LLM configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.is_enabled() && !self.base_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl("ai.base_url"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    512
}
