//! Session store configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Which session store backend to run.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreBackend {
    /// Process-local map; sessions die with the process.
    #[default]
    Memory,
    /// Redis-backed persistence with TTL.
    Redis,
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStoreConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: SessionStoreBackend,

    /// Redis connection URL (required for the redis backend).
    pub redis_url: Option<String>,

    /// Session TTL in seconds; zero disables expiry.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl SessionStoreConfig {
    /// Validate store configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == SessionStoreBackend::Redis {
            match self.redis_url.as_deref() {
                Some(url) if url.starts_with("redis://") || url.starts_with("rediss://") => {}
                Some(_) => return Err(ValidationError::InvalidUrl("session_store.redis_url")),
                None => {
                    return Err(ValidationError::MissingRequired("session_store.redis_url"))
                }
            }
        }
        Ok(())
    }
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            backend: SessionStoreBackend::default(),
            redis_url: None,
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_memory_backend() {
        let config = SessionStoreConfig::default();
        assert_eq!(config.backend, SessionStoreBackend::Memory);
        assert_eq!(config.ttl_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let config = SessionStoreConfig {
            backend: SessionStoreBackend::Redis,
            redis_url: None,
            ttl_secs: 3600,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_redis_url_scheme_is_checked() {
        let config = SessionStoreConfig {
            backend: SessionStoreBackend::Redis,
            redis_url: Some("http://localhost".to_string()),
            ttl_secs: 3600,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUrl(_))
        ));

        let config = SessionStoreConfig {
            backend: SessionStoreBackend::Redis,
            redis_url: Some("redis://localhost:6379".to_string()),
            ttl_secs: 3600,
        };
        assert!(config.validate().is_ok());
    }
}
