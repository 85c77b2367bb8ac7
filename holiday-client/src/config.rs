//! Client configuration
//!
//! Connection settings for the holiday API and the timing knobs of the request
//! pipeline.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default API origin used for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Wall-clock budget per call; exceeding it is a transport failure
    pub timeout: Duration,

    /// Pause inserted after each settled request of the serial queue
    pub queue_spacing: Duration,

    /// Location the user is sent to when the session is rejected
    pub login_path: String,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            queue_spacing: Duration::from_millis(100),
            login_path: "/login".to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognised environment variables:
    /// - HOLIDAY_API_URL (optional, default: http://localhost:8080)
    /// - HOLIDAY_API_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("HOLIDAY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url);

        if let Some(timeout) = std::env::var("HOLIDAY_API_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(timeout);
        }

        config
    }

    /// Sets the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the pause between serial queue items
    pub fn with_queue_spacing(mut self, spacing: Duration) -> Self {
        self.queue_spacing = spacing;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::Validation("base_url cannot be empty".into()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::Validation(
                "timeout must be greater than 0".into(),
            ));
        }

        if self.queue_spacing.is_zero() {
            return Err(ClientError::Validation(
                "queue_spacing must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.queue_spacing, Duration::from_millis(100));
        assert_eq!(config.login_path, "/login");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.base_url = String::new();
        assert!(config.validate().is_err());

        config.base_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://api.example.com".to_string();
        assert!(config.validate().is_ok());

        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        config.timeout = Duration::from_secs(5);
        config.queue_spacing = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ClientError::Validation(_))));

        config.queue_spacing = Duration::from_millis(1);
        assert!(config.validate().is_ok());
    }
}
