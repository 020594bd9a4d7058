//! Configuration for the analytics client

use crate::error::ClientError;
use std::time::Duration;

/// Default API origin
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Analytics client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsClientConfig {
    /// Origin of the analytics API (e.g., `https://console.example.com`)
    ///
    /// Endpoint paths are absolute and replace any path on this URL.
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,
}

impl AnalyticsClientConfig {
    /// Create config from environment variables
    ///
    /// Environment variables:
    /// - `ANALYTICS_BASE_URL`: API origin (default: `http://localhost:8000`)
    /// - `ANALYTICS_TIMEOUT_SECS`: request timeout (default: 30)
    ///
    /// # Errors
    /// Returns error if `ANALYTICS_BASE_URL` is not an absolute URL
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var("ANALYTICS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());

        let timeout = std::env::var("ANALYTICS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        let config = Self { base_url, timeout };
        config.validate()?;
        Ok(config)
    }

    /// Create a config for `base_url` with the default timeout
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that `base_url` parses as an absolute URL
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] describing the parse failure
    pub fn validate(&self) -> Result<(), ClientError> {
        self.parsed_base_url().map(|_| ())
    }

    pub(crate) fn parsed_base_url(&self) -> Result<url::Url, ClientError> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ClientError::Config(format!("Invalid ANALYTICS_BASE_URL '{}': {e}", self.base_url))
        })?;
        if url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "ANALYTICS_BASE_URL '{}' cannot be used as a base URL",
                self.base_url
            )));
        }
        Ok(url)
    }
}

impl Default for AnalyticsClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
