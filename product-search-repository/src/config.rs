//! Configuration types for the search engine connection.

use std::time::Duration;

/// Endpoint used when no engine URL is configured.
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:9200";

/// Configuration for the search engine connection.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine endpoint URL.
    pub url: String,
    /// Timeout applied to every request sent over the transport.
    pub request_timeout: Duration,
    /// Number of health checks attempted before giving up on a connection.
    pub connect_attempts: u32,
    /// Fixed delay between two health checks.
    pub connect_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENGINE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_attempts: 10,
            connect_delay: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Create a config for the given endpoint, falling back to
    /// [`DEFAULT_ENGINE_URL`] when the value is missing or blank.
    pub fn from_url(url: Option<&str>) -> Self {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_ENGINE_URL);

        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// Set the retry loop bounds.
    pub fn with_connect_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.connect_attempts = attempts;
        self.connect_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.url, DEFAULT_ENGINE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_attempts, 10);
        assert_eq!(config.connect_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_from_url_falls_back_on_blank() {
        assert_eq!(EngineConfig::from_url(None).url, DEFAULT_ENGINE_URL);
        assert_eq!(EngineConfig::from_url(Some("  ")).url, DEFAULT_ENGINE_URL);
        assert_eq!(
            EngineConfig::from_url(Some("http://search:9200")).url,
            "http://search:9200"
        );
    }
}
