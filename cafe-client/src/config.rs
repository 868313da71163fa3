//! Client configuration

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for the backend and location APIs
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://api.example.com").
    ///
    /// `None` means the deployment never configured it; every backend call
    /// then fails with `ClientError::NotConfigured`.
    pub base_url: Option<String>,

    /// Location API base URL (place search / reverse geocode)
    pub location_base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration for the given backend
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            location_base_url: "http://localhost:3000".to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Configuration without a backend URL
    pub fn unconfigured() -> Self {
        Self {
            base_url: None,
            ..Self::new("")
        }
    }

    /// Load from environment variables
    ///
    /// | 环境变量 | 默认值 |
    /// |----------|--------|
    /// | CAFE_API_URL | (unset) |
    /// | CAFE_LOCATION_URL | http://localhost:3000 |
    /// | CAFE_HTTP_TIMEOUT_SECS | 30 |
    pub fn from_env() -> Self {
        let mut config = Self::unconfigured();
        config.base_url = std::env::var("CAFE_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        if let Ok(url) = std::env::var("CAFE_LOCATION_URL") {
            config.location_base_url = url;
        }
        config.timeout = std::env::var("CAFE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        config
    }

    /// Set the location API base URL
    pub fn with_location_base_url(mut self, url: impl Into<String>) -> Self {
        self.location_base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3001")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("https://api.example.com")
            .with_location_base_url("https://shop.example.com")
            .with_timeout(5);
        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.location_base_url, "https://shop.example.com");
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_unconfigured_has_no_backend() {
        let config = ClientConfig::unconfigured();
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
    }
}
