//! Client configuration.

use std::time::Duration;

/// Base URL of the Clerk Backend API.
pub const DEFAULT_API_URL: &str = "https://api.clerk.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`ClerkClient`](crate::ClerkClient).
#[derive(Clone)]
pub struct ClerkConfig {
    /// Base URL, without a trailing slash.
    pub api_url: String,
    /// Backend API secret key, sent as a bearer token.
    pub secret_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClerkConfig {
    /// Creates a configuration for the public API with the default timeout.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            secret_key: secret_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClerkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkConfig")
            .field("api_url", &self.api_url)
            .field("secret_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClerkConfig::new("sk_test_123");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClerkConfig::new("sk_test_123").with_api_url("http://localhost:8080/");
        assert_eq!(config.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", ClerkConfig::new("sk_test_123"));
        assert!(!output.contains("sk_test_123"));
        assert!(output.contains("[REDACTED]"));
    }
}
