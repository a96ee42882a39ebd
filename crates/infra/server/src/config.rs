//! Server configuration.
//!
//! Non-secret settings come from a TOML file; secrets come only from the
//! environment. Every loader takes an environment lookup function so tests
//! never touch the process environment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use usersync_axum::DEFAULT_WEBHOOK_PATH;
use usersync_handlers::{DuplicateCreatePolicy, SyncPolicy, UpdateMissingPolicy};
use usersync_provider_clerk::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use usersync_webhooks::DEFAULT_TOLERANCE_SECS;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "USERSYNC_CONFIG";
/// Config file used when `USERSYNC_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "usersync.toml";
/// Webhook signing secret (`whsec_...`).
pub const WEBHOOK_SECRET_ENV: &str = "WEBHOOK_SECRET";
/// Provider Backend API secret key.
pub const PROVIDER_SECRET_ENV: &str = "CLERK_SECRET_KEY";
/// Overrides `server.host`.
pub const HOST_ENV: &str = "USERSYNC_HOST";
/// Overrides `server.port`.
pub const PORT_ENV: &str = "USERSYNC_PORT";

/// Full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    pub provider: ProviderConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// `[webhook]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Path of the webhook endpoint.
    pub path: String,
    /// Accepted clock skew for the delivery timestamp.
    pub tolerance_secs: i64,
    /// Reject deliveries outside the tolerance window.
    pub enforce_timestamp: bool,
    pub duplicate_create: DuplicateCreatePolicy,
    pub update_missing: UpdateMissingPolicy,
}

impl WebhookConfig {
    /// The handler policy described by this section.
    pub fn sync_policy(&self) -> SyncPolicy {
        SyncPolicy::default()
            .with_duplicate_create(self.duplicate_create)
            .with_update_missing(self.update_missing)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_WEBHOOK_PATH.to_string(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            enforce_timestamp: true,
            duplicate_create: DuplicateCreatePolicy::default(),
            update_missing: UpdateMissingPolicy::default(),
        }
    }
}

/// `[provider]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Backend API base URL.
    pub api_url: String,
    /// Request timeout for the metadata write-back.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `USERSYNC_HOST` and `USERSYNC_PORT`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: PORT_ENV.to_string(),
                reason: format!("'{port}' is not a valid port"),
            })?;
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.webhook.path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "webhook.path".to_string(),
                reason: "must start with '/'".to_string(),
            });
        }

        if self.webhook.tolerance_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "webhook.tolerance_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "provider.timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

/// Loads the configuration file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    Config::from_toml_str(&content)
}

/// Secrets read from the environment.
#[derive(Clone)]
pub struct Secrets {
    pub webhook_secret: String,
    pub provider_secret_key: String,
}

impl Secrets {
    /// Reads both secrets; absent or blank values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingSecret(name))
        };

        Ok(Self {
            webhook_secret: require(WEBHOOK_SECRET_ENV)?,
            provider_secret_key: require(PROVIDER_SECRET_ENV)?,
        })
    }

    /// Reads both secrets from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("webhook_secret", &"[REDACTED]")
            .field("provider_secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Missing secret: environment variable {0} is not set")]
    MissingSecret(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.webhook.path, "/api/webhooks/clerk");
        assert_eq!(config.webhook.tolerance_secs, 300);
        assert!(config.webhook.enforce_timestamp);
        assert_eq!(config.provider.timeout_secs, 10);
    }

    #[test]
    fn test_parse_sections() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9100
            log_level = "debug"

            [webhook]
            path = "/hooks/identity"
            enforce_timestamp = false
            duplicate_create = "conflict"
            update_missing = "upsert"

            [provider]
            api_url = "http://localhost:4000"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.webhook.path, "/hooks/identity");
        assert!(!config.webhook.enforce_timestamp);
        assert_eq!(config.provider.api_url, "http://localhost:4000");

        let policy = config.webhook.sync_policy();
        assert_eq!(policy.duplicate_create, DuplicateCreatePolicy::Conflict);
        assert_eq!(policy.update_missing, UpdateMissingPolicy::Upsert);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("[webhook]\npath = \"hooks\""),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_toml_str("[webhook]\ntolerance_secs = 0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_toml_str("[server]\nport = \"x\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/usersync.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env_overrides(env(&[(HOST_ENV, "127.0.0.1"), (PORT_ENV, "9000")]))
            .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);

        let err = Config::default()
            .with_env_overrides(env(&[(PORT_ENV, "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_secrets_are_required() {
        let err = Secrets::from_lookup(env(&[(PROVIDER_SECRET_ENV, "sk_test")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(WEBHOOK_SECRET_ENV)));

        let err = Secrets::from_lookup(env(&[(WEBHOOK_SECRET_ENV, "whsec_abc"), (PROVIDER_SECRET_ENV, " ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(PROVIDER_SECRET_ENV)));

        let secrets =
            Secrets::from_lookup(env(&[(WEBHOOK_SECRET_ENV, "whsec_abc"), (PROVIDER_SECRET_ENV, "sk_test")])).unwrap();
        assert_eq!(secrets.webhook_secret, "whsec_abc");
        assert!(!format!("{secrets:?}").contains("sk_test"));
    }
}
