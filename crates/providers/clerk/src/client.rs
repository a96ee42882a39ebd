//! HTTP client for the user metadata endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use usersync_core::{ProviderMetadataClient, ProviderMetadataPatch, PublicMetadata, SyncError, SyncResult};

use crate::config::ClerkConfig;

/// Request body for `PATCH /v1/users/{id}/metadata`.
#[derive(Serialize)]
struct MetadataRequest<'a> {
    public_metadata: &'a PublicMetadata,
}

/// Error body returned by the Backend API.
#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    message: String,
    #[serde(default)]
    long_message: Option<String>,
}

/// Clerk Backend API client.
#[derive(Debug, Clone)]
pub struct ClerkClient {
    http: reqwest::Client,
    config: ClerkConfig,
}

impl ClerkClient {
    /// Creates a client with the configured timeout.
    pub fn new(config: ClerkConfig) -> SyncResult<Self> {
        if config.secret_key.trim().is_empty() {
            return Err(SyncError::config("Clerk secret key is empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SyncError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClerkConfig {
        &self.config
    }

    /// Builds the metadata URL for a user, rejecting ids that would change
    /// the request path.
    pub fn metadata_url(&self, provider_user_id: &str) -> SyncResult<String> {
        if provider_user_id.is_empty()
            || provider_user_id
                .chars()
                .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
        {
            return Err(SyncError::invalid_field(
                "provider_user_id",
                "contains characters not allowed in a path segment",
            ));
        }

        Ok(format!("{}/v1/users/{}/metadata", self.config.api_url, provider_user_id))
    }
}

#[async_trait]
impl ProviderMetadataClient for ClerkClient {
    fn name(&self) -> &str {
        "clerk"
    }

    async fn update_public_metadata(&self, patch: &ProviderMetadataPatch) -> SyncResult<()> {
        let url = self.metadata_url(&patch.provider_user_id)?;

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.config.secret_key)
            .json(&MetadataRequest {
                public_metadata: &patch.public_metadata,
            })
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "request timed out" } else { "request failed" };
                SyncError::provider(None, format!("{reason}: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                provider_user_id = %patch.provider_user_id,
                status = status.as_u16(),
                "Clerk metadata updated"
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::provider(
            Some(status.as_u16()),
            format!("HTTP {}: {}", status.as_u16(), error_message(&body)),
        ))
    }
}

/// Extracts the first error message from an API error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.errors.into_iter().next())
        .map(|entry| entry.long_message.unwrap_or(entry.message))
        .unwrap_or_else(|| "unexpected response".to_string())
}
