//! # Usersync Server
//!
//! Standalone webhook receiver. Wires the signature verifier, the
//! synchronization handlers, the local store and the provider write-back
//! client into one Axum application.

mod config;

pub use config::{
    load_config, Config, ConfigError, ProviderConfig, Secrets, ServerConfig, WebhookConfig, CONFIG_PATH_ENV,
    DEFAULT_CONFIG_PATH, HOST_ENV, PORT_ENV, PROVIDER_SECRET_ENV, WEBHOOK_SECRET_ENV,
};

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use usersync_adapter_memory::MemoryUserStore;
use usersync_axum::{webhook_routes, WebhookState};
use usersync_core::{ProviderMetadataClient, SyncError, UserStore};
use usersync_handlers::SyncService;
use usersync_provider_clerk::{ClerkClient, ClerkConfig};
use usersync_webhooks::{WebhookError, WebhookReceiver, WebhookReceiverBuilder};

/// Startup and serving errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Webhook setup error: {0}")]
    Webhook(#[from] WebhookError),
    #[error("Provider setup error: {0}")]
    Provider(#[from] SyncError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs the global `fmt` subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The assembled server.
pub struct UsersyncServer {
    /// Server configuration.
    pub config: Config,
    secrets: Secrets,
    store: Arc<dyn UserStore>,
}

impl UsersyncServer {
    /// Creates a server backed by the in-memory store.
    pub fn new(config: Config, secrets: Secrets) -> Self {
        Self::with_store(config, secrets, Arc::new(MemoryUserStore::new()))
    }

    /// Creates a server backed by the given store.
    pub fn with_store(config: Config, secrets: Secrets, store: Arc<dyn UserStore>) -> Self {
        Self { config, secrets, store }
    }

    /// Builds the signature verifier from the webhook section.
    pub fn receiver(&self) -> Result<WebhookReceiver, ServerError> {
        let builder = WebhookReceiverBuilder::new(self.secrets.webhook_secret.clone());
        let builder = if self.config.webhook.enforce_timestamp {
            builder.tolerance(self.config.webhook.tolerance_secs)
        } else {
            tracing::warn!("Webhook timestamp enforcement is disabled");
            builder.ignore_timestamp()
        };

        Ok(builder.build()?)
    }

    /// Builds the provider write-back client.
    pub fn provider_client(&self) -> Result<ClerkClient, ServerError> {
        let config = ClerkConfig::new(self.secrets.provider_secret_key.clone())
            .with_api_url(self.config.provider.api_url.clone())
            .with_timeout(Duration::from_secs(self.config.provider.timeout_secs));

        Ok(ClerkClient::new(config)?)
    }

    /// Builds the application router.
    pub fn router(&self) -> Result<Router, ServerError> {
        let provider: Arc<dyn ProviderMetadataClient> = Arc::new(self.provider_client()?);
        self.router_with_provider(provider)
    }

    /// Builds the application router around a given provider client.
    pub fn router_with_provider(&self, provider: Arc<dyn ProviderMetadataClient>) -> Result<Router, ServerError> {
        let service = SyncService::new(self.store.clone(), provider, self.config.webhook.sync_policy());
        let state = WebhookState::new(self.receiver()?, service);

        Ok(webhook_routes(state, &self.config.webhook.path))
    }

    /// Binds and serves until Ctrl+C or SIGTERM.
    pub async fn run(&self) -> Result<(), ServerError> {
        let app = self.router()?;
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(
            %addr,
            path = %self.config.webhook.path,
            duplicate_create = ?self.config.webhook.duplicate_create,
            update_missing = ?self.config.webhook.update_missing,
            "Usersync server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
