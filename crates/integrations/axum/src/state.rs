//! Shared state for the webhook routes.

use std::sync::Arc;

use usersync_handlers::SyncService;
use usersync_webhooks::WebhookReceiver;

/// Process-scoped dependencies of the webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookState {
    pub receiver: Arc<WebhookReceiver>,
    pub service: Arc<SyncService>,
}

impl WebhookState {
    /// Creates the state from a configured receiver and service.
    pub fn new(receiver: WebhookReceiver, service: SyncService) -> Self {
        Self {
            receiver: Arc::new(receiver),
            service: Arc::new(service),
        }
    }
}
