//! Event dispatch and the metadata write-back shared by the create paths.

use std::sync::Arc;

use usersync_core::{LocalUserRecord, ProviderMetadataClient, ProviderMetadataPatch, SyncResult, UserStore};
use usersync_webhooks::ProviderEvent;

use crate::outcome::{SyncOutcome, WriteBack};
use crate::policy::SyncPolicy;

/// Applies provider events to the local store.
///
/// Holds no per-request state: the store and the provider client are the
/// only shared resources, so one instance serves any number of concurrent
/// deliveries.
#[derive(Clone)]
pub struct SyncService {
    pub(crate) store: Arc<dyn UserStore>,
    pub(crate) provider: Arc<dyn ProviderMetadataClient>,
    pub(crate) policy: SyncPolicy,
}

impl SyncService {
    /// Creates a new service from its collaborators.
    pub fn new(
        store: Arc<dyn UserStore>,
        provider: Arc<dyn ProviderMetadataClient>,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            store,
            provider,
            policy,
        }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Dispatches an event to the handler for its kind.
    pub async fn handle(&self, event: &ProviderEvent) -> SyncResult<SyncOutcome> {
        let result = match event {
            ProviderEvent::UserCreated {
                provider_user_id,
                attributes,
            } => self.handle_created(provider_user_id, attributes).await,
            ProviderEvent::UserUpdated {
                provider_user_id,
                attributes,
            } => self.handle_updated(provider_user_id, attributes).await,
            ProviderEvent::UserDeleted { provider_user_id } => self.handle_deleted(provider_user_id).await,
            ProviderEvent::Unhandled {
                event_type,
                object_id,
            } => Ok(self.handle_unhandled(event_type, object_id.as_deref())),
        };

        if let Err(err) = &result {
            let event_kind = event.kind().as_str();
            let provider_user_id = event.provider_user_id().unwrap_or("-");

            if err.is_client_error() {
                tracing::warn!(
                    event_kind,
                    provider_user_id,
                    error_kind = err.kind(),
                    error = %err,
                    "Rejected provider event"
                );
            } else {
                tracing::error!(
                    event_kind,
                    provider_user_id,
                    error_kind = err.kind(),
                    error = %err,
                    "Failed to apply provider event"
                );
            }
        }

        result
    }

    fn handle_unhandled(&self, event_type: &str, object_id: Option<&str>) -> SyncOutcome {
        tracing::info!(
            event_type,
            object_id = object_id.unwrap_or("-"),
            "Ignoring unhandled provider event"
        );

        SyncOutcome::Ignored {
            event_type: event_type.to_string(),
        }
    }

    /// Writes the local id into the provider's public metadata.
    ///
    /// Never fails: a failed write is reported in the returned value and
    /// logged, and the local mutation stands.
    pub(crate) async fn write_back(&self, user: &LocalUserRecord) -> WriteBack {
        let patch = ProviderMetadataPatch::for_record(user);

        match self.provider.update_public_metadata(&patch).await {
            Ok(()) => {
                tracing::debug!(
                    provider = self.provider.name(),
                    provider_user_id = %user.provider_user_id,
                    local_user_id = %user.id,
                    "Wrote local user id to provider metadata"
                );
                WriteBack::Written
            }
            Err(err) => {
                tracing::error!(
                    provider = self.provider.name(),
                    provider_user_id = %user.provider_user_id,
                    local_user_id = %user.id,
                    error_kind = err.kind(),
                    error = %err,
                    "Metadata write-back failed; local record kept"
                );
                WriteBack::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService")
            .field("provider", &self.provider.name())
            .field("policy", &self.policy)
            .finish()
    }
}
