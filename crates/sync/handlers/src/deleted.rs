//! `user.deleted` handler.

use usersync_core::SyncResult;

use crate::outcome::SyncOutcome;
use crate::service::SyncService;

impl SyncService {
    pub(crate) async fn handle_deleted(&self, provider_user_id: &str) -> SyncResult<SyncOutcome> {
        match self.store.delete_user(provider_user_id).await? {
            Some(user) => {
                tracing::info!(
                    event_kind = "user_deleted",
                    provider_user_id,
                    local_user_id = %user.id,
                    outcome = "deleted",
                    "Deleted local user"
                );
                Ok(SyncOutcome::Deleted { user })
            }
            None => {
                tracing::info!(
                    event_kind = "user_deleted",
                    provider_user_id,
                    outcome = "already_absent",
                    "User already absent locally"
                );
                Ok(SyncOutcome::AlreadyAbsent {
                    provider_user_id: provider_user_id.to_string(),
                })
            }
        }
    }
}
