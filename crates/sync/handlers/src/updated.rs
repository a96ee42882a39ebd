//! `user.updated` handler.

use usersync_core::{SyncError, SyncResult, UserPatch};
use usersync_webhooks::UserAttributes;

use crate::created::new_user_from;
use crate::outcome::SyncOutcome;
use crate::policy::UpdateMissingPolicy;
use crate::service::SyncService;

impl SyncService {
    pub(crate) async fn handle_updated(
        &self,
        provider_user_id: &str,
        attributes: &UserAttributes,
    ) -> SyncResult<SyncOutcome> {
        let patch = patch_from(attributes);

        match self.store.update_user(provider_user_id, &patch).await {
            Ok(user) => {
                tracing::info!(
                    event_kind = "user_updated",
                    provider_user_id,
                    local_user_id = %user.id,
                    fields = ?patch.field_names(),
                    outcome = "updated",
                    "Updated local user"
                );
                Ok(SyncOutcome::Updated { user })
            }
            Err(SyncError::NotFound { .. }) => self.handle_update_missing(provider_user_id, attributes, &patch).await,
            Err(err) => Err(err),
        }
    }

    /// The update arrived before its create, or after a delete.
    async fn handle_update_missing(
        &self,
        provider_user_id: &str,
        attributes: &UserAttributes,
        patch: &UserPatch,
    ) -> SyncResult<SyncOutcome> {
        if self.policy.update_missing == UpdateMissingPolicy::Upsert {
            if new_user_from(provider_user_id, attributes).is_ok() {
                return match self.handle_created(provider_user_id, attributes).await? {
                    // The create raced in between; apply the update on top of it.
                    SyncOutcome::AlreadyExists { .. } => {
                        let user = self.store.update_user(provider_user_id, patch).await?;
                        Ok(SyncOutcome::Updated { user })
                    }
                    outcome => Ok(outcome),
                };
            }
        }

        tracing::warn!(
            event_kind = "user_updated",
            provider_user_id,
            outcome = "update_skipped",
            "Update for a user with no local record"
        );

        Ok(SyncOutcome::UpdateSkipped {
            provider_user_id: provider_user_id.to_string(),
        })
    }
}

/// Builds a patch from the attributes the payload carries.
///
/// A blank email or username is left out of the patch: the local schema
/// requires both, so an empty value means "unknown" rather than "clear".
pub(crate) fn patch_from(attributes: &UserAttributes) -> UserPatch {
    UserPatch {
        email: non_blank(&attributes.email),
        username: non_blank(&attributes.username),
        first_name: attributes.first_name.clone(),
        last_name: attributes.last_name.clone(),
        photo_url: attributes.image_url.clone(),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
