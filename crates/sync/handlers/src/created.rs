//! `user.created` handler.

use usersync_core::{NewUser, SyncError, SyncResult};
use usersync_webhooks::UserAttributes;

use crate::outcome::{SyncOutcome, WriteBack};
use crate::service::SyncService;

impl SyncService {
    pub(crate) async fn handle_created(
        &self,
        provider_user_id: &str,
        attributes: &UserAttributes,
    ) -> SyncResult<SyncOutcome> {
        let new_user = new_user_from(provider_user_id, attributes)?;

        match self.store.create_user(&new_user).await {
            Ok(user) => {
                let write_back = self.write_back(&user).await;

                tracing::info!(
                    event_kind = "user_created",
                    provider_user_id,
                    local_user_id = %user.id,
                    outcome = "created",
                    write_back = write_back.label(),
                    "Created local user"
                );

                Ok(SyncOutcome::Created { user, write_back })
            }
            Err(err) if err.is_duplicate_of("provider_user_id") => self.acknowledge_duplicate(provider_user_id).await,
            Err(err) => Err(err),
        }
    }

    /// A redelivered create. Re-issues the write-back so a write that
    /// failed on the first delivery is repaired by the retry.
    async fn acknowledge_duplicate(&self, provider_user_id: &str) -> SyncResult<SyncOutcome> {
        let existing = self.store.find_by_provider_id(provider_user_id).await?;

        let write_back = match &existing {
            Some(user) => self.write_back(user).await,
            None => WriteBack::NotAttempted,
        };

        tracing::info!(
            event_kind = "user_created",
            provider_user_id,
            local_user_id = existing.as_ref().map(|u| u.id.as_str()).unwrap_or("-"),
            outcome = "already_exists",
            write_back = write_back.label(),
            "User already exists locally"
        );

        Ok(SyncOutcome::AlreadyExists {
            user: existing,
            write_back,
        })
    }
}

/// Builds the creation record, enforcing the mandatory fields.
///
/// Optional name and avatar fields are coalesced to empty strings here,
/// at the boundary of the local schema.
pub(crate) fn new_user_from(provider_user_id: &str, attributes: &UserAttributes) -> SyncResult<NewUser> {
    let email = required(&attributes.email, "email")?;
    let username = required(&attributes.username, "username")?;

    Ok(NewUser {
        provider_user_id: provider_user_id.to_string(),
        email,
        username,
        first_name: attributes.first_name.clone().unwrap_or_default(),
        last_name: attributes.last_name.clone().unwrap_or_default(),
        photo_url: attributes.image_url.clone().unwrap_or_default(),
    })
}

fn required(value: &Option<String>, field: &str) -> SyncResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SyncError::missing_field(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> UserAttributes {
        UserAttributes {
            email: Some("ada@example.com".to_string()),
            username: Some("ada".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_optional_fields_coalesce_to_empty() {
        let user = new_user_from("user_1", &attributes()).unwrap();
        assert_eq!(user.provider_user_id, "user_1");
        assert_eq!(user.first_name, "");
        assert_eq!(user.last_name, "");
        assert_eq!(user.photo_url, "");
    }

    #[test]
    fn test_missing_username_is_rejected() {
        let mut attrs = attributes();
        attrs.username = None;

        let err = new_user_from("user_1", &attrs).unwrap_err();
        assert!(matches!(err, SyncError::MissingField { ref field } if field == "username"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_blank_email_is_rejected() {
        let mut attrs = attributes();
        attrs.email = Some("   ".to_string());

        let err = new_user_from("user_1", &attrs).unwrap_err();
        assert!(matches!(err, SyncError::MissingField { ref field } if field == "email"));
    }
}
