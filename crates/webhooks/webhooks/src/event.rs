//! Provider event decoding.
//!
//! Turns a verified webhook body into a [`ProviderEvent`]. Unknown event
//! types decode to [`ProviderEvent::Unhandled`] instead of failing, since
//! the provider adds event types without notice.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{WebhookError, WebhookResult};

/// The kind of a provider event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UserCreated,
    UserUpdated,
    UserDeleted,
    Unhandled,
}

impl EventKind {
    /// Maps a provider event type string to a kind.
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            "user.created" => EventKind::UserCreated,
            "user.updated" => EventKind::UserUpdated,
            "user.deleted" => EventKind::UserDeleted,
            _ => EventKind::Unhandled,
        }
    }

    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::UserCreated => "user_created",
            EventKind::UserUpdated => "user_updated",
            EventKind::UserDeleted => "user_deleted",
            EventKind::Unhandled => "unhandled",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional profile fields carried by user events.
///
/// `None` means the field was absent or `null` in the payload;
/// `Some("")` means it was present and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttributes {
    /// Primary email address.
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Avatar URL.
    pub image_url: Option<String>,
}

/// A decoded, verified webhook payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// A user was created on the provider.
    UserCreated {
        provider_user_id: String,
        attributes: UserAttributes,
    },
    /// A user's profile changed on the provider.
    UserUpdated {
        provider_user_id: String,
        attributes: UserAttributes,
    },
    /// A user was deleted on the provider.
    UserDeleted { provider_user_id: String },
    /// Any event type this system does not act on.
    Unhandled {
        event_type: String,
        /// `data.id` when present, for logging only.
        object_id: Option<String>,
    },
}

impl ProviderEvent {
    /// Returns the event kind.
    pub fn kind(&self) -> EventKind {
        match self {
            ProviderEvent::UserCreated { .. } => EventKind::UserCreated,
            ProviderEvent::UserUpdated { .. } => EventKind::UserUpdated,
            ProviderEvent::UserDeleted { .. } => EventKind::UserDeleted,
            ProviderEvent::Unhandled { .. } => EventKind::Unhandled,
        }
    }

    /// Returns the provider user id for user events.
    pub fn provider_user_id(&self) -> Option<&str> {
        match self {
            ProviderEvent::UserCreated { provider_user_id, .. }
            | ProviderEvent::UserUpdated { provider_user_id, .. }
            | ProviderEvent::UserDeleted { provider_user_id } => Some(provider_user_id),
            ProviderEvent::Unhandled { .. } => None,
        }
    }

    /// Returns the profile attributes for create and update events.
    pub fn attributes(&self) -> Option<&UserAttributes> {
        match self {
            ProviderEvent::UserCreated { attributes, .. }
            | ProviderEvent::UserUpdated { attributes, .. } => Some(attributes),
            _ => None,
        }
    }
}

/// Webhook envelope: `{ "type": ..., "data": { ... } }`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

/// User object as sent by the provider. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawUser {
    id: Option<String>,
    email_addresses: Option<Vec<RawEmailAddress>>,
    primary_email_address_id: Option<String>,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEmailAddress {
    id: Option<String>,
    email_address: String,
}

impl RawUser {
    fn require_id(&self) -> WebhookResult<String> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| WebhookError::MalformedEventPayload("data.id is required".to_string()))
    }

    /// Picks the primary address, falling back to the first one listed.
    fn primary_email(&self) -> Option<String> {
        let addresses = self.email_addresses.as_ref()?;

        let primary = self.primary_email_address_id.as_deref().and_then(|primary_id| {
            addresses
                .iter()
                .find(|address| address.id.as_deref() == Some(primary_id))
        });

        primary
            .or_else(|| addresses.first())
            .map(|address| address.email_address.clone())
    }

    fn into_attributes(self) -> UserAttributes {
        UserAttributes {
            email: self.primary_email(),
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            image_url: self.image_url,
        }
    }
}

/// Decodes a verified webhook body into a typed event.
pub fn decode_event(body: &[u8]) -> WebhookResult<ProviderEvent> {
    let envelope: Envelope = serde_json::from_slice(body)?;

    match EventKind::from_type(&envelope.event_type) {
        EventKind::UserCreated => {
            let (provider_user_id, user) = decode_user(envelope)?;
            Ok(ProviderEvent::UserCreated {
                provider_user_id,
                attributes: user.into_attributes(),
            })
        }
        EventKind::UserUpdated => {
            let (provider_user_id, user) = decode_user(envelope)?;
            Ok(ProviderEvent::UserUpdated {
                provider_user_id,
                attributes: user.into_attributes(),
            })
        }
        EventKind::UserDeleted => {
            let (provider_user_id, _) = decode_user(envelope)?;
            Ok(ProviderEvent::UserDeleted { provider_user_id })
        }
        EventKind::Unhandled => {
            let object_id = envelope
                .data
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string);

            Ok(ProviderEvent::Unhandled {
                event_type: envelope.event_type,
                object_id,
            })
        }
    }
}

/// Parses `data` as a user object with a required id.
fn decode_user(envelope: Envelope) -> WebhookResult<(String, RawUser)> {
    let user: RawUser = serde_json::from_value(envelope.data).map_err(|e| {
        WebhookError::MalformedEventPayload(format!("invalid {} data: {}", envelope.event_type, e))
    })?;
    let provider_user_id = user.require_id()?;

    Ok((provider_user_id, user))
}
