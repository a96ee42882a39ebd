//! Core data types for usersync.
//!
//! This module defines the application's own `LocalUserRecord` and the
//! shapes used to create and patch it, plus the metadata patch that links
//! a provider identity back to its local record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The application's durable user entity.
///
/// `provider_user_id` is the only stable join key between the identity
/// provider and the local store and is unique across all records. `id` is
/// assigned by the store on creation and never reassigned.
///
/// # Example
///
/// ```rust
/// use usersync_core::{LocalUserRecord, NewUser};
///
/// let new_user = NewUser {
///     provider_user_id: "user_2abc".to_string(),
///     email: "ada@example.com".to_string(),
///     username: "ada".to_string(),
///     ..Default::default()
/// };
/// let record = LocalUserRecord::from_new("local_1".to_string(), new_user);
/// assert_eq!(record.provider_user_id, "user_2abc");
/// assert!(record.first_name.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUserRecord {
    /// Local identifier assigned by the store
    pub id: String,

    /// Identifier issued by the identity provider
    pub provider_user_id: String,

    /// Primary email address
    pub email: String,

    /// Username, mandatory in the local schema
    pub username: String,

    /// First name, empty when the provider never sent one
    pub first_name: String,

    /// Last name, empty when the provider never sent one
    pub last_name: String,

    /// Avatar URL, empty when the provider never sent one
    pub photo_url: String,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl LocalUserRecord {
    /// Builds a fresh record from creation data and a store-assigned id.
    pub fn from_new(id: String, user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id,
            provider_user_id: user.provider_user_id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            photo_url: user.photo_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data required to create a local user record.
///
/// Every field is non-null; optional provider fields are coalesced to an
/// empty string before a `NewUser` is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub provider_user_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: String,
}

/// A partial update of a local user record.
///
/// `None` means "leave the stored value untouched"; it never means "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl UserPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.photo_url.is_none()
    }

    /// Names of the fields carried by this patch, for logging.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.email.is_some() {
            names.push("email");
        }
        if self.username.is_some() {
            names.push("username");
        }
        if self.first_name.is_some() {
            names.push("first_name");
        }
        if self.last_name.is_some() {
            names.push("last_name");
        }
        if self.photo_url.is_some() {
            names.push("photo_url");
        }
        names
    }

    /// Applies the present fields to a record in place.
    pub fn apply_to(&self, record: &mut LocalUserRecord) {
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(username) = &self.username {
            record.username = username.clone();
        }
        if let Some(first_name) = &self.first_name {
            record.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = last_name.clone();
        }
        if let Some(photo_url) = &self.photo_url {
            record.photo_url = photo_url.clone();
        }
        if !self.is_empty() {
            record.updated_at = Utc::now();
        }
    }
}

/// Public metadata stored on the provider side for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetadata {
    /// Local identifier of the user record
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// A one-way write back to the identity provider, linking a provider
/// identity to its local record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadataPatch {
    /// The provider user whose metadata is written
    pub provider_user_id: String,

    /// The metadata to store
    pub public_metadata: PublicMetadata,
}

impl ProviderMetadataPatch {
    /// Creates the patch linking `record` back to its provider identity.
    pub fn for_record(record: &LocalUserRecord) -> Self {
        Self {
            provider_user_id: record.provider_user_id.clone(),
            public_metadata: PublicMetadata {
                user_id: record.id.clone(),
            },
        }
    }
}
