//! Core traits for usersync.
//!
//! This module defines the two external collaborators the synchronization
//! handlers talk to: the local user store and the identity provider's
//! metadata API. Both are injected as trait objects so tests can swap in
//! in-memory fakes.

use async_trait::async_trait;

use crate::error::SyncResult;
use crate::types::{LocalUserRecord, NewUser, ProviderMetadataPatch, UserPatch};

/// Trait for local user stores (database backends).
///
/// Implementations are the transactional resource: handlers rely on the
/// store's unique-key enforcement instead of in-process locking.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user and assigns its local identifier.
    ///
    /// Returns `SyncError::DuplicateEntry` when a unique field (at least
    /// `provider_user_id`) is already taken.
    async fn create_user(&self, user: &NewUser) -> SyncResult<LocalUserRecord>;

    /// Applies a partial update to the user with the given provider id.
    ///
    /// Returns `SyncError::NotFound` when no such user exists.
    async fn update_user(&self, provider_user_id: &str, patch: &UserPatch) -> SyncResult<LocalUserRecord>;

    /// Deletes the user with the given provider id.
    ///
    /// Deleting an absent user is not an error; `Ok(None)` is returned.
    async fn delete_user(&self, provider_user_id: &str) -> SyncResult<Option<LocalUserRecord>>;

    /// Gets a user by provider id.
    async fn find_by_provider_id(&self, provider_user_id: &str) -> SyncResult<Option<LocalUserRecord>>;

    /// Counts total users.
    async fn count_users(&self) -> SyncResult<usize> {
        Ok(0)
    }
}

/// Trait for writing local identity back into the provider's metadata store.
#[async_trait]
pub trait ProviderMetadataClient: Send + Sync {
    /// Returns the provider name (e.g., "clerk").
    fn name(&self) -> &str;

    /// Stores `patch.public_metadata` on the provider user.
    async fn update_public_metadata(&self, patch: &ProviderMetadataPatch) -> SyncResult<()>;
}
