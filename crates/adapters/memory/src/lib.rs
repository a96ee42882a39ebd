//! # Usersync Memory Adapter
//!
//! An in-memory user store and provider metadata client, primarily
//! intended for testing and development purposes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use usersync_adapter_memory::{MemoryMetadataClient, MemoryUserStore};
//!
//! let store = Arc::new(MemoryUserStore::new());
//! let provider = Arc::new(MemoryMetadataClient::new());
//! let service = SyncService::new(store, provider, SyncPolicy::default());
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use usersync_core::error::{SyncError, SyncResult};
use usersync_core::traits::{ProviderMetadataClient, UserStore};
use usersync_core::types::{LocalUserRecord, NewUser, ProviderMetadataPatch, PublicMetadata, UserPatch};

/// In-memory storage keyed by provider user id.
type Store<T> = Arc<RwLock<HashMap<String, T>>>;

/// In-memory user store.
///
/// Enforces uniqueness of `provider_user_id`, `email` and `username` the
/// way a relational schema with unique indexes would. Data is lost when
/// the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Store<LocalUserRecord>,
    unavailable: Arc<RwLock<bool>>,
}

impl MemoryUserStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with a database error.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Returns the number of users stored.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Inserts a record as-is, bypassing id assignment. Useful for seeding.
    pub async fn insert(&self, record: LocalUserRecord) {
        self.users
            .write()
            .await
            .insert(record.provider_user_id.clone(), record);
    }

    async fn check_available(&self) -> SyncResult<()> {
        if *self.unavailable.read().await {
            return Err(SyncError::database("memory store is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: &NewUser) -> SyncResult<LocalUserRecord> {
        self.check_available().await?;
        let mut users = self.users.write().await;

        if users.contains_key(&user.provider_user_id) {
            return Err(SyncError::duplicate(
                "user",
                "provider_user_id",
                &user.provider_user_id,
            ));
        }

        if users.values().any(|u| u.email == user.email) {
            return Err(SyncError::duplicate("user", "email", &user.email));
        }

        if users.values().any(|u| u.username == user.username) {
            return Err(SyncError::duplicate("user", "username", &user.username));
        }

        let record = LocalUserRecord::from_new(uuid::Uuid::new_v4().to_string(), user.clone());
        users.insert(record.provider_user_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_user(&self, provider_user_id: &str, patch: &UserPatch) -> SyncResult<LocalUserRecord> {
        self.check_available().await?;
        let mut users = self.users.write().await;

        if !users.contains_key(provider_user_id) {
            return Err(SyncError::not_found("user", "provider_user_id", provider_user_id));
        }

        if let Some(email) = &patch.email {
            if users
                .values()
                .any(|u| u.provider_user_id != provider_user_id && &u.email == email)
            {
                return Err(SyncError::duplicate("user", "email", email));
            }
        }

        if let Some(username) = &patch.username {
            if users
                .values()
                .any(|u| u.provider_user_id != provider_user_id && &u.username == username)
            {
                return Err(SyncError::duplicate("user", "username", username));
            }
        }

        match users.get_mut(provider_user_id) {
            Some(user) => {
                patch.apply_to(user);
                Ok(user.clone())
            }
            None => Err(SyncError::not_found("user", "provider_user_id", provider_user_id)),
        }
    }

    async fn delete_user(&self, provider_user_id: &str) -> SyncResult<Option<LocalUserRecord>> {
        self.check_available().await?;
        let mut users = self.users.write().await;
        Ok(users.remove(provider_user_id))
    }

    async fn find_by_provider_id(&self, provider_user_id: &str) -> SyncResult<Option<LocalUserRecord>> {
        self.check_available().await?;
        let users = self.users.read().await;
        Ok(users.get(provider_user_id).cloned())
    }

    async fn count_users(&self) -> SyncResult<usize> {
        self.check_available().await?;
        Ok(self.users.read().await.len())
    }
}

/// In-memory stand-in for the identity provider's metadata API.
///
/// Records every successful write and can be told to fail, which is how
/// write-back failures are exercised in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataClient {
    metadata: Store<PublicMetadata>,
    failing: Arc<RwLock<bool>>,
    attempts: Arc<RwLock<usize>>,
}

impl MemoryMetadataClient {
    /// Creates a new client that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new client that rejects every write.
    pub fn failing() -> Self {
        Self {
            failing: Arc::new(RwLock::new(true)),
            ..Self::default()
        }
    }

    /// Toggles failure injection.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Returns the metadata stored for a provider user.
    pub async fn metadata_for(&self, provider_user_id: &str) -> Option<PublicMetadata> {
        self.metadata.read().await.get(provider_user_id).cloned()
    }

    /// Returns how many writes were attempted, successful or not.
    pub async fn attempts(&self) -> usize {
        *self.attempts.read().await
    }
}

#[async_trait]
impl ProviderMetadataClient for MemoryMetadataClient {
    fn name(&self) -> &str {
        "memory"
    }

    async fn update_public_metadata(&self, patch: &ProviderMetadataPatch) -> SyncResult<()> {
        *self.attempts.write().await += 1;

        if *self.failing.read().await {
            return Err(SyncError::provider(Some(503), "metadata API unavailable"));
        }

        self.metadata
            .write()
            .await
            .insert(patch.provider_user_id.clone(), patch.public_metadata.clone());
        Ok(())
    }
}
