//! # Usersync Core
//!
//! This crate provides the foundational types and traits for usersync.
//! It defines the local user record (`LocalUserRecord`) together with the
//! create/patch shapes used to mutate it, the error type shared by every
//! layer, and the trait interfaces that storage adapters and identity
//! provider clients must implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{SyncError, SyncResult};
pub use traits::{ProviderMetadataClient, UserStore};
pub use types::{LocalUserRecord, NewUser, ProviderMetadataPatch, PublicMetadata, UserPatch};
