//! # Usersync Clerk Provider
//!
//! Writes the local user id back into a Clerk user's public metadata, so
//! downstream consumers of the identity token can resolve the local record
//! without a lookup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use usersync_provider_clerk::{ClerkClient, ClerkConfig};
//!
//! let client = ClerkClient::new(ClerkConfig::new(secret_key))?;
//! let service = SyncService::new(store, Arc::new(client), SyncPolicy::default());
//! ```

mod client;
mod config;

pub use client::ClerkClient;
pub use config::{ClerkConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
