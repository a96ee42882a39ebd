//! # Usersync Handlers
//!
//! Applies verified provider events to the local user store.
//!
//! One handler per event kind, dispatched by [`SyncService::handle`]:
//! - `user.created` creates the local record and writes the local id back
//!   into the provider's public metadata
//! - `user.updated` patches only the fields present in the payload
//! - `user.deleted` removes the record, succeeding when it is already gone
//! - anything else is acknowledged without touching the store
//!
//! Webhook delivery is at-least-once and unordered, so every handler is
//! idempotent: duplicate creates, deletes of absent users and updates that
//! race ahead of their create are all success-shaped outcomes.

mod created;
mod deleted;
mod outcome;
mod policy;
mod service;
mod updated;

pub use outcome::{SyncOutcome, WriteBack};
pub use policy::{DuplicateCreatePolicy, SyncPolicy, UpdateMissingPolicy};
pub use service::SyncService;
