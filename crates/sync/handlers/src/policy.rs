//! Policies for the races at-least-once delivery produces.

use serde::{Deserialize, Serialize};

/// What to answer when `user.created` arrives for a user that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateCreatePolicy {
    /// Answer 200, the redelivery is expected.
    #[default]
    Acknowledge,
    /// Answer 409 so the duplicate is visible on the provider's dashboard.
    Conflict,
}

/// What to do when `user.updated` arrives for a user that does not exist locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMissingPolicy {
    /// Log a warning and answer 200 without mutating anything.
    #[default]
    Acknowledge,
    /// Create the record from the update when it carries an email and a
    /// username; otherwise behave like `Acknowledge`.
    Upsert,
}

/// Policy knobs for [`SyncService`](crate::SyncService).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncPolicy {
    pub duplicate_create: DuplicateCreatePolicy,
    pub update_missing: UpdateMissingPolicy,
}

impl SyncPolicy {
    /// Sets the duplicate create policy.
    pub fn with_duplicate_create(mut self, policy: DuplicateCreatePolicy) -> Self {
        self.duplicate_create = policy;
        self
    }

    /// Sets the update-before-create policy.
    pub fn with_update_missing(mut self, policy: UpdateMissingPolicy) -> Self {
        self.update_missing = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_acknowledge() {
        let policy = SyncPolicy::default();
        assert_eq!(policy.duplicate_create, DuplicateCreatePolicy::Acknowledge);
        assert_eq!(policy.update_missing, UpdateMissingPolicy::Acknowledge);
    }
}
