//! Terminal results of applying one event.

use usersync_core::LocalUserRecord;

use crate::policy::{DuplicateCreatePolicy, SyncPolicy};

static NOT_ATTEMPTED: WriteBack = WriteBack::NotAttempted;

/// Result of the metadata write-back to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBack {
    /// The provider now maps the user to its local id.
    Written,
    /// The write failed; the local mutation still stands.
    Failed { reason: String },
    /// No write-back applies to this outcome.
    NotAttempted,
}

impl WriteBack {
    /// Stable name used in logs and response bodies.
    pub fn label(&self) -> &'static str {
        match self {
            WriteBack::Written => "written",
            WriteBack::Failed { .. } => "failed",
            WriteBack::NotAttempted => "not_attempted",
        }
    }

    /// Returns true if the write-back was attempted and failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, WriteBack::Failed { .. })
    }
}

/// What a handler did with an event. Every variant is a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new local record was created.
    Created {
        user: LocalUserRecord,
        write_back: WriteBack,
    },
    /// The user already existed locally (redelivered create).
    AlreadyExists {
        user: Option<LocalUserRecord>,
        write_back: WriteBack,
    },
    /// The local record was patched.
    Updated { user: LocalUserRecord },
    /// The update targeted a user with no local record.
    UpdateSkipped { provider_user_id: String },
    /// The local record was removed.
    Deleted { user: LocalUserRecord },
    /// There was nothing to delete.
    AlreadyAbsent { provider_user_id: String },
    /// The event type is not acted on.
    Ignored { event_type: String },
}

impl SyncOutcome {
    /// Stable name used in logs and response bodies.
    pub fn label(&self) -> &'static str {
        match self {
            SyncOutcome::Created { .. } => "created",
            SyncOutcome::AlreadyExists { .. } => "already_exists",
            SyncOutcome::Updated { .. } => "updated",
            SyncOutcome::UpdateSkipped { .. } => "update_skipped",
            SyncOutcome::Deleted { .. } => "deleted",
            SyncOutcome::AlreadyAbsent { .. } => "already_absent",
            SyncOutcome::Ignored { .. } => "ignored",
        }
    }

    /// The local record the outcome refers to, if any.
    pub fn user(&self) -> Option<&LocalUserRecord> {
        match self {
            SyncOutcome::Created { user, .. }
            | SyncOutcome::Updated { user }
            | SyncOutcome::Deleted { user } => Some(user),
            SyncOutcome::AlreadyExists { user, .. } => user.as_ref(),
            _ => None,
        }
    }

    /// The write-back result for create outcomes.
    pub fn write_back(&self) -> &WriteBack {
        match self {
            SyncOutcome::Created { write_back, .. } | SyncOutcome::AlreadyExists { write_back, .. } => {
                write_back
            }
            _ => &NOT_ATTEMPTED,
        }
    }

    /// HTTP status to report to the provider.
    pub fn status_code(&self, policy: &SyncPolicy) -> u16 {
        match self {
            SyncOutcome::AlreadyExists { .. } if policy.duplicate_create == DuplicateCreatePolicy::Conflict => 409,
            _ => 200,
        }
    }
}
