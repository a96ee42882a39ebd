//! Error types for usersync.
//!
//! This module defines the `SyncError` enum which represents every failure
//! a synchronization handler, a storage adapter or a provider client can
//! report. Each variant maps to exactly one HTTP status so the webhook
//! endpoint never has to guess.

use thiserror::Error;

/// The main error type for usersync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    // ==================== Validation Errors ====================
    /// A required field is missing or empty.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A field value is invalid.
    #[error("Invalid field value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    // ==================== Storage Errors ====================
    /// A database operation failed.
    #[error("Database error: {message}")]
    DatabaseError { message: String },

    /// The requested record was not found.
    #[error("Record not found: {entity} with {key}={value}")]
    NotFound {
        entity: String,
        key: String,
        value: String,
    },

    /// A unique constraint was violated.
    #[error("Duplicate entry: {entity} with {field}={value} already exists")]
    DuplicateEntry {
        entity: String,
        field: String,
        value: String,
    },

    // ==================== Provider Errors ====================
    /// A call to the identity provider's API failed.
    #[error("Provider error: {message}")]
    ProviderError {
        status: Option<u16>,
        message: String,
    },

    // ==================== Configuration Errors ====================
    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl SyncError {
    /// Creates a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a new invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::DatabaseError {
            message: message.into(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a new duplicate entry error.
    pub fn duplicate(entity: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateEntry {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new provider error.
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ProviderError {
            status,
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Returns true if this duplicate entry error is a conflict on the given field.
    pub fn is_duplicate_of(&self, field_name: &str) -> bool {
        matches!(self, Self::DuplicateEntry { field, .. } if field == field_name)
    }

    /// Returns true if the request itself was at fault (vs a server-side fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidField { .. } | Self::DuplicateEntry { .. }
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingField { .. } | Self::InvalidField { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::DuplicateEntry { .. } => 409,
            Self::ProviderError { .. } => 502,
            _ => 500,
        }
    }

    /// Returns a stable, log-friendly name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::InvalidField { .. } => "invalid_field",
            Self::DatabaseError { .. } => "database_error",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateEntry { .. } => "duplicate_entry",
            Self::ProviderError { .. } => "provider_error",
            Self::ConfigurationError { .. } => "configuration_error",
        }
    }
}

/// A Result type alias using SyncError.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::missing_field("username");
        assert_eq!(err.to_string(), "Missing required field: username");

        let err = SyncError::provider(None, "connection refused");
        assert_eq!(err.to_string(), "Provider error: connection refused");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SyncError::missing_field("email").status_code(), 400);
        assert_eq!(SyncError::not_found("user", "provider_user_id", "u_1").status_code(), 404);
        assert_eq!(SyncError::duplicate("user", "email", "a@x.com").status_code(), 409);
        assert_eq!(SyncError::database("down").status_code(), 500);
        assert_eq!(SyncError::provider(None, "timeout").status_code(), 502);
    }

    #[test]
    fn test_duplicate_field_matching() {
        let err = SyncError::duplicate("user", "provider_user_id", "user_1");
        assert!(err.is_duplicate_of("provider_user_id"));
        assert!(!err.is_duplicate_of("email"));
        assert!(!SyncError::database("x").is_duplicate_of("provider_user_id"));
    }

    #[test]
    fn test_is_client_error() {
        assert!(SyncError::missing_field("username").is_client_error());
        assert!(!SyncError::database("test").is_client_error());
    }
}
