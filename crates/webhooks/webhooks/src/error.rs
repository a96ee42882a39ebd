//! Webhook error types.

use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Error type for inbound webhook verification and decoding.
///
/// Request failures map to a 4xx status. `InvalidSecret` and
/// `InvalidTolerance` are setup faults and map to 500.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// One or more delivery headers are absent or empty.
    #[error("Missing signature headers")]
    MissingSignatureHeaders,

    /// Delivery headers are present but unparseable.
    #[error("Malformed signature headers: {0}")]
    MalformedSignatureHeaders(String),

    /// No signature in the header matches the payload.
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// The delivery timestamp is outside the accepted window.
    #[error("Timestamp out of range: {timestamp} is more than {tolerance_secs}s from {now}")]
    TimestampOutOfRange {
        timestamp: i64,
        now: i64,
        tolerance_secs: i64,
    },

    /// The verified body is not a valid event payload.
    #[error("Malformed event payload: {0}")]
    MalformedEventPayload(String),

    /// The configured signing secret cannot be used.
    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    /// The configured timestamp tolerance is not positive.
    #[error("Invalid timestamp tolerance: {0}s, must be positive")]
    InvalidTolerance(i64),
}

impl WebhookError {
    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SignatureMismatch | Self::TimestampOutOfRange { .. } => 401,
            Self::InvalidSecret(_) | Self::InvalidTolerance(_) => 500,
            _ => 400,
        }
    }

    /// Returns a stable, log-friendly name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingSignatureHeaders => "missing_signature_headers",
            Self::MalformedSignatureHeaders(_) => "malformed_signature_headers",
            Self::SignatureMismatch => "signature_mismatch",
            Self::TimestampOutOfRange { .. } => "timestamp_out_of_range",
            Self::MalformedEventPayload(_) => "malformed_event_payload",
            Self::InvalidSecret(_) => "invalid_secret",
            Self::InvalidTolerance(_) => "invalid_tolerance",
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::MalformedEventPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WebhookError::MissingSignatureHeaders.status_code(), 400);
        assert_eq!(WebhookError::SignatureMismatch.status_code(), 401);
        assert_eq!(
            WebhookError::TimestampOutOfRange {
                timestamp: 0,
                now: 1000,
                tolerance_secs: 300
            }
            .status_code(),
            401
        );
        assert_eq!(WebhookError::MalformedEventPayload("x".into()).status_code(), 400);
    }

    #[test]
    fn test_setup_errors_are_server_faults() {
        assert_eq!(WebhookError::InvalidSecret("empty".into()).status_code(), 500);
        assert_eq!(WebhookError::InvalidTolerance(0).status_code(), 500);
        assert_eq!(WebhookError::InvalidTolerance(-5).kind(), "invalid_tolerance");
    }
}
