//! Webhook receiver for verifying incoming webhooks.

use crate::error::{WebhookError, WebhookResult};
use crate::event::{decode_event, ProviderEvent};
use crate::headers::DeliveryHeaders;
use crate::signature::WebhookSigner;

/// Default tolerance for timestamp validation (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// How the delivery timestamp is checked against the local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Reject deliveries more than `tolerance_secs` in the past or future.
    Enforce { tolerance_secs: i64 },
    /// Accept any timestamp. The timestamp is still covered by the signature.
    Ignore,
}

impl Default for TimestampPolicy {
    fn default() -> Self {
        TimestampPolicy::Enforce {
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl TimestampPolicy {
    /// Checks a delivery timestamp against `now` (both unix seconds).
    ///
    /// The distance is computed without overflow, so any header value
    /// yields a result.
    pub fn check(&self, timestamp: i64, now: i64) -> WebhookResult<()> {
        match *self {
            TimestampPolicy::Enforce { tolerance_secs } => {
                if now.abs_diff(timestamp) > tolerance_secs.unsigned_abs() {
                    return Err(WebhookError::TimestampOutOfRange {
                        timestamp,
                        now,
                        tolerance_secs,
                    });
                }
                Ok(())
            }
            TimestampPolicy::Ignore => Ok(()),
        }
    }
}

/// Webhook receiver for verifying incoming webhooks.
///
/// Holds the signing secret shared with the provider; the secret never
/// leaves this struct and is redacted from its `Debug` output.
#[derive(Debug, Clone)]
pub struct WebhookReceiver {
    signer: WebhookSigner,
    timestamp_policy: TimestampPolicy,
}

impl WebhookReceiver {
    /// Creates a new webhook receiver with the default timestamp policy.
    pub fn new(secret: &str) -> WebhookResult<Self> {
        let signer = WebhookSigner::from_secret(secret)?;

        Ok(Self {
            signer,
            timestamp_policy: TimestampPolicy::default(),
        })
    }

    /// Sets the timestamp policy.
    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }

    /// Returns the active timestamp policy.
    pub fn timestamp_policy(&self) -> TimestampPolicy {
        self.timestamp_policy
    }

    /// Verifies a delivery and decodes its payload into a typed event.
    pub fn verify(&self, headers: &DeliveryHeaders, payload: &[u8]) -> WebhookResult<ProviderEvent> {
        self.verify_at(headers, payload, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) against an explicit clock.
    pub fn verify_at(&self, headers: &DeliveryHeaders, payload: &[u8], now: i64) -> WebhookResult<ProviderEvent> {
        self.verify_signature_at(headers, payload, now)?;
        decode_event(payload)
    }

    /// Authenticates a delivery without decoding it.
    fn verify_signature_at(&self, headers: &DeliveryHeaders, payload: &[u8], now: i64) -> WebhookResult<()> {
        let result = self.check(headers, payload, now);

        if let Err(err) = &result {
            tracing::warn!(
                delivery_id = %headers.id,
                failure = err.kind(),
                "Webhook verification failed"
            );
        }

        result
    }

    fn check(&self, headers: &DeliveryHeaders, payload: &[u8], now: i64) -> WebhookResult<()> {
        let timestamp = headers.timestamp_secs()?;

        // Check timestamp tolerance
        self.timestamp_policy.check(timestamp, now)?;

        // Verify signature
        self.signer.verify(&headers.signature, &headers.id, timestamp, payload)
    }
}

/// Builder for webhook receivers with custom configuration.
pub struct WebhookReceiverBuilder {
    secret: String,
    timestamp_policy: TimestampPolicy,
}

impl WebhookReceiverBuilder {
    /// Creates a new builder.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            timestamp_policy: TimestampPolicy::default(),
        }
    }

    /// Sets the timestamp tolerance and enables enforcement.
    ///
    /// The tolerance must be positive; [`build`](Self::build) rejects anything else.
    pub fn tolerance(mut self, secs: i64) -> Self {
        self.timestamp_policy = TimestampPolicy::Enforce {
            tolerance_secs: secs,
        };
        self
    }

    /// Disables the timestamp check.
    pub fn ignore_timestamp(mut self) -> Self {
        self.timestamp_policy = TimestampPolicy::Ignore;
        self
    }

    /// Builds the receiver.
    pub fn build(self) -> WebhookResult<WebhookReceiver> {
        if let TimestampPolicy::Enforce { tolerance_secs } = self.timestamp_policy {
            if tolerance_secs <= 0 {
                return Err(WebhookError::InvalidTolerance(tolerance_secs));
            }
        }

        Ok(WebhookReceiver::new(&self.secret)?.with_timestamp_policy(self.timestamp_policy))
    }
}
