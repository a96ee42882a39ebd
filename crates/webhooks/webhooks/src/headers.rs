//! Delivery headers sent by the provider with every webhook.

use crate::error::{WebhookError, WebhookResult};

/// Header carrying the unique delivery id.
pub const DELIVERY_ID_HEADER: &str = "svix-id";
/// Header carrying the delivery timestamp (unix seconds).
pub const DELIVERY_TIMESTAMP_HEADER: &str = "svix-timestamp";
/// Header carrying the delivery signature(s).
pub const DELIVERY_SIGNATURE_HEADER: &str = "svix-signature";

/// The three header values needed to authenticate a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryHeaders {
    /// Unique delivery id, stable across redeliveries of the same message.
    pub id: String,
    /// Raw timestamp header value.
    pub timestamp: String,
    /// Raw signature header value.
    pub signature: String,
}

impl DeliveryHeaders {
    /// Creates headers from already extracted values.
    pub fn new(id: impl Into<String>, timestamp: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            signature: signature.into(),
        }
    }

    /// Extracts the delivery headers through a header lookup function.
    ///
    /// All three must be present and non-blank; this check runs before any
    /// cryptographic work so malformed requests are rejected cheaply.
    pub fn from_lookup<'a, F>(lookup: F) -> WebhookResult<Self>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        match (
            get(DELIVERY_ID_HEADER),
            get(DELIVERY_TIMESTAMP_HEADER),
            get(DELIVERY_SIGNATURE_HEADER),
        ) {
            (Some(id), Some(timestamp), Some(signature)) => Ok(Self {
                id,
                timestamp,
                signature,
            }),
            _ => Err(WebhookError::MissingSignatureHeaders),
        }
    }

    /// Parses the timestamp header as unix seconds.
    pub fn timestamp_secs(&self) -> WebhookResult<i64> {
        self.timestamp.parse::<i64>().map_err(|_| {
            WebhookError::MalformedSignatureHeaders(format!(
                "{} is not an integer",
                DELIVERY_TIMESTAMP_HEADER
            ))
        })
    }
}
