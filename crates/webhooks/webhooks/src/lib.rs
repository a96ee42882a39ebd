//! # Usersync Webhooks
//!
//! Inbound side of the identity provider's webhook deliveries:
//! - Delivery header extraction (fail fast on missing headers)
//! - HMAC-SHA256 signature verification with an explicit timestamp policy
//! - Decoding of verified payloads into typed provider events
//!
//! ## Example
//!
//! ```rust,ignore
//! use usersync_webhooks::{DeliveryHeaders, WebhookReceiver};
//!
//! let receiver = WebhookReceiver::new(&secret)?;
//! let headers = DeliveryHeaders::from_lookup(|name| request_header(name))?;
//! let event = receiver.verify(&headers, &body)?;
//! ```

mod error;
mod event;
mod headers;
mod receiver;
mod signature;

pub use error::{WebhookError, WebhookResult};
pub use event::{decode_event, EventKind, ProviderEvent, UserAttributes};
pub use headers::{
    DeliveryHeaders, DELIVERY_ID_HEADER, DELIVERY_SIGNATURE_HEADER, DELIVERY_TIMESTAMP_HEADER,
};
pub use receiver::{TimestampPolicy, WebhookReceiver, WebhookReceiverBuilder, DEFAULT_TOLERANCE_SECS};
pub use signature::{SignatureVersion, WebhookSigner};
