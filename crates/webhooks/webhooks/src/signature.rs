//! HMAC signature generation and verification.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{WebhookError, WebhookResult};

type HmacSha256 = Hmac<Sha256>;

/// Prefix the provider puts in front of base64-encoded signing secrets.
const SECRET_PREFIX: &str = "whsec_";

/// Signature version for webhook payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureVersion {
    /// Version 1: HMAC-SHA256, base64 encoded
    #[default]
    V1,
}

impl SignatureVersion {
    /// The tag used in the signature header.
    pub fn tag(&self) -> &'static str {
        match self {
            SignatureVersion::V1 => "v1",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "v1" => Some(SignatureVersion::V1),
            _ => None,
        }
    }
}

/// Webhook signer for generating and verifying signatures.
///
/// The signed content is `{delivery_id}.{timestamp}.{payload}`, so a
/// signature cannot be replayed under another delivery id or timestamp.
#[derive(Clone)]
pub struct WebhookSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for WebhookSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl WebhookSigner {
    /// Creates a signer from a provider signing secret (`whsec_<base64>`).
    ///
    /// The `whsec_` prefix is optional; the remainder must be non-empty base64.
    pub fn from_secret(secret: &str) -> WebhookResult<Self> {
        let encoded = secret.trim();
        let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);

        if encoded.is_empty() {
            return Err(WebhookError::InvalidSecret("secret is empty".to_string()));
        }

        let key = STANDARD
            .decode(encoded)
            .map_err(|_| WebhookError::InvalidSecret("secret is not valid base64".to_string()))?;

        if key.is_empty() {
            return Err(WebhookError::InvalidSecret("secret decodes to no bytes".to_string()));
        }

        Ok(Self { key })
    }

    /// Creates a signer from raw key bytes.
    pub fn from_key(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Generates a base64 signature for the given delivery.
    pub fn sign(&self, delivery_id: &str, timestamp: i64, payload: &[u8]) -> String {
        STANDARD.encode(self.sign_v1(delivery_id, timestamp, payload))
    }

    /// Generates a full signature header value.
    pub fn sign_header(&self, delivery_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let signature = self.sign(delivery_id, timestamp, payload);
        format!("{},{}", SignatureVersion::V1.tag(), signature)
    }

    /// Verifies a signature header against the delivery.
    ///
    /// The header is a space-separated list of `<version>,<base64>` entries;
    /// verification succeeds if any supported entry matches. Unknown
    /// versions are skipped so the provider can roll out new schemes.
    pub fn verify(
        &self,
        header: &str,
        delivery_id: &str,
        timestamp: i64,
        payload: &[u8],
    ) -> WebhookResult<()> {
        let expected = self.sign_v1(delivery_id, timestamp, payload);

        let matched = parse_signature_header(header)
            .filter(|(version, _)| *version == SignatureVersion::V1)
            .filter_map(|(_, encoded)| STANDARD.decode(encoded).ok())
            .any(|candidate| constant_time_compare(&expected, &candidate));

        if matched {
            Ok(())
        } else {
            Err(WebhookError::SignatureMismatch)
        }
    }

    fn sign_v1(&self, delivery_id: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");

        // Sign: id.timestamp.payload
        mac.update(delivery_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        mac.finalize().into_bytes().to_vec()
    }
}

/// Parses a signature header into `(version, signature)` pairs, skipping
/// entries with an unknown version or no comma.
fn parse_signature_header(header: &str) -> impl Iterator<Item = (SignatureVersion, &str)> {
    header.split_whitespace().filter_map(|entry| {
        let (tag, signature) = entry.split_once(',')?;
        Some((SignatureVersion::from_tag(tag)?, signature))
    })
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> WebhookSigner {
        WebhookSigner::from_secret("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw").unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = signer();
        let payload = b"{\"type\":\"user.created\"}";
        let header = signer.sign_header("msg_1", 1234567890, payload);

        assert!(signer.verify(&header, "msg_1", 1234567890, payload).is_ok());

        // Wrong payload should fail
        assert!(matches!(
            signer.verify(&header, "msg_1", 1234567890, b"{}"),
            Err(WebhookError::SignatureMismatch)
        ));

        // Wrong timestamp should fail
        assert!(signer.verify(&header, "msg_1", 1234567891, payload).is_err());

        // Wrong delivery id should fail
        assert!(signer.verify(&header, "msg_2", 1234567890, payload).is_err());
    }

    #[test]
    fn test_sign_header_format() {
        let header = signer().sign_header("msg_1", 1234567890, b"payload");
        assert!(header.starts_with("v1,"));
        assert_eq!(STANDARD.decode(&header[3..]).unwrap().len(), 32);
    }

    #[test]
    fn test_any_matching_signature_is_accepted() {
        let signer = signer();
        let other = WebhookSigner::from_key(b"rotated-out-key".to_vec());
        let payload = b"payload";

        let header = format!(
            "{} v2,ignored {}",
            other.sign_header("msg_1", 10, payload),
            signer.sign_header("msg_1", 10, payload)
        );

        assert!(signer.verify(&header, "msg_1", 10, payload).is_ok());
    }

    #[test]
    fn test_unknown_versions_and_garbage_rejected() {
        let signer = signer();
        let signature = signer.sign("msg_1", 10, b"payload");

        for header in [
            format!("v2,{}", signature),
            signature.clone(),
            "v1,not-base64!!".to_string(),
            String::new(),
        ] {
            assert!(
                matches!(
                    signer.verify(&header, "msg_1", 10, b"payload"),
                    Err(WebhookError::SignatureMismatch)
                ),
                "header {:?} should not verify",
                header
            );
        }
    }

    #[test]
    fn test_secret_prefix_is_optional() {
        let with_prefix = WebhookSigner::from_secret("whsec_c2VjcmV0").unwrap();
        let without_prefix = WebhookSigner::from_secret("c2VjcmV0").unwrap();

        assert_eq!(
            with_prefix.sign("msg_1", 1, b"x"),
            without_prefix.sign("msg_1", 1, b"x")
        );
        assert_eq!(with_prefix.sign("msg_1", 1, b"x"), WebhookSigner::from_key(b"secret".to_vec()).sign("msg_1", 1, b"x"));
    }

    #[test]
    fn test_invalid_secrets() {
        assert!(matches!(
            WebhookSigner::from_secret(""),
            Err(WebhookError::InvalidSecret(_))
        ));
        assert!(matches!(
            WebhookSigner::from_secret("whsec_"),
            Err(WebhookError::InvalidSecret(_))
        ));
        assert!(matches!(
            WebhookSigner::from_secret("whsec_%%%"),
            Err(WebhookError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("MfKQ9r8"));
    }
}
