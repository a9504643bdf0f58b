//! Webhook signature verification and envelope unwrapping.
//!
//! The platform signs each delivery with `base64(HMAC-SHA256(secret, body))`
//! over the exact body bytes. Verification recomputes the digest and compares
//! it in constant time. The outcome is a [`Verification`] record; callers
//! branch on `success` only and treat `reason` as diagnostics.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::coercion::parse_external_id;
use super::ports::WebhookDelivery;

type HmacSha256 = Hmac<Sha256>;

/// Envelope keys checked, in priority order, after the top level.
pub const ENVELOPE_KEYS: [&str; 4] = ["order", "booking", "data", "resource"];

/// Shared secret used to sign platform webhooks.
///
/// The value is wiped from memory on drop and redacted from `Debug`.
#[derive(Clone)]
pub struct WebhookSecret(Zeroizing<String>);

impl WebhookSecret {
    /// Wrap a configured secret. Blank values count as "not configured".
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = Zeroizing::new(secret.into());
        (!secret.trim().is_empty()).then_some(Self(secret))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

/// Why a delivery failed verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationFailure {
    /// No shared secret is configured; a deployment problem, not an attack.
    #[error("secret not configured")]
    SecretNotConfigured,
    /// The signature header was absent or blank.
    #[error("missing signature")]
    MissingSignature,
    /// The signature did not match the recomputed digest.
    #[error("signature mismatch")]
    SignatureMismatch,
    /// The signature matched but the non-empty body is not JSON.
    #[error("invalid json: {message}")]
    InvalidJson { message: String },
}

/// Outcome of verifying one delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub success: bool,
    /// Body decoded as UTF-8, lossily.
    pub raw_body: String,
    /// Parsed body; `None` for an empty body or on failure.
    pub payload: Option<Value>,
    pub signature: Option<String>,
    pub computed_signature: Option<String>,
    pub topic: Option<String>,
    pub delivery_id: Option<String>,
    pub reason: Option<VerificationFailure>,
}

/// Verifies platform webhook deliveries against an explicit secret.
#[derive(Debug, Clone)]
pub struct WebhookAuthenticator {
    secret: Option<WebhookSecret>,
}

impl WebhookAuthenticator {
    /// Create an authenticator. `None` rejects every delivery.
    pub fn new(secret: Option<WebhookSecret>) -> Self {
        Self { secret }
    }

    /// Whether a secret is configured.
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Compute the base64 signature the platform would send for `body`.
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(body);
        Some(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Verify one delivery and parse its body.
    pub fn verify(&self, delivery: &WebhookDelivery) -> Verification {
        let mut verification = Verification {
            success: false,
            raw_body: String::from_utf8_lossy(&delivery.body).into_owned(),
            payload: None,
            signature: delivery.signature.clone(),
            computed_signature: None,
            topic: delivery.topic.clone(),
            delivery_id: delivery.delivery_id.clone(),
            reason: None,
        };

        let Some(computed) = self.sign(&delivery.body) else {
            verification.reason = Some(VerificationFailure::SecretNotConfigured);
            return verification;
        };
        verification.computed_signature = Some(computed.clone());

        let received = delivery
            .signature
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let Some(received) = received else {
            verification.reason = Some(VerificationFailure::MissingSignature);
            return verification;
        };
        if !bool::from(computed.as_bytes().ct_eq(received.as_bytes())) {
            verification.reason = Some(VerificationFailure::SignatureMismatch);
            return verification;
        }

        if verification.raw_body.trim().is_empty() {
            verification.success = true;
            return verification;
        }
        match serde_json::from_slice::<Value>(&delivery.body) {
            Ok(payload) => {
                verification.success = true;
                verification.payload = Some(payload);
            }
            Err(err) => {
                verification.reason = Some(VerificationFailure::InvalidJson {
                    message: err.to_string(),
                });
            }
        }
        verification
    }
}

/// Locate the entity record inside a webhook payload.
///
/// The top level wins when it carries a usable `id`; otherwise the first of
/// [`ENVELOPE_KEYS`] holding a non-array object with a usable `id`.
pub fn unwrap_envelope(payload: &Value) -> Option<&Value> {
    let nested = ENVELOPE_KEYS.iter().filter_map(|key| payload.get(*key));
    std::iter::once(payload)
        .chain(nested)
        .find(|candidate| candidate.is_object() && parse_external_id(candidate.get("id")).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommerceEntity;
    use rstest::{fixture, rstest};
    use serde_json::json;

    const SECRET: &str = "wc-secret";

    #[fixture]
    fn authenticator() -> WebhookAuthenticator {
        WebhookAuthenticator::new(WebhookSecret::new(SECRET))
    }

    fn delivery(body: &[u8], signature: Option<String>) -> WebhookDelivery {
        WebhookDelivery {
            entity: CommerceEntity::Order,
            body: body.to_vec(),
            signature,
            topic: Some("order.updated".to_owned()),
            delivery_id: Some("d-1".to_owned()),
        }
    }

    #[rstest]
    fn signs_like_the_platform(authenticator: WebhookAuthenticator) {
        assert_eq!(
            authenticator.sign(br#"{"id":1}"#).as_deref(),
            Some("xspNGMrVWxIcQDyrXfbm2UqRDdmgJAuEN8sLb9BkThg=")
        );
    }

    #[rstest]
    fn accepts_a_valid_signature(authenticator: WebhookAuthenticator) {
        let body = br#"{"id":1,"status":"processing"}"#;
        let verification = authenticator.verify(&delivery(body, authenticator.sign(body)));

        assert!(verification.success);
        assert_eq!(verification.reason, None);
        assert_eq!(verification.payload, Some(json!({"id": 1, "status": "processing"})));
        assert_eq!(verification.topic.as_deref(), Some("order.updated"));
        assert_eq!(verification.delivery_id.as_deref(), Some("d-1"));
    }

    #[rstest]
    fn flipping_any_body_byte_fails(authenticator: WebhookAuthenticator) {
        let body = br#"{"id":1}"#.to_vec();
        let signature = authenticator.sign(&body);
        for index in 0..body.len() {
            let mut tampered = body.clone();
            tampered[index] ^= 0x01;
            let verification = authenticator.verify(&delivery(&tampered, signature.clone()));
            assert!(!verification.success, "byte {index} flip must fail");
            assert_eq!(verification.reason, Some(VerificationFailure::SignatureMismatch));
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn missing_secret_always_fails(#[case] secret: Option<&str>) {
        let authenticator = WebhookAuthenticator::new(secret.and_then(WebhookSecret::new));
        let body = br#"{"id":1}"#;
        let forged = WebhookAuthenticator::new(WebhookSecret::new("")).sign(body);
        let verification = authenticator.verify(&delivery(body, forged));

        assert!(!verification.success);
        assert_eq!(verification.reason, Some(VerificationFailure::SecretNotConfigured));
        assert_eq!(verification.computed_signature, None);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    fn missing_signature_fails(authenticator: WebhookAuthenticator, #[case] signature: Option<String>) {
        let verification = authenticator.verify(&delivery(br#"{"id":1}"#, signature));
        assert_eq!(verification.reason, Some(VerificationFailure::MissingSignature));
    }

    #[rstest]
    fn signature_of_different_length_fails(authenticator: WebhookAuthenticator) {
        let verification = authenticator.verify(&delivery(br#"{"id":1}"#, Some("c2hvcnQ=".to_owned())));
        assert_eq!(verification.reason, Some(VerificationFailure::SignatureMismatch));
    }

    #[rstest]
    fn signed_empty_body_succeeds_without_payload(authenticator: WebhookAuthenticator) {
        let verification = authenticator.verify(&delivery(b"", authenticator.sign(b"")));
        assert!(verification.success);
        assert_eq!(verification.payload, None);
    }

    #[rstest]
    fn signed_non_json_body_reports_parse_error(authenticator: WebhookAuthenticator) {
        let body = b"webhook_id=12";
        let verification = authenticator.verify(&delivery(body, authenticator.sign(body)));
        assert!(!verification.success);
        assert!(matches!(
            verification.reason,
            Some(VerificationFailure::InvalidJson { .. })
        ));
        assert_eq!(verification.raw_body, "webhook_id=12");
    }

    #[rstest]
    fn secret_is_redacted_from_debug() {
        let secret = WebhookSecret::new(SECRET).expect("secret");
        assert!(!format!("{secret:?}").contains(SECRET));
    }

    #[rstest]
    #[case(json!({"id": 5, "order": {"id": 6}}), Some(json!({"id": 5, "order": {"id": 6}})))]
    #[case(json!({"order": {"id": 6}}), Some(json!({"id": 6})))]
    #[case(json!({"order": {"id": "x"}, "booking": {"id": "7"}}), Some(json!({"id": "7"})))]
    #[case(json!({"data": [{"id": 1}], "resource": {"id": 8}}), Some(json!({"id": 8})))]
    #[case(json!({"data": {"status": "paid"}}), None)]
    #[case(json!([{"id": 1}]), None)]
    fn unwraps_envelopes_in_priority_order(#[case] payload: Value, #[case] expected: Option<Value>) {
        assert_eq!(unwrap_envelope(&payload).cloned(), expected);
    }
}
