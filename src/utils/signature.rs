//! Svix webhook signature verification.
//!
//! Svix signs `"{msg_id}.{timestamp}.{body}"` with HMAC-SHA256 and sends the
//! base64 digest in `svix-signature` as space-separated `v1,<sig>` entries.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("webhook secret is not valid base64")]
    InvalidSecret,
    #[error("timestamp header is not an integer")]
    InvalidTimestamp,
    #[error("message timestamp too old")]
    TimestampTooOld,
    #[error("message timestamp too new")]
    TimestampTooNew,
    #[error("no matching signature found")]
    NoMatchingSignature,
}

/// The three signature headers carried by every delivery.
#[derive(Debug, Clone)]
pub struct SvixHeaders {
    pub id: String,
    pub signature: String,
    pub timestamp: String,
}

#[derive(Clone)]
pub struct WebhookVerifier {
    key: Vec<u8>,
    tolerance_secs: i64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// Builds a verifier from a `whsec_`-prefixed (or bare) base64 secret.
    pub fn new(secret: &str, tolerance_secs: i64) -> Result<Self, SignatureError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded)
            .map_err(|_| SignatureError::InvalidSecret)?;
        if key.is_empty() {
            return Err(SignatureError::InvalidSecret);
        }

        Ok(Self { key, tolerance_secs })
    }

    pub fn verify(&self, headers: &SvixHeaders, payload: &[u8]) -> Result<(), SignatureError> {
        self.verify_at(headers, payload, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(
        &self,
        headers: &SvixHeaders,
        payload: &[u8],
        now: i64,
    ) -> Result<(), SignatureError> {
        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp)?;

        // The header is caller-controlled; a difference that overflows is out
        // of tolerance in the direction of the sign.
        match now.checked_sub(timestamp) {
            Some(age) if age > self.tolerance_secs => return Err(SignatureError::TimestampTooOld),
            Some(age) if age < -self.tolerance_secs => return Err(SignatureError::TimestampTooNew),
            Some(_) => {}
            None if timestamp < now => return Err(SignatureError::TimestampTooOld),
            None => return Err(SignatureError::TimestampTooNew),
        }

        let mac = self.mac_for(&headers.id, timestamp, payload);

        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
            .any(|candidate| mac.clone().verify_slice(&candidate).is_ok());

        if matched {
            Ok(())
        } else {
            Err(SignatureError::NoMatchingSignature)
        }
    }

    /// Produces a `v1,<base64>` signature entry for the given message.
    #[cfg(test)]
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let digest = self.mac_for(msg_id, timestamp, payload).finalize().into_bytes();
        format!("{},{}", SIGNATURE_VERSION, STANDARD.encode(digest))
    }

    fn mac_for(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }
}
