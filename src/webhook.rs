//! Webhook signature verification.
//!
//! BuyCoins signs each webhook delivery with an HMAC of the raw request body,
//! keyed by the webhook token issued in the dashboard, and sends it in the
//! `X-Webhook-Signature` header. The documented scheme is hex-encoded
//! HMAC-SHA1; the algorithm and encoding are configurable in case the
//! provider moves to a stronger digest.
//!
//! ```ignore
//! let verifier = WebhookVerifier::new(webhook_token);
//! if verifier.verify(&body, signature_header) {
//!     // trusted delivery
//! }
//! ```

use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::config::DEFAULT_WEBHOOK_HEADER;
use crate::error::WebhookError;

/// Keyed hash used to sign webhook bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    /// HMAC-SHA1, the scheme BuyCoins documents.
    #[default]
    HmacSha1,
    HmacSha256,
    HmacSha512,
}

impl SignatureAlgorithm {
    /// Optional `<name>=` prefix some senders put in front of the digest.
    fn header_prefix(&self) -> &'static str {
        match self {
            Self::HmacSha1 => "sha1=",
            Self::HmacSha256 => "sha256=",
            Self::HmacSha512 => "sha512=",
        }
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HmacSha1 => write!(f, "HMAC-SHA1"),
            Self::HmacSha256 => write!(f, "HMAC-SHA256"),
            Self::HmacSha512 => write!(f, "HMAC-SHA512"),
        }
    }
}

/// Text encoding of the digest in the signature header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    #[default]
    Hex,
    Base64,
}

/// Verifies that webhook deliveries were signed with the shared secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
    algorithm: SignatureAlgorithm,
    encoding: SignatureEncoding,
    header: String,
}

impl WebhookVerifier {
    /// Verifier for the default scheme (hex HMAC-SHA1 in `X-Webhook-Signature`).
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            algorithm: SignatureAlgorithm::default(),
            encoding: SignatureEncoding::default(),
            header: DEFAULT_WEBHOOK_HEADER.to_string(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_encoding(mut self, encoding: SignatureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn encoding(&self) -> SignatureEncoding {
        self.encoding
    }

    pub fn header_name(&self) -> &str {
        &self.header
    }

    fn digest(&self, body: &[u8]) -> Vec<u8> {
        match self.algorithm {
            SignatureAlgorithm::HmacSha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(body);
                mac.finalize().into_bytes().to_vec()
            }
            SignatureAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(body);
                mac.finalize().into_bytes().to_vec()
            }
            SignatureAlgorithm::HmacSha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(body);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// Compute the header value the exchange would send for `body`.
    pub fn sign(&self, body: impl AsRef<[u8]>) -> String {
        let digest = self.digest(body.as_ref());
        match self.encoding {
            SignatureEncoding::Hex => hex::encode(digest),
            SignatureEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(digest),
        }
    }

    fn decode_signature(&self, signature: &str) -> Option<Vec<u8>> {
        let trimmed = signature.trim();
        let raw = trimmed
            .strip_prefix(self.algorithm.header_prefix())
            .unwrap_or(trimmed);
        match self.encoding {
            SignatureEncoding::Hex => hex::decode(raw).ok(),
            SignatureEncoding::Base64 => base64::engine::general_purpose::STANDARD.decode(raw).ok(),
        }
    }

    /// True only if `signature` is the HMAC of `body` under the shared secret.
    ///
    /// Digests are compared in constant time.
    pub fn verify(&self, body: impl AsRef<[u8]>, signature: &str) -> bool {
        let Some(supplied) = self.decode_signature(signature) else {
            log::debug!("webhook signature is not valid {:?}", self.encoding);
            return false;
        };
        let expected = self.digest(body.as_ref());
        expected.as_slice().ct_eq(supplied.as_slice()).into()
    }

    /// Look up the signature header and verify `body` against it.
    pub fn verify_headers(&self, headers: &HeaderMap, body: impl AsRef<[u8]>) -> Result<(), WebhookError> {
        let value = headers
            .get(self.header.as_str())
            .ok_or_else(|| WebhookError::MissingSignature(self.header.clone()))?;
        let signature = value.to_str().map_err(|_| WebhookError::MalformedHeader)?;
        if self.verify(body, signature) {
            Ok(())
        } else {
            log::warn!("rejected webhook delivery: {} mismatch", self.algorithm);
            Err(WebhookError::InvalidSignature)
        }
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("encoding", &self.encoding)
            .field("header", &self.header)
            .finish()
    }
}

/// Verify a delivery with the default scheme (hex HMAC-SHA1).
pub fn verify(body: impl AsRef<[u8]>, shared_secret: &str, signature: &str) -> bool {
    WebhookVerifier::new(shared_secret).verify(body, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    // RFC 2202 test case 2.
    const RFC2202_KEY: &str = "Jefe";
    const RFC2202_DATA: &[u8] = b"what do ya want for nothing?";
    const RFC2202_SHA1: &str = "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79";

    #[test]
    fn test_known_sha1_vector() {
        let verifier = WebhookVerifier::new(RFC2202_KEY);
        assert_eq!(verifier.sign(RFC2202_DATA), RFC2202_SHA1);
        assert!(verify(RFC2202_DATA, RFC2202_KEY, RFC2202_SHA1));
    }

    #[test]
    fn test_uppercase_hex_and_prefix_accepted() {
        assert!(verify(RFC2202_DATA, RFC2202_KEY, &RFC2202_SHA1.to_uppercase()));
        assert!(verify(RFC2202_DATA, RFC2202_KEY, &format!("sha1={}", RFC2202_SHA1)));
    }

    #[test]
    fn test_body_mutation_rejected() {
        let body = br#"{"event":"coins.incoming","data":{"amount":"0.01"}}"#.to_vec();
        let sig = WebhookVerifier::new("token").sign(&body);
        assert!(verify(&body, "token", &sig));

        for i in 0..body.len() {
            let mut mutated = body.clone();
            mutated[i] ^= 0x01;
            assert!(!verify(&mutated, "token", &sig), "mutation at byte {} accepted", i);
        }
    }

    #[test]
    fn test_secret_mutation_rejected() {
        let body = b"payload";
        let sig = WebhookVerifier::new("token").sign(body);
        assert!(!verify(body, "tokem", &sig));
        assert!(!verify(body, "token ", &sig));
        assert!(!verify(body, "", &sig));
    }

    #[test]
    fn test_garbage_signature_rejected() {
        assert!(!verify(b"payload", "token", "not-hex"));
        assert!(!verify(b"payload", "token", ""));
        // Valid hex, wrong length.
        assert!(!verify(b"payload", "token", "abcd"));
    }

    #[test]
    fn test_sha256_base64() {
        let verifier = WebhookVerifier::new("token")
            .with_algorithm(SignatureAlgorithm::HmacSha256)
            .with_encoding(SignatureEncoding::Base64);
        let sig = verifier.sign(b"payload");
        assert_eq!(
            base64::engine::general_purpose::STANDARD.decode(&sig).unwrap().len(),
            32
        );
        assert!(verifier.verify(b"payload", &sig));
        // A SHA-1 verifier must not accept the SHA-256 signature.
        assert!(!WebhookVerifier::new("token")
            .with_encoding(SignatureEncoding::Base64)
            .verify(b"payload", &sig));
    }

    #[test]
    fn test_sha512_hex_length() {
        let verifier = WebhookVerifier::new("token").with_algorithm(SignatureAlgorithm::HmacSha512);
        assert_eq!(verifier.sign(b"payload").len(), 128);
    }

    #[test]
    fn test_verify_headers() {
        let verifier = WebhookVerifier::new("token");
        let body = b"{\"hello\":\"world\"}";

        let mut headers = HeaderMap::new();
        assert_eq!(
            verifier.verify_headers(&headers, body),
            Err(WebhookError::MissingSignature("X-Webhook-Signature".into()))
        );

        headers.insert(
            "x-webhook-signature",
            HeaderValue::from_str(&verifier.sign(body)).unwrap(),
        );
        assert!(verifier.verify_headers(&headers, body).is_ok());
        assert_eq!(
            verifier.verify_headers(&headers, b"tampered"),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let dbg = format!("{:?}", WebhookVerifier::new("super-secret-token"));
        assert!(!dbg.contains("super-secret-token"));
    }
}
