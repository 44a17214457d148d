//! Miniflux webhook signature verification.
//!
//! Miniflux signs every webhook body with HMAC-SHA256 keyed by the shared
//! webhook secret and sends the hex digest in `X-Miniflux-Signature`.
//! Reference: https://miniflux.app/docs/webhooks.html

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "X-Miniflux-Signature";

/// Verify a webhook signature against the raw request body.
///
/// Must be called on the bytes exactly as received, before any JSON parsing.
/// Malformed hex never matches.
///
/// # Arguments
///
/// * `secret` - The shared webhook secret
/// * `raw_body` - The request body as received
/// * `signature` - Hex digest from the signature header
///
/// # Returns
///
/// `true` only if `signature` is the lower-case hex HMAC-SHA256 of `raw_body`
/// under `secret`. Any other spelling, including upper-case hex or padding,
/// is a mismatch.
pub fn verify_signature(secret: &[u8], raw_body: &[u8], signature: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => {
            warn!("webhook_signature_invalid_key");
            return false;
        }
    };

    mac.update(raw_body);

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected_signature, signature);

    if !valid {
        warn!(
            body_length = raw_body.len(),
            expected_length = expected_signature.len(),
            actual_length = signature.len(),
            "webhook_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison; only the length check short-circuits.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Compute the hex signature Miniflux would send for `raw_body`.
#[cfg(test)]
pub(crate) fn sign(secret: &[u8], raw_body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(raw_body);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-webhook-secret";
    const BODY: &[u8] = br#"{"event_type":"save_entry","entry":{"id":1,"title":"T","url":"https://x.test"}}"#;

    #[test]
    fn test_verify_signature_valid() {
        let signature = sign(SECRET, BODY);
        assert_eq!(signature.len(), 64);
        assert!(verify_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn test_verify_signature_rejects_uppercase_hex() {
        let signature = sign(SECRET, BODY);
        assert!(signature.bytes().any(|b| b.is_ascii_alphabetic()));
        assert!(!verify_signature(SECRET, BODY, &signature.to_uppercase()));
    }

    #[test]
    fn test_verify_signature_rejects_padding() {
        let signature = sign(SECRET, BODY);
        assert!(!verify_signature(SECRET, BODY, &format!(" {signature}")));
        assert!(!verify_signature(SECRET, BODY, &format!("{signature}\n")));
    }

    #[test]
    fn test_verify_signature_empty_body() {
        let signature = sign(SECRET, b"");
        assert!(verify_signature(SECRET, b"", &signature));
        assert!(!verify_signature(SECRET, b" ", &signature));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let signature = sign(b"other-secret", BODY);
        assert!(!verify_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn test_verify_signature_body_bit_flip() {
        let signature = sign(SECRET, BODY);
        for i in 0..BODY.len() {
            for bit in 0..8 {
                let mut mutated = BODY.to_vec();
                mutated[i] ^= 1 << bit;
                assert!(
                    !verify_signature(SECRET, &mutated, &signature),
                    "byte {i} bit {bit} still verified"
                );
            }
        }
    }

    #[test]
    fn test_verify_signature_signature_bit_flip() {
        for (secret, body) in [(SECRET, BODY), (&b"k"[..], &b"payload"[..])] {
            let signature = sign(secret, body);
            for i in 0..signature.len() {
                for bit in 0..8 {
                    let mut mutated = signature.clone().into_bytes();
                    mutated[i] ^= 1 << bit;
                    // Bit 7 leaves ASCII and becomes U+FFFD here
                    let mutated = String::from_utf8_lossy(&mutated).into_owned();
                    assert!(
                        !verify_signature(secret, body, &mutated),
                        "char {i} bit {bit} still verified: {mutated}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "ABC"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_verify_signature_malformed() {
        assert!(!verify_signature(SECRET, BODY, ""));
        assert!(!verify_signature(SECRET, BODY, "not-hex"));
        assert!(!verify_signature(SECRET, BODY, "abc"));
        assert!(!verify_signature(SECRET, BODY, &"z".repeat(64)));
        let truncated = &sign(SECRET, BODY)[..62];
        assert!(!verify_signature(SECRET, BODY, truncated));
    }
}
