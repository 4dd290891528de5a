//! Payment signature verification.
//!
//! This is the single trust boundary between "the buyer claims they
//! paid" and "an order is created". No other code path may create a
//! paid order.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies gateway payment proofs with a shared secret.
///
/// The gateway signs `"{session_id}|{payment_id}"` with HMAC-SHA256
/// and returns the hex-encoded digest to the client, which sends it
/// back to us. Verification is side-effect-free and idempotent.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    /// Creates a verifier for the given shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self, session_id: &str, payment_id: &str) -> HmacSha256 {
        // HMAC accepts keys of any length; new_from_slice cannot fail.
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(session_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac
    }

    /// Computes the expected hex signature for a session/payment pair.
    ///
    /// Used by the in-memory gateway and by tests; production
    /// signatures come from the real gateway.
    pub fn sign(&self, session_id: &str, payment_id: &str) -> String {
        hex::encode(self.mac(session_id, payment_id).finalize().into_bytes())
    }

    /// Verifies a client-returned signature.
    ///
    /// Returns false on any mismatch or malformed input, never errors.
    /// The comparison goes through `Mac::verify_slice`, which is
    /// constant-time; secrets are never compared with `==`.
    pub fn verify(&self, session_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(bytes) = hex::decode(signature) else {
            return false;
        };
        self.mac(session_id, payment_id).verify_slice(&bytes).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new("test-secret")
    }

    #[test]
    fn test_valid_signature_verifies() {
        let v = verifier();
        let sig = v.sign("sess_1", "pay_1");
        assert!(v.verify("sess_1", "pay_1", &sig));
    }

    #[test]
    fn test_verification_is_idempotent() {
        let v = verifier();
        let sig = v.sign("sess_1", "pay_1");
        assert!(v.verify("sess_1", "pay_1", &sig));
        assert!(v.verify("sess_1", "pay_1", &sig));
    }

    #[test]
    fn test_mutated_signature_fails() {
        let v = verifier();
        let sig = v.sign("sess_1", "pay_1");

        // Flip one hex digit.
        let mut chars: Vec<char> = sig.chars().collect();
        chars[0] = if chars[0] == '0' { '1' } else { '0' };
        let mutated: String = chars.into_iter().collect();

        assert!(!v.verify("sess_1", "pay_1", &mutated));
    }

    #[test]
    fn test_mutated_inputs_fail() {
        let v = verifier();
        let sig = v.sign("sess_1", "pay_1");

        assert!(!v.verify("sess_2", "pay_1", &sig));
        assert!(!v.verify("sess_1", "pay_2", &sig));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let sig = verifier().sign("sess_1", "pay_1");
        let other = SignatureVerifier::new("other-secret");
        assert!(!other.verify("sess_1", "pay_1", &sig));
    }

    #[test]
    fn test_malformed_hex_returns_false() {
        let v = verifier();
        assert!(!v.verify("sess_1", "pay_1", "not-hex"));
        assert!(!v.verify("sess_1", "pay_1", ""));
    }

    #[test]
    fn test_separator_prevents_boundary_shifts() {
        // sign("ab", "c") must differ from sign("a", "bc").
        let v = verifier();
        let sig = v.sign("ab", "c");
        assert!(!v.verify("a", "bc", &sig));
    }
}
