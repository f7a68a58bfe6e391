//! Gateway checkout signature verification.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 using the
//! merchant key secret and sends the lower-case hex digest back to the client.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifier for checkout callback signatures.
#[derive(Clone)]
pub struct PaymentSignatureVerifier {
    secret: SecretString,
}

impl PaymentSignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Computes the hex-encoded signature for an order/payment pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        hex::encode(self.compute(order_id, payment_id))
    }

    /// Returns true when `signature` is the valid signature for the pair.
    ///
    /// Malformed hex is treated as a mismatch.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(provided) = hex::decode(signature.trim()) else {
            return false;
        };
        let expected = self.compute(order_id, payment_id);
        if expected.len() != provided.len() {
            return false;
        }
        expected.ct_eq(&provided).into()
    }

    fn compute(&self, order_id: &str, payment_id: &str) -> Vec<u8> {
        // HMAC keys of any length are valid, so this never fails.
        let Ok(mut mac) = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes()) else {
            return Vec::new();
        };
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for PaymentSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSignatureVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
