//! RFC 8032 verifier backed by `ed25519-dalek`

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tss_bridge_core::{StandardVerifier, SIGNATURE_LENGTH};

/// Standard Ed25519 verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct DalekVerifier {
    /// Use `verify_strict` (rejects small-order keys and non-canonical R)
    strict: bool,
}

impl DalekVerifier {
    /// Verifier with the cofactorless check of RFC 8032
    pub fn new() -> Self {
        DalekVerifier { strict: false }
    }

    /// Verifier that additionally rejects weak keys and malleable signatures
    pub fn strict() -> Self {
        DalekVerifier { strict: true }
    }
}

impl StandardVerifier for DalekVerifier {
    fn verify(&self, public_key: &[u8; 32], message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
        let key = match VerifyingKey::from_bytes(public_key) {
            Ok(key) => key,
            Err(e) => {
                log::debug!("Public key rejected: {}", e);
                return false;
            }
        };
        let signature = Signature::from_bytes(signature);

        let result = if self.strict {
            key.verify_strict(message, &signature)
        } else {
            key.verify(message, &signature)
        };
        result.is_ok()
    }
}
