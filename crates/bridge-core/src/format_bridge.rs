//! Conversion of native artifacts into the verifier-facing encoding
//!
//! Two conventions exist for what "standard" means at this boundary:
//! copying the native little-endian encoding through unchanged, or
//! reversing each 32-byte component into big-endian. The convention is
//! fixed per [`FormatBridge`] instance through [`BridgeStrategy`].
//!
//! RFC 8032 encodes points and scalars little-endian, and signatures
//! bridged with [`BridgeStrategy::Passthrough`] verify under
//! `ed25519-dalek`; that is the default.

use crate::field::FieldElement;
use crate::scalar_codec::{encode_be, ScalarBuffer, SCALAR_LENGTH};
use crate::{FormatError, FormatResult};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an R || S signature
pub const SIGNATURE_LENGTH: usize = 2 * SCALAR_LENGTH;

/// Sign bit of X in bit 255 of the encoded integer
const SIGN_BIT: u8 = 0x80;

/// Byte-order convention of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeStrategy {
    /// Native little-endian encoding is already RFC 8032; copy through
    #[default]
    Passthrough,
    /// Reverse R and S independently, encode public keys big-endian
    ReverseHalves,
}

impl fmt::Display for BridgeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeStrategy::Passthrough => write!(f, "passthrough"),
            BridgeStrategy::ReverseHalves => write!(f, "reverse_halves"),
        }
    }
}

/// Signature split into its two components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureRs {
    /// Commitment R
    pub r: [u8; SCALAR_LENGTH],
    /// Response S
    pub s: [u8; SCALAR_LENGTH],
}

impl SignatureRs {
    /// Split a 64-byte buffer
    pub fn from_slice(buf: &[u8]) -> FormatResult<Self> {
        if buf.len() != SIGNATURE_LENGTH {
            return Err(FormatError::WrongLength {
                expected: SIGNATURE_LENGTH,
                actual: buf.len(),
            });
        }
        let mut r = [0u8; SCALAR_LENGTH];
        let mut s = [0u8; SCALAR_LENGTH];
        r.copy_from_slice(&buf[..SCALAR_LENGTH]);
        s.copy_from_slice(&buf[SCALAR_LENGTH..]);
        Ok(SignatureRs { r, s })
    }

    /// R || S
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..SCALAR_LENGTH].copy_from_slice(&self.r);
        out[SCALAR_LENGTH..].copy_from_slice(&self.s);
        out
    }
}

/// A standards-conformant signature verifier
pub trait StandardVerifier {
    /// Check `signature` over `message` under `public_key`
    fn verify(&self, public_key: &[u8; 32], message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool;
}

/// Native-to-standard converter with a fixed strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatBridge {
    strategy: BridgeStrategy,
}

impl FormatBridge {
    /// Bridge using `strategy` for every conversion
    pub fn new(strategy: BridgeStrategy) -> Self {
        FormatBridge { strategy }
    }

    /// Selected strategy
    pub fn strategy(&self) -> BridgeStrategy {
        self.strategy
    }

    /// Convert a native R || S signature
    pub fn signature_to_standard(&self, buf: &[u8]) -> FormatResult<[u8; SIGNATURE_LENGTH]> {
        let mut sig = SignatureRs::from_slice(buf)?;
        if self.strategy == BridgeStrategy::ReverseHalves {
            sig.r.reverse();
            sig.s.reverse();
        }
        Ok(sig.to_bytes())
    }

    /// Encode a public key from affine coordinates
    ///
    /// The X sign is recomputed here from the native little-endian encoding
    /// of X rather than taken from a compressed point, so that it can be
    /// cross-checked against [`crate::point_codec::compress`].
    pub fn public_key_to_standard(&self, x: &BigUint, y: &BigUint) -> FormatResult<[u8; 32]> {
        let x_native = ScalarBuffer::from_integer(x)?;
        let negative = FieldElement::from_buffer(&x_native).is_negative();

        let mut out = match self.strategy {
            BridgeStrategy::Passthrough => ScalarBuffer::from_integer(y)?.0,
            BridgeStrategy::ReverseHalves => encode_be(y)?,
        };

        let msb = self.msb_index();
        if negative {
            out[msb] |= SIGN_BIT;
        } else {
            out[msb] &= !SIGN_BIT;
        }
        Ok(out)
    }

    /// Read the X sign back out of a key produced by this bridge
    pub fn standard_sign_bit(&self, public_key: &[u8; 32]) -> bool {
        public_key[self.msb_index()] & SIGN_BIT != 0
    }

    /// Bridge native artifacts and hand them to `verifier`
    pub fn verify_with<V: StandardVerifier + ?Sized>(
        &self,
        verifier: &V,
        x: &BigUint,
        y: &BigUint,
        message: &[u8],
        native_signature: &[u8],
    ) -> FormatResult<bool> {
        let public_key = self.public_key_to_standard(x, y)?;
        let signature = self.signature_to_standard(native_signature)?;
        Ok(verifier.verify(&public_key, message, &signature))
    }

    /// Byte holding the most significant bits of the 256-bit integer
    fn msb_index(&self) -> usize {
        match self.strategy {
            BridgeStrategy::Passthrough => SCALAR_LENGTH - 1,
            BridgeStrategy::ReverseHalves => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Ed25519, HdCurve};
    use crate::point_codec::compress;
    use num_traits::One;

    fn sample_points() -> Vec<(BigUint, BigUint)> {
        (1u64..=24)
            .map(|k| {
                let point = Ed25519::to_affine(&Ed25519::mul_base(&BigUint::from(k * 7919))).unwrap();
                (point.x, point.y)
            })
            .collect()
    }

    #[test]
    fn test_length_guard() {
        for strategy in [BridgeStrategy::Passthrough, BridgeStrategy::ReverseHalves] {
            let bridge = FormatBridge::new(strategy);
            for len in 0..=130usize {
                let buf = vec![0xa5u8; len];
                let result = bridge.signature_to_standard(&buf);
                if len == SIGNATURE_LENGTH {
                    assert!(result.is_ok());
                } else {
                    assert_eq!(
                        result.unwrap_err(),
                        FormatError::WrongLength { expected: 64, actual: len }
                    );
                }
            }
        }
    }

    #[test]
    fn test_reverse_halves_reverses_each_component() {
        let native: Vec<u8> = (0u8..64).collect();
        let out = FormatBridge::new(BridgeStrategy::ReverseHalves)
            .signature_to_standard(&native)
            .unwrap();

        for i in 0..32 {
            assert_eq!(out[i], native[31 - i]);
            assert_eq!(out[32 + i], native[63 - i]);
        }
        // not a whole-buffer reversal
        assert_ne!(out[0], native[63]);
    }

    #[test]
    fn test_passthrough_copies() {
        let native: Vec<u8> = (0u8..64).rev().collect();
        let out = FormatBridge::new(BridgeStrategy::Passthrough)
            .signature_to_standard(&native)
            .unwrap();
        assert_eq!(out.to_vec(), native);
    }

    #[test]
    fn test_sign_bit_agreement() {
        for strategy in [BridgeStrategy::Passthrough, BridgeStrategy::ReverseHalves] {
            let bridge = FormatBridge::new(strategy);
            for (x, y) in sample_points() {
                let compressed = compress(&x, &y).unwrap();
                let standard = bridge.public_key_to_standard(&x, &y).unwrap();
                assert_eq!(compressed.sign_bit(), bridge.standard_sign_bit(&standard));
            }
        }
    }

    #[test]
    fn test_sign_bit_agreement_for_unreduced_x() {
        // x >= p: both sides reduce before testing the sign
        let (x, y) = sample_points().remove(0);
        let unreduced = &x + &*crate::field::FIELD_PRIME;
        let bridge = FormatBridge::default();
        let compressed = compress(&unreduced, &y).unwrap();
        let standard = bridge.public_key_to_standard(&unreduced, &y).unwrap();
        assert_eq!(compressed.sign_bit(), bridge.standard_sign_bit(&standard));
        assert_eq!(compressed.sign_bit(), compress(&x, &y).unwrap().sign_bit());
    }

    #[test]
    fn test_passthrough_public_key_is_compressed_point() {
        let bridge = FormatBridge::new(BridgeStrategy::Passthrough);
        for (x, y) in sample_points() {
            assert_eq!(bridge.public_key_to_standard(&x, &y).unwrap(), compress(&x, &y).unwrap().to_bytes());
        }
    }

    #[test]
    fn test_reverse_halves_public_key_is_reversed_compressed_point() {
        let bridge = FormatBridge::new(BridgeStrategy::ReverseHalves);
        for (x, y) in sample_points() {
            let mut expected = compress(&x, &y).unwrap().to_bytes();
            expected.reverse();
            assert_eq!(bridge.public_key_to_standard(&x, &y).unwrap(), expected);
        }
    }

    #[test]
    fn test_small_coordinates() {
        let x = BigUint::from_bytes_be(&[0x01, 0x02, 0x03]);
        let y = BigUint::from_bytes_be(&[0x04, 0x05, 0x06]);
        let be = FormatBridge::new(BridgeStrategy::ReverseHalves)
            .public_key_to_standard(&x, &y)
            .unwrap();
        assert_eq!(&be[29..], &[0x04, 0x05, 0x06]);
        // x = 0x010203 is odd, hence negative
        assert_eq!(be[0], SIGN_BIT);
    }

    #[test]
    fn test_oversized_y_rejected() {
        let y = BigUint::one() << 256u32;
        assert!(matches!(
            FormatBridge::default().public_key_to_standard(&BigUint::one(), &y),
            Err(FormatError::ScalarOverflow { .. })
        ));
    }

    struct AcceptIfFirstByte(u8);

    impl StandardVerifier for AcceptIfFirstByte {
        fn verify(&self, _public_key: &[u8; 32], _message: &[u8], signature: &[u8; 64]) -> bool {
            signature[0] == self.0
        }
    }

    #[test]
    fn test_verify_with_uses_bridged_signature() {
        let (x, y) = sample_points().remove(3);
        let mut native = [0u8; 64];
        native[0] = 1;
        native[31] = 2;

        let verifier = AcceptIfFirstByte(2);
        assert!(!FormatBridge::new(BridgeStrategy::Passthrough)
            .verify_with(&verifier, &x, &y, b"msg", &native)
            .unwrap());
        assert!(FormatBridge::new(BridgeStrategy::ReverseHalves)
            .verify_with(&verifier, &x, &y, b"msg", &native)
            .unwrap());
    }
}
