//! Fixed-width integer encoding
//!
//! Integers cross the protocol boundary as 32-byte buffers. The field
//! arithmetic underneath expects little-endian limbs, while hashing and
//! external encodings use big-endian, so both directions live here.

use crate::{FormatError, FormatResult};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Width of every encoded scalar or coordinate
pub const SCALAR_LENGTH: usize = 32;

/// Largest bit length that fits in a [`ScalarBuffer`]
const MAX_BITS: u64 = (SCALAR_LENGTH * 8) as u64;

/// 32-byte little-endian encoding of an unsigned integer below 2^256
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScalarBuffer(#[serde(with = "hex::serde")] pub [u8; SCALAR_LENGTH]);

impl ScalarBuffer {
    /// The all-zero buffer
    pub const ZERO: ScalarBuffer = ScalarBuffer([0u8; SCALAR_LENGTH]);

    /// Encode an integer: big-endian, zero-padded on the left to 32 bytes,
    /// then reversed into little-endian.
    ///
    /// Integers of 2^256 or more are rejected rather than truncated.
    pub fn from_integer(value: &BigUint) -> FormatResult<Self> {
        let mut bytes = encode_be(value)?;
        bytes.reverse();
        Ok(ScalarBuffer(bytes))
    }

    /// Encode an optional integer; an absent value maps to [`ScalarBuffer::ZERO`]
    pub fn from_optional(value: Option<&BigUint>) -> FormatResult<Self> {
        match value {
            Some(value) => Self::from_integer(value),
            None => Ok(Self::ZERO),
        }
    }

    /// Build from a little-endian slice that must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> FormatResult<Self> {
        let array: [u8; SCALAR_LENGTH] = bytes.try_into().map_err(|_| FormatError::WrongLength {
            expected: SCALAR_LENGTH,
            actual: bytes.len(),
        })?;
        Ok(ScalarBuffer(array))
    }

    /// Decode back into an integer
    pub fn to_integer(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0)
    }

    /// Big-endian view of the same integer
    pub fn to_be_bytes(&self) -> [u8; SCALAR_LENGTH] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    /// Raw little-endian bytes
    pub fn as_bytes(&self) -> &[u8; SCALAR_LENGTH] {
        &self.0
    }
}

impl From<[u8; SCALAR_LENGTH]> for ScalarBuffer {
    fn from(bytes: [u8; SCALAR_LENGTH]) -> Self {
        ScalarBuffer(bytes)
    }
}

impl AsRef<[u8]> for ScalarBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encode an integer as 32 big-endian bytes, left-padded with zeros
pub fn encode_be(value: &BigUint) -> FormatResult<[u8; SCALAR_LENGTH]> {
    let bits = value.bits();
    if bits > MAX_BITS {
        return Err(FormatError::ScalarOverflow { bits });
    }

    let raw = value.to_bytes_be();
    let mut out = [0u8; SCALAR_LENGTH];
    // BigUint encodes zero as a single 0x00 byte, which still fits
    out[SCALAR_LENGTH - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// Decode 32 big-endian bytes
pub fn decode_be(bytes: &[u8; SCALAR_LENGTH]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}
