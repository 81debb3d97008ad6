//! Compressed and blinded projective forms of edwards25519 points
//!
//! Compression follows the RFC 8032 layout: Y little-endian in bits 0..254,
//! the sign of X in bit 255. The blinded lift produces extended coordinates
//! (X:Y:Z:T) scaled by a caller-drawn random Z.
//!
//! All field arithmetic here runs on `BigUint` and is not constant time.
//! Only feed it public points; secret-dependent values belong in
//! `curve25519-dalek`.

use crate::field::FieldElement;
use crate::scalar_codec::{ScalarBuffer, SCALAR_LENGTH};
use crate::{AffinePoint, FormatError, FormatResult};
use curve25519_dalek::scalar::Scalar;
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Mask of the X-sign bit within the last byte
const SIGN_BIT: u8 = 0x80;

/// RFC 8032 compressed point: Y little-endian with the X sign in bit 255
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressedPoint(#[serde(with = "hex::serde")] pub [u8; SCALAR_LENGTH]);

impl CompressedPoint {
    /// Whether the encoded X is negative
    pub fn sign_bit(&self) -> bool {
        self.0[SCALAR_LENGTH - 1] & SIGN_BIT != 0
    }

    /// Encoded bytes
    pub fn as_bytes(&self) -> &[u8; SCALAR_LENGTH] {
        &self.0
    }

    /// Copy out the encoded bytes
    pub fn to_bytes(&self) -> [u8; SCALAR_LENGTH] {
        self.0
    }
}

/// Compress affine coordinates
///
/// Y goes through the scalar codec; X is reduced into the field and its
/// canonical negativity decides bit 255.
pub fn compress(x: &BigUint, y: &BigUint) -> FormatResult<CompressedPoint> {
    let mut s = ScalarBuffer::from_integer(y)?.0;
    let x_le = ScalarBuffer::from_integer(x)?;

    if FieldElement::from_buffer(&x_le).is_negative() {
        s[SCALAR_LENGTH - 1] |= SIGN_BIT;
    } else {
        s[SCALAR_LENGTH - 1] &= !SIGN_BIT;
    }

    Ok(CompressedPoint(s))
}

/// Extended twisted Edwards coordinates: x = X/Z, y = Y/Z, x·y = T/Z
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPoint {
    /// X = x·Z
    pub x: FieldElement,
    /// Y = y·Z
    pub y: FieldElement,
    /// Projective denominator
    pub z: FieldElement,
    /// T = x·y·Z
    pub t: FieldElement,
}

impl ExtendedPoint {
    /// Unblinded lift with Z = 1
    pub fn from_affine(point: &AffinePoint) -> FormatResult<Self> {
        let x = FieldElement::from_buffer(&ScalarBuffer::from_integer(&point.x)?);
        let y = FieldElement::from_buffer(&ScalarBuffer::from_integer(&point.y)?);
        let t = x.mul(&y);
        Ok(ExtendedPoint { x, y, z: FieldElement::one(), t })
    }

    /// Complete addition for a = -1 (Hisil–Wong–Carter–Dawson, "add-2008-hwcd-3")
    pub fn add(&self, other: &ExtendedPoint) -> ExtendedPoint {
        let two = FieldElement::from_u64(2);
        let d2 = FieldElement::edwards_d().mul(&two);

        let a = self.y.sub(&self.x).mul(&other.y.sub(&other.x));
        let b = self.y.add(&self.x).mul(&other.y.add(&other.x));
        let c = self.t.mul(&d2).mul(&other.t);
        let d = self.z.mul(&two).mul(&other.z);
        let e = b.sub(&a);
        let f = d.sub(&c);
        let g = d.add(&c);
        let h = b.add(&a);

        ExtendedPoint {
            x: e.mul(&f),
            y: g.mul(&h),
            z: f.mul(&g),
            t: e.mul(&h),
        }
    }

    /// Divide out Z
    pub fn to_affine(&self) -> AffinePoint {
        let z_inv = self.z.invert();
        AffinePoint::new(self.x.mul(&z_inv).to_integer(), self.y.mul(&z_inv).to_integer())
    }
}

/// Lift affine coordinates into a blinded extended representation
///
/// A positive `z` below the group order is drawn from `rng`; the result is
/// `(x·z, y·z, z, x·y·z)`. A zero draw is reported rather than retried.
pub fn lift_blinded<R: RngCore + CryptoRng>(
    x: &BigUint,
    y: &BigUint,
    rng: &mut R,
) -> FormatResult<ExtendedPoint> {
    let fx = FieldElement::from_buffer(&ScalarBuffer::from_integer(x)?);
    let fy = FieldElement::from_buffer(&ScalarBuffer::from_integer(y)?);

    let z_bytes = Zeroizing::new(Scalar::random(rng).to_bytes());
    let z = FieldElement::from_buffer(&ScalarBuffer(*z_bytes));
    if z.is_zero() {
        return Err(FormatError::DegenerateBlinding);
    }

    Ok(ExtendedPoint {
        x: fx.mul(&z),
        y: fy.mul(&z),
        t: fx.mul(&fy).mul(&z),
        z,
    })
}
