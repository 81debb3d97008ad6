//! Curve adapters
//!
//! Derivation and share updates work on affine coordinates and integer
//! scalars; the actual group arithmetic is delegated to `curve25519-dalek`
//! and `k256` through [`HdCurve`].

use crate::field::{self, FieldElement, FIELD_PRIME};
use crate::point_codec::compress;
use crate::scalar_codec::{encode_be, ScalarBuffer};
use crate::AffinePoint;
use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::IsIdentity,
};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint as K256Affine, EncodedPoint, FieldBytes, ProjectivePoint, U256};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ℓ = 2^252 + 27742317777372353535851937790883648493
static ED25519_ORDER: Lazy<BigUint> = Lazy::new(|| {
    BigUint::from_bytes_be(&[
        0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x14, 0xde, 0xf9, 0xde, 0xa2, 0xf7, 0x9c, 0xd6, 0x58, 0x12, 0x63, 0x1a, 0x5c, 0xf5, 0xd3, 0xed,
    ])
});

/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
static SECP256K1_ORDER: Lazy<BigUint> = Lazy::new(|| {
    BigUint::from_bytes_be(&[
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
        0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
    ])
});

/// Curve identifier supplied by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// edwards25519 (EdDSA)
    #[default]
    Ed25519,
    /// secp256k1 (ECDSA)
    Secp256k1,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Ed25519 => write!(f, "ed25519"),
            CurveKind::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

/// Group operations needed by derivation and share updates
pub trait HdCurve {
    /// Library point type
    type Point: Clone + PartialEq + fmt::Debug;

    /// Identifier of this curve
    const KIND: CurveKind;

    /// Prime order N of the generator
    fn order() -> &'static BigUint;

    /// k·G, with k reduced modulo N
    fn mul_base(k: &BigUint) -> Self::Point;

    /// k·P, with k reduced modulo N
    fn mul(point: &Self::Point, k: &BigUint) -> Self::Point;

    /// P + Q
    fn add(a: &Self::Point, b: &Self::Point) -> Self::Point;

    /// True for the group identity
    fn is_identity(point: &Self::Point) -> bool;

    /// Decode affine coordinates; `None` if the point is not on the curve
    fn from_affine(point: &AffinePoint) -> Option<Self::Point>;

    /// Affine coordinates; `None` if the point has none (identity on
    /// short-Weierstrass curves)
    fn to_affine(point: &Self::Point) -> Option<AffinePoint>;
}

/// edwards25519 backed by `curve25519-dalek`
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519;

impl Ed25519 {
    fn scalar(k: &BigUint) -> Scalar {
        let reduced = k % &*ED25519_ORDER;
        let mut bytes = [0u8; 32];
        let le = reduced.to_bytes_le();
        bytes[..le.len()].copy_from_slice(&le);
        Scalar::from_bytes_mod_order(bytes)
    }
}

impl HdCurve for Ed25519 {
    type Point = EdwardsPoint;

    const KIND: CurveKind = CurveKind::Ed25519;

    fn order() -> &'static BigUint {
        &ED25519_ORDER
    }

    fn mul_base(k: &BigUint) -> EdwardsPoint {
        EdwardsPoint::mul_base(&Self::scalar(k))
    }

    fn mul(point: &EdwardsPoint, k: &BigUint) -> EdwardsPoint {
        point * Self::scalar(k)
    }

    fn add(a: &EdwardsPoint, b: &EdwardsPoint) -> EdwardsPoint {
        a + b
    }

    fn is_identity(point: &EdwardsPoint) -> bool {
        point.is_identity()
    }

    fn from_affine(point: &AffinePoint) -> Option<EdwardsPoint> {
        if point.x >= *FIELD_PRIME || point.y >= *FIELD_PRIME {
            return None;
        }
        let x = FieldElement::from_integer(&point.x);
        let y = FieldElement::from_integer(&point.y);
        if !field::is_on_curve(&x, &y) {
            return None;
        }
        let encoded = compress(&point.x, &point.y).ok()?;
        CompressedEdwardsY(encoded.to_bytes()).decompress()
    }

    fn to_affine(point: &EdwardsPoint) -> Option<AffinePoint> {
        let mut bytes = point.compress().to_bytes();
        let sign = bytes[31] & 0x80 != 0;
        bytes[31] &= 0x7f;

        let y = FieldElement::from_buffer(&ScalarBuffer(bytes));
        let y2 = y.square();
        let u = y2.sub(&FieldElement::one());
        let v = FieldElement::edwards_d().mul(&y2).add(&FieldElement::one());
        let mut x = FieldElement::sqrt_ratio(&u, &v)?;
        if x.is_zero() && sign {
            return None;
        }
        if x.is_negative() != sign {
            x = x.neg();
        }

        Some(AffinePoint::new(x.to_integer(), y.to_integer()))
    }
}

/// secp256k1 backed by `k256`
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1;

impl Secp256k1 {
    fn scalar(k: &BigUint) -> k256::Scalar {
        let reduced = k % &*SECP256K1_ORDER;
        let mut bytes = [0u8; 32];
        let be = reduced.to_bytes_be();
        bytes[32 - be.len()..].copy_from_slice(&be);
        <k256::Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(bytes))
    }
}

impl HdCurve for Secp256k1 {
    type Point = ProjectivePoint;

    const KIND: CurveKind = CurveKind::Secp256k1;

    fn order() -> &'static BigUint {
        &SECP256K1_ORDER
    }

    fn mul_base(k: &BigUint) -> ProjectivePoint {
        ProjectivePoint::GENERATOR * Self::scalar(k)
    }

    fn mul(point: &ProjectivePoint, k: &BigUint) -> ProjectivePoint {
        *point * Self::scalar(k)
    }

    fn add(a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
        *a + *b
    }

    fn is_identity(point: &ProjectivePoint) -> bool {
        *point == ProjectivePoint::IDENTITY
    }

    fn from_affine(point: &AffinePoint) -> Option<ProjectivePoint> {
        let x = encode_be(&point.x).ok()?;
        let y = encode_be(&point.y).ok()?;
        let encoded =
            EncodedPoint::from_affine_coordinates(&FieldBytes::from(x), &FieldBytes::from(y), false);
        let affine: Option<K256Affine> = K256Affine::from_encoded_point(&encoded).into();
        affine.map(ProjectivePoint::from)
    }

    fn to_affine(point: &ProjectivePoint) -> Option<AffinePoint> {
        let encoded = point.to_affine().to_encoded_point(false);
        let x = encoded.x()?;
        let y = encoded.y()?;
        Some(AffinePoint::new(
            BigUint::from_bytes_be(x.as_slice()),
            BigUint::from_bytes_be(y.as_slice()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
    use curve25519_dalek::traits::Identity;
    use num_traits::{One, Zero};

    #[test]
    fn test_ed25519_basepoint_coordinates() {
        // RFC 8032 section 5.1: B = (x, 4/5)
        let base = Ed25519::to_affine(&ED25519_BASEPOINT_POINT).unwrap();
        let expected_x = BigUint::parse_bytes(
            b"15112221349535400772501151409588531511454012693041857206046113283949847762202",
            10,
        )
        .unwrap();
        let expected_y = BigUint::parse_bytes(
            b"46316835694926478169428394003475163141307993866256225615783033603165251855960",
            10,
        )
        .unwrap();
        assert_eq!(base.x, expected_x);
        assert_eq!(base.y, expected_y);
    }

    #[test]
    fn test_ed25519_affine_round_trip() {
        for k in [1u64, 2, 7, 1000, 123456789] {
            let point = Ed25519::mul_base(&BigUint::from(k));
            let affine = Ed25519::to_affine(&point).unwrap();
            assert_eq!(Ed25519::from_affine(&affine).unwrap(), point);
        }
    }

    #[test]
    fn test_ed25519_identity_affine() {
        let affine = Ed25519::to_affine(&EdwardsPoint::identity()).unwrap();
        assert!(affine.x.is_zero());
        assert!(affine.y.is_one());
        assert!(Ed25519::is_identity(&Ed25519::from_affine(&affine).unwrap()));
    }

    #[test]
    fn test_ed25519_rejects_off_curve() {
        let base = Ed25519::to_affine(&ED25519_BASEPOINT_POINT).unwrap();
        let bent = AffinePoint::new(&base.x + BigUint::one(), base.y.clone());
        assert!(Ed25519::from_affine(&bent).is_none());

        let unreduced = AffinePoint::new(&base.x + &*FIELD_PRIME, base.y);
        assert!(Ed25519::from_affine(&unreduced).is_none());
    }

    #[test]
    fn test_ed25519_order_annihilates() {
        let order = Ed25519::order().clone();
        assert!(Ed25519::is_identity(&Ed25519::mul_base(&order)));
    }

    #[test]
    fn test_secp256k1_generator() {
        let g = Secp256k1::to_affine(&Secp256k1::mul_base(&BigUint::one())).unwrap();
        let gx = BigUint::parse_bytes(
            b"79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
            16,
        )
        .unwrap();
        assert_eq!(g.x, gx);
        assert_eq!(Secp256k1::from_affine(&g).unwrap(), ProjectivePoint::GENERATOR);
    }

    #[test]
    fn test_secp256k1_identity_has_no_affine_form() {
        let order = Secp256k1::order().clone();
        let identity = Secp256k1::mul_base(&order);
        assert!(Secp256k1::is_identity(&identity));
        assert!(Secp256k1::to_affine(&identity).is_none());
    }

    #[test]
    fn test_curve_kind_display() {
        assert_eq!(CurveKind::Secp256k1.to_string(), "secp256k1");
        assert_eq!(CurveKind::default(), CurveKind::Ed25519);
    }
}
