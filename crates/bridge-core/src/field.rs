//! Arithmetic in the edwards25519 base field GF(2^255 - 19)
//!
//! Elements are kept fully reduced, so the sign predicate below is always
//! evaluated on the canonical representative.
//!
//! Operations are variable time; use them on public coordinates only.

use crate::scalar_codec::ScalarBuffer;
use crate::FormatResult;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

/// p = 2^255 - 19
pub static FIELD_PRIME: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << 255u32) - BigUint::from(19u32));

/// d = -121665 / 121666
static EDWARDS_D: Lazy<FieldElement> = Lazy::new(|| {
    let num = FieldElement::from_u64(121665).neg();
    let den = FieldElement::from_u64(121666);
    num.mul(&den.invert())
});

/// sqrt(-1) = 2^((p - 1) / 4)
static SQRT_M1: Lazy<FieldElement> = Lazy::new(|| {
    let exp = (&*FIELD_PRIME - BigUint::one()) >> 2u32;
    FieldElement::from_u64(2).pow(&exp)
});

/// A reduced element of GF(2^255 - 19)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldElement(BigUint);

impl FieldElement {
    /// Additive identity
    pub fn zero() -> Self {
        FieldElement(BigUint::zero())
    }

    /// Multiplicative identity
    pub fn one() -> Self {
        FieldElement(BigUint::one())
    }

    /// Reduce an arbitrary integer into the field
    pub fn from_integer(value: &BigUint) -> Self {
        FieldElement(value % &*FIELD_PRIME)
    }

    /// Small constant
    pub fn from_u64(value: u64) -> Self {
        Self::from_integer(&BigUint::from(value))
    }

    /// Load from a little-endian buffer, reducing all 256 bits
    pub fn from_buffer(buf: &ScalarBuffer) -> Self {
        Self::from_integer(&buf.to_integer())
    }

    /// Canonical little-endian encoding
    pub fn to_buffer(&self) -> FormatResult<ScalarBuffer> {
        ScalarBuffer::from_integer(&self.0)
    }

    /// Canonical representative as an integer
    pub fn to_integer(&self) -> BigUint {
        self.0.clone()
    }

    /// Signed-representative rule: an element is negative when the low bit
    /// of its canonical encoding is set.
    pub fn is_negative(&self) -> bool {
        self.0.bit(0)
    }

    /// True for the additive identity
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// a + b
    pub fn add(&self, other: &FieldElement) -> FieldElement {
        FieldElement((&self.0 + &other.0) % &*FIELD_PRIME)
    }

    /// a - b
    pub fn sub(&self, other: &FieldElement) -> FieldElement {
        FieldElement((&self.0 + &*FIELD_PRIME - &other.0) % &*FIELD_PRIME)
    }

    /// a * b
    pub fn mul(&self, other: &FieldElement) -> FieldElement {
        FieldElement((&self.0 * &other.0) % &*FIELD_PRIME)
    }

    /// a^2
    pub fn square(&self) -> FieldElement {
        self.mul(self)
    }

    /// -a
    pub fn neg(&self) -> FieldElement {
        FieldElement::zero().sub(self)
    }

    /// a^e
    pub fn pow(&self, exp: &BigUint) -> FieldElement {
        FieldElement(self.0.modpow(exp, &FIELD_PRIME))
    }

    /// a^(p - 2); maps zero to zero
    pub fn invert(&self) -> FieldElement {
        let exp = &*FIELD_PRIME - BigUint::from(2u32);
        self.pow(&exp)
    }

    /// Edwards curve constant d
    pub fn edwards_d() -> &'static FieldElement {
        &EDWARDS_D
    }

    /// Square root of u / v, if one exists (RFC 8032 section 5.1.3)
    pub fn sqrt_ratio(u: &FieldElement, v: &FieldElement) -> Option<FieldElement> {
        // x = u v^3 (u v^7)^((p - 5) / 8)
        let v3 = v.square().mul(v);
        let v7 = v3.square().mul(v);
        let exp = (&*FIELD_PRIME - BigUint::from(5u32)) >> 3u32;
        let mut x = u.mul(&v3).mul(&u.mul(&v7).pow(&exp));

        let check = v.mul(&x.square());
        if check == *u {
            Some(x)
        } else if check == u.neg() {
            x = x.mul(&SQRT_M1);
            Some(x)
        } else {
            None
        }
    }
}

/// Twisted Edwards curve equation -x^2 + y^2 = 1 + d x^2 y^2
pub fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
    let x2 = x.square();
    let y2 = y.square();
    let lhs = y2.sub(&x2);
    let rhs = FieldElement::one().add(&FieldElement::edwards_d().mul(&x2).mul(&y2));
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_m1_squares_to_minus_one() {
        assert_eq!(SQRT_M1.square(), FieldElement::one().neg());
    }

    #[test]
    fn test_invert() {
        let a = FieldElement::from_u64(123456789);
        assert_eq!(a.mul(&a.invert()), FieldElement::one());
    }

    #[test]
    fn test_negativity_uses_canonical_representative() {
        // p + 2 reduces to 2 (even), although the raw integer is odd
        let raw = &*FIELD_PRIME + BigUint::from(2u32);
        assert!(raw.bit(0));
        assert!(!FieldElement::from_integer(&raw).is_negative());

        assert!(FieldElement::from_u64(3).is_negative());
        assert!(!FieldElement::from_u64(4).is_negative());
    }

    #[test]
    fn test_sqrt_ratio() {
        let a = FieldElement::from_u64(9);
        let root = FieldElement::sqrt_ratio(&a, &FieldElement::one()).unwrap();
        assert_eq!(root.square(), a);
    }

    #[test]
    fn test_identity_is_on_curve() {
        assert!(is_on_curve(&FieldElement::zero(), &FieldElement::one()));
        assert!(!is_on_curve(&FieldElement::one(), &FieldElement::one()));
    }
}
