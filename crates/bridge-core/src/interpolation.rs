//! Lagrange interpolation of public shares at zero
//!
//! Used to check that a set of share records still describes the expected
//! group key, before and after a tweak is applied.

use crate::curve::HdCurve;
use crate::types::ParticipantId;
use crate::{AffinePoint, DerivationError, DerivationResult};
use num_bigint::BigUint;
use num_traits::One;
use std::collections::HashSet;

/// λ_i = Π_{j≠i} x_j / (x_j - x_i) mod N
fn lagrange_coefficient(i: ParticipantId, participants: &[ParticipantId], order: &BigUint) -> BigUint {
    let x_i = BigUint::from(i.as_u32());
    let mut numerator = BigUint::one();
    let mut denominator = BigUint::one();

    for x_j in participants.iter().filter(|p| **p != i).map(|p| BigUint::from(p.as_u32())) {
        numerator = numerator * &x_j % order;
        denominator = denominator * ((&x_j + order - &x_i) % order) % order;
    }

    // N is prime, so d^(N-2) is the inverse
    let exponent = order - BigUint::from(2u32);
    numerator * denominator.modpow(&exponent, order) % order
}

/// Recover `f(0)·G` from `(id, f(id)·G)` pairs
///
/// Any `t` shares of a degree `t-1` sharing give the group key.
pub fn interpolate_public_key<C: HdCurve>(
    shares: &[(ParticipantId, AffinePoint)],
) -> DerivationResult<AffinePoint> {
    if shares.is_empty() {
        return Err(DerivationError::InterpolationFailure("no shares supplied".to_string()));
    }

    let ids: Vec<ParticipantId> = shares.iter().map(|(id, _)| *id).collect();
    let unique: HashSet<_> = ids.iter().collect();
    if unique.len() != ids.len() {
        return Err(DerivationError::InterpolationFailure("duplicate participant ids".to_string()));
    }
    if ids.iter().any(|id| id.as_u32() == 0) {
        return Err(DerivationError::InterpolationFailure("participant id 0 is reserved".to_string()));
    }

    let order = C::order();
    let mut acc: Option<C::Point> = None;
    for (id, share) in shares {
        let point = C::from_affine(share).ok_or_else(|| {
            DerivationError::PointArithmeticFailure(format!("share of participant {} is not on {}", id.0, C::KIND))
        })?;
        let term = C::mul(&point, &lagrange_coefficient(*id, &ids, order));
        acc = Some(match acc {
            Some(sum) => C::add(&sum, &term),
            None => term,
        });
    }

    acc.and_then(|sum| C::to_affine(&sum))
        .ok_or_else(|| DerivationError::InterpolationFailure("interpolated key is the identity".to_string()))
}
