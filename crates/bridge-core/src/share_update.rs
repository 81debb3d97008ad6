//! Homomorphic share update
//!
//! A Shamir sharing keeps the secret in the constant term of a polynomial.
//! Adding the public offset `d·G` to every participant's public share shifts
//! that constant term by `d`, so interpolating any threshold subset of the
//! updated shares yields `(x + d)·G` while nobody learns `x`.
//!
//! Records are updated in place and the caller must hold the only handle to
//! them for the duration of the call. On error the batch is left partially
//! updated: discard it and start over, never resume.

use crate::curve::HdCurve;
use crate::types::{ShareRecord, Tweak};
use crate::{AffinePoint, DerivationError, DerivationResult};

/// Applies a derivation tweak to share records of curve `C`
#[derive(Debug, Clone)]
pub struct ShareUpdater<C: HdCurve> {
    child_public_key: AffinePoint,
    delta: C::Point,
}

impl<C: HdCurve> ShareUpdater<C> {
    /// Prepare an update: `tweak·G` is computed once here, and the child
    /// key is checked to be a valid point
    pub fn new(tweak: &Tweak, child_public_key: &AffinePoint) -> DerivationResult<Self> {
        if C::from_affine(child_public_key).is_none() {
            return Err(DerivationError::PointArithmeticFailure(format!(
                "child public key is not on {}",
                C::KIND
            )));
        }

        Ok(ShareUpdater {
            child_public_key: child_public_key.clone(),
            delta: C::mul_base(tweak.as_integer()),
        })
    }

    /// The child key every record will carry
    pub fn child_public_key(&self) -> &AffinePoint {
        &self.child_public_key
    }

    /// Update every record in place
    ///
    /// Each record gets the broadcast child key, and each `X_j` becomes
    /// `X_j + tweak·G`. Stops at the first failure.
    ///
    /// Every record must describe the same, non-zero number of participants;
    /// a batch that does not is rejected before anything is modified.
    pub fn apply(&self, records: &mut [ShareRecord]) -> DerivationResult<()> {
        check_participant_counts(records)?;

        for (k, record) in records.iter_mut().enumerate() {
            record.public_key = self.child_public_key.clone();

            for (j, big_x) in record.big_xj.iter_mut().enumerate() {
                *big_x = self.shift(big_x).map_err(|reason| {
                    log::error!("Share update aborted at record {}, commitment {}: {}", k, j, reason);
                    DerivationError::PointArithmeticFailure(format!("record {}, X_{}: {}", k, j, reason))
                })?;
            }
        }

        log::debug!("Applied {} tweak to {} share records", C::KIND, records.len());
        Ok(())
    }

    /// Pure variant of [`ShareUpdater::apply`]; the input is left untouched
    pub fn applied(&self, records: &[ShareRecord]) -> DerivationResult<Vec<ShareRecord>> {
        let mut updated = records.to_vec();
        self.apply(&mut updated)?;
        Ok(updated)
    }

    fn shift(&self, big_x: &AffinePoint) -> Result<AffinePoint, &'static str> {
        let point = C::from_affine(big_x).ok_or("point is not on the curve")?;
        let shifted = C::add(&point, &self.delta);
        C::to_affine(&shifted).ok_or("sum has no affine form")
    }
}

fn check_participant_counts(records: &[ShareRecord]) -> DerivationResult<()> {
    let expected = match records.first() {
        Some(first) => first.num_participants(),
        None => return Ok(()),
    };
    if expected == 0 {
        return Err(DerivationError::InconsistentShareRecords(
            "record 0 has no public shares".to_string(),
        ));
    }

    if let Some((k, record)) = records
        .iter()
        .enumerate()
        .find(|(_, record)| record.num_participants() != expected)
    {
        log::error!(
            "Share record {} lists {} participants, record 0 lists {}",
            k,
            record.num_participants(),
            expected
        );
        return Err(DerivationError::InconsistentShareRecords(format!(
            "record {} has {} public shares, expected {}",
            k,
            record.num_participants(),
            expected
        )));
    }
    Ok(())
}
