//! Public-only HD derivation with tweak accumulation
//!
//! Each level computes `I = HMAC-SHA512(chain_code, serP(parent) || index)`,
//! moves the public key by `IL·G` and keeps `IL` in a running sum modulo the
//! group order. The running sum is the tweak that participants later add to
//! their shares, so the secret itself never has to be reconstructed.

use crate::curve::HdCurve;
use crate::types::{DerivationPath, ExtendedKey, Tweak, DEFAULT_HD_VERSION, HARDENED_OFFSET};
use crate::{AffinePoint, DerivationError, DerivationResult};
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::Sha512;
use std::marker::PhantomData;
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// Derives child public keys and the matching tweak for curve `C`
#[derive(Debug, Clone)]
pub struct DeltaDeriver<C: HdCurve> {
    version: [u8; 4],
    _curve: PhantomData<C>,
}

impl<C: HdCurve> Default for DeltaDeriver<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HdCurve> DeltaDeriver<C> {
    /// Deriver tagging keys with the default version bytes
    pub fn new() -> Self {
        Self::with_version(DEFAULT_HD_VERSION)
    }

    /// Deriver tagging keys with `version`
    pub fn with_version(version: [u8; 4]) -> Self {
        DeltaDeriver {
            version,
            _curve: PhantomData,
        }
    }

    /// Walk `path` from the master key
    ///
    /// Returns the tweak `Σ IL mod N` together with the child extended key,
    /// so that `child = master + tweak·G`.
    pub fn derive(
        &self,
        path: &DerivationPath,
        master: &AffinePoint,
        chain_code: &[u8; 32],
    ) -> DerivationResult<(Tweak, ExtendedKey)> {
        if path.len() > u8::MAX as usize {
            return Err(DerivationError::PathTooDeep(path.len()));
        }
        if let Some(index) = path.indices().iter().find(|i| **i >= HARDENED_OFFSET) {
            return Err(DerivationError::HardenedIndexRejected(*index));
        }

        let master_point = C::from_affine(master).ok_or_else(|| {
            DerivationError::PointArithmeticFailure(format!("master public key is not on {}", C::KIND))
        })?;
        if C::is_identity(&master_point) {
            return Err(DerivationError::IdentityPoint { depth: 0 });
        }

        let order = C::order();
        let mut key = ExtendedKey::master(master.clone(), *chain_code, self.version);
        let mut point = master_point;
        let mut tweak = BigUint::zero();

        for &index in path.indices() {
            let (il, child_point, child_key) = self.derive_child(&key, &point, index)?;
            tweak = (tweak + il) % order;
            key = child_key;
            point = child_point;
        }

        log::debug!(
            "Derived {} key at {} (depth {}, index {})",
            C::KIND,
            path,
            key.depth,
            key.child_index
        );

        Ok((Tweak::new(tweak, order), key))
    }

    /// One derivation level; returns `(IL mod N, child point, child key)`
    fn derive_child(
        &self,
        parent: &ExtendedKey,
        parent_point: &C::Point,
        index: u32,
    ) -> DerivationResult<(BigUint, C::Point, ExtendedKey)> {
        if index >= HARDENED_OFFSET {
            return Err(DerivationError::HardenedIndexRejected(index));
        }

        let ser_p = parent.public_key.hd_serialize()?;

        let mut mac = <HmacSha512 as Mac>::new_from_slice(&parent.chain_code)
            .map_err(|e| DerivationError::PointArithmeticFailure(e.to_string()))?;
        mac.update(&ser_p);
        mac.update(&index.to_be_bytes());
        let mut digest = Zeroizing::new([0u8; 64]);
        digest.copy_from_slice(&mac.finalize().into_bytes());
        let (il_bytes, ir_bytes) = digest.split_at(32);

        let il = BigUint::from_bytes_be(il_bytes) % C::order();
        let child_point = C::add(parent_point, &C::mul_base(&il));

        let depth = parent.depth + 1;
        if C::is_identity(&child_point) {
            return Err(DerivationError::IdentityPoint { depth });
        }
        let public_key = C::to_affine(&child_point).ok_or_else(|| {
            DerivationError::PointArithmeticFailure(format!("child at depth {} has no affine form", depth))
        })?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir_bytes);

        let child = ExtendedKey {
            public_key,
            chain_code,
            depth,
            child_index: index,
            parent_fingerprint: parent.public_key.fingerprint()?,
            version: self.version,
        };

        Ok((il, child_point, child))
    }
}
