//! Checking a bridge strategy before it is used

use crate::{VerifierError, VerifierResult};
use num_bigint::BigUint;
use tss_bridge_core::{FormatBridge, StandardVerifier};

/// Confirm that `bridge` turns a known-good native signature into one that
/// `verifier` accepts
///
/// Run this once with a sample signature before relying on a strategy; a
/// rejection means the strategy does not match the verifier's convention.
pub fn validate_strategy<V: StandardVerifier + ?Sized>(
    bridge: &FormatBridge,
    verifier: &V,
    x: &BigUint,
    y: &BigUint,
    message: &[u8],
    native_signature: &[u8],
) -> VerifierResult<()> {
    if bridge.verify_with(verifier, x, y, message, native_signature)? {
        log::info!("Bridge strategy {} accepted by reference verifier", bridge.strategy());
        Ok(())
    } else {
        log::warn!("Bridge strategy {} rejected by reference verifier", bridge.strategy());
        Err(VerifierError::StrategyRejected(bridge.strategy()))
    }
}
