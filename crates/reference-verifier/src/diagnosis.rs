//! Signature format diagnosis
//!
//! When it is unknown which byte order a signer emits, try the plausible
//! layouts against the reference verifier and report which ones pass.

use serde::{Deserialize, Serialize};
use std::fmt;
use tss_bridge_core::{BridgeStrategy, FormatResult, SignatureRs, StandardVerifier, SIGNATURE_LENGTH};

/// Candidate layout of a native signature and public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatVariant {
    /// Signature and key used as-is
    Direct,
    /// Whole 64-byte signature reversed
    ReversedSignature,
    /// R and S reversed independently
    ReversedHalves,
    /// Public key reversed, signature as-is
    ReversedPublicKey,
    /// Public key reversed and R, S reversed independently
    ReversedBoth,
}

impl FormatVariant {
    /// Every variant, in the order they are tried
    pub const ALL: [FormatVariant; 5] = [
        FormatVariant::Direct,
        FormatVariant::ReversedSignature,
        FormatVariant::ReversedHalves,
        FormatVariant::ReversedPublicKey,
        FormatVariant::ReversedBoth,
    ];

    /// Strategy that produces exactly this layout from native artifacts
    pub fn strategy(self) -> Option<BridgeStrategy> {
        match self {
            FormatVariant::Direct => Some(BridgeStrategy::Passthrough),
            FormatVariant::ReversedBoth => Some(BridgeStrategy::ReverseHalves),
            FormatVariant::ReversedSignature | FormatVariant::ReversedHalves | FormatVariant::ReversedPublicKey => None,
        }
    }

    fn apply(&self, public_key: &[u8; 32], signature: &SignatureRs) -> ([u8; 32], [u8; SIGNATURE_LENGTH]) {
        let mut key = *public_key;
        let mut halves = *signature;
        halves.r.reverse();
        halves.s.reverse();

        match self {
            FormatVariant::Direct => (key, signature.to_bytes()),
            FormatVariant::ReversedSignature => {
                let mut sig = signature.to_bytes();
                sig.reverse();
                (key, sig)
            }
            FormatVariant::ReversedHalves => (key, halves.to_bytes()),
            FormatVariant::ReversedPublicKey => {
                key.reverse();
                (key, signature.to_bytes())
            }
            FormatVariant::ReversedBoth => {
                key.reverse();
                (key, halves.to_bytes())
            }
        }
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatVariant::Direct => "direct",
            FormatVariant::ReversedSignature => "reversed signature",
            FormatVariant::ReversedHalves => "reversed R and S",
            FormatVariant::ReversedPublicKey => "reversed public key",
            FormatVariant::ReversedBoth => "reversed key and R, S",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of [`diagnose_signature_format`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDiagnosis {
    /// Verification result per variant
    pub results: Vec<(FormatVariant, bool)>,
}

impl FormatDiagnosis {
    /// Variants the verifier accepted
    pub fn accepted(&self) -> Vec<FormatVariant> {
        self.results
            .iter()
            .filter(|(_, ok)| *ok)
            .map(|(variant, _)| *variant)
            .collect()
    }

    /// Bridge strategy whose output matches the first accepted variant
    ///
    /// `Passthrough` emits [`FormatVariant::Direct`] and `ReverseHalves`
    /// emits [`FormatVariant::ReversedBoth`] (key and both halves
    /// big-endian). Other variants have no strategy.
    pub fn recommended_strategy(&self) -> Option<BridgeStrategy> {
        self.accepted().into_iter().find_map(FormatVariant::strategy)
    }
}

/// Try every [`FormatVariant`] of a native signature against `verifier`
///
/// `public_key` is the native compressed key (see
/// [`tss_bridge_core::compress`]).
pub fn diagnose_signature_format<V: StandardVerifier + ?Sized>(
    verifier: &V,
    public_key: &[u8; 32],
    message: &[u8],
    native_signature: &[u8],
) -> FormatResult<FormatDiagnosis> {
    let signature = SignatureRs::from_slice(native_signature)?;

    let results: Vec<_> = FormatVariant::ALL
        .iter()
        .map(|variant| {
            let (key, sig) = variant.apply(public_key, &signature);
            let ok = verifier.verify(&key, message, &sig);
            log::debug!("Format variant {}: {}", variant, if ok { "verified" } else { "rejected" });
            (*variant, ok)
        })
        .collect();

    let diagnosis = FormatDiagnosis { results };
    match diagnosis.recommended_strategy() {
        Some(strategy) => log::info!("Signature format diagnosis recommends {}", strategy),
        None if diagnosis.accepted().is_empty() => {
            log::warn!("No signature layout verified; signer output is not RFC 8032 compatible")
        }
        None => log::warn!(
            "Only layouts outside the bridge strategies verified: {:?}",
            diagnosis.accepted()
        ),
    }

    Ok(diagnosis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sign_with_scalar;
    use crate::{validate_strategy, DalekVerifier};
    use curve25519_dalek::scalar::Scalar;
    use tss_bridge_core::{compress, FormatBridge};

    #[test]
    fn test_native_output_verifies_directly() {
        let message = b"Test Ed25519 signature format";
        let (public, signature) = sign_with_scalar(&Scalar::from(424242u64), &Scalar::from(777u64), message);
        let key = compress(&public.x, &public.y).unwrap().to_bytes();

        let diagnosis = diagnose_signature_format(&DalekVerifier::new(), &key, message, &signature).unwrap();
        assert_eq!(diagnosis.accepted(), vec![FormatVariant::Direct]);
        assert_eq!(diagnosis.recommended_strategy(), Some(BridgeStrategy::Passthrough));
        assert_eq!(diagnosis.results.len(), FormatVariant::ALL.len());
    }

    #[test]
    fn test_big_endian_signature_halves_have_no_strategy() {
        let message = b"big endian signer";
        let (public, native) = sign_with_scalar(&Scalar::from(31u64), &Scalar::from(41u64), message);
        let key = compress(&public.x, &public.y).unwrap().to_bytes();

        // R and S emitted big-endian, key left in RFC 8032 form
        let mut swapped = SignatureRs::from_slice(&native).unwrap();
        swapped.r.reverse();
        swapped.s.reverse();

        let diagnosis =
            diagnose_signature_format(&DalekVerifier::new(), &key, message, &swapped.to_bytes()).unwrap();
        assert_eq!(diagnosis.accepted(), vec![FormatVariant::ReversedHalves]);
        assert_eq!(diagnosis.recommended_strategy(), None);

        for strategy in [BridgeStrategy::Passthrough, BridgeStrategy::ReverseHalves] {
            assert!(validate_strategy(
                &FormatBridge::new(strategy),
                &DalekVerifier::new(),
                &public.x,
                &public.y,
                message,
                &swapped.to_bytes()
            )
            .is_err());
        }
    }

    /// Verifier that takes key, R and S big-endian
    struct BigEndianVerifier(DalekVerifier);

    impl StandardVerifier for BigEndianVerifier {
        fn verify(&self, public_key: &[u8; 32], message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
            let mut key = *public_key;
            key.reverse();
            let mut sig = SignatureRs::from_slice(signature).unwrap();
            sig.r.reverse();
            sig.s.reverse();
            self.0.verify(&key, message, &sig.to_bytes())
        }
    }

    #[test]
    fn test_big_endian_verifier_recommends_reverse_halves() {
        let message = b"big endian verifier";
        let (public, native) = sign_with_scalar(&Scalar::from(271u64), &Scalar::from(828u64), message);
        let key = compress(&public.x, &public.y).unwrap().to_bytes();
        let verifier = BigEndianVerifier(DalekVerifier::new());

        let diagnosis = diagnose_signature_format(&verifier, &key, message, &native).unwrap();
        assert_eq!(diagnosis.accepted(), vec![FormatVariant::ReversedBoth]);
        let recommended = diagnosis.recommended_strategy().unwrap();
        assert_eq!(recommended, BridgeStrategy::ReverseHalves);

        assert_eq!(
            validate_strategy(&FormatBridge::new(recommended), &verifier, &public.x, &public.y, message, &native),
            Ok(())
        );
    }

    #[test]
    fn test_recommendation_always_validates() {
        let message = b"recommended strategy round trip";
        let (public, native) = sign_with_scalar(&Scalar::from(99u64), &Scalar::from(100u64), message);
        let key = compress(&public.x, &public.y).unwrap().to_bytes();

        let verifiers: [&dyn StandardVerifier; 2] = [&DalekVerifier::new(), &BigEndianVerifier(DalekVerifier::new())];
        for verifier in verifiers {
            let diagnosis = diagnose_signature_format(verifier, &key, message, &native).unwrap();
            let strategy = diagnosis.recommended_strategy().unwrap();
            assert_eq!(
                validate_strategy(&FormatBridge::new(strategy), verifier, &public.x, &public.y, message, &native),
                Ok(())
            );
        }
    }

    #[test]
    fn test_variant_strategy_mapping() {
        assert_eq!(FormatVariant::Direct.strategy(), Some(BridgeStrategy::Passthrough));
        assert_eq!(FormatVariant::ReversedBoth.strategy(), Some(BridgeStrategy::ReverseHalves));
        assert_eq!(FormatVariant::ReversedHalves.strategy(), None);
        assert_eq!(FormatVariant::ReversedSignature.strategy(), None);
        assert_eq!(FormatVariant::ReversedPublicKey.strategy(), None);
    }

    #[test]
    fn test_unusable_signature() {
        let diagnosis = diagnose_signature_format(&DalekVerifier::new(), &[0u8; 32], b"m", &[1u8; 64]).unwrap();
        assert!(diagnosis.accepted().is_empty());
        assert_eq!(diagnosis.recommended_strategy(), None);

        assert!(diagnose_signature_format(&DalekVerifier::new(), &[0u8; 32], b"m", &[1u8; 10]).is_err());
    }
}
