//! Configured entry point for derivation, share updates and export

use crate::config::AdapterConfig;
use crate::{AdapterError, AdapterResult};
use tss_bridge_core::{
    AffinePoint, CurveKind, DeltaDeriver, DerivationPath, Ed25519, ExtendedKey, FormatBridge, HdCurve, Secp256k1,
    ShareRecord, ShareUpdater, Tweak, SIGNATURE_LENGTH,
};
use tss_bridge_verifier::{validate_strategy, DalekVerifier};

/// Runs the adapter pipeline for one configured curve and strategy
#[derive(Debug, Clone)]
pub struct ThresholdKeyAdapter {
    config: AdapterConfig,
    bridge: FormatBridge,
}

impl ThresholdKeyAdapter {
    /// Create an adapter from `config`
    pub fn new(config: AdapterConfig) -> Self {
        log::info!(
            "Threshold key adapter on {} with {} bridge",
            config.curve,
            config.bridge_strategy
        );
        let bridge = FormatBridge::new(config.bridge_strategy);
        ThresholdKeyAdapter { config, bridge }
    }

    /// Active configuration
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Bridge built from the configured strategy
    pub fn bridge(&self) -> &FormatBridge {
        &self.bridge
    }

    /// Derive the child key for `path` without touching any share
    pub fn derive_child(
        &self,
        path: &DerivationPath,
        master: &AffinePoint,
        chain_code: &[u8; 32],
    ) -> AdapterResult<(Tweak, ExtendedKey)> {
        let derived = match self.config.curve {
            CurveKind::Ed25519 => self.deriver::<Ed25519>().derive(path, master, chain_code)?,
            CurveKind::Secp256k1 => self.deriver::<Secp256k1>().derive(path, master, chain_code)?,
        };
        Ok(derived)
    }

    /// Derive the child key for `path` and shift every record to it
    ///
    /// Records are updated in place. If the update fails they are left
    /// partially modified and must be discarded.
    pub fn derive_and_update(
        &self,
        path: &DerivationPath,
        master: &AffinePoint,
        chain_code: &[u8; 32],
        records: &mut [ShareRecord],
    ) -> AdapterResult<(Tweak, ExtendedKey)> {
        match self.config.curve {
            CurveKind::Ed25519 => self.derive_and_update_on::<Ed25519>(path, master, chain_code, records),
            CurveKind::Secp256k1 => self.derive_and_update_on::<Secp256k1>(path, master, chain_code, records),
        }
    }

    /// Convert a native R || S signature for the verifier
    pub fn export_signature(&self, native_signature: &[u8]) -> AdapterResult<[u8; SIGNATURE_LENGTH]> {
        Ok(self.bridge.signature_to_standard(native_signature)?)
    }

    /// Encode an edwards25519 public key for the verifier
    pub fn export_public_key(&self, public_key: &AffinePoint) -> AdapterResult<[u8; 32]> {
        self.require_ed25519()?;
        Ok(self.bridge.public_key_to_standard(&public_key.x, &public_key.y)?)
    }

    /// Check the configured strategy against `ed25519-dalek` with one
    /// known-good native signature
    pub fn validate_bridge(
        &self,
        public_key: &AffinePoint,
        message: &[u8],
        native_signature: &[u8],
    ) -> AdapterResult<()> {
        self.require_ed25519()?;
        validate_strategy(
            &self.bridge,
            &DalekVerifier::new(),
            &public_key.x,
            &public_key.y,
            message,
            native_signature,
        )?;
        Ok(())
    }

    fn deriver<C: HdCurve>(&self) -> DeltaDeriver<C> {
        DeltaDeriver::with_version(self.config.hd_version)
    }

    fn derive_and_update_on<C: HdCurve>(
        &self,
        path: &DerivationPath,
        master: &AffinePoint,
        chain_code: &[u8; 32],
        records: &mut [ShareRecord],
    ) -> AdapterResult<(Tweak, ExtendedKey)> {
        let (tweak, child) = self.deriver::<C>().derive(path, master, chain_code)?;
        ShareUpdater::<C>::new(&tweak, &child.public_key)?.apply(records)?;
        log::info!("Derived {} and updated {} share records", path, records.len());
        Ok((tweak, child))
    }

    fn require_ed25519(&self) -> AdapterResult<()> {
        match self.config.curve {
            CurveKind::Ed25519 => Ok(()),
            other => Err(AdapterError::UnsupportedCurve(other)),
        }
    }
}

impl Default for ThresholdKeyAdapter {
    fn default() -> Self {
        ThresholdKeyAdapter::new(AdapterConfig::default())
    }
}
