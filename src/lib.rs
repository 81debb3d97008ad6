//! Threshold key adapter
//!
//! Application-facing layer over [`tss_bridge_core`] and
//! [`tss_bridge_verifier`]: configuration, logging setup and a single
//! [`ThresholdKeyAdapter`] that runs derivation, share updates and
//! signature export with the configured curve and bridge strategy.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod config;

pub use adapter::ThresholdKeyAdapter;
pub use config::AdapterConfig;

use thiserror::Error;
use tss_bridge_core::{CurveKind, DerivationError, FormatError};
use tss_bridge_verifier::VerifierError;

/// Errors surfaced by the adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Derivation or share update failed
    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),

    /// Encoding or bridging failed
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// The reference verifier disagreed with the bridge
    #[error("Verification error: {0}")]
    Verifier(#[from] VerifierError),

    /// Operation only defined for another curve
    #[error("Operation not supported on {0}")]
    UnsupportedCurve(CurveKind),
}

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Install `env_logger` as the `log` backend
///
/// `filter` uses the `RUST_LOG` syntax and overrides the environment when
/// given. Fails if a logger is already installed.
pub fn init_logging(filter: Option<&str>) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.try_init()
}
