//! Reference verification for the TSS bridge
//!
//! Provides:
//! - An RFC 8032 verifier backed by `ed25519-dalek`
//! - Validation of a bridge strategy against that verifier
//! - Diagnosis of unknown signature encodings by trying known layouts

#![warn(missing_docs)]

pub mod dalek;
pub mod diagnosis;
pub mod validation;

pub use dalek::DalekVerifier;
pub use diagnosis::{diagnose_signature_format, FormatDiagnosis, FormatVariant};
pub use validation::validate_strategy;

use thiserror::Error;
use tss_bridge_core::{BridgeStrategy, FormatError};

/// Verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// The reference verifier rejected output of the selected strategy
    #[error("Bridge strategy {0} rejected by reference verifier")]
    StrategyRejected(BridgeStrategy),

    /// Native artifacts could not be bridged
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result type for verification operations
pub type VerifierResult<T> = Result<T, VerifierError>;
