//! Threshold key adapter core
//!
//! Pieces that sit between a threshold signing protocol and the outside world:
//! - Public-only HD derivation producing a child key and a cumulative tweak
//! - Homomorphic application of that tweak to every participant's public shares
//! - Fixed-width scalar and compressed-point codecs for edwards25519
//! - Conversion of native signatures and keys into the verifier-facing encoding
//!
//! Everything here is synchronous and free of global state. Randomness is
//! always supplied by the caller.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod scalar_codec;
pub mod field;
pub mod point_codec;
pub mod curve;
pub mod types;
pub mod derivation;
pub mod share_update;
pub mod interpolation;
pub mod format_bridge;

pub use types::*;
pub use scalar_codec::{ScalarBuffer, SCALAR_LENGTH};
pub use point_codec::{compress, lift_blinded, CompressedPoint, ExtendedPoint};
pub use curve::{CurveKind, Ed25519, HdCurve, Secp256k1};
pub use derivation::DeltaDeriver;
pub use share_update::ShareUpdater;
pub use interpolation::interpolate_public_key;
pub use format_bridge::{BridgeStrategy, FormatBridge, SignatureRs, StandardVerifier, SIGNATURE_LENGTH};

use thiserror::Error;

/// Errors raised while deriving child keys or updating shares
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// Hardened derivation needs private key material
    #[error("Hardened derivation index {0:#010x} rejected (public-only derivation)")]
    HardenedIndexRejected(u32),

    /// A derived point collapsed to the identity
    #[error("Derived point at depth {depth} is the identity")]
    IdentityPoint {
        /// Depth at which the identity appeared (0 for the master point)
        depth: u8,
    },

    /// A point could not be decoded or the sum is not representable
    #[error("Point arithmetic failure: {0}")]
    PointArithmeticFailure(String),

    /// More levels than the one-byte depth field can record
    #[error("Derivation path has {0} levels, at most 255 are supported")]
    PathTooDeep(usize),

    /// Textual path could not be parsed
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    /// Share records disagree on the number of participants
    #[error("Inconsistent share records: {0}")]
    InconsistentShareRecords(String),

    /// Share interpolation was given unusable input
    #[error("Interpolation failed: {0}")]
    InterpolationFailure(String),

    /// Coordinate encoding failed
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Errors raised by the codecs and the format bridge
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Buffer has the wrong size
    #[error("Wrong length: expected {expected} bytes, got {actual}")]
    WrongLength {
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Integer does not fit in 256 bits
    #[error("Integer of {bits} bits does not fit in a 32-byte buffer")]
    ScalarOverflow {
        /// Bit length of the rejected integer
        bits: u64,
    },

    /// The random source produced a zero blinding factor
    #[error("Blinding factor is zero")]
    DegenerateBlinding,
}

/// Result type for derivation and share updates
pub type DerivationResult<T> = Result<T, DerivationError>;

/// Result type for codec and bridge operations
pub type FormatResult<T> = Result<T, FormatError>;
