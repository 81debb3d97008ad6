//! Core data model shared by derivation, share updates and the bridge

use crate::scalar_codec::encode_be;
use crate::{DerivationError, FormatResult};
use bitcoin_hashes::{hash160, Hash};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First hardened child index (2^31)
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Version bytes of a BIP32 mainnet extended private key, used as the
/// default version tag of derived keys
pub const DEFAULT_HD_VERSION: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];

/// Length of a serialized extended key
pub const EXTENDED_KEY_LENGTH: usize = 78;

/// Participant identifier (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    /// Create a new participant ID
    pub fn new(id: u32) -> Option<Self> {
        if id > 0 {
            Some(ParticipantId(id))
        } else {
            None
        }
    }

    /// Get the underlying u32 value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Affine curve point in the coordinate form used by the key-generation
/// subsystem
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffinePoint {
    /// X coordinate
    pub x: BigUint,
    /// Y coordinate
    pub y: BigUint,
}

impl AffinePoint {
    /// Create from coordinates
    pub fn new(x: BigUint, y: BigUint) -> Self {
        AffinePoint { x, y }
    }

    /// Compressed serialization used as HD derivation input:
    /// `(0x02 | y_parity) || x` with x big-endian
    pub fn hd_serialize(&self) -> FormatResult<[u8; 33]> {
        let mut out = [0u8; 33];
        out[0] = 0x02 | u8::from(self.y.bit(0));
        out[1..].copy_from_slice(&encode_be(&self.x)?);
        Ok(out)
    }

    /// First four bytes of hash160 over [`AffinePoint::hd_serialize`]
    pub fn fingerprint(&self) -> FormatResult<[u8; 4]> {
        let digest = hash160::Hash::hash(&self.hd_serialize()?);
        let mut fp = [0u8; 4];
        fp.copy_from_slice(&digest.as_byte_array()[..4]);
        Ok(fp)
    }
}

/// Ordered list of non-hardened child indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Create from raw indices; hardened indices are rejected at derivation time
    pub fn new(indices: Vec<u32>) -> Self {
        DerivationPath(indices)
    }

    /// Indices in derivation order
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the master key itself
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(indices: Vec<u32>) -> Self {
        DerivationPath(indices)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(indices: &[u32]) -> Self {
        DerivationPath(indices.to_vec())
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    /// Parse `m/0/5/12`; a `'` or `h` suffix marks a hardened level
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = match trimmed.strip_prefix('m') {
            Some("") => return Ok(DerivationPath::default()),
            Some(rest) => rest
                .strip_prefix('/')
                .ok_or_else(|| DerivationError::InvalidPath(trimmed.to_string()))?,
            None => trimmed,
        };

        let mut indices = Vec::new();
        for component in body.split('/') {
            let (digits, hardened) = match component.strip_suffix(&['\'', 'h'][..]) {
                Some(digits) => (digits, true),
                None => (component, false),
            };
            let index: u32 = digits
                .parse()
                .map_err(|_| DerivationError::InvalidPath(format!("bad component {:?}", component)))?;
            if index >= HARDENED_OFFSET {
                return Err(DerivationError::InvalidPath(format!("index {} out of range", index)));
            }
            indices.push(if hardened { index | HARDENED_OFFSET } else { index });
        }

        Ok(DerivationPath(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.0 {
            if *index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

/// Public extended key produced by derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedKey {
    /// Public point
    pub public_key: AffinePoint,
    /// Chain code for further derivation
    #[serde(with = "hex::serde")]
    pub chain_code: [u8; 32],
    /// Number of derivation steps from the master key
    pub depth: u8,
    /// Index this key was derived with (0 for the master)
    pub child_index: u32,
    /// Fingerprint of the parent key
    #[serde(with = "hex::serde")]
    pub parent_fingerprint: [u8; 4],
    /// Version tag
    #[serde(with = "hex::serde")]
    pub version: [u8; 4],
}

impl ExtendedKey {
    /// Root key at depth 0
    pub fn master(public_key: AffinePoint, chain_code: [u8; 32], version: [u8; 4]) -> Self {
        ExtendedKey {
            public_key,
            chain_code,
            depth: 0,
            child_index: 0,
            parent_fingerprint: [0u8; 4],
            version,
        }
    }

    /// Fingerprint of this key
    pub fn fingerprint(&self) -> FormatResult<[u8; 4]> {
        self.public_key.fingerprint()
    }

    /// 78-byte layout: version || depth || parent fingerprint || child index
    /// || chain code || serialized point
    pub fn to_bytes(&self) -> FormatResult<[u8; EXTENDED_KEY_LENGTH]> {
        let mut out = [0u8; EXTENDED_KEY_LENGTH];
        out[0..4].copy_from_slice(&self.version);
        out[4] = self.depth;
        out[5..9].copy_from_slice(&self.parent_fingerprint);
        out[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        out[13..45].copy_from_slice(&self.chain_code);
        out[45..78].copy_from_slice(&self.public_key.hd_serialize()?);
        Ok(out)
    }
}

/// Cumulative scalar offset between the master key and a derived child,
/// reduced modulo the curve order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tweak(BigUint);

impl Tweak {
    /// Reduce `value` modulo `order`
    pub fn new(value: BigUint, order: &BigUint) -> Self {
        Tweak(value % order)
    }

    /// The zero tweak (empty path)
    pub fn zero() -> Self {
        Tweak(BigUint::zero())
    }

    /// Underlying integer
    pub fn as_integer(&self) -> &BigUint {
        &self.0
    }

    /// True when no offset applies
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// One participant's public view of the sharing
///
/// `big_xj[j]` is the public share `x_j·G` of participant `j`; there is one
/// entry per participant in the scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// Group public key
    pub public_key: AffinePoint,
    /// Public shares of every participant, in participant order
    pub big_xj: Vec<AffinePoint>,
}

impl ShareRecord {
    /// Create a record
    pub fn new(public_key: AffinePoint, big_xj: Vec<AffinePoint>) -> Self {
        ShareRecord { public_key, big_xj }
    }

    /// Number of participants this record describes
    pub fn num_participants(&self) -> usize {
        self.big_xj.len()
    }
}
