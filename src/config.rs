//! Adapter configuration
//!
//! Read from a JSON document; every field is optional:
//!
//! ```json
//! {
//!   "curve": "ed25519",
//!   "bridge_strategy": "passthrough",
//!   "hd_version": "0488ade4",
//!   "log_filter": "tss_bridge_core=debug"
//! }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tss_bridge_core::{BridgeStrategy, CurveKind, DEFAULT_HD_VERSION};

/// Settings for a [`crate::ThresholdKeyAdapter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Curve the shared key lives on
    pub curve: CurveKind,
    /// Encoding convention towards the verifier
    pub bridge_strategy: BridgeStrategy,
    /// Version tag written into extended keys
    #[serde(with = "hex::serde")]
    pub hd_version: [u8; 4],
    /// `RUST_LOG`-style filter passed to [`crate::init_logging`]
    pub log_filter: Option<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            curve: CurveKind::default(),
            bridge_strategy: BridgeStrategy::default(),
            hd_version: DEFAULT_HD_VERSION,
            log_filter: None,
        }
    }
}

impl AdapterConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse adapter configuration")
    }

    /// Read and parse a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read adapter configuration from {}", path.display()))?;
        let config = Self::from_json(&json).with_context(|| format!("Invalid configuration in {}", path.display()))?;
        log::debug!(
            "Loaded adapter configuration: curve={}, strategy={}",
            config.curve,
            config.bridge_strategy
        );
        Ok(config)
    }

    /// Install the logger with [`AdapterConfig::log_filter`]
    pub fn init_logging(&self) -> Result<(), log::SetLoggerError> {
        crate::init_logging(self.log_filter.as_deref())
    }
}
