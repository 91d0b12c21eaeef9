//! Response decoder limits.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LIST_LEN, DEFAULT_MAX_PROCESS_FRAMES};
use crate::error::{BmapError, Result};

/// Bounds applied while decoding one response.
///
/// A misbehaving device can stream an unterminated list or an endless run of
/// PROCESS frames; these limits turn that into an error instead of unbounded
/// memory growth.
///
/// ```yaml
/// max_list_len: 64
/// max_depth: 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Maximum elements in one list response.
    pub max_list_len: usize,
    /// Maximum nesting depth of list responses.
    pub max_depth: usize,
    /// Maximum PROCESS frames skipped in one response.
    pub max_process_frames: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_list_len: DEFAULT_MAX_LIST_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            max_process_frames: DEFAULT_MAX_PROCESS_FRAMES,
        }
    }
}

impl DecoderConfig {
    /// Parse and validate a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: DecoderConfig =
            serde_yaml::from_str(yaml).map_err(|e| BmapError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero bounds.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_list_len", self.max_list_len),
            ("max_depth", self.max_depth),
            ("max_process_frames", self.max_process_frames),
        ] {
            if value == 0 {
                return Err(BmapError::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }
}
