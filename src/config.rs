//! Configuration
//!
//! Everything is optional; a missing file or key falls back to the defaults.
//!
//! ```toml
//! [driver]
//! inter_key_delay_ms = 200
//! submit_key = "↵"
//! case = "lower"
//! settle_delay_ms = 0
//!
//! [extractor]
//! unknown_policy = "sentinel"
//! ```

use crate::driver::DriverConfig;
use crate::error::ConfigError;
use crate::extract::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub driver: DriverConfig,
    pub extractor: ExtractorConfig,
}

impl PilotConfig {
    /// Parse TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed TOML or unknown enum values.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

/// Serialize a `Duration` as whole milliseconds
pub mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    /// # Errors
    /// Fails if the value is not a non-negative integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
