//! Bridge configuration.
//!
//! ```toml
//! memory-growth = "allow"
//! max-memory-bytes = 16777216
//! fuel = 50000000
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// What the allocator does when a request runs past the end of linear memory.
///
/// Whether a module tolerates its memory growing in the middle of a call is
/// not something the host can check, so growth is opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryGrowth {
    /// Fail the request with [`BridgeError::OutOfMemory`](crate::BridgeError::OutOfMemory).
    #[default]
    Deny,
    /// Grow the memory far enough to satisfy the request.
    Allow,
}

/// Settings for loading and driving a foreign module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BridgeConfig {
    /// Allocator growth policy.
    pub memory_growth: MemoryGrowth,
    /// Upper bound on linear memory size, enforced by the runtime.
    pub max_memory_bytes: Option<u64>,
    /// Fuel granted to each foreign call. `None` disables metering.
    pub fuel: Option<u64>,
}

/// Errors produced while loading a [`BridgeConfig`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[display("failed to read config file {}", path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[display("invalid config: {source}")]
    Parse {
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

impl BridgeConfig {
    /// Parses a configuration from TOML text.
    ///
    /// Missing keys take their defaults; unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed or unknown settings.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { source })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.memory_growth, MemoryGrowth::Deny);
        assert_eq!(config.fuel, None);
    }

    #[test]
    fn test_full_config() {
        let config = BridgeConfig::from_toml_str(
            r#"
            memory-growth = "allow"
            max-memory-bytes = 1048576
            fuel = 1000
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            BridgeConfig {
                memory_growth: MemoryGrowth::Allow,
                max_memory_bytes: Some(1_048_576),
                fuel: Some(1000),
            }
        );
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = BridgeConfig::from_toml_str("memory_growth = \"allow\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(BridgeConfig::from_toml_str("memory-growth = \"sometimes\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = BridgeConfig::from_file("/nonexistent/bridoku.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/bridoku.toml"));
    }
}
