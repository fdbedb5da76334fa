//! Dispatcher configuration via `dispatch.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally placed next to the application's data.
pub const CONFIG_FILE_NAME: &str = "dispatch.toml";

/// Default number of cached handler types.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Errors loading or writing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config file '{path}': {reason}")]
    Io { path: String, reason: String },

    /// The file is not valid TOML for [`DispatchConfig`]
    #[error("failed to parse config: {reason}")]
    Parse { reason: String },

    /// The config could not be serialized
    #[error("failed to serialize config: {reason}")]
    Serialize { reason: String },
}

/// Dispatcher configuration loaded from `dispatch.toml`.
///
/// # Example
///
/// ```toml
/// # Maximum number of cached name -> handler type entries (0 = unbounded)
/// cache_capacity = 1024
///
/// # Wrap every call in the logging filter
/// log_calls = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum cached handler types; `0` disables the bound.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Install the logging filter as the outermost stage.
    #[serde(default = "default_log_calls")]
    pub log_calls: bool,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_log_calls() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            log_calls: default_log_calls(),
        }
    }
}

impl DispatchConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Command dispatch configuration
#
# Maximum number of cached name -> handler type entries.
# When full, an arbitrary entry is evicted and re-resolved on next use.
# 0 disables the bound.
cache_capacity = 1024

# Wrap every call in the logging filter (span per call, debug-level timing).
log_calls = true
"#
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { reason } => ConfigError::Parse {
                reason: format!("'{}': {}", path.display(), reason),
            },
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
