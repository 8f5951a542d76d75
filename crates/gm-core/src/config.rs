//! Configuration structures for the genkit-migrate tool.
//!
//! - [`ScanConfig`] - Walker settings (extra skip directories, symlinks)
//! - [`OutputConfig`] - Default report format for `analyze`
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] and deserialize with
//! `#[serde(default)]`, so a configuration file only needs the keys it changes.
//! Command-line flags always take precedence over file values.

use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Provider;

/// Configuration for the project walker.
///
/// # Examples
///
/// ```
/// use gm_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.extra_skip_dirs.is_empty());
/// assert!(!config.follow_links);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names pruned in addition to `vendor` and `.git`.
    pub extra_skip_dirs: Vec<String>,

    /// Whether to follow symbolic links while walking.
    pub follow_links: bool,
}

/// Configuration for analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default format for `analyze` (`table` or `json`).
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "table".to_owned(),
        }
    }
}

/// Root configuration for the genkit-migrate tool.
///
/// # Examples
///
/// ```
/// use gm_core::{Config, Provider};
///
/// let config = Config::default();
/// assert_eq!(config.default_source_provider, Provider::Gcp);
/// assert_eq!(config.default_target_provider, Provider::Aws);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider assumed for the source project when `--from` is omitted.
    pub default_source_provider: Provider,

    /// Provider targeted when `--to` is omitted.
    pub default_target_provider: Provider,

    /// Walker configuration.
    pub scan: ScanConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source_provider: Provider::Gcp,
            default_target_provider: Provider::Aws,
            scan: ScanConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingFile`] if `path` does not exist
    /// - [`ConfigError::Io`] if the file cannot be read
    /// - [`ConfigError::Parse`] if the file is not valid JSON for this schema
    /// - [`ConfigError::InvalidOption`] if [`validate`](Self::validate) fails
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        if !path.is_file() {
            return Err(ConfigError::InvalidPath {
                path: path.to_owned(),
                reason: "not a regular file".to_owned(),
            });
        }

        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path` if given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Checks option values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the default target is
    /// `unknown` or an extra skip directory is empty or contains a separator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_target_provider == Provider::Unknown {
            return Err(ConfigError::InvalidOption {
                option: "default_target_provider".to_owned(),
                reason: "a concrete target provider is required".to_owned(),
            });
        }

        if let Some(bad) = self
            .scan
            .extra_skip_dirs
            .iter()
            .find(|dir| dir.is_empty() || dir.contains(['/', '\\']))
        {
            return Err(ConfigError::InvalidOption {
                option: "scan.extra_skip_dirs".to_owned(),
                reason: format!("'{bad}' must be a single directory name"),
            });
        }

        Ok(())
    }
}
