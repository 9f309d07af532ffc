//! Configuration system for shiftquill.
//!
//! This module provides the configuration structure for shiftquill with sensible defaults
//! and support for serialization/deserialization via serde. Configuration can be loaded
//! from TOML files and merged with command-line arguments.
//!
//! # Example
//!
//! ```
//! use shiftquill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.max_depth, 512);
//! assert_eq!(config.indent_size, 2);
//!
//! // Create custom configuration
//! let custom = Config {
//!     max_depth: 64,
//!     pretty: false,
//!     ..Config::default()
//! };
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for shiftquill.
///
/// # Fields
///
/// * `max_depth` - Deepest walk allowed before a transform fails (default: 512)
/// * `max_array_index` - Largest array position an output path may write to (default: 100000)
/// * `indent_size` - Spaces per indentation level in pretty output (default: 2)
/// * `pretty` - Pretty-print output documents (default: true)
/// * `create_backup` - Create .bak files before overwriting an output file (default: false)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Deepest walk allowed before a transform fails
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Largest array position an output path may write to
    #[serde(default = "default_max_array_index")]
    pub max_array_index: usize,

    /// Number of spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Pretty-print output documents
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Create .bak files before overwriting an output file
    #[serde(default)]
    pub create_backup: bool,
}

/// Returns the default walk depth ceiling.
fn default_max_depth() -> usize {
    crate::shiftr::DEFAULT_MAX_DEPTH
}

/// Returns the default array position ceiling.
fn default_max_array_index() -> usize {
    crate::document::traversr::DEFAULT_MAX_INDEX
}

/// Returns the default indentation size.
fn default_indent_size() -> usize {
    2
}

/// Returns the default for pretty output.
fn default_pretty() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_array_index: default_max_array_index(),
            indent_size: default_indent_size(),
            pretty: default_pretty(),
            create_backup: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/shiftquill/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("shiftquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
