//! Collection configuration module.
//!
//! Handles loading and validating the optional `frontmatter.toml` that sits in
//! the root of a documents directory. Every key is optional: stock defaults
//! match the conventions of a just-the-docs style book (`index.md` as the
//! collection landing page, `# Chapter N: Title` marker lines).
//!
//! ## Config File Location
//!
//! ```text
//! docs/
//! ├── frontmatter.toml         # Optional, applies to the whole collection
//! ├── index.md
//! ├── 01-intro.md
//! └── part-two/
//!     └── 02-setup.md
//! ```
//!
//! A different file can be passed with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! layout = "default"          # Value of the `layout:` key in every header
//! index_file = "index.md"     # File name that marks the collection index
//! extension = "md"            # Only files ending in `.<extension>` are touched
//! marker_prefix = "# Chapter" # Chapter marker line prefix
//!
//! [processing]
//! max_processes = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the documents root when no `--config` is given.
pub const CONFIG_FILENAME: &str = "frontmatter.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Collection configuration loaded from `frontmatter.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Value written to the `layout:` key of every header.
    pub layout: String,
    /// Base name of the collection index document.
    pub index_file: String,
    /// Document extension, without the leading dot.
    pub extension: String,
    /// Prefix identifying the chapter marker line.
    pub marker_prefix: String,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: "default".to_string(),
            index_file: "index.md".to_string(),
            extension: "md".to_string(),
            marker_prefix: "# Chapter".to_string(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Config {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.trim().is_empty() {
            return Err(ConfigError::Validation("layout must not be empty".into()));
        }
        if self.index_file.is_empty() || self.index_file.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "index_file must be a bare file name".into(),
            ));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "extension must be non-empty and given without the leading dot".into(),
            ));
        }
        if self.marker_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "marker_prefix must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load and validate a config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `frontmatter.toml` from the documents root.
///
/// Falls back to stock defaults when the file doesn't exist.
pub fn load_config(root: &Path) -> Result<Config, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    if !path.is_file() {
        return Ok(Config::default());
    }
    load_config_file(&path)
}
