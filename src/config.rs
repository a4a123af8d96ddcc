//! Build configuration.
//!
//! Handles loading, validating, and merging `postmark.toml`. The file lives in
//! the project root (next to `package.json` in a typical blog checkout) and
//! every key is optional:
//!
//! ```toml
//! content_dir = "content"               # Directory scanned for posts
//! output = "generated/content.json"     # Where the manifest is written
//! extension = "mdx"                     # Post file extension, no dot
//!
//! [urls]
//! prefix = "/blog"                      # url = prefix + "/" + slug
//!
//! [reading]
//! words_per_minute = 200                # Reading speed for readingTime
//! ```
//!
//! Stock defaults are serialized to TOML and the user file is merged on top,
//! so a config only needs the keys it changes. Unknown keys are rejected to
//! catch typos early. Relative paths resolve against the project root.

use crate::metadata::DEFAULT_WORDS_PER_MINUTE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILENAME: &str = "postmark.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory scanned (non-recursively) for posts.
    pub content_dir: PathBuf,
    /// Manifest output path.
    pub output: PathBuf,
    /// Post file extension without the leading dot. Case-sensitive.
    pub extension: String,
    pub urls: UrlsConfig,
    pub reading: ReadingConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output: PathBuf::from("generated/content.json"),
            extension: "mdx".to_string(),
            urls: UrlsConfig::default(),
            reading: ReadingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlsConfig {
    /// Path every post URL starts with.
    pub prefix: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            prefix: "/blog".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadingConfig {
    pub words_per_minute: u32,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reading.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "reading.words_per_minute must be greater than 0".into(),
            ));
        }
        if !self.urls.prefix.starts_with('/') || self.urls.prefix.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "urls.prefix must start with '/' and not end with one, got {:?}",
                self.urls.prefix
            )));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "extension must be non-empty and given without a dot, got {:?}",
                self.extension
            )));
        }
        Ok(())
    }

    /// Content directory resolved against the project root.
    pub fn content_path(&self, root: &Path) -> PathBuf {
        root.join(&self.content_dir)
    }

    /// Manifest path resolved against the project root.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, overlay) => overlay,
    }
}

/// Load `postmark.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a project root, falling back to defaults.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    let overlay = load_raw_config(root)?;
    if overlay.is_some() {
        log::debug!("loaded {}", root.join(CONFIG_FILENAME).display());
    }
    resolve_config(overlay)
}

/// Returns a fully-commented stock `postmark.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Postmark Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
# Relative paths are resolved against the directory holding this file.

# Directory scanned for posts. Subdirectories are not descended into.
content_dir = "content"

# Where the JSON manifest is written. Parent directories are created.
output = "generated/content.json"

# Post file extension, without the dot. Matched case-sensitively.
extension = "mdx"

# ---------------------------------------------------------------------------
# URLs
# ---------------------------------------------------------------------------
[urls]
# Every post's url is "<prefix>/<slug>". Must start with '/', no trailing '/'.
prefix = "/blog"

# ---------------------------------------------------------------------------
# Reading time
# ---------------------------------------------------------------------------
[reading]
# Average reading speed used for readingTime ("N min read").
words_per_minute = 200
"##
}
