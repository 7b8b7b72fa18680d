//! Settings file management
//!
//! Optional TOML settings that supply defaults for the command-line flags
//! and the transfer options. The file lives at
//! `$BUCKET_PROBE_CONFIG_DIR/config.toml` when that variable is set, and at
//! `<config dir>/bucket-probe/config.toml` otherwise.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::traits::{DEFAULT_CONCURRENCY, DEFAULT_PART_SIZE, UploadOptions};

/// Current settings schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the settings directory
pub const CONFIG_DIR_ENV: &str = "BUCKET_PROBE_CONFIG_DIR";

/// Bucket address used when neither the flag nor the settings file sets one
pub const DEFAULT_BUCKET_ADDRESS: &str = "http://127.0.0.1:9000/test";

/// Main settings structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Settings schema version
    pub schema_version: u32,

    /// Default flag values
    #[serde(default)]
    pub defaults: Defaults,

    /// Transfer tuning
    #[serde(default)]
    pub transfer: TransferSettings,
}

/// Defaults for the command-line flags
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    /// Target bucket address
    #[serde(default = "default_bucket_address")]
    pub bucket_address: String,

    /// Create the bucket before uploading
    #[serde(default)]
    pub create_bucket: bool,
}

/// Upload tuning
#[derive(Debug, Clone, Deserialize)]
pub struct TransferSettings {
    /// Maximum part transfers in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Part size in bytes
    #[serde(default = "default_part_size")]
    pub part_size: u64,
}

fn default_bucket_address() -> String {
    DEFAULT_BUCKET_ADDRESS.to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_part_size() -> u64 {
    DEFAULT_PART_SIZE
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            bucket_address: default_bucket_address(),
            create_bucket: false,
        }
    }
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            part_size: default_part_size(),
        }
    }
}

impl TransferSettings {
    /// Convert to upload options, clamping out-of-range values
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions::new()
            .concurrency(self.concurrency)
            .part_size(self.part_size)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            transfer: TransferSettings::default(),
        }
    }
}

/// Configuration manager locates and loads the settings file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default settings path
    pub fn new() -> Result<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(Self::with_path(PathBuf::from(dir).join("config.toml")));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        let config_path = config_dir.join("bucket-probe").join("config.toml");
        Ok(Self { config_path })
    }

    /// Create a ConfigManager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the settings file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load settings from disk
    ///
    /// A missing file yields the default settings.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "No settings file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Settings file version {} is newer than supported version {}. Please upgrade bucket-probe.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        Ok(config)
    }
}
