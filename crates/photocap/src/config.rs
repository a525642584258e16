//! Configuration management for photocap.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::device::TEST_PATTERN_DEVICE;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "photocap";

/// Extension of slot files under the data directory.
const SLOT_FILE_EXTENSION: &str = "json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PHOTOCAP_`)
/// 2. TOML config file at `~/.config/photocap/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Capture configuration.
    pub capture: CaptureConfig,
    /// Sync mirror configuration.
    pub sync: SyncConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding slot files.
    /// Defaults to `~/.local/share/photocap`.
    pub data_dir: Option<PathBuf>,
    /// Name of the persistent slot holding the capture sequence.
    pub slot_name: String,
}

/// Capture-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Device to stream from.
    pub device: String,
    /// Raster buffer width in pixels.
    pub width: u32,
    /// Raster buffer height in pixels.
    pub height: u32,
}

/// Sync-mirror configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Mirror each capture to the remote write endpoint.
    pub enabled: bool,
    /// The write endpoint URL.
    pub endpoint: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            slot_name: "captured_images".to_string(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: TEST_PATTERN_DEVICE.to_string(),
            width: 300,
            height: 200,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:5000/api/images".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `PHOTOCAP_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("PHOTOCAP_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "capture dimensions must be nonzero (got {}x{})",
                    self.capture.width, self.capture.height
                ),
            });
        }

        if self.storage.slot_name.is_empty() {
            return Err(Error::ConfigValidation {
                message: "slot_name must not be empty".to_string(),
            });
        }

        if self.sync.enabled && self.sync.endpoint.is_empty() {
            return Err(Error::ConfigValidation {
                message: "sync.endpoint must not be empty when sync is enabled".to_string(),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Path of the slot file holding the capture sequence.
    #[must_use]
    pub fn slot_path(&self) -> PathBuf {
        self.data_dir()
            .join(format!("{}.{SLOT_FILE_EXTENSION}", self.storage.slot_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.capture.device, TEST_PATTERN_DEVICE);
        assert_eq!(config.capture.width, 300);
        assert_eq!(config.capture.height, 200);
        assert!(config.sync.enabled);
    }

    #[test]
    fn test_default_storage_config() {
        let storage = StorageConfig::default();

        assert!(storage.data_dir.is_none());
        assert_eq!(storage.slot_name, "captured_images");
    }

    #[test]
    fn test_default_sync_config() {
        let sync = SyncConfig::default();

        assert!(sync.enabled);
        assert_eq!(sync.endpoint, "http://localhost:5000/api/images");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_dimensions() {
        let mut config = Config::default();
        config.capture.width = 0;

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("capture dimensions"));
    }

    #[test]
    fn test_validate_empty_slot_name() {
        let mut config = Config::default();
        config.storage.slot_name = String::new();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("slot_name"));
    }

    #[test]
    fn test_validate_empty_endpoint_when_enabled() {
        let mut config = Config::default();
        config.sync.endpoint = String::new();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("sync.endpoint"));
    }

    #[test]
    fn test_validate_empty_endpoint_allowed_when_disabled() {
        let mut config = Config::default();
        config.sync.enabled = false;
        config.sync.endpoint = String::new();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slot_path_uses_slot_name() {
        let config = Config::default();
        let path = config.slot_path();

        assert!(path.to_string_lossy().contains("captured_images.json"));
    }

    #[test]
    fn test_slot_path_custom_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/custom/data"));

        assert_eq!(
            config.slot_path(),
            PathBuf::from("/custom/data/captured_images.json")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("photocap"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("photocap"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("slot_name"));
        assert!(json.contains("endpoint"));
    }

    #[test]
    fn test_capture_config_deserialize() {
        let json = r#"{"device": "test-pattern", "width": 640, "height": 480}"#;
        let capture: CaptureConfig = serde_json::from_str(json).unwrap();
        assert_eq!(capture.width, 640);
        assert_eq!(capture.height, 480);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
