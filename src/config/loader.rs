//! Configuration loader for rtti-probe
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::{
    DEFAULT_ARCHITECTURE, DEFAULT_CONFIG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_MAX_NAME_LEN,
    DEFAULT_MODULE_WINDOW, DEFAULT_TYPE_INFO_OFFSET,
};
use crate::core::types::{AddressRange, PointerWidth};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub heuristics: HeuristicsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target process description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_architecture")]
    pub architecture: PointerWidth,
    /// Overrides the lower plausibility bound of the architecture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plausible_min: Option<u64>,
    /// Overrides the upper plausibility bound of the architecture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plausible_max: Option<u64>,
}

/// Tuning for the type-name heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    #[serde(default = "default_module_window_start")]
    pub module_window_start: u64,
    #[serde(default = "default_module_window_end")]
    pub module_window_end: u64,
    #[serde(default = "default_type_info_offset")]
    pub type_info_offset: u64,
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "default_weak_pointer")]
    pub weak_pointer: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl TargetConfig {
    /// Plausibility window after applying overrides
    pub fn plausible_range(&self) -> AddressRange {
        let base = self.architecture.plausible_range();
        AddressRange::new(
            self.plausible_min.unwrap_or(base.start.as_u64()),
            self.plausible_max.unwrap_or(base.end.as_u64()),
        )
    }
}

impl HeuristicsConfig {
    /// Module window accepted by the structural fallback
    pub fn module_window(&self) -> AddressRange {
        AddressRange::new(self.module_window_start, self.module_window_end)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            architecture: default_architecture(),
            plausible_min: None,
            plausible_max: None,
        }
    }
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        HeuristicsConfig {
            module_window_start: default_module_window_start(),
            module_window_end: default_module_window_end(),
            type_info_offset: default_type_info_offset(),
            max_name_len: default_max_name_len(),
            weak_pointer: default_weak_pointer(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if the file is missing or unreadable
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(ConfigError::FileNotFound(_)) => Config::default(),
            Err(e) => {
                tracing::warn!(path = %self.config_path.display(), error = %e, "using default configuration");
                Config::default()
            }
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads `rtti-probe.toml` from the working directory, falling back to defaults
pub fn load_config() -> Result<Config, ConfigError> {
    Ok(ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default())
}

// Default functions for serde
fn default_architecture() -> PointerWidth {
    DEFAULT_ARCHITECTURE
}

fn default_module_window_start() -> u64 {
    DEFAULT_MODULE_WINDOW.start.as_u64()
}

fn default_module_window_end() -> u64 {
    DEFAULT_MODULE_WINDOW.end.as_u64()
}

fn default_type_info_offset() -> u64 {
    DEFAULT_TYPE_INFO_OFFSET
}

fn default_max_name_len() -> usize {
    DEFAULT_MAX_NAME_LEN
}

fn default_weak_pointer() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
