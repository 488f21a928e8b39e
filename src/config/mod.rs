//! Configuration module for rtti-probe
//!
//! Provides configuration loading, validation, and default settings.

mod defaults;
mod loader;
mod validator;

pub use defaults::{
    DEFAULT_ARCHITECTURE, DEFAULT_CONFIG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_MAX_NAME_LEN,
    DEFAULT_MODULE_WINDOW, DEFAULT_TYPE_INFO_OFFSET,
};
pub use loader::{
    load_config, Config, ConfigError, ConfigLoader, HeuristicsConfig, LoggingConfig,
    TargetConfig,
};
pub use validator::{validate_config, ConfigValidator, MAX_NAME_LEN_LIMIT};

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
