//! Configuration validator for rtti-probe
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::defaults::VALID_LOG_LEVELS;
use super::loader::{Config, ConfigError, HeuristicsConfig, LoggingConfig, TargetConfig};
use crate::core::types::PointerWidth;

/// Longest name the heuristics will ever read
pub const MAX_NAME_LEN_LIMIT: usize = 4096;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_target(&config.target)?;
        Self::validate_heuristics(&config.heuristics, config.target.architecture)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates the plausibility window
    fn validate_target(target: &TargetConfig) -> Result<(), ConfigError> {
        let range = target.plausible_range();

        if range.start.is_null() {
            return Err(ConfigError::Invalid(
                "Plausible minimum address cannot be 0".to_string(),
            ));
        }

        if range.is_inverted() {
            return Err(ConfigError::Invalid(format!(
                "Plausible address range {} is inverted",
                range
            )));
        }

        if target.architecture == PointerWidth::Width4 && range.end.as_u64() > u64::from(u32::MAX)
        {
            return Err(ConfigError::Invalid(format!(
                "Plausible maximum {} does not fit a 32-bit target",
                range.end
            )));
        }

        Ok(())
    }

    /// Validates heuristic tuning
    fn validate_heuristics(
        heuristics: &HeuristicsConfig,
        architecture: PointerWidth,
    ) -> Result<(), ConfigError> {
        let window = heuristics.module_window();
        if window.is_inverted() {
            return Err(ConfigError::Invalid(format!(
                "Module window {} is inverted",
                window
            )));
        }

        if heuristics.max_name_len == 0 || heuristics.max_name_len > MAX_NAME_LEN_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "Maximum name length must be between 1 and {}",
                MAX_NAME_LEN_LIMIT
            )));
        }

        if heuristics.type_info_offset % architecture.size() as u64 != 0 {
            return Err(ConfigError::Invalid(format!(
                "Type info offset 0x{:X} is not aligned to the {}-byte pointer width",
                heuristics.type_info_offset,
                architecture.size()
            )));
        }

        if !heuristics.weak_pointer {
            tracing::debug!("weak pointer heuristic disabled");
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, VALID_LOG_LEVELS
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> super::ConfigResult<()> {
    ConfigValidator::validate(config)
}
