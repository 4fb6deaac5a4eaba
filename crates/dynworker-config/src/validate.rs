//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accepted values for `logging.format`.
pub const LOG_FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Validate a fully-merged configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_module(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_module(config: &Config) -> ConfigResult<()> {
    let m = &config.module;

    if !m.path.is_absolute() {
        return Err(ConfigError::ValidationError {
            field: "module.path".to_owned(),
            message: format!("'{}' is not an absolute path", m.path.display()),
        });
    }

    if m.entry_symbol.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "module.entry_symbol".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }

    if m.entry_symbol.contains('\0') {
        return Err(ConfigError::ValidationError {
            field: "module.entry_symbol".to_owned(),
            message: "must not contain NUL bytes".to_owned(),
        });
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    Ok(())
}
