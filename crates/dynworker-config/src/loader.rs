//! Config file loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge the config file, if one is given or named by `DYNWORKER_CONFIG`
//! 3. Deserialize merged tree → `Config`
//! 4. Apply `DYNWORKER_*` overrides
//! 5. Validate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::env::{self, apply_env_overrides};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: usize = 1_048_576;

/// A loaded configuration and where its values came from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// The validated configuration.
    pub config: Config,
    /// Config file merged over the defaults, if any.
    pub file: Option<PathBuf>,
    /// Environment variables that overrode a value.
    pub env_overrides: Vec<String>,
}

impl ResolvedConfig {
    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if rendering fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.config)?)
    }
}

/// Load configuration from defaults, an optional file, and `env`.
///
/// An explicit `file` takes precedence over `DYNWORKER_CONFIG`. A named file
/// that does not exist is an error.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or the
/// final configuration fails validation.
pub fn load(file: Option<&Path>, env: &HashMap<String, String>) -> ConfigResult<ResolvedConfig> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let file = file
        .map(Path::to_path_buf)
        .or_else(|| env::lookup(env, env::CONFIG_FILE).map(PathBuf::from));

    if let Some(path) = &file {
        let overlay = load_file(path)?;
        deep_merge(&mut merged, overlay);
        info!(path = %path.display(), "loaded config file");
    }

    let mut config: Config = merged.try_into().map_err(|e| ConfigError::ParseError {
        path: file
            .as_ref()
            .map_or_else(|| "<embedded defaults>".to_owned(), |p| p.display().to_string()),
        source: e,
    })?;

    let env_overrides = apply_env_overrides(&mut config, env);
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        file,
        env_overrides,
    })
}

fn load_file(path: &Path) -> ConfigResult<toml::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    // Check size after reading to avoid TOCTOU between stat and read.
    if content.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len(),
            ),
        });
    }

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Merge `overlay` into `base`, recursing into tables.
fn deep_merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    },
                }
            }
        },
        (base, overlay) => *base = overlay,
    }
}
