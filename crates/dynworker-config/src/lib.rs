#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for the dynworker dispatcher.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dynworker_config::{Config, env};
//!
//! let resolved = Config::load(None, &env::collect_env_vars()).unwrap();
//! println!("module: {}", resolved.config.module.path.display());
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Environment variables** (`DYNWORKER_MODULE_PATH`, `DYNWORKER_ENTRY_SYMBOL`,
//!    `DYNWORKER_LOG_LEVEL`, `DYNWORKER_LOG_FORMAT`)
//! 2. **Config file** (`--config` or `DYNWORKER_CONFIG`)
//! 3. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! This crate has no dependencies on other dynworker crates.

/// Environment variable overrides.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config file is malformed or the final
    /// configuration fails validation.
    pub fn load(
        file: Option<&std::path::Path>,
        env: &std::collections::HashMap<String, String>,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(file, env)
    }
}
