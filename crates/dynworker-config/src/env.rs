//! Environment variable overrides.
//!
//! Overrides are read from a map rather than the live process environment so
//! callers (and tests) decide what the loader sees.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::types::Config;

/// Prefix shared by every variable this crate reads.
pub const ENV_PREFIX: &str = "DYNWORKER_";
/// Path of the config file to load.
pub const CONFIG_FILE: &str = "DYNWORKER_CONFIG";
/// Overrides `module.path`.
pub const MODULE_PATH: &str = "DYNWORKER_MODULE_PATH";
/// Overrides `module.entry_symbol`.
pub const ENTRY_SYMBOL: &str = "DYNWORKER_ENTRY_SYMBOL";
/// Overrides `logging.level`.
pub const LOG_LEVEL: &str = "DYNWORKER_LOG_LEVEL";
/// Overrides `logging.format`.
pub const LOG_FORMAT: &str = "DYNWORKER_LOG_FORMAT";

/// Snapshot the `DYNWORKER_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Look up a variable, treating empty values as unset.
pub(crate) fn lookup<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Apply overrides to `config`, returning the names of the variables used.
pub(crate) fn apply_env_overrides(
    config: &mut Config,
    env: &HashMap<String, String>,
) -> Vec<String> {
    let mut applied = Vec::new();

    if let Some(path) = lookup(env, MODULE_PATH) {
        config.module.path = PathBuf::from(path);
        applied.push(MODULE_PATH.to_owned());
    }
    if let Some(symbol) = lookup(env, ENTRY_SYMBOL) {
        config.module.entry_symbol = symbol.to_owned();
        applied.push(ENTRY_SYMBOL.to_owned());
    }
    if let Some(level) = lookup(env, LOG_LEVEL) {
        config.logging.level = level.trim().to_ascii_lowercase();
        applied.push(LOG_LEVEL.to_owned());
    }
    if let Some(format) = lookup(env, LOG_FORMAT) {
        config.logging.format = format.trim().to_ascii_lowercase();
        applied.push(LOG_FORMAT.to_owned());
    }

    for name in &applied {
        debug!(var = %name, "applied environment override");
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_overrides_replace_values() {
        let mut config = Config::default();
        let applied = apply_env_overrides(
            &mut config,
            &env(&[
                (MODULE_PATH, "/opt/worker.so"),
                (ENTRY_SYMBOL, "makeWorker"),
                (LOG_LEVEL, "DEBUG"),
                (LOG_FORMAT, "Pretty"),
            ]),
        );

        assert_eq!(config.module.path, PathBuf::from("/opt/worker.so"));
        assert_eq!(config.module.entry_symbol, "makeWorker");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(applied.len(), 4);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = Config::default();
        let applied = apply_env_overrides(&mut config, &env(&[(MODULE_PATH, "  ")]));

        assert_eq!(config, Config::default());
        assert!(applied.is_empty());
    }
}
