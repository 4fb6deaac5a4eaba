//! Configuration struct definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level dispatcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which worker module to load and how to enter it.
    pub module: ModuleSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

/// Worker module location and entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSection {
    /// Absolute path of the shared object on the mounted filesystem.
    pub path: PathBuf,
    /// Name of the exported factory function.
    pub entry_symbol: String,
}

impl Default for ModuleSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/mnt/efs/modules/libWorkerPlugin.so"),
            entry_symbol: "createPlugin".to_owned(),
        }
    }
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["dynworker_plugins=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "json".to_owned(),
            directives: Vec::new(),
        }
    }
}
