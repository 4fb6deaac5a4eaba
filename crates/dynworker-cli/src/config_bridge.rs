//! Bridge from `dynworker_config::Config` to telemetry types.

use anyhow::Result;
use dynworker_config::Config;
use dynworker_telemetry::{LogConfig, LogFormat};

/// Build the logging setup described by `config`.
///
/// `verbose` raises the level to `debug`.
pub(crate) fn to_log_config(config: &Config, verbose: bool) -> Result<LogConfig> {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let format: LogFormat = config.logging.format.parse()?;

    let mut log_config = LogConfig::new(level).with_format(format);
    if format == LogFormat::Json {
        log_config = log_config.without_ansi();
    }
    for directive in &config.logging.directives {
        log_config = log_config.with_directive(directive);
    }
    Ok(log_config)
}

/// Logging setup used when the configuration itself failed to load.
pub(crate) fn fallback_log_config(verbose: bool) -> LogConfig {
    let level = if verbose { "debug" } else { "info" };
    LogConfig::new(level).with_format(LogFormat::Compact)
}
