//! `dynworker resolve`: check that the configured module is present.

use anyhow::{Result, bail};
use dynworker_config::Config;
use dynworker_plugins::ModuleLocator;

use crate::theme::Theme;

/// Resolve the module path, failing if it is missing.
pub(crate) async fn run_resolve(config: &Config) -> Result<()> {
    let locator = ModuleLocator::new(&config.module.path);

    match locator.resolve().await {
        Ok(path) => {
            println!("{}", Theme::success(&path.display().to_string()));
            println!(
                "{}",
                Theme::dimmed(&format!("entry symbol: {}", config.module.entry_symbol))
            );
            Ok(())
        },
        Err(e) => {
            eprintln!("{}", Theme::error(&e.to_string()));
            bail!("module could not be resolved");
        },
    }
}
