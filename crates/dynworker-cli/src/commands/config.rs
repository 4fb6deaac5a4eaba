//! `dynworker config`: view configuration.

use anyhow::Result;
use dynworker_config::ResolvedConfig;

use crate::theme::Theme;

/// Print the resolved configuration as TOML, preceded by its sources.
pub(crate) fn show_config(resolved: &ResolvedConfig) -> Result<()> {
    println!("{}", Theme::header("# dynworker configuration"));
    match &resolved.file {
        Some(path) => println!("{}", Theme::dimmed(&format!("# file: {}", path.display()))),
        None => println!("{}", Theme::dimmed("# file: none (embedded defaults)")),
    }
    for var in &resolved.env_overrides {
        println!("{}", Theme::dimmed(&format!("# env override: {var}")));
    }
    println!();
    print!("{}", resolved.to_toml()?);
    Ok(())
}
