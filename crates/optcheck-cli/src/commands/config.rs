//! `optcheck config` - configuration file management

use anyhow::{bail, Context};
use console::style;
use optcheck_core::Config;
use std::path::Path;

/// Create a default configuration file at the given path
pub fn init(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    Config::default()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", style(path.display()).bold());
    Ok(())
}

/// Print the effective configuration as pretty JSON
pub fn show(config: &Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
