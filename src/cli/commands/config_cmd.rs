//! config command - Show the resolved configuration

use crate::cli::Context;
use crate::core::config::{LoadedConfig, Overrides, Settings};
use crate::ui::output::format_pairs;
use anyhow::Result;

/// Print the settings a run would use, credentials redacted.
pub fn config(ctx: &Context) -> Result<()> {
    let loaded = LoadedConfig::load(&ctx.cwd)?;
    let settings = Settings::resolve(
        &loaded.file,
        |key| std::env::var(key).ok(),
        &Overrides::default(),
    )?;

    let source = loaded
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none, using defaults)".to_string());

    println!("# Config file: {}", source);
    println!("{}", format_pairs(&settings.redacted_entries()));
    Ok(())
}
