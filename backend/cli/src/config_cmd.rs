//! `petpal config show|init`.

use std::path::Path;

use anyhow::{bail, Context, Result};

use petpal_config::{apply_all_defaults, redact, write_config, PetPalConfig};

use crate::terminal_output::note_success;

pub fn show(config: &PetPalConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

/// Resolved config as YAML with secrets masked.
fn render(config: &PetPalConfig) -> Result<String> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    serde_yaml::to_string(&redact(&value)).context("Failed to render config as YAML")
}

pub async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    write_config(&apply_all_defaults(PetPalConfig::default()), path).await?;
    note_success(&format!("Wrote {}", path.display()));
    Ok(())
}
