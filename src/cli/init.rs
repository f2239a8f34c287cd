use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use shelfwatch::config::CONFIG_FILE_NAME;
use shelfwatch::presets::preset;

pub fn run_init(preset_name: &str, force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{CONFIG_FILE_NAME} already exists. Use --force to overwrite the existing configuration."
        );
    }

    let Some(contents) = preset(preset_name) else {
        anyhow::bail!("Unknown preset '{preset_name}'");
    };

    fs::write(&config_path, contents)
        .with_context(|| format!("Failed to write configuration to {}", config_path.display()))?;

    println!(
        "{CONFIG_FILE_NAME} created with '{}' preset at {}",
        preset_name,
        config_path.display()
    );

    Ok(())
}
