use std::path::Path;

use anyhow::{Context, Result};

use shelfwatch::ShelfwatchConfig;

pub fn run_rules_list(config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => ShelfwatchConfig::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ShelfwatchConfig::load().context("Failed to load configuration")?,
    };
    let catalog = config.rule_catalog()?;

    println!("Rules ({}):", catalog.len());
    println!(
        "{:<26} {:<9} {:>6}  Regulation",
        "KEY", "SEVERITY", "WEIGHT"
    );
    println!("{}", "-".repeat(90));

    for rule in catalog.iter() {
        let disabled = config.rules.disable.iter().any(|d| d == rule.key.as_ref());
        let regulation = rule
            .regulation
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        println!(
            "{:<26} {:<9} {:>6}  {}{}",
            rule.key,
            rule.severity.as_str(),
            rule.weight,
            regulation,
            if disabled { " (disabled)" } else { "" }
        );
    }

    Ok(())
}
