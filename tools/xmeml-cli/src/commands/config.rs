//! Show or write the configuration.

use std::path::PathBuf;

use xmeml_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    if write {
        let written = match path {
            Some(path) => {
                config.save_to(&path)?;
                path
            }
            None => config.save()?,
        };
        println!("Wrote config to {}", written.display());
        return Ok(());
    }

    let path = path.unwrap_or_else(config_file_path);
    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not present, using defaults)");
    }
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
