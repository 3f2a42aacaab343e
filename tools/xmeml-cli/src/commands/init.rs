//! Write a starter manifest.

use std::path::PathBuf;

use xmeml_common::config::AppConfig;

use crate::manifest::Manifest;

pub fn run(config: &AppConfig, path: PathBuf, title: String, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let manifest = Manifest::starter(&title, &config.export);
    manifest.save(&path)?;

    println!("Created manifest '{}' at {}", title, path.display());
    println!(
        "  Target: {}",
        manifest.target.unwrap_or(config.export.target)
    );
    println!(
        "  Timeline: {}x{} @ {}fps",
        config.export.width, config.export.height, config.export.framerate
    );
    println!();
    println!("Edit the media locations, then run:");
    println!("  xmeml export {}", path.display());

    Ok(())
}
