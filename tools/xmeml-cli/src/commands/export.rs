//! Export a manifest to an XMEML document.

use std::path::PathBuf;

use anyhow::Context;
use xmeml_common::config::AppConfig;
use xmeml_common::TargetEditor;
use xmeml_render_engine::{default_file_name, export_project, ExportJob};

use crate::manifest::Manifest;

pub fn run(
    config: &AppConfig,
    manifest_path: PathBuf,
    output: Option<PathBuf>,
    target: Option<TargetEditor>,
) -> anyhow::Result<()> {
    println!("Exporting manifest: {}", manifest_path.display());

    let manifest = Manifest::load(&manifest_path)?;
    let project = manifest
        .build(&config.export)
        .with_context(|| format!("failed to build project from {}", manifest_path.display()))?
        .project;

    let target = target.unwrap_or(project.target());
    for issue in project.validate() {
        tracing::warn!(%issue, "project issue");
    }
    for missing in project.missing_sources() {
        tracing::warn!(%missing, "source not found on disk");
    }

    let output_path = output.unwrap_or_else(|| {
        config
            .export
            .output_dir
            .join(default_file_name(&project.title, target))
    });

    println!("  Title: {}", project.title);
    println!("  Target: {target}");
    println!("  Timelines: {}", project.timelines().len());
    println!("  Media: {}", project.media_pool().len());

    let job = ExportJob::new(&output_path).with_target(target);
    let written = export_project(&project, &job)
        .map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;

    println!("\nExport complete: {}", written.display());
    Ok(())
}
