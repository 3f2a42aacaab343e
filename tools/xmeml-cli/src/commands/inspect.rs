//! Show a manifest's project tree and track allocation.

use std::path::PathBuf;

use anyhow::Context;
use xmeml_common::config::AppConfig;
use xmeml_project_model::{Folder, Project, Timeline, TrackKind};

use crate::manifest::Manifest;

pub fn run(config: &AppConfig, manifest_path: PathBuf) -> anyhow::Result<()> {
    let manifest = Manifest::load(&manifest_path)?;
    let built = manifest
        .build(&config.export)
        .with_context(|| format!("failed to build project from {}", manifest_path.display()))?;
    let project = &built.project;

    println!("Project: {}", project.title);
    println!("  Target: {}", project.target());
    println!("  Media: {}", project.media_pool().len());
    println!();

    println!("Bins:");
    if project.folders().is_empty() {
        println!("  (none)");
    }
    for folder in project.folders() {
        folder.walk(&mut |f, depth| print_folder(project, f, depth));
    }
    println!();

    for (key, id) in &built.timeline_keys {
        let Some(timeline) = project.timeline(*id) else {
            continue;
        };
        println!("Timeline '{key}' ({id}):");
        print_timeline(project, timeline);
        println!();
    }

    let issues = project.validate();
    if issues.is_empty() {
        println!("Project is valid.");
    } else {
        println!("Validation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}

fn print_folder(project: &Project, folder: &Folder, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    println!("{indent}{}/ [{}]", folder.name, folder.color);
    for id in folder.media() {
        let name = project
            .media(*id)
            .map(|m| m.clip_name())
            .unwrap_or_else(|| format!("<unknown media {id}>"));
        println!("{indent}  {name}");
    }
    for id in folder.timelines() {
        let name = project
            .timeline(*id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("<unknown {id}>"));
        println!("{indent}  {name} (sequence)");
    }
}

fn print_timeline(project: &Project, timeline: &Timeline) {
    let geometry = timeline.geometry();
    println!("  Name: {}", timeline.name);
    println!(
        "  Format: {}x{} @ {}fps, start {}",
        geometry.width,
        geometry.height,
        timeline.framerate(),
        timeline.start()
    );
    println!("  Duration: {} frames", timeline.duration_frames());

    for (kind, prefix) in [(TrackKind::Video, 'V'), (TrackKind::Audio, 'A')] {
        for track in 1..=timeline.max_track(kind) {
            let lock = if timeline.is_track_locked(kind, track) {
                " (locked)"
            } else {
                ""
            };
            println!("  {prefix}{track}{lock}");
            for placement in timeline.placements_on_track(kind, track) {
                let name = project
                    .media(placement.media)
                    .map(|m| m.clip_name())
                    .unwrap_or_default();
                let disabled = if placement.enabled { "" } else { " [disabled]" };
                println!(
                    "    {} - {}  {name}{disabled}",
                    placement.timeline_in, placement.timeline_out
                );
            }
        }
    }

    for marker in timeline.markers() {
        match marker.out_point() {
            Some(out) if !marker.is_point() => {
                println!("  Marker '{}' {} - {}", marker.name, marker.in_point(), out)
            }
            _ => println!("  Marker '{}' {}", marker.name, marker.in_point()),
        }
    }
}
