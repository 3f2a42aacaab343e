//! Xmeml CLI: build editorial projects from JSON manifests and export them.
//!
//! Usage:
//!   xmeml export <MANIFEST>    Write the XMEML document for a manifest
//!   xmeml inspect <MANIFEST>   Show the project tree and track allocation
//!   xmeml init <PATH>          Write a starter manifest
//!   xmeml config               Show or write the configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use xmeml_common::config::AppConfig;
use xmeml_common::{TargetEditor, XmemlError};

mod commands;
mod manifest;

#[derive(Parser)]
#[command(
    name = "xmeml",
    about = "Write XMEML interchange files for Premiere Pro and DaVinci Resolve",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project described by a manifest and write it as XMEML
    Export {
        /// Path to the JSON manifest
        manifest: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Editor to write for: premiere|resolve
        #[arg(long)]
        target: Option<TargetEditor>,
    },

    /// Show the project tree and where each clip was allocated
    Inspect {
        /// Path to the JSON manifest
        manifest: PathBuf,
    },

    /// Write a starter manifest
    Init {
        /// Manifest file to create
        path: PathBuf,

        /// Project title
        #[arg(short, long, default_value = "Untitled")]
        title: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let writing_config = matches!(cli.command, Commands::Config { write: true });
    let config = match &cli.config {
        Some(path) => match AppConfig::load_from(path) {
            Err(XmemlError::FileNotFound { .. }) if writing_config => AppConfig::default(),
            loaded => loaded.with_context(|| format!("failed to load config {}", path.display()))?,
        },
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    xmeml_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Export {
            manifest,
            output,
            target,
        } => commands::export::run(&config, manifest, output, target),
        Commands::Inspect { manifest } => commands::inspect::run(&config, manifest),
        Commands::Init { path, title, force } => commands::init::run(&config, path, title, force),
        Commands::Config { write } => commands::config::run(&config, cli.config, write),
    }
}
