//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// terra command-line arguments.
///
/// CLI values override settings loaded from `terra.ron`.
#[derive(Parser, Debug)]
#[command(name = "terra", about = "Grid-based polygon tessellator")]
pub struct CliArgs {
    /// RON dataset to tessellate. A built-in sample is used when omitted.
    pub dataset: Option<PathBuf>,

    /// Grid cells per side.
    #[arg(long, short = 'n')]
    pub subdivisions: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(n) = args.subdivisions {
            self.tessellation.subdivisions = n;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
