//! CLI module for the slicer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::SliceSettings;
use crate::domain::errors::SliceResult;

pub mod args;
pub mod commands;

/// Boundary slicer
///
/// Cuts a time range out of a video, re-encoding only a short window around
/// each cut point and stream-copying everything in between.
#[derive(Parser, Debug)]
#[command(name = "slicer")]
#[command(about = "Frame-accurate video slicing with minimal re-encoding")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Settings file (default: slicer.toml in the working directory, if present)
    #[arg(long, env = "SLICER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cut a time range out of a video
    Slice(args::SliceArgs),
    /// Show what the slicer sees in a video
    Probe(args::ProbeArgs),
}

impl Cli {
    /// Settings from file and environment with this invocation's flags on top
    pub fn settings(&self) -> SliceResult<SliceSettings> {
        let mut settings = SliceSettings::load(self.config.as_deref())?;
        self.apply_overrides(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(&self, settings: &mut SliceSettings) {
        if let Some(level) = &self.log_level {
            settings.logging.level = level.clone();
        }
        if self.log_json {
            settings.logging.json = true;
        }
        if let Commands::Slice(args) = &self.command {
            if let Some(margin) = args.margin {
                settings.slice.margin = margin;
            }
            if let Some(crf) = args.crf {
                settings.encoder.crf = crf;
            }
            if let Some(preset) = &args.preset {
                settings.encoder.preset = preset.clone();
            }
            if args.sequential {
                settings.slice.parallel_regions = false;
            }
        }
    }
}
