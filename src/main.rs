//! Boundary slicer
//!
//! Cuts `[start, stop)` out of a video with frame accuracy while re-encoding
//! only a few seconds around each cut point.
//!
//! # Usage
//!
//! ```bash
//! slicer slice talk.mp4 1:02.5 4:10 --output clip.mp4
//! slicer probe talk.mp4 --json
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use boundary_slicer::app::DefaultAppContainer;
use boundary_slicer::cli::{commands, Cli, Commands};
use boundary_slicer::utils::format_duration;
use boundary_slicer::utils::logging::{init_logging, LoggingOptions};
use boundary_slicer::SliceError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            exit_code(&e)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings().context("Failed to load configuration")?;
    init_logging(&LoggingOptions {
        level: settings.logging.level.clone(),
        json: settings.logging.json,
    })?;

    let container = DefaultAppContainer::new(&settings)?;

    match &cli.command {
        Commands::Slice(args) => {
            info!("Executing slice command");
            let report = commands::slice(&container, args)
                .await
                .with_context(|| format!("Failed to slice {}", args.input.display()))?;
            println!(
                "{} ({:?}, {} segment(s), {})",
                report.output.display(),
                report.plan,
                report.segments,
                format_duration(report.elapsed)
            );
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            let summary = commands::probe(&container, args)
                .await
                .with_context(|| format!("Failed to probe {}", args.input.display()))?;
            println!("{}", summary.trim_end());
        }
    }

    Ok(())
}

/// 2 for mistakes the user can fix in the invocation, 1 for everything else
fn exit_code(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<SliceError>() {
        Some(slice_error) if slice_error.is_user_error() => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}
