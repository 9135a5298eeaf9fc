//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the slice command
#[derive(Args, Debug)]
pub struct SliceArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    pub start: String,

    /// Stop time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    pub stop: String,

    /// Output file path (default: <input>_sliced_<start>_<stop> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds re-encoded around each cut point
    #[arg(long)]
    pub margin: Option<f64>,

    /// Constant Rate Factor (0-51) when the source bitrate is unknown
    #[arg(long)]
    pub crf: Option<u8>,

    /// Encoding preset for x264/x265
    #[arg(long)]
    pub preset: Option<String>,

    /// Process the regions one after another
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
