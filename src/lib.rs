//! Boundary slicer library
//!
//! Frame-accurate video slicing that re-encodes only the regions around each
//! cut point and stream-copies the rest. The core is laid out in hexagonal
//! style: `domain` holds the model and rules, `ports` the contracts for the
//! external probing and encoding tools, `adapters` their ffprobe/ffmpeg
//! implementations and `app` the use cases.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{SliceInteractor, SliceOptions, SliceReport, SliceRequest};
pub use domain::errors::{SliceError, SliceResult};
pub use domain::model::{SourceInfo, TimeRange};
