// Domain models - Core types and data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{SliceError, SliceResult};
use crate::utils::time::format_seconds;

/// Half-open time window `[start, end)` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    /// Create a validated range; `start` must be non-negative and `end > start`
    pub fn new(start: f64, end: f64) -> SliceResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SliceError::InvalidRange(format!(
                "bounds must be finite (start {}, end {})",
                start, end
            )));
        }
        if start < 0.0 {
            return Err(SliceError::InvalidRange(format!(
                "start ({}) cannot be negative",
                format_seconds(start)
            )));
        }
        if end <= start {
            return Err(SliceError::InvalidRange(format!(
                "end ({}) must be greater than start ({})",
                format_seconds(end),
                format_seconds(start)
            )));
        }
        Ok(Self { start, end })
    }

    /// Length of the range in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", format_seconds(self.start), format_seconds(self.end))
    }
}

/// Snapshot of the source's first video stream and container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Stream bitrate, or the container bitrate when the stream has none
    pub bit_rate: Option<u64>,
    pub frame_rate: Option<String>,
    pub pix_fmt: Option<String>,
    /// `None` when the container does not report one
    pub duration: Option<f64>,
    pub has_audio: bool,
}

/// Region layout chosen by the planner
#[derive(Debug, Clone, PartialEq)]
pub enum PlanLayout {
    /// Short clip: both margin windows collide, one region is re-encoded
    SingleRegion { region: TimeRange },
    /// Re-encoded lead-in, stream-copied middle, re-encoded lead-out
    ThreeRegion {
        lead_in: TimeRange,
        middle: Option<TimeRange>,
        lead_out: TimeRange,
    },
}

/// Planner output for one slice request
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub requested: TimeRange,
    pub margin: f64,
    pub layout: PlanLayout,
}

impl Plan {
    /// Whether this is the short-clip layout
    pub fn is_single_region(&self) -> bool {
        matches!(self.layout, PlanLayout::SingleRegion { .. })
    }

    /// Regions in output order
    pub fn regions(&self) -> Vec<TimeRange> {
        match &self.layout {
            PlanLayout::SingleRegion { region } => vec![*region],
            PlanLayout::ThreeRegion {
                lead_in,
                middle,
                lead_out,
            } => {
                let mut regions = vec![*lead_in];
                regions.extend(middle.iter().copied());
                regions.push(*lead_out);
                regions
            }
        }
    }
}

/// Operation applied to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Codec-preserving extraction at absolute source timestamps
    Copy,
    /// Re-encode the extracted chunk so every frame decodes on its own
    IntraConvert,
    /// Exact trim plus final encode matched to the source
    CutEncode,
}

/// One external invocation within a segment's pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub source_region: TimeRange,
    pub operation: Operation,
    /// Final trim relative to the start of the extracted chunk
    pub relative_cut: Option<TimeRange>,
}

/// Position of a segment within the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentRole {
    Single,
    LeadIn,
    Middle,
    LeadOut,
}

impl SegmentRole {
    /// Stable label used for scratch file names and logs
    pub fn label(&self) -> &'static str {
        match self {
            SegmentRole::Single => "single",
            SegmentRole::LeadIn => "lead_in",
            SegmentRole::Middle => "middle",
            SegmentRole::LeadOut => "lead_out",
        }
    }
}

impl fmt::Display for SegmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered work items producing one segment file
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentTask {
    pub role: SegmentRole,
    pub steps: Vec<WorkItem>,
}

impl SegmentTask {
    /// Whether any step re-encodes
    pub fn reencodes(&self) -> bool {
        self.steps.iter().any(|s| s.operation != Operation::Copy)
    }
}

/// Parameters for a codec-preserving region extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractParams {
    pub region: TimeRange,
    pub include_audio: bool,
}

/// Video encoders the orchestrator can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoEncoder {
    /// Lossless intra-only intermediate
    Ffv1,
    X264,
    X265,
    Vp9,
    SvtAv1,
}

impl VideoEncoder {
    /// Encoder name understood by ffmpeg
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            VideoEncoder::Ffv1 => "ffv1",
            VideoEncoder::X264 => "libx264",
            VideoEncoder::X265 => "libx265",
            VideoEncoder::Vp9 => "libvpx-vp9",
            VideoEncoder::SvtAv1 => "libsvtav1",
        }
    }

    /// Whether the encoder takes an x264-style `-preset`
    pub fn supports_preset(&self) -> bool {
        matches!(self, VideoEncoder::X264 | VideoEncoder::X265)
    }

    /// Highest CRF value the encoder accepts
    pub fn max_crf(&self) -> u8 {
        match self {
            VideoEncoder::X264 | VideoEncoder::X265 => 51,
            VideoEncoder::Vp9 | VideoEncoder::SvtAv1 => 63,
            VideoEncoder::Ffv1 => 0,
        }
    }
}

/// Video rate control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateControl {
    /// Target bitrate in bits per second
    Bitrate(u64),
    /// Constant quality target
    Crf(u8),
}

/// Video encoding parameters for one transcode
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEncoding {
    pub encoder: VideoEncoder,
    pub rate: Option<RateControl>,
    pub preset: Option<String>,
    pub pix_fmt: Option<String>,
    /// Encoder level (FFV1 version for the intermediate)
    pub level: Option<u8>,
}

/// Audio encoding parameters for one transcode
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEncoding {
    Flac,
    Aac { bitrate: String },
}

/// Parameters for a full re-encode, optionally restricted to a trim window
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeParams {
    pub video: VideoEncoding,
    /// `None` means no audio stream is mapped at all
    pub audio: Option<AudioEncoding>,
    /// Window relative to the input's own timeline
    pub trim: Option<TimeRange>,
}

impl TranscodeParams {
    /// Reject parameters that must never reach the encoding tool
    pub fn validate(&self) -> SliceResult<()> {
        if let Some(trim) = &self.trim {
            if trim.start < 0.0 || trim.end <= trim.start {
                return Err(SliceError::InvalidParameters(format!(
                    "trim window {} is empty or negative",
                    trim
                )));
            }
        }

        let video = &self.video;
        match video.rate {
            Some(RateControl::Crf(crf)) if crf > video.encoder.max_crf() => {
                return Err(SliceError::InvalidParameters(format!(
                    "CRF {} exceeds {} for {}",
                    crf,
                    video.encoder.max_crf(),
                    video.encoder.ffmpeg_name()
                )));
            }
            Some(RateControl::Bitrate(0)) => {
                return Err(SliceError::InvalidParameters(
                    "video bitrate cannot be zero".to_string(),
                ));
            }
            _ => {}
        }

        if let Some(preset) = &video.preset {
            check_token("preset", preset)?;
        }
        if let Some(pix_fmt) = &video.pix_fmt {
            check_token("pixel format", pix_fmt)?;
        }
        if let Some(AudioEncoding::Aac { bitrate }) = &self.audio {
            check_token("audio bitrate", bitrate)?;
        }
        Ok(())
    }
}

/// Option values must be plain identifiers, never something ffmpeg reads as a flag
fn check_token(what: &str, value: &str) -> SliceResult<()> {
    let valid = !value.is_empty()
        && !value.starts_with('-')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(SliceError::InvalidParameters(format!(
            "{} '{}' is not a plain token",
            what, value
        )))
    }
}

#[cfg(test)]
mod tests;
