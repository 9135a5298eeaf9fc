// Inspect interactor - Probes a source and renders what the slicer sees

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::{SliceError, SliceResult};
use crate::domain::model::SourceInfo;
use crate::ports::ProbePort;
use crate::utils::path::container_extension;

/// Rendering of an inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectFormat {
    Text,
    Json,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Probe `input` into a source snapshot
    pub async fn inspect(&self, input: &Path) -> SliceResult<SourceInfo> {
        if !input.is_file() {
            return Err(SliceError::ProbeFailure(format!(
                "input file does not exist: {}",
                input.display()
            )));
        }
        let info = self.probe_port.probe_source(input).await?;
        info!("Probed {}", input.display());
        Ok(info)
    }

    /// Probe `input` and render the snapshot
    pub async fn summary(&self, input: &Path, format: InspectFormat) -> SliceResult<String> {
        let info = self.inspect(input).await?;
        match format {
            InspectFormat::Json => format_as_json(&info),
            InspectFormat::Text => Ok(format_as_text(input, &info)),
        }
    }
}

pub fn format_as_json(info: &SourceInfo) -> SliceResult<String> {
    serde_json::to_string_pretty(info)
        .map_err(|e| SliceError::ProbeFailure(format!("cannot serialise probe result: {}", e)))
}

pub fn format_as_text(input: &Path, info: &SourceInfo) -> String {
    fn or_unknown<T: ToString>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string())
    }

    let mut text = format!("File: {}\n", input.display());
    text.push_str(&format!("Video codec: {}\n", or_unknown(&info.codec_name)));
    match (info.width, info.height) {
        (Some(w), Some(h)) => text.push_str(&format!("Resolution: {}x{}\n", w, h)),
        _ => text.push_str("Resolution: unknown\n"),
    }
    text.push_str(&format!("Frame rate: {}\n", or_unknown(&info.frame_rate)));
    text.push_str(&format!("Pixel format: {}\n", or_unknown(&info.pix_fmt)));
    text.push_str(&format!(
        "Bitrate: {}\n",
        info.bit_rate
            .map(|b| format!("{} kb/s", b / 1000))
            .unwrap_or_else(|| "unknown".to_string())
    ));
    text.push_str(&format!(
        "Duration: {}\n",
        info.duration
            .map(|d| format!("{:.3}s", d))
            .unwrap_or_else(|| "unknown".to_string())
    ));
    text.push_str(&format!("Audio: {}\n", if info.has_audio { "yes" } else { "no" }));
    text.push_str(&format!("Slice container: {}\n", container_extension(info)));
    text
}
