//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe -of json` and decodes the subset of fields the slicer needs.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::{SliceError, SliceResult};
use crate::domain::model::SourceInfo;
use crate::ports::ProbePort;
use crate::utils::command::ToolRunner;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: String,
    runner: ToolRunner,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    bit_rate: Option<String>,
    r_frame_rate: Option<String>,
    pix_fmt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeFormat {
    bit_rate: Option<String>,
    duration: Option<String>,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(program: impl Into<String>, runner: ToolRunner) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    async fn query(&self, path: &Path, entries: &[&str]) -> SliceResult<String> {
        let mut args: Vec<OsString> = vec!["-v".into(), "error".into()];
        args.extend(entries.iter().map(OsString::from));
        args.extend(["-of".into(), "json".into(), path.as_os_str().to_owned()]);

        let output = self
            .runner
            .run(&self.program, &args)
            .await
            .map_err(|e| SliceError::ProbeFailure(format!("{}: {}", path.display(), e)))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_video(&self, path: &Path) -> SliceResult<SourceInfo> {
        let json = self
            .query(
                path,
                &[
                    "-select_streams",
                    "v:0",
                    "-show_entries",
                    "stream=codec_name,width,height,bit_rate,r_frame_rate,pix_fmt",
                    "-show_entries",
                    "format=bit_rate",
                ],
            )
            .await?;
        let info = parse_video_info(&json)?;
        debug!("Probed video stream of {}: {:?}", path.display(), info);
        Ok(info)
    }

    async fn probe_duration(&self, path: &Path) -> SliceResult<Option<f64>> {
        let json = self
            .query(path, &["-show_entries", "format=duration"])
            .await?;
        parse_duration(&json)
    }

    async fn has_audio(&self, path: &Path) -> SliceResult<bool> {
        let json = self
            .query(path, &["-show_entries", "stream=codec_type"])
            .await?;
        parse_has_audio(&json)
    }
}

fn decode(json: &str) -> SliceResult<ProbeOutput> {
    if json.trim().is_empty() {
        return Err(SliceError::ProbeFailure(
            "ffprobe produced no output".to_string(),
        ));
    }
    serde_json::from_str(json)
        .map_err(|e| SliceError::ProbeFailure(format!("malformed ffprobe output: {}", e)))
}

/// ffprobe reports numbers as strings and uses "N/A" for unknown values
fn numeric<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse::<T>().ok())
}

/// Decode the first video stream, falling back to the container bitrate
pub(crate) fn parse_video_info(json: &str) -> SliceResult<SourceInfo> {
    let output = decode(json)?;
    let stream = output.streams.into_iter().next().ok_or_else(|| {
        SliceError::ProbeFailure("source has no video stream".to_string())
    })?;

    let bit_rate = numeric::<u64>(stream.bit_rate.as_deref()).or_else(|| {
        output
            .format
            .as_ref()
            .and_then(|f| numeric::<u64>(f.bit_rate.as_deref()))
    });

    Ok(SourceInfo {
        codec_name: stream.codec_name,
        width: stream.width,
        height: stream.height,
        bit_rate,
        frame_rate: stream.r_frame_rate,
        pix_fmt: stream.pix_fmt,
        duration: None,
        has_audio: false,
    })
}

pub(crate) fn parse_duration(json: &str) -> SliceResult<Option<f64>> {
    let output = decode(json)?;
    Ok(output
        .format
        .and_then(|f| numeric::<f64>(f.duration.as_deref()))
        .filter(|d| d.is_finite() && *d > 0.0))
}

pub(crate) fn parse_has_audio(json: &str) -> SliceResult<bool> {
    let output = decode(json)?;
    Ok(output
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio")))
}
