//! Output path helpers

use std::path::{Path, PathBuf};

use crate::domain::model::SourceInfo;
use crate::utils::time::sanitize_for_filename;

/// Container extension matching the source codec: WebM for VP8/VP9, else MP4
pub fn container_extension(source: &SourceInfo) -> &'static str {
    match source.codec_name.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("vp8") | Some("vp9") => "webm",
        _ => "mp4",
    }
}

/// `<stem>_sliced_<start>_<stop>.<ext>` next to `input`
///
/// The timecodes are used as typed, made filename-safe.
pub fn default_output_path(input: &Path, start: &str, stop: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let name = format!(
        "{}_sliced_{}_{}.{}",
        stem,
        sanitize_for_filename(start),
        sanitize_for_filename(stop),
        extension
    );
    input.with_file_name(name)
}
