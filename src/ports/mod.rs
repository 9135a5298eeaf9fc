// Ports - Interface definitions (contracts) for the external media tool

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::SliceResult;
use crate::domain::model::*;

/// Port for media file probing
///
/// Every method fails with `ProbeFailure` when the probing tool exits
/// non-zero or returns malformed metadata.
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Codec, geometry, bitrate and pixel format of the first video stream
    ///
    /// `duration` and `has_audio` are left at their defaults.
    async fn probe_video(&self, path: &Path) -> SliceResult<SourceInfo>;

    /// Container duration; `None` when the container does not report one
    async fn probe_duration(&self, path: &Path) -> SliceResult<Option<f64>>;

    /// Whether any stream is an audio stream
    async fn has_audio(&self, path: &Path) -> SliceResult<bool>;

    /// Full snapshot used for one slice run
    async fn probe_source(&self, path: &Path) -> SliceResult<SourceInfo> {
        let mut info = self.probe_video(path).await?;
        info.duration = self.probe_duration(path).await?;
        info.has_audio = self.has_audio(path).await?;
        Ok(info)
    }
}

/// Port for the encoding tool
///
/// Each call writes `output` and returns its path; any failure is a
/// `ProcessFailure`.
#[async_trait]
pub trait MediaToolPort: Send + Sync {
    /// Codec-preserving extraction of `params.region` at absolute timestamps
    async fn extract(
        &self,
        input: &Path,
        params: &ExtractParams,
        output: &Path,
    ) -> SliceResult<PathBuf>;

    /// Full re-encode, optionally restricted to a trim window
    async fn transcode(
        &self,
        input: &Path,
        params: &TranscodeParams,
        output: &Path,
    ) -> SliceResult<PathBuf>;

    /// Lossless join of same-codec segments in the listed order
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> SliceResult<PathBuf>;
}
