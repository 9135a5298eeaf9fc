//! Recording fakes for the probe and media tool ports

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use boundary_slicer::app::{SliceInteractor, SliceOptions};
use boundary_slicer::domain::model::{ExtractParams, SourceInfo, TranscodeParams};
use boundary_slicer::ports::{MediaToolPort, ProbePort};
use boundary_slicer::{SliceError, SliceResult};

/// One invocation seen by [`RecordingTool`]
#[derive(Debug, Clone)]
pub enum Call {
    Extract {
        input: PathBuf,
        params: ExtractParams,
        output: PathBuf,
    },
    Transcode {
        input: PathBuf,
        params: TranscodeParams,
        output: PathBuf,
    },
    Concat {
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },
}

impl Call {
    pub fn output(&self) -> &Path {
        match self {
            Call::Extract { output, .. }
            | Call::Transcode { output, .. }
            | Call::Concat { output, .. } => output,
        }
    }

    pub fn output_name(&self) -> String {
        self.output()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

pub struct FakeProbe {
    pub info: SourceInfo,
    pub calls: AtomicUsize,
}

impl FakeProbe {
    pub fn new(info: SourceInfo) -> Self {
        Self {
            info,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProbePort for FakeProbe {
    async fn probe_video(&self, _path: &Path) -> SliceResult<SourceInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SourceInfo {
            duration: None,
            has_audio: false,
            ..self.info.clone()
        })
    }

    async fn probe_duration(&self, _path: &Path) -> SliceResult<Option<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.duration)
    }

    async fn has_audio(&self, _path: &Path) -> SliceResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.has_audio)
    }
}

/// Writes a small file for every call and records it
#[derive(Default)]
pub struct RecordingTool {
    pub calls: Mutex<Vec<Call>>,
    /// Fail any call whose output file name starts with this prefix
    pub fail_prefix: Option<String>,
    /// Stall any call whose output file name starts with this prefix
    pub stall_prefix: Option<String>,
}

impl RecordingTool {
    pub fn failing_on(prefix: &str) -> Self {
        Self {
            fail_prefix: Some(prefix.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: Call) -> SliceResult<PathBuf> {
        let name = call.output_name();
        let output = call.output().to_path_buf();
        self.calls.lock().unwrap().push(call);

        if let Some(prefix) = &self.stall_prefix {
            if name.starts_with(prefix.as_str()) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
        }
        if let Some(prefix) = &self.fail_prefix {
            if name.starts_with(prefix.as_str()) {
                return Err(SliceError::ProcessFailure {
                    tool: "ffmpeg".to_string(),
                    status: "exit code 1".to_string(),
                    stderr: format!("injected failure for {}", name),
                });
            }
        }

        std::fs::write(&output, name.as_bytes())?;
        Ok(output)
    }
}

#[async_trait]
impl MediaToolPort for RecordingTool {
    async fn extract(
        &self,
        input: &Path,
        params: &ExtractParams,
        output: &Path,
    ) -> SliceResult<PathBuf> {
        self.record(Call::Extract {
            input: input.to_path_buf(),
            params: params.clone(),
            output: output.to_path_buf(),
        })
        .await
    }

    async fn transcode(
        &self,
        input: &Path,
        params: &TranscodeParams,
        output: &Path,
    ) -> SliceResult<PathBuf> {
        self.record(Call::Transcode {
            input: input.to_path_buf(),
            params: params.clone(),
            output: output.to_path_buf(),
        })
        .await
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> SliceResult<PathBuf> {
        self.record(Call::Concat {
            inputs: inputs.to_vec(),
            output: output.to_path_buf(),
        })
        .await
    }
}

pub fn h264_source(duration: Option<f64>, has_audio: bool) -> SourceInfo {
    SourceInfo {
        codec_name: Some("h264".to_string()),
        width: Some(1280),
        height: Some(720),
        bit_rate: Some(4_000_000),
        frame_rate: Some("30/1".to_string()),
        pix_fmt: Some("yuv420p".to_string()),
        duration,
        has_audio,
    }
}

/// Temp workspace with an input file and a dedicated scratch parent
pub struct Workspace {
    pub dir: TempDir,
    pub input: PathBuf,
    pub scratch_parent: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("source.mp4");
        std::fs::write(&input, b"not really a video").unwrap();
        let scratch_parent = dir.path().join("scratch");
        std::fs::create_dir_all(&scratch_parent).unwrap();
        Self {
            dir,
            input,
            scratch_parent,
        }
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join("out").join(name)
    }

    pub fn options(&self, parallel: bool) -> SliceOptions {
        SliceOptions {
            parallel_regions: parallel,
            scratch_dir: Some(self.scratch_parent.clone()),
            ..SliceOptions::default()
        }
    }

    /// Scratch directories still present under the scratch parent
    pub fn leftover_scratch(&self) -> usize {
        std::fs::read_dir(&self.scratch_parent).unwrap().count()
    }

    pub fn interactor(
        &self,
        source: SourceInfo,
        tool: Arc<RecordingTool>,
        parallel: bool,
    ) -> (SliceInteractor, Arc<FakeProbe>) {
        let probe = Arc::new(FakeProbe::new(source));
        let interactor = SliceInteractor::new(probe.clone(), tool, self.options(parallel));
        (interactor, probe)
    }
}
