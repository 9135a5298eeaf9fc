// Slice interactor - Orchestrates the boundary slice use case

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::domain::errors::{SliceError, SliceResult};
use crate::domain::model::{Plan, TimeRange};
use crate::domain::rules::EncodeDefaults;
use crate::engine::{HybridExecutor, SegmentRunner};
use crate::output::{extension_of, OutputWriter};
use crate::planner::{SegmentPlanner, DEFAULT_MARGIN};
use crate::ports::{MediaToolPort, ProbePort};
use crate::utils::path::{container_extension, default_output_path};

/// Prefix of the per-call scratch directory
pub const SCRATCH_PREFIX: &str = "boundary_slice_";

/// Where a slice is written
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Path(PathBuf),
    /// `<stem>_sliced_<start>_<stop>.<ext>` beside the input, named from the
    /// timecodes as the user typed them; the extension follows the probed codec
    BesideInput { start: String, stop: String },
}

impl From<PathBuf> for OutputTarget {
    fn from(path: PathBuf) -> Self {
        OutputTarget::Path(path)
    }
}

/// Request to cut `[start, end)` seconds of `input` into `output`
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRequest {
    pub input: PathBuf,
    pub output: OutputTarget,
    pub start: f64,
    pub end: f64,
}

/// Tunables for one interactor
#[derive(Debug, Clone, PartialEq)]
pub struct SliceOptions {
    pub margin: f64,
    pub parallel_regions: bool,
    /// Parent for scratch directories; system temp dir when `None`
    pub scratch_dir: Option<PathBuf>,
    pub encode: EncodeDefaults,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            parallel_regions: true,
            scratch_dir: None,
            encode: EncodeDefaults::default(),
        }
    }
}

/// Layout the planner chose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    SingleRegion,
    ThreeRegion,
}

/// Outcome of a successful slice
#[derive(Debug, Clone)]
pub struct SliceReport {
    pub output: PathBuf,
    pub plan: PlanKind,
    /// Number of segment files joined into the output
    pub segments: usize,
    pub elapsed: Duration,
}

/// Interactor for the slice use case
pub struct SliceInteractor {
    probe_port: Arc<dyn ProbePort>,
    tool_port: Arc<dyn MediaToolPort>,
    options: SliceOptions,
}

impl SliceInteractor {
    /// Create new slice interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        tool_port: Arc<dyn MediaToolPort>,
        options: SliceOptions,
    ) -> Self {
        Self {
            probe_port,
            tool_port,
            options,
        }
    }

    /// Execute a slice request
    pub async fn execute(&self, request: SliceRequest) -> SliceResult<SliceReport> {
        self.slice_into(&request.input, &request.output, request.start, request.end)
            .await
    }

    /// Cut `[start, end)` of `input` into `output`, all or nothing
    pub async fn slice(
        &self,
        input: &Path,
        output: &Path,
        start: f64,
        end: f64,
    ) -> SliceResult<SliceReport> {
        self.slice_into(input, &OutputTarget::Path(output.to_path_buf()), start, end)
            .await
    }

    async fn slice_into(
        &self,
        input: &Path,
        target: &OutputTarget,
        start: f64,
        end: f64,
    ) -> SliceResult<SliceReport> {
        let started = Instant::now();
        let mut requested = TimeRange::new(start, end)?;

        if !input.is_file() {
            return Err(SliceError::ProbeFailure(format!(
                "input file does not exist: {}",
                input.display()
            )));
        }

        let source = self.probe_port.probe_source(input).await?;
        info!(
            "Source: codec {}, {}x{}, duration {}, audio {}",
            source.codec_name.as_deref().unwrap_or("unknown"),
            source.width.unwrap_or(0),
            source.height.unwrap_or(0),
            source
                .duration
                .map(|d| format!("{:.3}s", d))
                .unwrap_or_else(|| "unknown".to_string()),
            if source.has_audio { "yes" } else { "no" }
        );

        let output = match target {
            OutputTarget::Path(path) => path.clone(),
            OutputTarget::BesideInput { start, stop } => {
                default_output_path(input, start, stop, container_extension(&source))
            }
        };
        let output = output.as_path();
        info!(
            "Slicing {} {} -> {}",
            input.display(),
            requested,
            output.display()
        );

        if let Some(duration) = source.duration.filter(|d| *d > 0.0) {
            if requested.start >= duration {
                return Err(SliceError::InvalidRange(format!(
                    "start {}s is at or beyond the end of the source ({}s)",
                    requested.start, duration
                )));
            }
            if requested.end > duration {
                warn!(
                    "End {}s is past the source duration {}s, slicing to the end of the source",
                    requested.end, duration
                );
                requested = TimeRange::new(requested.start, duration)?;
            }
        }

        let planner = SegmentPlanner::new(self.options.margin);
        let plan = planner.plan(requested, source.duration)?;
        let tasks = planner.tasks(&plan)?;
        log_plan(&plan);

        let scratch = self.scratch_dir()?;
        info!("Scratch directory: {}", scratch.path().display());

        let runner = SegmentRunner::new(
            Arc::clone(&self.tool_port),
            source,
            self.options.encode.clone(),
            scratch.path().to_path_buf(),
            extension_of(output),
        );
        let executor = HybridExecutor::new(runner, self.options.parallel_regions);
        let segments = executor.run(input, &tasks).await?;

        let writer = OutputWriter::new(Arc::clone(&self.tool_port));
        let written = writer.finalize(&segments, scratch.path(), output).await?;

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!("Could not remove scratch directory {}: {}", scratch_path.display(), e);
        }

        let report = SliceReport {
            output: written,
            plan: if plan.is_single_region() {
                PlanKind::SingleRegion
            } else {
                PlanKind::ThreeRegion
            },
            segments: segments.len(),
            elapsed: started.elapsed(),
        };
        info!(
            "Slice complete: {} in {:.2}s",
            report.output.display(),
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    fn scratch_dir(&self) -> SliceResult<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match &self.options.scratch_dir {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

fn log_plan(plan: &Plan) {
    let regions: Vec<String> = plan.regions().iter().map(ToString::to_string).collect();
    info!(
        "Plan: {} with margin {}s: {}",
        if plan.is_single_region() {
            "single region"
        } else {
            "lead-in, middle, lead-out"
        },
        plan.margin,
        regions.join(" ")
    );
}
