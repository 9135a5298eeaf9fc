//! Segment execution engine
//!
//! A [`SegmentRunner`] turns one planned [`SegmentTask`] into a segment file
//! inside the scratch directory; [`hybrid::HybridExecutor`] runs all of a
//! plan's tasks and returns their files in output order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::{SliceError, SliceResult};
use crate::domain::model::*;
use crate::domain::rules::{EncodeDefaults, EncoderSelector};
use crate::ports::MediaToolPort;

pub mod hybrid;

pub use hybrid::HybridExecutor;

/// Container used for intermediate segment files
const SEGMENT_EXTENSION: &str = "mkv";

/// Executes the work items of one segment against a scratch directory
pub struct SegmentRunner {
    tool: Arc<dyn MediaToolPort>,
    source: SourceInfo,
    defaults: EncodeDefaults,
    scratch: PathBuf,
    /// Extension for a segment that is itself the final output
    final_extension: String,
}

impl SegmentRunner {
    pub fn new(
        tool: Arc<dyn MediaToolPort>,
        source: SourceInfo,
        defaults: EncodeDefaults,
        scratch: PathBuf,
        final_extension: impl Into<String>,
    ) -> Self {
        Self {
            tool,
            source,
            defaults,
            scratch,
            final_extension: final_extension.into(),
        }
    }

    /// Run every step of `task`, each consuming the previous step's file
    pub async fn run_task(&self, input: &Path, task: &SegmentTask) -> SliceResult<PathBuf> {
        let role = task.role;
        let last = task.steps.len().saturating_sub(1);
        let mut current: Option<PathBuf> = None;

        for (index, step) in task.steps.iter().enumerate() {
            let output = self.step_path(role, step.operation, index == last);
            debug!(
                "{}: {:?} of {} -> {}",
                role,
                step.operation,
                step.source_region,
                output.display()
            );

            let produced = match step.operation {
                Operation::Copy => {
                    let params = ExtractParams {
                        region: step.source_region,
                        include_audio: self.source.has_audio,
                    };
                    self.tool.extract(input, &params, &output).await?
                }
                Operation::IntraConvert => {
                    let chunk = previous(&current, role, step.operation)?;
                    let params = EncoderSelector::intraframe_params(&self.source);
                    self.tool.transcode(chunk, &params, &output).await?
                }
                Operation::CutEncode => {
                    let chunk = previous(&current, role, step.operation)?;
                    let cut = step.relative_cut.ok_or_else(|| {
                        SliceError::PlanningInconsistency(format!(
                            "{} cut-encode step has no relative cut",
                            role
                        ))
                    })?;
                    let params = EncoderSelector::cut_encode_params(&self.source, &self.defaults, cut);
                    self.tool.transcode(chunk, &params, &output).await?
                }
            };
            current = Some(produced);
        }

        let segment = current.ok_or_else(|| {
            SliceError::PlanningInconsistency(format!("{} segment has no work items", role))
        })?;
        info!("Segment {} ready: {}", role, segment.display());
        Ok(segment)
    }

    fn step_path(&self, role: SegmentRole, operation: Operation, is_last: bool) -> PathBuf {
        let suffix = match operation {
            Operation::Copy if is_last => "copy",
            Operation::Copy => "raw",
            Operation::IntraConvert => "intra",
            Operation::CutEncode => "cut",
        };
        let extension = if role == SegmentRole::Single && is_last {
            self.final_extension.as_str()
        } else {
            SEGMENT_EXTENSION
        };
        self.scratch
            .join(format!("{}_{}.{}", role.label(), suffix, extension))
    }
}

fn previous<'a>(
    current: &'a Option<PathBuf>,
    role: SegmentRole,
    operation: Operation,
) -> SliceResult<&'a Path> {
    current.as_deref().ok_or_else(|| {
        SliceError::PlanningInconsistency(format!(
            "{} {:?} step has no extracted chunk to work on",
            role, operation
        ))
    })
}
