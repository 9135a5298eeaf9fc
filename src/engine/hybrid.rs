//! Hybrid execution: re-encoded boundaries plus a stream-copied middle
//!
//! Segments share no state, so they may run concurrently. The first failure
//! aborts the remaining segments; their tool processes are killed when the
//! aborted futures drop.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::domain::errors::{SliceError, SliceResult};
use crate::domain::model::SegmentTask;
use crate::engine::SegmentRunner;

/// Runs all segment tasks of a plan
pub struct HybridExecutor {
    runner: Arc<SegmentRunner>,
    parallel: bool,
}

impl HybridExecutor {
    pub fn new(runner: SegmentRunner, parallel: bool) -> Self {
        Self {
            runner: Arc::new(runner),
            parallel,
        }
    }

    /// Produce one segment file per task, in task order
    pub async fn run(&self, input: &Path, tasks: &[SegmentTask]) -> SliceResult<Vec<PathBuf>> {
        let started = Instant::now();
        info!(
            "Processing {} segment(s){}",
            tasks.len(),
            if self.parallel && tasks.len() > 1 { " concurrently" } else { "" }
        );

        let segments = if self.parallel && tasks.len() > 1 {
            self.run_concurrently(input, tasks).await?
        } else {
            self.run_sequentially(input, tasks).await?
        };

        info!(
            "All segments completed in {:.2}s",
            started.elapsed().as_secs_f64()
        );
        Ok(segments)
    }

    async fn run_sequentially(
        &self,
        input: &Path,
        tasks: &[SegmentTask],
    ) -> SliceResult<Vec<PathBuf>> {
        let mut segments = Vec::with_capacity(tasks.len());
        for task in tasks {
            segments.push(self.runner.run_task(input, task).await?);
        }
        Ok(segments)
    }

    async fn run_concurrently(
        &self,
        input: &Path,
        tasks: &[SegmentTask],
    ) -> SliceResult<Vec<PathBuf>> {
        let mut set = JoinSet::new();
        for (index, task) in tasks.iter().cloned().enumerate() {
            let runner = Arc::clone(&self.runner);
            let input = input.to_path_buf();
            set.spawn(async move { (index, runner.run_task(&input, &task).await) });
        }

        let mut segments: Vec<Option<PathBuf>> = vec![None; tasks.len()];
        while let Some(joined) = set.join_next().await {
            let failure = match joined {
                Ok((index, Ok(path))) => {
                    segments[index] = Some(path);
                    continue;
                }
                Ok((index, Err(e))) => {
                    warn!("Segment {} failed, abandoning the others", tasks[index].role);
                    e
                }
                Err(join_error) => SliceError::ProcessFailure {
                    tool: "segment worker".to_string(),
                    status: (if join_error.is_panic() { "panicked" } else { "cancelled" })
                        .to_string(),
                    stderr: join_error.to_string(),
                },
            };

            set.abort_all();
            while set.join_next().await.is_some() {}
            return Err(failure);
        }

        segments
            .into_iter()
            .zip(tasks)
            .map(|(segment, task)| {
                segment.ok_or_else(|| {
                    SliceError::PlanningInconsistency(format!(
                        "segment {} produced no file",
                        task.role
                    ))
                })
            })
            .collect()
    }
}
