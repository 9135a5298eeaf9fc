//! Output assembly and finalisation
//!
//! Segments are joined inside the scratch directory and the result is moved
//! to the requested path as the very last step, so a failed run never leaves
//! a partial file at the output path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::{SliceError, SliceResult};
use crate::ports::MediaToolPort;

/// Joins segment files and moves the result into place
pub struct OutputWriter {
    tool: Arc<dyn MediaToolPort>,
}

impl OutputWriter {
    pub fn new(tool: Arc<dyn MediaToolPort>) -> Self {
        Self { tool }
    }

    /// Produce `output` from `segments`, which are in output order
    pub async fn finalize(
        &self,
        segments: &[PathBuf],
        scratch: &Path,
        output: &Path,
    ) -> SliceResult<PathBuf> {
        let assembled = match segments {
            [] => {
                return Err(SliceError::PlanningInconsistency(
                    "no segments to assemble".to_string(),
                ))
            }
            [only] => only.clone(),
            _ => {
                let joined = scratch.join(format!("joined.{}", extension_of(output)));
                info!("Concatenating {} segments", segments.len());
                self.tool.concat(segments, &joined).await?
            }
        };

        move_into_place(&assembled, output).await?;
        info!("Output written to {}", output.display());
        Ok(output.to_path_buf())
    }
}

/// Extension of `path`, `mp4` when it has none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "mp4".to_string())
}

/// Move `from` to `to`, replacing `to` only once the new file is complete
///
/// A plain rename is tried first. When that fails (typically because the
/// scratch directory is on another filesystem) the file is copied to a hidden
/// `.<name>.partial` sibling of `to` and renamed from there.
pub async fn move_into_place(from: &Path, to: &Path) -> SliceResult<()> {
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    match tokio::fs::rename(from, to).await {
        Ok(()) => {
            debug!("Renamed {} -> {}", from.display(), to.display());
            return Ok(());
        }
        Err(e) => debug!("Rename into place failed ({}), copying instead", e),
    }

    let partial = partial_path(to);
    let copied = async {
        tokio::fs::copy(from, &partial).await?;
        tokio::fs::rename(&partial, to).await
    }
    .await;

    if let Err(e) = copied {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove {}: {}", partial.display(), cleanup);
            }
        }
        return Err(e.into());
    }
    Ok(())
}

fn partial_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!(".{}.partial", name))
}
