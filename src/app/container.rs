use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, SliceSettings};
use crate::app::inspect_interactor::InspectInteractor;
use crate::app::jobs::JobRegistry;
use crate::app::slice_interactor::{SliceInteractor, SliceOptions};
use crate::domain::errors::SliceResult;
use crate::ports::{MediaToolPort, ProbePort};
use crate::utils::command::ToolRunner;

pub trait AppContainer: Send + Sync {
    fn slice_interactor(&self) -> Arc<SliceInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn job_registry(&self) -> JobRegistry;
}

/// Wires the ffmpeg/ffprobe adapters from validated settings
pub struct DefaultAppContainer {
    slice_interactor: Arc<SliceInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    job_registry: JobRegistry,
}

impl DefaultAppContainer {
    pub fn new(settings: &SliceSettings) -> SliceResult<Self> {
        settings.validate()?;

        let runner = ToolRunner::new(settings.tool_timeout());
        let probe_port: Arc<dyn ProbePort> =
            Arc::new(FFprobeAdapter::new(settings.tools.ffprobe.clone(), runner.clone()));
        let tool_port: Arc<dyn MediaToolPort> =
            Arc::new(FFmpegAdapter::new(settings.tools.ffmpeg.clone(), runner));

        Ok(Self::with_ports(probe_port, tool_port, options_from(settings)))
    }

    /// Wire the interactors around arbitrary port implementations
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        tool_port: Arc<dyn MediaToolPort>,
        options: SliceOptions,
    ) -> Self {
        let slice_interactor = Arc::new(SliceInteractor::new(
            Arc::clone(&probe_port),
            tool_port,
            options,
        ));
        let inspect_interactor = Arc::new(InspectInteractor::new(probe_port));
        let job_registry = JobRegistry::new(Arc::clone(&slice_interactor));

        Self {
            slice_interactor,
            inspect_interactor,
            job_registry,
        }
    }
}

pub fn options_from(settings: &SliceSettings) -> SliceOptions {
    SliceOptions {
        margin: settings.slice.margin,
        parallel_regions: settings.slice.parallel_regions,
        scratch_dir: settings.slice.scratch_dir.clone(),
        encode: settings.encode_defaults(),
    }
}

impl AppContainer for DefaultAppContainer {
    fn slice_interactor(&self) -> Arc<SliceInteractor> {
        Arc::clone(&self.slice_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn job_registry(&self) -> JobRegistry {
        self.job_registry.clone()
    }
}
