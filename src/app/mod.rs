// Application layer - Use case interactors

pub mod container;
pub mod inspect_interactor;
pub mod jobs;
pub mod slice_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectFormat, InspectInteractor};
pub use jobs::{JobId, JobRecord, JobRegistry, JobStatus};
pub use slice_interactor::{
    OutputTarget, PlanKind, SliceInteractor, SliceOptions, SliceReport, SliceRequest,
};
