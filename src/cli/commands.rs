//! Command implementations

use crate::app::{AppContainer, InspectFormat, OutputTarget, SliceReport, SliceRequest};
use crate::cli::args::{ProbeArgs, SliceArgs};
use crate::domain::errors::SliceResult;
use crate::domain::model::TimeRange;
use crate::utils::time::parse_timecode;

/// Execute the slice command
pub async fn slice(container: &dyn AppContainer, args: &SliceArgs) -> SliceResult<SliceReport> {
    let start = parse_timecode(&args.start)?;
    let end = parse_timecode(&args.stop)?;
    // Reject a bad range before anything is launched
    TimeRange::new(start, end)?;

    let output = match &args.output {
        Some(output) => OutputTarget::Path(output.clone()),
        None => OutputTarget::BesideInput {
            start: args.start.clone(),
            stop: args.stop.clone(),
        },
    };

    container
        .slice_interactor()
        .execute(SliceRequest {
            input: args.input.clone(),
            output,
            start,
            end,
        })
        .await
}

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: &ProbeArgs) -> SliceResult<String> {
    let format = if args.json {
        InspectFormat::Json
    } else {
        InspectFormat::Text
    };
    container
        .inspect_interactor()
        .summary(&args.input, format)
        .await
}
