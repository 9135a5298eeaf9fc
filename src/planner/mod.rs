//! Segment boundary planning
//!
//! Only the windows around the two cut points need an exact, non-keyframe
//! aligned trim, so only they are re-encoded. The bulk between them is
//! extracted losslessly. When the range is too short for the two windows to
//! stay apart, a single region covering both is re-encoded instead.

use tracing::debug;

use crate::domain::errors::{SliceError, SliceResult};
use crate::domain::model::{
    Operation, Plan, PlanLayout, SegmentRole, SegmentTask, TimeRange, WorkItem,
};

/// Default re-encoded window around each cut point, in seconds
pub const DEFAULT_MARGIN: f64 = 2.0;

/// Computes region layouts and the work items that realise them
#[derive(Debug, Clone)]
pub struct SegmentPlanner {
    margin: f64,
}

impl Default for SegmentPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

impl SegmentPlanner {
    /// Create a planner with the given margin
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    /// Plan the regions for `requested` within a source of `duration` seconds
    ///
    /// An unknown (or zero) duration is treated as unbounded.
    pub fn plan(&self, requested: TimeRange, duration: Option<f64>) -> SliceResult<Plan> {
        if !(self.margin.is_finite() && self.margin > 0.0) {
            return Err(SliceError::InvalidParameters(format!(
                "margin must be a positive number, got {}",
                self.margin
            )));
        }

        let TimeRange { start, end } = requested;
        let margin = self.margin;

        let lead_in_start = (start - margin).max(0.0);
        let lead_in_end = (start + margin).min(end);
        let lead_out_start = (end - margin).max(start);
        let lead_out_end = match duration {
            Some(d) if d > 0.0 => (end + margin).min(d),
            _ => end + margin,
        };

        let overlap = lead_in_end >= lead_out_start;

        let layout = if overlap {
            PlanLayout::SingleRegion {
                region: region(lead_in_start, lead_out_end, "single")?,
            }
        } else {
            let middle_start = start + margin;
            let middle_end = end - margin;
            let middle = if middle_end > middle_start {
                Some(region(middle_start, middle_end, "middle")?)
            } else {
                None
            };
            PlanLayout::ThreeRegion {
                lead_in: region(lead_in_start, lead_in_end, "lead-in")?,
                middle,
                lead_out: region(lead_out_start, lead_out_end, "lead-out")?,
            }
        };

        let plan = Plan {
            requested,
            margin,
            layout,
        };
        check_contiguous(&plan)?;

        debug!(
            "Planned {} for {}: {:?}",
            if plan.is_single_region() { "single region" } else { "three regions" },
            requested,
            plan.regions()
        );
        Ok(plan)
    }

    /// Expand a plan into ordered segment tasks
    pub fn tasks(&self, plan: &Plan) -> SliceResult<Vec<SegmentTask>> {
        let TimeRange { start, end } = plan.requested;

        let tasks = match &plan.layout {
            PlanLayout::SingleRegion { region } => {
                let cut = cut(start - region.start, end - region.start, region, "single")?;
                vec![boundary_task(SegmentRole::Single, *region, cut)]
            }
            PlanLayout::ThreeRegion {
                lead_in,
                middle,
                lead_out,
            } => {
                let mut tasks = Vec::with_capacity(3);

                let lead_in_cut = cut(
                    start - lead_in.start,
                    lead_in.end - lead_in.start,
                    lead_in,
                    "lead-in",
                )?;
                tasks.push(boundary_task(SegmentRole::LeadIn, *lead_in, lead_in_cut));

                if let Some(middle) = middle {
                    tasks.push(SegmentTask {
                        role: SegmentRole::Middle,
                        steps: vec![WorkItem {
                            source_region: *middle,
                            operation: Operation::Copy,
                            relative_cut: None,
                        }],
                    });
                }

                let lead_out_cut = cut(0.0, end - lead_out.start, lead_out, "lead-out")?;
                tasks.push(boundary_task(SegmentRole::LeadOut, *lead_out, lead_out_cut));
                tasks
            }
        };

        Ok(tasks)
    }
}

/// Extract, convert to the intraframe intermediate, then trim and encode
fn boundary_task(role: SegmentRole, region: TimeRange, cut: TimeRange) -> SegmentTask {
    SegmentTask {
        role,
        steps: vec![
            WorkItem {
                source_region: region,
                operation: Operation::Copy,
                relative_cut: None,
            },
            WorkItem {
                source_region: region,
                operation: Operation::IntraConvert,
                relative_cut: None,
            },
            WorkItem {
                source_region: region,
                operation: Operation::CutEncode,
                relative_cut: Some(cut),
            },
        ],
    }
}

fn region(start: f64, end: f64, name: &str) -> SliceResult<TimeRange> {
    TimeRange::new(start, end).map_err(|_| {
        SliceError::PlanningInconsistency(format!(
            "{} region [{}, {}] is empty or negative",
            name, start, end
        ))
    })
}

fn cut(start: f64, end: f64, region: &TimeRange, name: &str) -> SliceResult<TimeRange> {
    let range = TimeRange::new(start, end).map_err(|_| {
        SliceError::PlanningInconsistency(format!(
            "{} cut [{}, {}] is empty or negative",
            name, start, end
        ))
    })?;
    if range.start >= region.duration() {
        return Err(SliceError::PlanningInconsistency(format!(
            "{} cut {} starts beyond its {}s region",
            name,
            range,
            region.duration()
        )));
    }
    Ok(range)
}

fn check_contiguous(plan: &Plan) -> SliceResult<()> {
    let regions = plan.regions();
    for pair in regions.windows(2) {
        if pair[0].end != pair[1].start {
            return Err(SliceError::PlanningInconsistency(format!(
                "regions {} and {} are not contiguous",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: f64, end: f64) -> TimeRange {
        TimeRange::new(start, end).unwrap()
    }

    #[test]
    fn test_three_region_plan_for_mid_source_range() {
        let planner = SegmentPlanner::default();
        let plan = planner.plan(range(10.0, 15.0), Some(60.0)).unwrap();

        assert_eq!(
            plan.layout,
            PlanLayout::ThreeRegion {
                lead_in: range(8.0, 12.0),
                middle: Some(range(12.0, 13.0)),
                lead_out: range(13.0, 17.0),
            }
        );

        let tasks = planner.tasks(&plan).unwrap();
        let roles: Vec<SegmentRole> = tasks.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![SegmentRole::LeadIn, SegmentRole::Middle, SegmentRole::LeadOut]
        );
        assert_eq!(tasks[0].steps[2].relative_cut, Some(range(2.0, 4.0)));
        assert_eq!(tasks[2].steps[2].relative_cut, Some(range(0.0, 2.0)));
        assert!(!tasks[1].reencodes());
    }

    #[test]
    fn test_short_clip_uses_single_region() {
        let planner = SegmentPlanner::default();
        let plan = planner.plan(range(0.5, 3.5), Some(4.0)).unwrap();

        assert_eq!(
            plan.layout,
            PlanLayout::SingleRegion {
                region: range(0.0, 4.0)
            }
        );

        let tasks = planner.tasks(&plan).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].role, SegmentRole::Single);
        let ops: Vec<Operation> = tasks[0].steps.iter().map(|s| s.operation).collect();
        assert_eq!(
            ops,
            vec![Operation::Copy, Operation::IntraConvert, Operation::CutEncode]
        );
        assert_eq!(tasks[0].steps[2].relative_cut, Some(range(0.5, 3.5)));
    }

    #[test]
    fn test_ranges_shorter_than_two_margins_are_single_region() {
        let planner = SegmentPlanner::new(2.0);
        let duration = 120.0;
        let mut start = 0.0;
        while start < 110.0 {
            for length in [0.04, 0.5, 1.0, 2.5, 3.9] {
                let plan = planner.plan(range(start, start + length), Some(duration)).unwrap();
                assert!(plan.is_single_region(), "start {} length {}", start, length);
            }
            start += 7.3;
        }
    }

    #[test]
    fn test_long_ranges_with_clearance_have_a_middle() {
        let planner = SegmentPlanner::new(2.0);
        let duration = 300.0;
        for start in [2.0, 5.5, 40.0, 100.25] {
            for length in [4.5, 10.0, 60.0, 150.0] {
                let plan = planner.plan(range(start, start + length), Some(duration)).unwrap();
                match plan.layout {
                    PlanLayout::ThreeRegion {
                        lead_in,
                        middle: Some(middle),
                        lead_out,
                    } => {
                        assert_eq!(lead_in.end, middle.start);
                        assert_eq!(middle.end, lead_out.start);
                    }
                    other => panic!("expected three regions, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_regions_stay_within_source_bounds() {
        let planner = SegmentPlanner::new(2.0);
        let duration = 30.0;
        for (start, end) in [(0.0, 30.0), (0.5, 29.5), (1.0, 10.0), (20.0, 29.9), (0.0, 3.0)] {
            let plan = planner.plan(range(start, end), Some(duration)).unwrap();
            for region in plan.regions() {
                assert!(region.start >= 0.0, "{} starts before zero", region);
                assert!(region.end <= duration, "{} ends after duration", region);
            }
        }
    }

    #[test]
    fn test_unknown_duration_extends_by_margin() {
        let planner = SegmentPlanner::new(2.0);
        let plan = planner.plan(range(10.0, 20.0), None).unwrap();
        let last = *plan.regions().last().unwrap();
        assert_eq!(last, range(18.0, 22.0));

        let plan = planner.plan(range(10.0, 20.0), Some(0.0)).unwrap();
        assert_eq!(plan.regions().last().unwrap().end, 22.0);
    }

    #[test]
    fn test_range_at_end_of_source_clamps_lead_out() {
        let planner = SegmentPlanner::new(2.0);
        let plan = planner.plan(range(50.0, 60.0), Some(60.0)).unwrap();
        let tasks = planner.tasks(&plan).unwrap();
        let lead_out = tasks.last().unwrap();
        assert_eq!(lead_out.steps[0].source_region, range(58.0, 60.0));
        assert_eq!(lead_out.steps[2].relative_cut, Some(range(0.0, 2.0)));
    }

    #[test]
    fn test_start_beyond_duration_is_inconsistent() {
        let planner = SegmentPlanner::new(2.0);
        let err = planner.plan(range(70.0, 80.0), Some(60.0)).unwrap_err();
        assert!(matches!(err, SliceError::PlanningInconsistency(_)));
    }

    #[test]
    fn test_custom_margin() {
        let planner = SegmentPlanner::new(0.5);
        let plan = planner.plan(range(10.0, 12.0), Some(60.0)).unwrap();
        assert_eq!(
            plan.regions(),
            vec![range(9.5, 10.5), range(10.5, 11.5), range(11.5, 12.5)]
        );
    }

    #[test]
    fn test_non_positive_margin_is_rejected() {
        assert!(SegmentPlanner::new(0.0).plan(range(1.0, 2.0), None).is_err());
        assert!(SegmentPlanner::new(f64::NAN).plan(range(1.0, 2.0), None).is_err());
    }
}
