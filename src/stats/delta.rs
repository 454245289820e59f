//! Net change of cumulative histories over a date range.

use crate::types::{CaseCounts, DateRange, Timeline};

/// Net change per case type across the in-range points of a timeline.
///
/// Fewer than two points in range yields zero. Negative results (upstream
/// corrections) are passed through.
pub fn delta(timeline: &Timeline, range: &DateRange) -> CaseCounts {
    timeline
        .case_types()
        .map(|case_type| {
            let mut in_range = timeline
                .series(case_type)
                .into_iter()
                .flat_map(|series| series.iter())
                .filter(|(at, _)| range.contains(at.timestamp_millis()))
                .map(|(_, value)| *value);

            let change = match (in_range.next(), in_range.last()) {
                (Some(first), Some(last)) => last.saturating_sub(first),
                _ => 0,
            };
            (case_type, change)
        })
        .collect()
}
