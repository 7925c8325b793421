use crate::types::{MS_PER_DAY, diff_ms, shift_ms, shift_units, timestamp_ms};
use crate::{DataLoadingConfig, DateRange, Direction, TimeUnit};

/// Which edges of the cached data range need more data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefetchFlags {
    pub backward: bool,
    pub forward: bool,
}

impl PrefetchFlags {
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
        }
    }
}

/// A contiguous page adjacent to the cached data range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefetchRequest {
    pub direction: Direction,
    pub range: DateRange,
    /// Timestamp (ms) of the data-range boundary the page extends.
    pub edge: i64,
}

/// The window of data worth keeping: the visible center ± `max_cached_days`.
pub fn retention_range(visible: &DateRange, max_cached_days: u32) -> DateRange {
    let center = visible.center();
    let days = max_cached_days as i64;
    DateRange::new(
        shift_units(center, -days, TimeUnit::Days),
        shift_units(center, days, TimeUnit::Days),
    )
}

/// Decides which directions should be prefetched.
///
/// Each direction triggers when any of these holds (OR semantics, no priority):
/// - the visible edge lies outside the cached data range;
/// - the visible edge's proportional position in the data range passes the trigger ratio;
/// - no more than `prefetch_trigger_days` of data remain beyond the visible edge.
pub fn prefetch_flags(
    visible: &DateRange,
    data: &DateRange,
    config: &DataLoadingConfig,
) -> PrefetchFlags {
    let total_span = data.span_ms().max(1) as f64;
    let lower_threshold = 1.0 - config.prefetch_trigger_ratio;
    let from_start_ms = diff_ms(visible.start, data.start) as f64;
    let end_from_start_ms = diff_ms(visible.end, data.start) as f64;
    let to_end_ms = diff_ms(data.end, visible.end) as f64;

    let start_ratio = from_start_ms / total_span;
    let end_ratio = end_from_start_ms / total_span;
    let days_from_start = from_start_ms / MS_PER_DAY as f64;
    let days_to_end = to_end_ms / MS_PER_DAY as f64;
    let trigger_days = config.prefetch_trigger_days as f64;

    PrefetchFlags {
        backward: visible.start < data.start
            || start_ratio <= lower_threshold
            || days_from_start <= trigger_days,
        forward: visible.end > data.end
            || end_ratio >= config.prefetch_trigger_ratio
            || days_to_end <= trigger_days,
    }
}

/// The page immediately before (backward) or after (forward) `data`, not overlapping it.
pub fn prefetch_request(
    direction: Direction,
    data: &DateRange,
    prefetch_days: u32,
) -> PrefetchRequest {
    let days = prefetch_days as i64;
    let (range, edge) = match direction {
        Direction::Backward => (
            DateRange::new(
                shift_units(data.start, -days, TimeUnit::Days),
                shift_ms(data.start, -1),
            ),
            data.start,
        ),
        Direction::Forward => (
            DateRange::new(
                shift_ms(data.end, 1),
                shift_units(data.end, days, TimeUnit::Days),
            ),
            data.end,
        ),
    };
    PrefetchRequest {
        direction,
        range,
        edge: timestamp_ms(edge),
    }
}
