use std::fmt::Debug;
use std::sync::Arc;

use calendar_grid::{
    ByDirection, DataLoadingConfig, DataLoadingOptions, DateRange, Direction, PrefetchRequest,
    SchedulerData, data_range, merge_scheduler_data, prefetch_flags, prefetch_request,
    retention_range, trim_data_to_range,
};

pub type RangeChangeCallback = Arc<dyn Fn(&DateRange) + Send + Sync>;

/// A fetch the window wants performed.
///
/// The ticket carries the session it was issued in; completing it after the data source was
/// replaced has no effect on the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchRequest {
    pub direction: Direction,
    pub range: DateRange,
    /// Timestamp (ms) of the data-range boundary this page extends.
    pub edge: i64,
    pub session: u64,
}

/// What [`PrefetchWindow::complete`] did with a fetch result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchOutcome {
    /// The rows were merged; `rows` is the cached row count afterwards.
    Merged { rows: usize },
    Empty,
    /// The data source changed while the fetch was in flight.
    Stale,
    Failed,
}

/// The resident window of scheduler data.
///
/// Holds the externally supplied rows plus every prefetched page, trimmed to a retention range
/// around the last visible range. Fetching is ticket based: range changes return
/// [`FetchRequest`]s, the adapter resolves them (see [`crate::run_fetch`]) and hands results
/// back through [`PrefetchWindow::complete`]. At most one request per direction is in flight.
pub struct PrefetchWindow {
    config: DataLoadingConfig,
    prefetch_enabled: bool,
    source: SchedulerData,
    cached: SchedulerData,
    session: u64,
    in_flight: ByDirection<bool>,
    last_edge: ByDirection<Option<i64>>,
    visible_range: Option<DateRange>,
    initial_prune_done: bool,
    on_range_change: Option<RangeChangeCallback>,
}

impl PrefetchWindow {
    /// Creates a window over `data`. Prefetching starts disabled.
    pub fn new(data: SchedulerData, options: &DataLoadingOptions) -> Self {
        Self {
            config: options.normalized(),
            prefetch_enabled: false,
            cached: data.clone(),
            source: data,
            session: 0,
            in_flight: ByDirection::default(),
            last_edge: ByDirection::default(),
            visible_range: None,
            initial_prune_done: false,
            on_range_change: None,
        }
    }

    pub fn with_prefetch(mut self, enabled: bool) -> Self {
        self.prefetch_enabled = enabled;
        self
    }

    pub fn with_on_range_change(
        mut self,
        f: impl Fn(&DateRange) + Send + Sync + 'static,
    ) -> Self {
        self.on_range_change = Some(Arc::new(f));
        self
    }

    pub fn set_on_range_change(&mut self, f: Option<RangeChangeCallback>) {
        self.on_range_change = f;
    }

    pub fn config(&self) -> &DataLoadingConfig {
        &self.config
    }

    pub fn set_options(&mut self, options: &DataLoadingOptions) {
        self.config = options.normalized();
    }

    pub fn prefetch_enabled(&self) -> bool {
        self.prefetch_enabled
    }

    /// Enables or disables prefetching (i.e. whether a fetcher is attached).
    ///
    /// Toggling resets the window to the external data.
    pub fn set_prefetch_enabled(&mut self, enabled: bool) {
        if self.prefetch_enabled == enabled {
            return;
        }
        self.prefetch_enabled = enabled;
        self.reset();
    }

    /// Replaces the external data source.
    ///
    /// Only a change of reference identity counts. Returns `true` if the window was reset.
    pub fn set_source(&mut self, data: SchedulerData) -> bool {
        if data.ptr_eq(&self.source) {
            return false;
        }
        self.source = data;
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.cached = self.source.clone();
        self.session += 1;
        self.in_flight = ByDirection::default();
        self.last_edge = ByDirection::default();
        self.visible_range = None;
        self.initial_prune_done = false;
        vdebug!(session = self.session, "prefetch window reset");
    }

    /// The rows to render.
    pub fn data(&self) -> &SchedulerData {
        &self.cached
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn in_flight(&self, direction: Direction) -> bool {
        self.in_flight[direction]
    }

    pub fn last_requested_edge(&self, direction: Direction) -> Option<i64> {
        self.last_edge[direction]
    }

    pub fn visible_range(&self) -> Option<DateRange> {
        self.visible_range
    }

    /// `[min start, max end]` of the cached projects.
    pub fn data_range(&self) -> Option<DateRange> {
        data_range(&self.cached)
    }

    /// Reacts to a new visible range and returns the fetches to perform.
    ///
    /// The range change callback is always notified. Without prefetching nothing else happens.
    pub fn on_visible_range_change(&mut self, range: DateRange) -> Vec<FetchRequest> {
        if let Some(cb) = &self.on_range_change {
            cb(&range);
        }
        if !self.prefetch_enabled {
            return Vec::new();
        }

        self.visible_range = Some(range);
        if !self.initial_prune_done {
            self.initial_prune_done = true;
            let retained = retention_range(&range, self.config.max_cached_days);
            self.cached = trim_data_to_range(&self.cached, &retained);
        }

        let Some(data) = data_range(&self.cached) else {
            return Vec::new();
        };
        let flags = prefetch_flags(&range, &data, &self.config);
        Direction::BOTH
            .into_iter()
            .filter(|&direction| flags.get(direction))
            .filter_map(|direction| {
                self.begin_fetch(prefetch_request(direction, &data, self.config.prefetch_days))
            })
            .collect()
    }

    /// Marks a page as in flight, unless that direction is busy or the edge was already requested.
    pub fn begin_fetch(&mut self, request: PrefetchRequest) -> Option<FetchRequest> {
        let direction = request.direction;
        if self.in_flight[direction] || self.last_edge[direction] == Some(request.edge) {
            return None;
        }
        self.in_flight[direction] = true;
        self.last_edge[direction] = Some(request.edge);
        vdebug!(
            ?direction,
            edge = request.edge,
            session = self.session,
            "prefetch begin"
        );
        Some(FetchRequest {
            direction,
            range: request.range,
            edge: request.edge,
            session: self.session,
        })
    }

    /// Applies the result of a fetch issued by this window.
    ///
    /// Results from an earlier session are dropped untouched. Otherwise the in-flight flag of the
    /// request's direction is released whatever the outcome, and a failure also forgets the
    /// requested edge so it can be retried.
    pub fn complete<E: Debug>(
        &mut self,
        request: &FetchRequest,
        result: Result<SchedulerData, E>,
    ) -> FetchOutcome {
        if request.session != self.session {
            vtrace!(session = request.session, "discarding stale prefetch");
            return FetchOutcome::Stale;
        }
        self.in_flight[request.direction] = false;

        let rows = match result {
            Ok(rows) => rows,
            Err(_error) => {
                // Forget the edge so the next range change retries it.
                self.last_edge[request.direction] = None;
                if cfg!(debug_assertions) {
                    vwarn!(direction = ?request.direction, error = ?_error, "prefetch failed");
                }
                return FetchOutcome::Failed;
            }
        };
        if rows.is_empty() {
            return FetchOutcome::Empty;
        }

        let merged = merge_scheduler_data(&self.cached, &rows);
        self.cached = match self.visible_range {
            Some(visible) => {
                trim_data_to_range(&merged, &retention_range(&visible, self.config.max_cached_days))
            }
            None => merged,
        };
        vdebug!(
            direction = ?request.direction,
            rows = self.cached.len(),
            projects = self.cached.project_count(),
            "prefetch merged"
        );
        FetchOutcome::Merged {
            rows: self.cached.len(),
        }
    }
}

impl core::fmt::Debug for PrefetchWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrefetchWindow")
            .field("config", &self.config)
            .field("prefetch_enabled", &self.prefetch_enabled)
            .field("rows", &self.cached.len())
            .field("session", &self.session)
            .field("in_flight", &self.in_flight)
            .field("last_edge", &self.last_edge)
            .field("visible_range", &self.visible_range)
            .finish_non_exhaustive()
    }
}
