use std::fmt::Debug;
use std::sync::Arc;

use calendar_grid::chrono::NaiveDateTime;
use calendar_grid::{
    DataLoadingOptions, DateRange, HitContext, HitTest, OccupancyOptions, PlacedTile,
    PlacementContext, Point, SchedulerData, TileOptions, ZoomLevel, hit_test, pack_resources,
    place_tiles,
};

use crate::{
    Calendar, CalendarOptions, Debounce, FetchOutcome, FetchRequest, PrefetchWindow,
    RangeChangeCallback, RangeFetcher, ScrollBehavior, ScrollOutcome, ScrollSurface, run_fetch,
};

/// Configuration of a [`Scheduler`].
#[derive(Clone)]
pub struct SchedulerOptions {
    pub calendar: CalendarOptions,
    pub data_loading: DataLoadingOptions,
    pub tiles: TileOptions,
    /// Capacity reported with hover results.
    pub occupancy: OccupancyOptions,
    /// Whether a fetcher is attached. Without one the scheduler only shows the supplied rows.
    pub prefetch: bool,
    /// Delay before a resting pointer is resolved to a cell.
    pub hover_delay_ms: u64,
    pub on_visible_range_change: Option<RangeChangeCallback>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            calendar: CalendarOptions::default(),
            data_loading: DataLoadingOptions::default(),
            tiles: TileOptions::default(),
            occupancy: OccupancyOptions::default(),
            prefetch: false,
            hover_delay_ms: 300,
            on_visible_range_change: None,
        }
    }
}

impl SchedulerOptions {
    pub fn with_calendar(mut self, calendar: CalendarOptions) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_data_loading(mut self, data_loading: DataLoadingOptions) -> Self {
        self.data_loading = data_loading;
        self
    }

    pub fn with_tiles(mut self, tiles: TileOptions) -> Self {
        self.tiles = tiles;
        self
    }

    pub fn with_occupancy(mut self, occupancy: OccupancyOptions) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn with_prefetch(mut self, prefetch: bool) -> Self {
        self.prefetch = prefetch;
        self
    }

    pub fn with_hover_delay_ms(mut self, hover_delay_ms: u64) -> Self {
        self.hover_delay_ms = hover_delay_ms;
        self
    }

    pub fn with_on_visible_range_change(
        mut self,
        f: impl Fn(&DateRange) + Send + Sync + 'static,
    ) -> Self {
        self.on_visible_range_change = Some(Arc::new(f));
        self
    }
}

impl core::fmt::Debug for SchedulerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SchedulerOptions")
            .field("calendar", &self.calendar)
            .field("data_loading", &self.data_loading)
            .field("tiles", &self.tiles)
            .field("occupancy", &self.occupancy)
            .field("prefetch", &self.prefetch)
            .field("hover_delay_ms", &self.hover_delay_ms)
            .finish_non_exhaustive()
    }
}

/// A calendar, its data window and pointer hover state, wired together.
///
/// Every navigation entry point forwards visible-range changes to the [`PrefetchWindow`] and
/// queues the resulting [`FetchRequest`]s. Adapters drain them with
/// [`Scheduler::take_fetch_requests`], perform them however they like, and hand results back
/// with [`Scheduler::complete_fetch`].
#[derive(Debug)]
pub struct Scheduler {
    calendar: Calendar,
    window: PrefetchWindow,
    tile_options: TileOptions,
    occupancy: OccupancyOptions,
    fetch_queue: Vec<FetchRequest>,
    hover: Debounce<Point>,
    hovered: Option<HitTest>,
}

impl Scheduler {
    pub fn new(
        options: SchedulerOptions,
        data: SchedulerData,
        start_date: NaiveDateTime,
        viewport_width: f64,
    ) -> Self {
        let mut window =
            PrefetchWindow::new(data, &options.data_loading).with_prefetch(options.prefetch);
        window.set_on_range_change(options.on_visible_range_change);
        let mut scheduler = Self {
            calendar: Calendar::new(options.calendar, start_date, viewport_width),
            window,
            tile_options: options.tiles,
            occupancy: options.occupancy,
            fetch_queue: Vec::new(),
            hover: Debounce::new(options.hover_delay_ms),
            hovered: None,
        };
        scheduler.sync_range();
        scheduler
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn window(&self) -> &PrefetchWindow {
        &self.window
    }

    /// The rows to render.
    pub fn data(&self) -> &SchedulerData {
        self.window.data()
    }

    pub fn tile_options(&self) -> &TileOptions {
        &self.tile_options
    }

    pub fn occupancy_options(&self) -> &OccupancyOptions {
        &self.occupancy
    }

    fn sync_range(&mut self) {
        if let Some(range) = self.calendar.take_range_change() {
            let requests = self.window.on_visible_range_change(range);
            self.fetch_queue.extend(requests);
        }
    }

    fn reevaluate_range(&mut self) {
        self.calendar.take_range_change();
        let requests = self
            .window
            .on_visible_range_change(self.calendar.visible_range());
        self.fetch_queue.extend(requests);
    }

    /// Replaces the external data source (by reference identity) and re-evaluates prefetching.
    pub fn set_data(&mut self, data: SchedulerData) {
        if self.window.set_source(data) {
            self.fetch_queue.clear();
            self.hovered = None;
            self.reevaluate_range();
        }
    }

    pub fn set_prefetch_enabled(&mut self, enabled: bool) {
        if self.window.prefetch_enabled() == enabled {
            return;
        }
        self.window.set_prefetch_enabled(enabled);
        self.fetch_queue.clear();
        self.reevaluate_range();
    }

    /// Drains the fetches that should be started.
    pub fn take_fetch_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.fetch_queue)
    }

    pub fn complete_fetch<E: Debug>(
        &mut self,
        request: &FetchRequest,
        result: Result<SchedulerData, E>,
    ) -> FetchOutcome {
        self.window.complete(request, result)
    }

    /// Performs every queued fetch in turn with `fetcher` and applies the results.
    ///
    /// For drivers that can await in place; others use [`Scheduler::take_fetch_requests`].
    pub async fn fetch_pending<F: RangeFetcher + ?Sized>(
        &mut self,
        fetcher: &F,
    ) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        for request in self.take_fetch_requests() {
            let result = run_fetch(fetcher, &request).await;
            outcomes.push(self.window.complete(&request, result));
        }
        outcomes
    }

    pub fn handle_scroll_change<S: ScrollSurface + ?Sized>(
        &mut self,
        scroll_left: f64,
        now_ms: u64,
        surface: &mut S,
    ) -> ScrollOutcome {
        let outcome = self
            .calendar
            .handle_scroll_change(scroll_left, now_ms, surface);
        self.sync_range();
        outcome
    }

    pub fn go_to_date<S: ScrollSurface + ?Sized>(
        &mut self,
        date: NaiveDateTime,
        behavior: ScrollBehavior,
        surface: &mut S,
    ) -> f64 {
        let target = self.calendar.go_to_date(date, behavior, surface);
        self.sync_range();
        target
    }

    pub fn start_tween_to_date<S: ScrollSurface + ?Sized>(
        &mut self,
        date: NaiveDateTime,
        now_ms: u64,
        surface: &mut S,
    ) -> Option<f64> {
        let target = self.calendar.start_tween_to_date(date, now_ms, surface);
        self.sync_range();
        target
    }

    pub fn change_zoom<S: ScrollSurface + ?Sized>(
        &mut self,
        zoom: ZoomLevel,
        surface: &mut S,
    ) -> bool {
        let changed = self.calendar.change_zoom(zoom, surface);
        if changed {
            self.hovered = None;
            self.hover.cancel();
        }
        self.sync_range();
        changed
    }

    pub fn zoom_in<S: ScrollSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.calendar.zoom().zoomed_in() {
            Some(zoom) => self.change_zoom(zoom, surface),
            None => false,
        }
    }

    pub fn zoom_out<S: ScrollSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.calendar.zoom().zoomed_out() {
            Some(zoom) => self.change_zoom(zoom, surface),
            None => false,
        }
    }

    pub fn go_next<S: ScrollSurface + ?Sized>(
        &mut self,
        behavior: ScrollBehavior,
        surface: &mut S,
    ) -> f64 {
        let target = self.calendar.go_next(behavior, surface);
        self.sync_range();
        target
    }

    pub fn go_prev<S: ScrollSurface + ?Sized>(
        &mut self,
        behavior: ScrollBehavior,
        surface: &mut S,
    ) -> f64 {
        let target = self.calendar.go_prev(behavior, surface);
        self.sync_range();
        target
    }

    pub fn set_viewport_width(&mut self, viewport_width: f64) {
        self.calendar.set_viewport_width(viewport_width);
        self.sync_range();
    }

    /// Advances the idle reset, tween and hover timers.
    pub fn tick<S: ScrollSurface + ?Sized>(&mut self, now_ms: u64, surface: &mut S) -> Option<f64> {
        let scrolled = self.calendar.tick(now_ms, surface);
        if let Some(pointer) = self.hover.poll(now_ms) {
            self.hovered = Some(self.hit_test(pointer));
        }
        self.sync_range();
        scrolled
    }

    /// Cancels pending timers and tweens (teardown).
    pub fn cancel_timers(&mut self) {
        self.calendar.cancel_timers();
        self.hover.cancel();
    }

    pub fn placement_context(&self) -> PlacementContext {
        PlacementContext {
            zoom: self.calendar.zoom(),
            visible_range: self.calendar.visible_range(),
            center_date: self.calendar.current_center_date(),
            cols: self.calendar.cols(),
        }
    }

    /// Pixel placement of every visible tile.
    pub fn tiles(&self) -> Vec<PlacedTile> {
        place_tiles(
            self.window.data(),
            self.calendar.geometry(),
            &self.tile_options,
            &self.placement_context(),
        )
    }

    /// Resolves a grid-local pointer position immediately, occupancy included.
    pub fn hit_test(&self, pointer: Point) -> HitTest {
        let packed = pack_resources(self.window.data());
        let ctx = HitContext {
            zoom: self.calendar.zoom(),
            center_date: self.calendar.current_center_date(),
            cols: self.calendar.cols(),
            tiles: self.tile_options,
            occupancy: self.occupancy,
            resources: &packed,
        };
        hit_test(self.calendar.geometry(), &ctx, pointer)
    }

    /// Hides the current hover result and resolves `pointer` once it has rested for the hover
    /// delay.
    pub fn on_pointer_move(&mut self, pointer: Point, now_ms: u64) {
        self.hovered = None;
        self.hover.schedule(now_ms, pointer);
    }

    pub fn on_pointer_leave(&mut self) {
        self.hovered = None;
        self.hover.cancel();
    }

    pub fn hovered(&self) -> Option<&HitTest> {
        self.hovered.as_ref()
    }
}
