use calendar_grid::chrono::{Months, NaiveDateTime};
use calendar_grid::{DateRange, GridGeometry, ScrollConfig, ZoomLevel, shift_units};

use crate::{
    Easing, RebaseController, RebaseOptions, ScrollBehavior, ScrollOutcome, ScrollSurface, Tween,
};

/// Configuration of a [`Calendar`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarOptions {
    pub geometry: GridGeometry,
    pub rebase: RebaseOptions,
    /// Initial zoom level.
    pub zoom: ZoomLevel,
    /// Duration of adapter-driven tweens started with [`Calendar::start_tween_to_date`].
    pub tween_duration_ms: u64,
    pub easing: Easing,
    /// Queue a visible range only when it differs from the last queued one. Off by default: every
    /// recomputation (scroll, navigation, zoom, resize) is reported.
    pub dedupe_range_changes: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            geometry: GridGeometry::default(),
            rebase: RebaseOptions::default(),
            zoom: ZoomLevel::Day,
            tween_duration_ms: 300,
            easing: Easing::EaseInOutCubic,
            dedupe_range_changes: false,
        }
    }
}

impl CalendarOptions {
    pub fn with_geometry(mut self, geometry: GridGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_rebase(mut self, rebase: RebaseOptions) -> Self {
        self.rebase = rebase;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomLevel) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_tween(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.tween_duration_ms = duration_ms;
        self.easing = easing;
        self
    }

    pub fn with_dedupe_range_changes(mut self, dedupe: bool) -> Self {
        self.dedupe_range_changes = dedupe;
        self
    }
}

/// Owner of the shared calendar state: zoom, reference date, scroll position and viewport.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `handle_scroll_change` when the scroll container reports a new `scroll_left`
/// - `set_viewport_width` on resize
/// - `tick(now_ms)` each frame/timer tick (idle rebase reset and tweens)
///
/// Every mutation that moves the visible range queues it for [`Calendar::take_range_change`].
#[derive(Clone, Debug)]
pub struct Calendar {
    options: CalendarOptions,
    zoom: ZoomLevel,
    reference_date: NaiveDateTime,
    scroll_position: f64,
    viewport_width: f64,
    rebase: RebaseController,
    tween: Option<Tween>,
    tween_sample: Option<f64>,
    last_range: Option<DateRange>,
    pending_range: Option<DateRange>,
}

impl Calendar {
    /// Creates a calendar centered on `start_date`.
    pub fn new(options: CalendarOptions, start_date: NaiveDateTime, viewport_width: f64) -> Self {
        let scroll_position = options.geometry.scroll_config(options.zoom).center;
        let mut calendar = Self {
            rebase: RebaseController::new(options.rebase),
            zoom: options.zoom,
            options,
            reference_date: start_date,
            scroll_position,
            viewport_width: viewport_width.max(0.0),
            tween: None,
            tween_sample: None,
            last_range: None,
            pending_range: None,
        };
        calendar.note_range_change();
        calendar
    }

    /// Moves the surface to the current scroll position (e.g. after mounting).
    pub fn sync_surface<S: ScrollSurface + ?Sized>(&self, surface: &mut S) {
        surface.scroll_to(self.scroll_position, ScrollBehavior::Instant);
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.options.geometry
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn reference_date(&self) -> NaiveDateTime {
        self.reference_date
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn rebase_controller(&self) -> &RebaseController {
        &self.rebase
    }

    pub fn scroll_config(&self) -> ScrollConfig {
        self.options.geometry.scroll_config(self.zoom)
    }

    pub fn cols(&self) -> usize {
        self.options.geometry.cols(self.zoom, self.viewport_width)
    }

    pub fn cell_width(&self) -> f64 {
        self.options.geometry.cell_width(self.zoom)
    }

    /// The buffered, unit-aligned range that must have rendered content.
    pub fn visible_range(&self) -> DateRange {
        self.options.geometry.visible_range(
            self.scroll_position,
            self.reference_date,
            self.zoom,
            self.viewport_width,
        )
    }

    /// The continuous date under the viewport center, for pixel-accurate placement.
    pub fn current_center_date(&self) -> NaiveDateTime {
        self.options
            .geometry
            .center_date_from_scroll(self.scroll_position, self.reference_date, self.zoom)
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom.zoomed_in().is_some()
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom.zoomed_out().is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
        self.tween_sample = None;
    }

    /// The visible range recomputed since the last call, if any.
    pub fn take_range_change(&mut self) -> Option<DateRange> {
        self.pending_range.take()
    }

    fn note_range_change(&mut self) {
        let range = self.visible_range();
        if self.options.dedupe_range_changes && self.last_range == Some(range) {
            return;
        }
        self.last_range = Some(range);
        self.pending_range = Some(range);
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    ///
    /// An event that echoes the last tween sample keeps the tween running; any other event cancels
    /// it.
    pub fn handle_scroll_change<S: ScrollSurface + ?Sized>(
        &mut self,
        scroll_left: f64,
        now_ms: u64,
        surface: &mut S,
    ) -> ScrollOutcome {
        let is_echo = self
            .tween_sample
            .is_some_and(|sample| (sample - scroll_left).abs() <= 0.5);
        if !is_echo {
            self.cancel_animation();
        }
        self.apply_scroll(scroll_left, now_ms, surface)
    }

    fn apply_scroll<S: ScrollSurface + ?Sized>(
        &mut self,
        scroll_left: f64,
        now_ms: u64,
        surface: &mut S,
    ) -> ScrollOutcome {
        let config = self.scroll_config();
        let outcome = self.rebase.handle_scroll_change(
            scroll_left,
            now_ms,
            &config,
            self.viewport_width,
            surface,
        );
        if let ScrollOutcome::Rebased { shift_units: units, .. } = outcome {
            self.reference_date = shift_units(self.reference_date, units, config.unit);
            if let Some(tween) = &mut self.tween {
                tween.translate(outcome.scroll_left() - scroll_left);
            }
        }
        self.scroll_position = outcome.scroll_left();
        self.note_range_change();
        outcome
    }

    /// Scrolls so that `date` sits at the viewport center.
    ///
    /// A target outside the safe zone re-centers the coordinate system on `date` instead, which
    /// always scrolls instantly.
    pub fn go_to_date<S: ScrollSurface + ?Sized>(
        &mut self,
        date: NaiveDateTime,
        behavior: ScrollBehavior,
        surface: &mut S,
    ) -> f64 {
        self.cancel_animation();
        let (target, behavior) = self.target_for_date(date, behavior, surface);
        self.scroll_position = target;
        surface.scroll_to(target, behavior);
        self.note_range_change();
        target
    }

    fn target_for_date<S: ScrollSurface + ?Sized>(
        &mut self,
        date: NaiveDateTime,
        behavior: ScrollBehavior,
        surface: &S,
    ) -> (f64, ScrollBehavior) {
        let config = self.scroll_config();
        let target = self
            .options
            .geometry
            .scroll_position_for_date(date, self.reference_date, self.zoom);
        if config.is_in_safe_zone(target) {
            return (
                RebaseController::clamp_scroll_left(&config, target, surface),
                behavior,
            );
        }

        vdebug!(%date, target, "re-centering reference date");
        self.reference_date = date;
        self.rebase.reset();
        (config.center, ScrollBehavior::Instant)
    }

    /// Starts an adapter-driven tween that brings `date` to the viewport center.
    ///
    /// Returns the target offset. Far targets re-center instantly instead and return `None`.
    pub fn start_tween_to_date<S: ScrollSurface + ?Sized>(
        &mut self,
        date: NaiveDateTime,
        now_ms: u64,
        surface: &mut S,
    ) -> Option<f64> {
        let (target, behavior) = self.target_for_date(date, ScrollBehavior::Smooth, surface);
        if behavior == ScrollBehavior::Instant {
            self.cancel_animation();
            self.scroll_position = target;
            surface.scroll_to(target, behavior);
            self.note_range_change();
            return None;
        }
        self.tween = Some(Tween::new(
            self.scroll_position,
            target,
            now_ms,
            self.options.tween_duration_ms,
            self.options.easing,
        ));
        Some(target)
    }

    /// Switches the zoom level, keeping the date at the viewport center in place.
    ///
    /// Returns `false` if `zoom` is already active.
    pub fn change_zoom<S: ScrollSurface + ?Sized>(
        &mut self,
        zoom: ZoomLevel,
        surface: &mut S,
    ) -> bool {
        if zoom == self.zoom {
            return false;
        }
        let center = self.current_center_date();
        self.cancel_animation();
        self.rebase.reset();
        self.zoom = zoom;
        vdebug!(?zoom, %center, "change zoom");
        self.go_to_date(center, ScrollBehavior::Instant, surface);
        true
    }

    pub fn zoom_in<S: ScrollSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.zoom.zoomed_in() {
            Some(zoom) => self.change_zoom(zoom, surface),
            None => false,
        }
    }

    pub fn zoom_out<S: ScrollSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.zoom.zoomed_out() {
            Some(zoom) => self.change_zoom(zoom, surface),
            None => false,
        }
    }

    /// Moves forward by one month (week zoom), one day (day zoom) or one hour (hour zoom).
    pub fn go_next<S: ScrollSurface + ?Sized>(
        &mut self,
        behavior: ScrollBehavior,
        surface: &mut S,
    ) -> f64 {
        let date = self.step_from_center(1);
        self.go_to_date(date, behavior, surface)
    }

    /// The mirror of [`Calendar::go_next`].
    pub fn go_prev<S: ScrollSurface + ?Sized>(
        &mut self,
        behavior: ScrollBehavior,
        surface: &mut S,
    ) -> f64 {
        let date = self.step_from_center(-1);
        self.go_to_date(date, behavior, surface)
    }

    fn step_from_center(&self, sign: i64) -> NaiveDateTime {
        let center = self.visible_range().center();
        match self.zoom {
            ZoomLevel::Week => {
                let stepped = if sign >= 0 {
                    center.checked_add_months(Months::new(1))
                } else {
                    center.checked_sub_months(Months::new(1))
                };
                stepped.unwrap_or(center)
            }
            zoom => shift_units(center, sign, zoom.unit()),
        }
    }

    /// Resize. Recomputes columns and the visible range; never rebases.
    pub fn set_viewport_width(&mut self, viewport_width: f64) {
        self.viewport_width = viewport_width.max(0.0);
        self.note_range_change();
    }

    /// Advances timers and the active tween.
    ///
    /// Returns the new scroll position while a tween is running.
    pub fn tick<S: ScrollSurface + ?Sized>(
        &mut self,
        now_ms: u64,
        surface: &mut S,
    ) -> Option<f64> {
        self.rebase.tick(now_ms);

        let tween = self.tween?;
        let sample = tween.sample(now_ms);
        surface.scroll_to(sample, ScrollBehavior::Instant);
        self.tween_sample = Some(sample);
        let outcome = self.apply_scroll(sample, now_ms, surface);
        if let ScrollOutcome::Rebased { .. } = outcome {
            self.tween_sample = Some(outcome.scroll_left());
        }

        if tween.is_done(now_ms) {
            self.cancel_animation();
        }
        Some(self.scroll_position)
    }

    /// Cancels pending timers and tweens (teardown).
    pub fn cancel_timers(&mut self) {
        self.rebase.cancel_idle();
        self.cancel_animation();
    }
}
