use calendar_grid::{ByDirection, Direction, ScrollConfig};

use crate::{Debounce, ScrollBehavior, ScrollSurface};

/// Tuning of the anti-thrash behavior of [`RebaseController`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebaseOptions {
    /// Fraction of the viewport width a drag must travel past a rebase anchor to re-arm.
    pub rearm_viewport_ratio: f64,
    pub rearm_min_px: f64,
    pub rearm_max_px: f64,
    /// Re-arm distance used while the viewport width is unknown (<= 0).
    pub rearm_fallback_px: f64,
    /// Extra fraction of the base distance required per consecutive same-direction rebase.
    pub rearm_streak_growth: f64,
    /// Cap of the grown distance, in viewport widths.
    pub rearm_max_viewport_multiplier: f64,
    pub rearm_max_fallback_px: f64,
    /// Inactivity after which all locks and streaks are dropped.
    pub idle_reset_ms: u64,
}

impl Default for RebaseOptions {
    fn default() -> Self {
        Self {
            rearm_viewport_ratio: 0.25,
            rearm_min_px: 50.0,
            rearm_max_px: 400.0,
            rearm_fallback_px: 120.0,
            rearm_streak_growth: 0.5,
            rearm_max_viewport_multiplier: 2.0,
            rearm_max_fallback_px: 800.0,
            idle_reset_ms: 200,
        }
    }
}

impl RebaseOptions {
    pub fn with_rearm_viewport_ratio(mut self, ratio: f64) -> Self {
        self.rearm_viewport_ratio = ratio;
        self
    }

    pub fn with_rearm_bounds_px(mut self, min_px: f64, max_px: f64) -> Self {
        self.rearm_min_px = min_px;
        self.rearm_max_px = max_px;
        self
    }

    pub fn with_rearm_fallback_px(mut self, fallback_px: f64) -> Self {
        self.rearm_fallback_px = fallback_px;
        self
    }

    pub fn with_rearm_streak_growth(mut self, growth: f64) -> Self {
        self.rearm_streak_growth = growth;
        self
    }

    pub fn with_rearm_max_viewport_multiplier(mut self, multiplier: f64) -> Self {
        self.rearm_max_viewport_multiplier = multiplier;
        self
    }

    pub fn with_rearm_max_fallback_px(mut self, max_px: f64) -> Self {
        self.rearm_max_fallback_px = max_px;
        self
    }

    pub fn with_idle_reset_ms(mut self, idle_reset_ms: u64) -> Self {
        self.idle_reset_ms = idle_reset_ms;
        self
    }
}

/// Where the last rebase in one direction happened and where the viewport is held until the
/// drag re-arms.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebaseLock {
    pub anchor: f64,
    pub pinned_scroll_left: f64,
}

/// What [`RebaseController::handle_scroll_change`] did with a scroll event.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollOutcome {
    /// The position was taken as is.
    Accepted { scroll_left: f64 },
    /// A lock held the viewport at its pinned position.
    Pinned { scroll_left: f64 },
    /// The coordinate system moved: the reference date must shift by `shift_units` (signed, in
    /// the zoom's unit) and the scroll position is now `scroll_left`.
    Rebased {
        scroll_left: f64,
        direction: Direction,
        steps: u32,
        shift_units: i64,
    },
}

impl ScrollOutcome {
    /// The scroll position to store after this event.
    pub fn scroll_left(&self) -> f64 {
        match *self {
            Self::Accepted { scroll_left }
            | Self::Pinned { scroll_left }
            | Self::Rebased { scroll_left, .. } => scroll_left,
        }
    }

    pub fn is_rebase(&self) -> bool {
        matches!(self, Self::Rebased { .. })
    }
}

/// Threshold-based rebasing of the virtual scroll container, with directional locks.
///
/// A plain "rebase whenever a threshold is crossed" loops forever when a scrollbar thumb is
/// dragged back and forth across the threshold. After each rebase the controller locks that
/// direction: further events are pinned to the post-rebase position until the drag has moved
/// past the rebase anchor by a re-arm distance, and that distance grows with every consecutive
/// same-direction rebase. Locks and streaks are dropped when the position returns to the safe
/// zone or after `idle_reset_ms` without scroll events.
///
/// The controller does not own the reference date; callers apply the `shift_units` of a
/// [`ScrollOutcome::Rebased`] themselves.
#[derive(Clone, Debug)]
pub struct RebaseController {
    options: RebaseOptions,
    locks: ByDirection<Option<RebaseLock>>,
    streaks: ByDirection<u32>,
    idle: Debounce,
}

impl Default for RebaseController {
    fn default() -> Self {
        Self::new(RebaseOptions::default())
    }
}

impl RebaseController {
    pub fn new(options: RebaseOptions) -> Self {
        Self {
            idle: Debounce::new(options.idle_reset_ms),
            options,
            locks: ByDirection::default(),
            streaks: ByDirection::default(),
        }
    }

    pub fn options(&self) -> &RebaseOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RebaseOptions) {
        self.idle.set_delay_ms(options.idle_reset_ms);
        self.options = options;
    }

    pub fn lock(&self, direction: Direction) -> Option<RebaseLock> {
        self.locks[direction]
    }

    pub fn streak(&self, direction: Direction) -> u32 {
        self.streaks[direction]
    }

    pub fn is_idle_reset_pending(&self) -> bool {
        self.idle.is_pending()
    }

    /// Re-arm distance before any streak growth.
    pub fn base_rearm_distance(&self, viewport_width: f64) -> f64 {
        let o = &self.options;
        if viewport_width <= 0.0 {
            return o.rearm_fallback_px;
        }
        (viewport_width * o.rearm_viewport_ratio)
            .round()
            .min(o.rearm_max_px)
            .max(o.rearm_min_px)
    }

    /// Re-arm distance for the current streak in `direction`.
    pub fn adaptive_rearm_distance(&self, direction: Direction, viewport_width: f64) -> f64 {
        let o = &self.options;
        let growth = 1.0 + self.streaks[direction] as f64 * o.rearm_streak_growth;
        let cap = if viewport_width > 0.0 {
            (viewport_width * o.rearm_max_viewport_multiplier).round()
        } else {
            o.rearm_max_fallback_px
        };
        (self.base_rearm_distance(viewport_width) * growth)
            .round()
            .min(cap)
    }

    /// Bounds a scroll target to the surface's extent (or the container width).
    pub fn clamp_scroll_left<S: ScrollSurface + ?Sized>(
        config: &ScrollConfig,
        value: f64,
        surface: &S,
    ) -> f64 {
        config.clamp_scroll_left(value, surface.max_scroll_left())
    }

    /// Processes a scroll event at `scroll_left`.
    pub fn handle_scroll_change<S: ScrollSurface + ?Sized>(
        &mut self,
        scroll_left: f64,
        now_ms: u64,
        config: &ScrollConfig,
        viewport_width: f64,
        surface: &mut S,
    ) -> ScrollOutcome {
        self.idle.schedule(now_ms, ());

        if config.is_in_safe_zone(scroll_left) {
            self.reset();
            return ScrollOutcome::Accepted { scroll_left };
        }

        let direction = if scroll_left > config.threshold_high {
            Direction::Forward
        } else {
            Direction::Backward
        };

        if let Some(lock) = self.locks[direction] {
            let rearm = self.adaptive_rearm_distance(direction, viewport_width);
            if !has_passed_rearm_point(direction, scroll_left, lock.anchor, rearm) {
                let pinned = Self::clamp_scroll_left(config, lock.pinned_scroll_left, &*surface);
                if (surface.scroll_left() - pinned).abs() > 0.5 {
                    surface.scroll_to(pinned, ScrollBehavior::Instant);
                }
                vtrace!(scroll_left, pinned, rearm, ?direction, "pinned to rebase lock");
                return ScrollOutcome::Pinned {
                    scroll_left: pinned,
                };
            }
        }

        self.rebase(direction, scroll_left, config, surface)
    }

    fn rebase<S: ScrollSurface + ?Sized>(
        &mut self,
        direction: Direction,
        scroll_left: f64,
        config: &ScrollConfig,
        surface: &mut S,
    ) -> ScrollOutcome {
        if config.reposition_jump <= 0.0 {
            return ScrollOutcome::Accepted { scroll_left };
        }

        let past_threshold = match direction {
            Direction::Forward => scroll_left - config.threshold_high,
            Direction::Backward => config.threshold_low - scroll_left,
        };
        let steps = (past_threshold / config.reposition_jump).ceil().max(1.0) as u32;
        let scroll_shift = config.reposition_jump * steps as f64;
        let next = match direction {
            Direction::Forward => scroll_left - scroll_shift,
            Direction::Backward => scroll_left + scroll_shift,
        };
        let pinned = Self::clamp_scroll_left(config, next, &*surface);
        let shift_units = direction.signum() * config.date_shift * steps as i64;

        surface.scroll_to(pinned, ScrollBehavior::Instant);

        self.locks[direction] = Some(RebaseLock {
            anchor: scroll_left,
            pinned_scroll_left: pinned,
        });
        self.locks[direction.opposite()] = None;
        self.streaks[direction] += 1;
        self.streaks[direction.opposite()] = 0;

        vdebug!(
            scroll_left,
            pinned,
            steps,
            shift_units,
            streak = self.streaks[direction],
            ?direction,
            "rebase"
        );
        ScrollOutcome::Rebased {
            scroll_left: pinned,
            direction,
            steps,
            shift_units,
        }
    }

    /// Fires the idle reset when due. Returns `true` if state was cleared.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.idle.poll(now_ms).is_none() {
            return false;
        }
        vtrace!(now_ms, "idle rebase reset");
        self.reset();
        true
    }

    /// Clears both locks and both streaks.
    pub fn reset(&mut self) {
        self.locks = ByDirection::default();
        self.streaks = ByDirection::default();
    }

    /// Cancels the pending idle reset (teardown).
    pub fn cancel_idle(&mut self) {
        self.idle.cancel();
    }
}

fn has_passed_rearm_point(direction: Direction, scroll_left: f64, anchor: f64, rearm: f64) -> bool {
    match direction {
        Direction::Forward => scroll_left >= anchor + rearm,
        Direction::Backward => scroll_left <= anchor - rearm,
    }
}
