use crate::{GridGeometry, TimeUnit, ZoomLevel};

/// Geometry of the virtual scroll container for one zoom level.
///
/// This is a pure function of the zoom level and [`GridGeometry`]; adapters should memoize it
/// keyed on zoom only.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollConfig {
    pub container_width: f64,
    /// Scroll offset that maps to the reference date.
    pub center: f64,
    /// Pixel distance covered by one rebase step.
    pub reposition_jump: f64,
    pub threshold_high: f64,
    pub threshold_low: f64,
    /// Units (of `unit`) the reference date moves per rebase step.
    pub date_shift: i64,
    pub unit: TimeUnit,
}

impl ScrollConfig {
    /// Whether `scroll_left` lies inside `[threshold_low, threshold_high]`.
    pub fn is_in_safe_zone(&self, scroll_left: f64) -> bool {
        scroll_left >= self.threshold_low && scroll_left <= self.threshold_high
    }

    /// Bounds a scroll target to `[0, max_scroll_left]`, defaulting the upper bound to the
    /// container width.
    pub fn clamp_scroll_left(&self, value: f64, max_scroll_left: Option<f64>) -> f64 {
        let max = max_scroll_left
            .map(|m| m.max(0.0))
            .unwrap_or(self.container_width);
        value.max(0.0).min(max)
    }
}

impl GridGeometry {
    pub fn cell_width(&self, zoom: ZoomLevel) -> f64 {
        match zoom {
            ZoomLevel::Week => self.week_cell_width,
            ZoomLevel::Day => self.day_cell_width,
            ZoomLevel::Hour => self.hour_cell_width,
        }
    }

    pub fn scroll_config(&self, zoom: ZoomLevel) -> ScrollConfig {
        let cell_width = self.cell_width(zoom);
        let (units, jump_units) = match zoom {
            ZoomLevel::Week => (
                (self.container_days / 7) as i64,
                (self.reposition_jump_days / 7) as i64,
            ),
            ZoomLevel::Day => (
                self.container_days as i64,
                self.reposition_jump_days as i64,
            ),
            ZoomLevel::Hour => (
                self.container_days as i64 * 24,
                self.reposition_jump_days as i64 * 24,
            ),
        };
        let ratio = self.reposition_threshold.clamp(0.5, 1.0);
        let container_width = units as f64 * cell_width;

        ScrollConfig {
            container_width,
            center: container_width / 2.0,
            reposition_jump: jump_units as f64 * cell_width,
            threshold_high: container_width * ratio,
            threshold_low: container_width * (1.0 - ratio),
            date_shift: jump_units,
            unit: zoom.unit(),
        }
    }

    /// Number of columns needed to cover `viewport_width`.
    pub fn cols(&self, zoom: ZoomLevel, viewport_width: f64) -> usize {
        let cell_width = self.cell_width(zoom);
        if cell_width <= 0.0 || viewport_width <= 0.0 {
            return 0;
        }
        (viewport_width / cell_width).ceil() as usize
    }
}
