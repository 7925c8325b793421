//! Scroll offset ↔ date mapping.
//!
//! Scroll offset `center` corresponds to the reference date. Two flavours exist:
//! - a discretized, buffered one ([`GridGeometry::visible_range`]) for range queries
//!   (data-window sizing, prefetch decisions);
//! - a continuous one ([`GridGeometry::center_date_from_scroll`]) for pixel-accurate tile
//!   placement.

use chrono::NaiveDateTime;

use crate::types::{shift_fractional_units, shift_units, start_of_day, start_of_iso_week, unit_diff};
use crate::{DateRange, GridGeometry, ZoomLevel};

impl GridGeometry {
    /// Whole units between the container center and `scroll_left` (floored).
    pub fn offset_units(&self, scroll_left: f64, zoom: ZoomLevel) -> i64 {
        let config = self.scroll_config(zoom);
        let cell_width = self.cell_width(zoom);
        if cell_width <= 0.0 {
            return 0;
        }
        ((scroll_left - config.center) / cell_width).floor() as i64
    }

    /// The date span that must have rendered content, including the rendering buffer.
    pub fn visible_range(
        &self,
        scroll_left: f64,
        reference_date: NaiveDateTime,
        zoom: ZoomLevel,
        viewport_width: f64,
    ) -> DateRange {
        let unit = zoom.unit();
        let offset = self.offset_units(scroll_left, zoom);
        let current_center = shift_units(reference_date, offset, unit);
        let visible_units = self.cols(zoom, viewport_width) as i64;
        let from_center = visible_units / 2 + self.render_buffer_units as i64;

        DateRange::new(
            shift_units(current_center, -from_center, unit),
            shift_units(current_center, from_center, unit),
        )
    }

    /// The continuous date under the viewport center (no unit flooring).
    pub fn center_date_from_scroll(
        &self,
        scroll_left: f64,
        reference_date: NaiveDateTime,
        zoom: ZoomLevel,
    ) -> NaiveDateTime {
        let config = self.scroll_config(zoom);
        let cell_width = self.cell_width(zoom);
        if cell_width <= 0.0 {
            return reference_date;
        }
        let offset = (scroll_left - config.center) / cell_width;
        shift_fractional_units(reference_date, offset, config.unit)
    }

    /// Inverse of [`Self::center_date_from_scroll`].
    pub fn scroll_position_for_date(
        &self,
        target: NaiveDateTime,
        reference_date: NaiveDateTime,
        zoom: ZoomLevel,
    ) -> f64 {
        let config = self.scroll_config(zoom);
        config.center + unit_diff(target, reference_date, config.unit) * self.cell_width(zoom)
    }

    /// Signed fractional units from `center_date` to `date`, with `date` snapped to the start of
    /// its ISO week (week zoom) or day (day zoom). Hour zoom uses exact fractional hours.
    pub fn unit_offset_from_center(
        &self,
        date: NaiveDateTime,
        center_date: NaiveDateTime,
        zoom: ZoomLevel,
    ) -> f64 {
        let snapped = match zoom {
            ZoomLevel::Week => start_of_iso_week(date),
            ZoomLevel::Day => start_of_day(date),
            ZoomLevel::Hour => date,
        };
        unit_diff(snapped, center_date, zoom.unit())
    }

    /// Horizontal pixel position of `date` inside a viewport of `cols` columns whose center
    /// column shows `center_date`.
    pub fn tile_x(
        &self,
        date: NaiveDateTime,
        center_date: NaiveDateTime,
        zoom: ZoomLevel,
        cols: usize,
    ) -> f64 {
        let cell_width = self.cell_width(zoom);
        let center_col = (cols / 2) as f64;
        let x = (center_col + self.unit_offset_from_center(date, center_date, zoom)) * cell_width;
        match zoom {
            // The hourly grid is drawn with a half-cell lead for its borders.
            ZoomLevel::Hour => x + cell_width / 2.0,
            _ => x,
        }
    }
}

/// Inclusive overlap of a project span with a date range.
pub fn is_project_visible(start: NaiveDateTime, end: NaiveDateTime, range: &DateRange) -> bool {
    range.overlaps(start, end)
}
