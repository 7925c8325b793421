/// Pixel and span configuration of the virtual time axis.
///
/// All mapping functions in this crate are methods on this type, so an adapter holds one value
/// and passes it wherever geometry is needed. The defaults match a 10-year virtual container
/// that rebases every 180 days.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridGeometry {
    pub week_cell_width: f64,
    pub day_cell_width: f64,
    pub hour_cell_width: f64,
    /// Total span of the virtual scroll container, in days.
    pub container_days: u32,
    /// Span shifted by a single rebase step, in days.
    pub reposition_jump_days: u32,
    /// Fraction of the container width past which a rebase triggers (mirrored for the low side).
    pub reposition_threshold: f64,
    /// Extra units rendered on each side of the viewport.
    pub render_buffer_units: u32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            week_cell_width: 84.0,
            day_cell_width: 50.0,
            hour_cell_width: 50.0,
            container_days: 3650,
            reposition_jump_days: 180,
            reposition_threshold: 0.8,
            render_buffer_units: 2,
        }
    }
}

impl GridGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell_widths(mut self, week: f64, day: f64, hour: f64) -> Self {
        self.week_cell_width = week;
        self.day_cell_width = day;
        self.hour_cell_width = hour;
        self
    }

    pub fn with_container_days(mut self, container_days: u32) -> Self {
        self.container_days = container_days;
        self
    }

    pub fn with_reposition_jump_days(mut self, reposition_jump_days: u32) -> Self {
        self.reposition_jump_days = reposition_jump_days;
        self
    }

    pub fn with_reposition_threshold(mut self, reposition_threshold: f64) -> Self {
        self.reposition_threshold = reposition_threshold;
        self
    }

    pub fn with_render_buffer_units(mut self, render_buffer_units: u32) -> Self {
        self.render_buffer_units = render_buffer_units;
        self
    }
}

/// Vertical layout of tiles plus the hourly-view day start.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileOptions {
    pub row_height: f64,
    pub tile_y_offset: f64,
    pub tile_height: f64,
    /// Hour at which the first project of a day starts in the hourly view (0-23).
    pub day_start_hour: u32,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self {
            row_height: 56.0,
            tile_y_offset: 4.0,
            tile_height: 48.0,
            day_start_hour: 9,
        }
    }
}

impl TileOptions {
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_tile_y_offset(mut self, tile_y_offset: f64) -> Self {
        self.tile_y_offset = tile_y_offset;
        self
    }

    pub fn with_tile_height(mut self, tile_height: f64) -> Self {
        self.tile_height = tile_height;
        self
    }

    pub fn with_day_start_hour(mut self, day_start_hour: u32) -> Self {
        self.day_start_hour = day_start_hour.min(23);
        self
    }
}

/// Capacity used to split a resource's booked time into free time and overtime.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct OccupancyOptions {
    /// Working hours per day; fractions are kept to the minute (7.5 is 7h 30m).
    pub max_hours_per_day: f64,
    /// Count bookings on Saturdays and Sundays. Off by default, weekends then book nothing.
    pub include_weekends: bool,
}

impl Default for OccupancyOptions {
    fn default() -> Self {
        Self {
            max_hours_per_day: 8.0,
            include_weekends: false,
        }
    }
}

impl OccupancyOptions {
    pub fn with_max_hours_per_day(mut self, hours: f64) -> Self {
        self.max_hours_per_day = hours;
        self
    }

    pub fn with_include_weekends(mut self, include: bool) -> Self {
        self.include_weekends = include;
        self
    }

    /// Daily capacity in minutes. Non-finite or non-positive hours fall back to 8.
    pub fn capacity_minutes(&self) -> u64 {
        let hours = if self.max_hours_per_day.is_finite() && self.max_hours_per_day > 0.0 {
            self.max_hours_per_day
        } else {
            8.0
        };
        let whole = hours.floor();
        (whole as u64) * 60 + ((hours - whole) * 60.0).round() as u64
    }
}

/// Raw, user-supplied data loading configuration.
///
/// Every key is optional and may hold any number (including NaN). Use
/// [`DataLoadingOptions::normalized`] to obtain the validated [`DataLoadingConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct DataLoadingOptions {
    pub prefetch_days: Option<f64>,
    pub prefetch_trigger_days: Option<f64>,
    pub prefetch_trigger_ratio: Option<f64>,
    pub max_cached_days: Option<f64>,
}

impl DataLoadingOptions {
    pub fn with_prefetch_days(mut self, days: f64) -> Self {
        self.prefetch_days = Some(days);
        self
    }

    pub fn with_prefetch_trigger_days(mut self, days: f64) -> Self {
        self.prefetch_trigger_days = Some(days);
        self
    }

    pub fn with_prefetch_trigger_ratio(mut self, ratio: f64) -> Self {
        self.prefetch_trigger_ratio = Some(ratio);
        self
    }

    pub fn with_max_cached_days(mut self, days: f64) -> Self {
        self.max_cached_days = Some(days);
        self
    }

    /// Applies defaults and clamping to each key independently.
    pub fn normalized(&self) -> DataLoadingConfig {
        let defaults = DataLoadingConfig::default();
        DataLoadingConfig {
            prefetch_days: normalize_int(self.prefetch_days, 1, defaults.prefetch_days),
            prefetch_trigger_days: normalize_int(
                self.prefetch_trigger_days,
                0,
                defaults.prefetch_trigger_days,
            ),
            prefetch_trigger_ratio: match self.prefetch_trigger_ratio {
                Some(v) if !v.is_nan() => v.clamp(0.01, 0.99),
                _ => defaults.prefetch_trigger_ratio,
            },
            max_cached_days: normalize_int(self.max_cached_days, 1, defaults.max_cached_days),
        }
    }
}

fn normalize_int(value: Option<f64>, min: u32, fallback: u32) -> u32 {
    match value {
        Some(v) if v.is_finite() => v.floor().clamp(min as f64, u32::MAX as f64) as u32,
        Some(v) if v == f64::INFINITY => u32::MAX,
        Some(v) if v == f64::NEG_INFINITY => min,
        _ => fallback,
    }
}

/// Validated data loading configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataLoadingConfig {
    /// Days requested per prefetch page (>= 1).
    pub prefetch_days: u32,
    /// Remaining cached days that trigger a prefetch (>= 0).
    pub prefetch_trigger_days: u32,
    /// Proportional trigger position within the cached range, in `[0.01, 0.99]`.
    pub prefetch_trigger_ratio: f64,
    /// Half-width of the retention window, in days (>= 1).
    pub max_cached_days: u32,
}

impl Default for DataLoadingConfig {
    fn default() -> Self {
        Self {
            prefetch_days: 30,
            prefetch_trigger_days: 30,
            prefetch_trigger_ratio: 0.8,
            max_cached_days: 60,
        }
    }
}
