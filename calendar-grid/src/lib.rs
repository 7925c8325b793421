//! A headless engine for virtualized calendar/scheduler grids.
//!
//! For stateful controllers (scroll rebasing, prefetch window, tweens), see the
//! `calendar-grid-adapter` crate.
//!
//! This crate holds the pure parts of a resource × time grid that scrolls "forever" in both
//! directions: zoom-level cell geometry, the scroll offset ↔ date mapping anchored on a movable
//! reference date, scheduler data transforms (merge, trim, data range), prefetch decisions, tile
//! placement and per-cell occupancy.
//!
//! It is UI-agnostic. A rendering layer is expected to provide:
//! - viewport width
//! - scroll offset of the virtual container
//! - the scheduler rows to lay out
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod data;
mod geometry;
mod layout;
mod mapping;
mod occupancy;
mod options;
mod prefetch;
mod tiles;
mod types;

#[cfg(test)]
mod tests;

pub use chrono;

pub use data::{
    Project, Row, RowLabel, SchedulerData, data_range, merge_scheduler_data, trim_data_to_range,
};
pub use geometry::ScrollConfig;
pub use hit_test::{HitContext, HitTest, hit_test};
pub use layout::{PackedResource, pack_resource, pack_resources, row_offsets, rows_per_resource};
pub use mapping::is_project_visible;
pub use occupancy::{
    HoursMinutes, OccupancyData, day_occupancy, hour_occupancy, occupancy, week_occupancy,
};
pub use options::{
    DataLoadingConfig, DataLoadingOptions, GridGeometry, OccupancyOptions, TileOptions,
};
pub use prefetch::{
    PrefetchFlags, PrefetchRequest, prefetch_flags, prefetch_request, retention_range,
};
pub use tiles::{PlacedTile, PlacementContext, place_tiles};
pub use types::{
    ByDirection, DateRange, Direction, Point, TimeUnit, ZoomLevel, shift_fractional_units,
    shift_units, start_of_day, start_of_hour, start_of_iso_week, timestamp_ms, unit_diff,
};
