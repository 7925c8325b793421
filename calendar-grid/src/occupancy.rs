use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::types::{diff_ms, shift_ms, start_of_day};
use crate::{OccupancyOptions, PackedResource, Project, TimeUnit, ZoomLevel, shift_units};

const MINUTES_PER_HOUR: u64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;

/// A duration split into whole hours and the remaining minutes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoursMinutes {
    pub hours: u32,
    pub minutes: u32,
}

impl HoursMinutes {
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
    };

    pub fn from_minutes(total: u64) -> Self {
        Self {
            hours: u32::try_from(total / MINUTES_PER_HOUR).unwrap_or(u32::MAX),
            minutes: (total % MINUTES_PER_HOUR) as u32,
        }
    }

    pub fn total_minutes(self) -> u64 {
        u64::from(self.hours) * MINUTES_PER_HOUR + u64::from(self.minutes)
    }
}

/// How much of a resource's capacity a grid cell books.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyData {
    pub taken: HoursMinutes,
    pub free: HoursMinutes,
    pub overtime: HoursMinutes,
}

impl OccupancyData {
    /// All zeros; used outside every resource.
    pub const EMPTY: Self = Self {
        taken: HoursMinutes::ZERO,
        free: HoursMinutes::ZERO,
        overtime: HoursMinutes::ZERO,
    };

    /// Splits `taken` minutes against a capacity: whatever is left is free, the excess is
    /// overtime.
    pub fn against_capacity(taken: u64, capacity: u64) -> Self {
        Self {
            taken: HoursMinutes::from_minutes(taken),
            free: HoursMinutes::from_minutes(capacity.saturating_sub(taken)),
            overtime: HoursMinutes::from_minutes(taken.saturating_sub(capacity)),
        }
    }
}

/// Occupancy of the cell starting at `focused_date` for the current zoom.
///
/// `focused_date` is the start of the unit under the pointer (see [`crate::hit_test`]).
pub fn occupancy(
    resource: &PackedResource<'_>,
    focused_date: NaiveDateTime,
    zoom: ZoomLevel,
    day_start_hour: u32,
    options: &OccupancyOptions,
) -> OccupancyData {
    match zoom {
        ZoomLevel::Week => week_occupancy(resource, focused_date.date(), options),
        ZoomLevel::Day => day_occupancy(resource, focused_date.date(), options),
        ZoomLevel::Hour => hour_occupancy(resource, focused_date, day_start_hour),
    }
}

/// Sums the daily occupancy of every project spanning `day` against one day of capacity.
pub fn day_occupancy(
    resource: &PackedResource<'_>,
    day: NaiveDate,
    options: &OccupancyOptions,
) -> OccupancyData {
    OccupancyData::against_capacity(
        taken_minutes_on(resource, day, options),
        options.capacity_minutes(),
    )
}

/// Sums the seven days from `week_start` against the capacity of the week's working days.
///
/// Weekends only count, in both taken time and capacity, when
/// [`OccupancyOptions::include_weekends`] is set.
pub fn week_occupancy(
    resource: &PackedResource<'_>,
    week_start: NaiveDate,
    options: &OccupancyOptions,
) -> OccupancyData {
    let mut taken = 0;
    let mut working_days = 0;
    for day in week_start.iter_days().take(7) {
        if counts_day(day, options) {
            working_days += 1;
            taken += taken_minutes_on(resource, day, options);
        }
    }
    OccupancyData::against_capacity(taken, options.capacity_minutes() * working_days)
}

/// Booked time within the hour starting at `hour_start`.
///
/// Each sub-row contributes the first project spanning that day. Those projects are laid end to
/// end from `day_start_hour`, the same way the hourly tiles are, and the overlap with the hour is
/// summed up to a full hour. There is no overtime within an hour.
pub fn hour_occupancy(
    resource: &PackedResource<'_>,
    hour_start: NaiveDateTime,
    day_start_hour: u32,
) -> OccupancyData {
    let day = hour_start.date();
    let hour_end = shift_units(hour_start, 1, TimeUnit::Hours);
    let mut cursor = shift_units(
        start_of_day(hour_start),
        i64::from(day_start_hour.min(23)),
        TimeUnit::Hours,
    );

    let mut taken_secs = 0i64;
    for sub_row in &resource.sub_rows {
        let Some(project) = sub_row.iter().find(|p| spans_day(p, day)) else {
            continue;
        };
        let start = cursor;
        let end = shift_ms(start, i64::from(project.occupancy) * 1000);
        cursor = end;

        let overlap = diff_ms(end.min(hour_end), start.max(hour_start)) / 1000;
        if overlap > 0 {
            taken_secs += overlap;
            if taken_secs >= SECONDS_PER_HOUR {
                taken_secs = SECONDS_PER_HOUR;
                break;
            }
        }
    }

    let taken = (taken_secs / 60) as u64;
    OccupancyData {
        taken: HoursMinutes::from_minutes(taken),
        free: HoursMinutes::from_minutes(MINUTES_PER_HOUR.saturating_sub(taken)),
        overtime: HoursMinutes::ZERO,
    }
}

fn taken_minutes_on(
    resource: &PackedResource<'_>,
    day: NaiveDate,
    options: &OccupancyOptions,
) -> u64 {
    if !counts_day(day, options) {
        return 0;
    }
    let seconds: u64 = resource
        .row
        .data
        .iter()
        .filter(|p| spans_day(p, day))
        .map(|p| u64::from(p.occupancy))
        .sum();
    seconds / 60
}

fn counts_day(day: NaiveDate, options: &OccupancyOptions) -> bool {
    options.include_weekends || !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Day-granular, inclusive on both ends.
fn spans_day(project: &Project, day: NaiveDate) -> bool {
    project.start_date.date() <= day && day <= project.end_date.date()
}
