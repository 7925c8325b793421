use core::ops::{Index, IndexMut};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

pub(crate) const MS_PER_HOUR: i64 = 60 * 60 * 1000;
pub(crate) const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
pub(crate) const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Discrete granularity of the timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoomLevel {
    Week = 0,
    #[default]
    Day = 1,
    Hour = 2,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 3] = [ZoomLevel::Week, ZoomLevel::Day, ZoomLevel::Hour];

    /// Converts a raw zoom index. Unknown values fall back to [`ZoomLevel::Day`].
    pub fn from_index(index: i64) -> Self {
        Self::try_from_index(index).unwrap_or(Self::Day)
    }

    pub fn try_from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Week),
            1 => Some(Self::Day),
            2 => Some(Self::Hour),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn unit(self) -> TimeUnit {
        match self {
            Self::Week => TimeUnit::Weeks,
            Self::Day => TimeUnit::Days,
            Self::Hour => TimeUnit::Hours,
        }
    }

    /// The next finer zoom level, if any.
    pub fn zoomed_in(self) -> Option<Self> {
        Self::try_from_index(self as i64 + 1)
    }

    /// The next coarser zoom level, if any.
    pub fn zoomed_out(self) -> Option<Self> {
        Self::try_from_index(self as i64 - 1)
    }
}

/// The time span covered by one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeUnit {
    Weeks,
    Days,
    Hours,
}

impl TimeUnit {
    pub const fn millis(self) -> i64 {
        match self {
            Self::Weeks => MS_PER_WEEK,
            Self::Days => MS_PER_DAY,
            Self::Hours => MS_PER_HOUR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Backward, Direction::Forward];

    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// `1` for forward, `-1` for backward.
    pub fn signum(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// A value kept separately for each scroll/fetch direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ByDirection<T> {
    pub forward: T,
    pub backward: T,
}

impl<T> ByDirection<T> {
    pub fn new(forward: T, backward: T) -> Self {
        Self { forward, backward }
    }
}

impl<T> Index<Direction> for ByDirection<T> {
    type Output = T;

    fn index(&self, direction: Direction) -> &T {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }
}

impl<T> IndexMut<Direction> for ByDirection<T> {
    fn index_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        }
    }
}

/// An inclusive date span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn span_ms(&self) -> i64 {
        diff_ms(self.end, self.start)
    }

    /// The midpoint of the range.
    pub fn center(&self) -> NaiveDateTime {
        shift_ms(self.start, self.span_ms() / 2)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    /// Inclusive overlap test against another span.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.end && end >= self.start
    }
}

/// A point in grid-local pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub(crate) fn diff_ms(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    a.signed_duration_since(b).num_milliseconds()
}

/// Shifts a date by milliseconds, saturating at the representable bounds.
pub(crate) fn shift_ms(at: NaiveDateTime, ms: i64) -> NaiveDateTime {
    let shifted = TimeDelta::try_milliseconds(ms).and_then(|delta| at.checked_add_signed(delta));
    match shifted {
        Some(v) => v,
        None if ms < 0 => NaiveDateTime::MIN,
        None => NaiveDateTime::MAX,
    }
}

/// Shifts a date by whole units (weeks/days/hours).
pub fn shift_units(at: NaiveDateTime, units: i64, unit: TimeUnit) -> NaiveDateTime {
    shift_ms(at, units.saturating_mul(unit.millis()))
}

/// Shifts a date by a fractional number of units, rounded to the millisecond.
pub fn shift_fractional_units(at: NaiveDateTime, units: f64, unit: TimeUnit) -> NaiveDateTime {
    let ms = (units * unit.millis() as f64).round();
    if !ms.is_finite() {
        return at;
    }
    shift_ms(at, ms as i64)
}

/// Signed fractional number of `unit`s from `from` to `to`.
pub fn unit_diff(to: NaiveDateTime, from: NaiveDateTime, unit: TimeUnit) -> f64 {
    diff_ms(to, from) as f64 / unit.millis() as f64
}

pub fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

pub fn start_of_hour(at: NaiveDateTime) -> NaiveDateTime {
    at.date()
        .and_hms_opt(at.hour(), 0, 0)
        .unwrap_or_else(|| start_of_day(at))
}

/// Monday 00:00 of the ISO week containing `at`.
pub fn start_of_iso_week(at: NaiveDateTime) -> NaiveDateTime {
    let back = at.weekday().num_days_from_monday() as i64;
    shift_units(start_of_day(at), -back, TimeUnit::Days)
}

/// Milliseconds since the Unix epoch, treating the naive time as UTC.
pub fn timestamp_ms(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp_millis()
}

pub(crate) fn format_day(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}
