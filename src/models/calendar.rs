//! Hour-granularity timeline and interval models.
//!
//! All internal computation uses integer hour-offsets relative to the
//! schedule's start instant, for exactness and to avoid floating-point
//! drift. [`Timeline`] converts between absolute datetimes and offsets;
//! [`HourWindow`] is the half-open interval the rest of the engine
//! trades in.
//!
//! # Time Model
//! Datetimes are naive: no timezone arithmetic is performed. A trailing
//! `Z` on input is structurally stripped, not converted.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};

/// A half-open interval `[start, end)` in hour-offsets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct HourWindow {
    /// Interval start (hour offset, inclusive).
    pub start: i64,
    /// Interval end (hour offset, exclusive).
    pub end: i64,
}

impl HourWindow {
    /// Creates a new window.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Window length in hours. Zero or negative means empty.
    #[inline]
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    /// Whether the window covers no hours.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether an hour offset falls within this window.
    #[inline]
    pub fn contains(&self, hour: i64) -> bool {
        hour >= self.start && hour < self.end
    }

    /// Whether two windows share at least one hour.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection of two windows, or `None` when they are disjoint.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

/// The schedule's overall range and hour-offset frame of reference.
///
/// Offset 0 is `start`; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    /// Schedule start instant.
    pub start: NaiveDateTime,
    /// Schedule end instant (exclusive).
    pub end: NaiveDateTime,
}

impl Timeline {
    /// Creates a timeline, rejecting empty ranges.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> SchedulerResult<Self> {
        if end <= start {
            return Err(SchedulerError::EmptyTimeline {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Total schedulable hours in the range.
    pub fn total_hours(&self) -> i64 {
        (self.end - self.start).num_hours()
    }

    /// Hour offset of a datetime relative to the schedule start.
    ///
    /// Sub-hour precision is truncated; the engine operates on whole
    /// hours as its inputs do.
    pub fn offset_of(&self, instant: NaiveDateTime) -> i64 {
        (instant - self.start).num_hours()
    }

    /// Datetime at a given hour offset.
    pub fn instant_at(&self, offset: i64) -> NaiveDateTime {
        self.start + Duration::hours(offset)
    }

    /// The full range as a window: `[0, total_hours)`.
    pub fn full_window(&self) -> HourWindow {
        HourWindow::new(0, self.total_hours())
    }

    /// Clamps a window to the schedule bounds, `None` if nothing remains.
    pub fn clamp(&self, window: HourWindow) -> Option<HourWindow> {
        window.intersect(&self.full_window())
    }
}

/// Parses an ISO-8601-like datetime string.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds and an
/// optional trailing `Z` (stripped, not converted), plus bare dates
/// (`YYYY-MM-DD`, interpreted as midnight). Anything else fails with
/// [`SchedulerError::MalformedDateTime`].
pub fn parse_datetime(value: &str) -> SchedulerResult<NaiveDateTime> {
    let trimmed = value.strip_suffix('Z').unwrap_or(value);

    if let Ok(dt) = trimmed.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(date) = trimmed.parse::<NaiveDate>() {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(SchedulerError::MalformedDateTime {
        value: value.to_string(),
    })
}
