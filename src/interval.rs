// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Half-open time intervals.
//!
//! [`Interval<T>`] is generic over any [`TimeInstant`]: naive local
//! wall-clock times or zoned `chrono` instants. Intervals are treated
//! as `[start, end)` throughout, so two back-to-back intervals never both
//! contain their shared edge.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone};
use std::fmt;

/// Trait for types that represent a point in time.
pub trait TimeInstant: Clone + PartialOrd {
    /// The duration type produced by subtracting two instants.
    type Duration;

    /// `self − other`.
    fn difference(&self, other: &Self) -> Self::Duration;
}

impl TimeInstant for NaiveDateTime {
    type Duration = TimeDelta;

    #[inline]
    fn difference(&self, other: &Self) -> Self::Duration {
        *self - *other
    }
}

impl<Tz: TimeZone> TimeInstant for DateTime<Tz> {
    type Duration = TimeDelta;

    #[inline]
    fn difference(&self, other: &Self) -> Self::Duration {
        self.clone() - other.clone()
    }
}

/// An interval between two instants, `[start, end)`.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeDelta};
/// use miqat::Interval;
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 2, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let span = Interval::new(day(18), day(20));
/// assert_eq!(span.duration(), TimeDelta::days(2));
/// assert!(span.contains(&day(19)));
/// assert!(!span.contains(&day(20)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

impl<T: TimeInstant> Interval<T> {
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// `end − start`.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: &T) -> bool {
        *instant >= self.start && *instant < self.end
    }

    /// Whether `instant` comes before the interval opens.
    pub fn is_pending_at(&self, instant: &T) -> bool {
        *instant < self.start
    }

    /// Whether the interval has closed at `instant`.
    pub fn is_elapsed_at(&self, instant: &T) -> bool {
        *instant >= self.end
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
