// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The Ramadan window.
//!
//! A [`RamadanWindow`] is a pair of local wall-clock instants: midnight
//! opening the first fasting day, and midnight following the last one. It
//! is stored timezone-free and pinned to a zone with
//! [`RamadanWindow::resolve`], which yields a half-open [`Interval`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use crate::clock::resolve_local;
use crate::error::{MiqatError, MiqatResult};
use crate::hijri::{HijriDate, RAMADAN, SHAWWAL};
use crate::interval::Interval;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

/// Local wall-clock bounds of a Ramadan season, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RamadanWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl RamadanWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> MiqatResult<Self> {
        if start >= end {
            return Err(MiqatError::invalid_input(
                "ramadan window",
                format!("start {start} is not before end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Window from the first fasting day to the day after the last one
    /// (Eid al-Fitr), both at local midnight.
    pub fn from_dates(first_day: NaiveDate, eid: NaiveDate) -> MiqatResult<Self> {
        Self::new(
            first_day.and_time(NaiveTime::MIN),
            eid.and_time(NaiveTime::MIN),
        )
    }

    /// Ramadan 1447 as announced for central Europe: 18 February to
    /// 19 March 2026.
    pub fn fixed() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2026, 2, 18)
                .unwrap_or_default()
                .and_time(NaiveTime::MIN),
            end: NaiveDate::from_ymd_opt(2026, 3, 20)
                .unwrap_or_default()
                .and_time(NaiveTime::MIN),
        }
    }

    /// Ramadan of `year` AH from the tabular calendar, moved by the local
    /// sighting offset (see [`HijriDate::from_gregorian_with_offset`]).
    pub fn for_hijri_year(year: i32, offset_days: i32) -> MiqatResult<Self> {
        let shift = Duration::days(-i64::from(offset_days));
        let first = HijriDate::new(year, RAMADAN, 1)?.to_gregorian()? + shift;
        let eid = HijriDate::new(year, SHAWWAL, 1)?.to_gregorian()? + shift;
        Self::from_dates(first, eid)
    }

    /// The Ramadan in progress on `date`, the one that just ended while the
    /// calendar is still in Shawwal, or else the next one to begin.
    pub fn season_for(date: NaiveDate, offset_days: i32) -> MiqatResult<Self> {
        let today = HijriDate::from_gregorian_with_offset(date, offset_days)?;
        let year = if today.month() > SHAWWAL {
            today.year() + 1
        } else {
            today.year()
        };
        Self::for_hijri_year(year, offset_days)
    }

    #[inline]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// First fasting day.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Number of whole local days covered.
    pub fn length_days(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days()
    }

    /// One-based index of `date` within the season.
    pub fn day_of_ramadan(&self, date: NaiveDate) -> Option<u32> {
        let instant = date.and_time(NaiveTime::MIN);
        if !self.as_interval().contains(&instant) {
            return None;
        }
        u32::try_from((date - self.start.date()).num_days() + 1).ok()
    }

    pub fn as_interval(&self) -> Interval<NaiveDateTime> {
        Interval::new(self.start, self.end)
    }

    /// Pin both bounds to `tz`.
    pub fn resolve(&self, tz: &Tz) -> Interval<chrono::DateTime<Tz>> {
        Interval::new(resolve_local(tz, self.start), resolve_local(tz, self.end))
    }
}

impl std::fmt::Display for RamadanWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ramadan {}", self.as_interval())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RamadanWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: NaiveDateTime,
            end: NaiveDateTime,
        }

        let raw = Raw::deserialize(deserializer)?;
        RamadanWindow::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
