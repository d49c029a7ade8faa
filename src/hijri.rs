// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Tabular Hijri calendar.
//!
//! The arithmetical Islamic calendar: odd months have 30 days, even months
//! 29, and Dhu al-Hijjah gains a 30th day in the 11 leap years of each
//! 30-year cycle (2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29). Day 1 of year 1
//! is Julian Day Number 1 948 440 (civil epoch, 622-07-16 Julian).
//!
//! Observed months, which begin with a local crescent sighting, can differ
//! from the tabular ones by a day or two. Callers compensate with a signed
//! day offset, applied to the Gregorian date before conversion: `-1` when
//! the local community is one day behind the tables.

use chrono::{Duration, NaiveDate};

use crate::error::{MiqatError, MiqatResult};
use crate::julian::JulianDay;

#[cfg(feature = "serde")]
use serde::Serialize;

/// JDN of 1 Muharram 1 AH.
const EPOCH_JDN: i64 = 1_948_440;

/// Days in one 30-year cycle.
const CYCLE_DAYS: i64 = 10_631;

pub const RAMADAN: u32 = 9;
pub const SHAWWAL: u32 = 10;

const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Ula",
    "Jumada al-Akhirah",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qa'dah",
    "Dhu al-Hijjah",
];

/// A date in the tabular Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HijriDate {
    year: i32,
    month: u32,
    day: u32,
}

/// Whether `year` AH has 355 days.
pub fn is_leap_year(year: i32) -> bool {
    (14 + 11 * i64::from(year)).rem_euclid(30) < 11
}

/// Length of `month` in `year` AH, or `None` for a month outside 1–12.
pub fn month_length(year: i32, month: u32) -> Option<u32> {
    match month {
        12 if is_leap_year(year) => Some(30),
        1..=12 if month % 2 == 1 => Some(30),
        1..=12 => Some(29),
        _ => None,
    }
}

/// English transliteration of a month name.
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

impl HijriDate {
    /// Build a date, validating month and day against the tables.
    pub fn new(year: i32, month: u32, day: u32) -> MiqatResult<Self> {
        if year < 1 {
            return Err(MiqatError::invalid_input(
                "hijri year",
                format!("{year} precedes the epoch"),
            ));
        }
        let length = month_length(year, month).ok_or_else(|| {
            MiqatError::invalid_input("hijri month", format!("{month} is outside 1..=12"))
        })?;
        if day == 0 || day > length {
            return Err(MiqatError::invalid_input(
                "hijri day",
                format!("{day} is outside 1..={length} for month {month} of {year}"),
            ));
        }
        Ok(Self { year, month, day })
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u32 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u32 {
        self.day
    }

    pub fn month_name(&self) -> &'static str {
        // month is validated on construction
        month_name(self.month).unwrap_or("")
    }

    /// Julian Day Number of this date.
    pub fn day_number(&self) -> i64 {
        let (y, m, d) = (
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
        );
        d + (59 * (m - 1) + 1) / 2 + (y - 1) * 354 + (3 + 11 * y).div_euclid(30) + EPOCH_JDN - 1
    }

    /// The Hijri date carrying Julian Day Number `jdn`.
    pub fn from_day_number(jdn: i64) -> MiqatResult<Self> {
        if jdn < EPOCH_JDN {
            return Err(MiqatError::invalid_input(
                "date",
                format!("JDN {jdn} precedes the Hijri epoch"),
            ));
        }
        let year = (30 * (jdn - EPOCH_JDN) + 10_646).div_euclid(CYCLE_DAYS);
        let year = i32::try_from(year)
            .map_err(|_| MiqatError::invalid_input("date", format!("JDN {jdn} is out of range")))?;

        let first_of_year = Self { year, month: 1, day: 1 }.day_number();
        // Month starts fall on ceil(29.5 · (m − 1)) days after 1 Muharram.
        let twice_offset = 2 * (jdn - 29 - first_of_year);
        let month = if twice_offset <= 0 {
            1
        } else {
            ((twice_offset + 58) / 59 + 1).min(12) as u32
        };
        let first_of_month = Self { year, month, day: 1 }.day_number();
        let day = (jdn - first_of_month + 1) as u32;
        Ok(Self { year, month, day })
    }

    /// Convert a proleptic Gregorian date.
    pub fn from_gregorian(date: NaiveDate) -> MiqatResult<Self> {
        Self::from_day_number(JulianDay::day_number_of(date))
    }

    /// Convert a Gregorian date, shifted by a local sighting offset.
    pub fn from_gregorian_with_offset(date: NaiveDate, offset_days: i32) -> MiqatResult<Self> {
        let shifted = date
            .checked_add_signed(Duration::days(i64::from(offset_days)))
            .ok_or_else(|| {
                MiqatError::invalid_input("date", format!("{date} + {offset_days}d overflows"))
            })?;
        Self::from_gregorian(shifted)
    }

    /// The proleptic Gregorian date of this Hijri date.
    pub fn to_gregorian(&self) -> MiqatResult<NaiveDate> {
        JulianDay::date_of_day_number(self.day_number()).ok_or_else(|| {
            MiqatError::invalid_input(
                "hijri date",
                format!("{self} is outside the Gregorian range"),
            )
        })
    }
}

impl std::fmt::Display for HijriDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month_name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ramadan_1447() {
        let first = HijriDate::new(1447, RAMADAN, 1).unwrap();
        assert_eq!(first.to_gregorian().unwrap(), ymd(2026, 2, 18));
        let eid = HijriDate::new(1447, SHAWWAL, 1).unwrap();
        assert_eq!(eid.to_gregorian().unwrap(), ymd(2026, 3, 20));
        assert_eq!(
            HijriDate::from_gregorian(ymd(2026, 2, 17)).unwrap(),
            HijriDate::new(1447, 8, 29).unwrap()
        );
    }

    #[test]
    fn recent_ramadan_starts() {
        let starts = [
            (1445, ymd(2024, 3, 11)),
            (1446, ymd(2025, 3, 1)),
            (1448, ymd(2027, 2, 8)),
        ];
        for (year, start) in starts {
            let date = HijriDate::new(year, RAMADAN, 1).unwrap();
            assert_eq!(date.to_gregorian().unwrap(), start, "{year}");
        }
    }

    #[test]
    fn epoch() {
        let first = HijriDate::new(1, 1, 1).unwrap();
        assert_eq!(first.day_number(), EPOCH_JDN);
        assert_eq!(first.to_gregorian().unwrap(), ymd(622, 7, 19));
        assert!(HijriDate::from_gregorian(ymd(622, 7, 18)).is_err());
    }

    #[test]
    fn gregorian_round_trip_over_two_centuries() {
        let mut date = ymd(1900, 1, 1);
        let end = ymd(2100, 1, 1);
        while date < end {
            let hijri = HijriDate::from_gregorian(date).unwrap();
            assert!(hijri.day() <= month_length(hijri.year(), hijri.month()).unwrap());
            assert_eq!(hijri.to_gregorian().unwrap(), date);
            date += Duration::days(1);
        }
    }

    #[test]
    fn leap_years_follow_the_cycle() {
        let leaps: Vec<i32> = (1..=30).filter(|&y| is_leap_year(y)).collect();
        assert_eq!(leaps, vec![2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29]);
        assert_eq!(month_length(1447, 12), Some(30));
        assert_eq!(month_length(1446, 12), Some(29));
        assert_eq!(month_length(1447, 9), Some(30));
        assert_eq!(month_length(1447, 13), None);
    }

    #[test]
    fn offset_shifts_the_calendar() {
        // One day behind the tables: 18 Feb is still 29 Sha'ban.
        let behind = HijriDate::from_gregorian_with_offset(ymd(2026, 2, 18), -1).unwrap();
        assert_eq!((behind.month(), behind.day()), (8, 29));
        let ahead = HijriDate::from_gregorian_with_offset(ymd(2026, 2, 17), 1).unwrap();
        assert_eq!((ahead.month(), ahead.day()), (RAMADAN, 1));
    }

    #[test]
    fn validation_and_display() {
        assert_eq!(HijriDate::new(1446, 12, 30).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(HijriDate::new(1447, 0, 1).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(HijriDate::new(0, 1, 1).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(HijriDate::new(1447, 9, 1).unwrap().to_string(), "1 Ramadan 1447 AH");
        assert_eq!(month_name(12), Some("Dhu al-Hijjah"));
        assert_eq!(month_name(0), None);
    }
}
