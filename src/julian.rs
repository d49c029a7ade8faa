// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Day instants.
//!
//! [`JulianDay`] stores a single [`Days`] quantity counted from the start of
//! the Julian Period. Both the solar model and the tabular Hijri calendar run
//! on this axis: the former through [`JulianDay::julian_centuries`], the
//! latter through integer Julian Day Numbers ([`JulianDay::day_number`]).
//!
//! The axis is civil Universal Time. ΔT (≈ 69 s in the 2020s) is not applied:
//! it shifts rise/set instants by far less than the accuracy of the
//! low-precision solar model built on top of it.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use qtty::*;
use std::ops::{Add, Sub};

/// JD of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Day Number of 0001-01-01 (proleptic Gregorian) minus one, i.e. the
/// offset between chrono's day count from the Common Era and the JDN.
const CE_DAY_OFFSET: i64 = 1_721_425;

/// A point on the Julian Day axis (UT).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDay {
    quantity: Days,
}

impl JulianDay {
    /// J2000.0 epoch: 2000-01-01T12:00:00 (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Create from a raw scalar (days since the Julian Period epoch).
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
        }
    }

    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self { quantity: days }
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Julian centuries since J2000.0, the time argument of the solar model.
    #[inline]
    pub fn julian_centuries(&self) -> Centuries {
        Centuries::new(
            ((*self - Self::J2000) / Self::JULIAN_CENTURY)
                .simplify()
                .value(),
        )
    }

    /// 0h UT of the day whose noon carries Julian Day Number `jdn`.
    #[inline]
    pub fn from_day_number(jdn: i64) -> Self {
        Self::new(jdn as f64 - 0.5)
    }

    /// Julian Day Number (the integer day count that changes at noon UT)
    /// of the civil day containing this instant.
    #[inline]
    pub fn day_number(&self) -> i64 {
        (self.value() + 0.5).floor() as i64
    }

    /// Julian Day Number of a proleptic Gregorian calendar date.
    #[inline]
    pub fn day_number_of(date: NaiveDate) -> i64 {
        i64::from(date.num_days_from_ce()) + CE_DAY_OFFSET
    }

    /// Proleptic Gregorian date carrying Julian Day Number `jdn`.
    ///
    /// Returns `None` outside chrono's representable range.
    pub fn date_of_day_number(jdn: i64) -> Option<NaiveDate> {
        let days = i32::try_from(jdn - CE_DAY_OFFSET).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days)
    }

    /// Build an instant from a `chrono::DateTime<Utc>`.
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        let seconds_since_epoch = Seconds::new(datetime.timestamp() as f64);
        let nanos = Seconds::new(datetime.timestamp_subsec_nanos() as f64 / 1e9);
        Self::from_days(Days::new(UNIX_EPOCH_JD) + (seconds_since_epoch + nanos).to::<Day>())
    }

    /// Convert to a `chrono::DateTime<Utc>`.
    ///
    /// Returns `None` if the value falls outside chrono's representable range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let seconds_since_epoch = (self.quantity - Days::new(UNIX_EPOCH_JD))
            .to::<Second>()
            .value();
        if !seconds_since_epoch.is_finite() {
            return None;
        }
        let secs = seconds_since_epoch.floor() as i64;
        let nanos = ((seconds_since_epoch - secs as f64) * 1e9) as u32;
        DateTime::<Utc>::from_timestamp(secs, nanos)
    }
}

impl std::fmt::Display for JulianDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {}", self.quantity)
    }
}

impl Add<Days> for JulianDay {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl Sub<Days> for JulianDay {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity - rhs)
    }
}

impl Sub for JulianDay {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn j2000_from_utc() {
        let noon = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let jd = JulianDay::from_utc(noon);
        assert!((jd - JulianDay::J2000).abs() < Days::new(1e-9));
    }

    #[test]
    fn utc_roundtrip_is_stable() {
        let datetime = DateTime::from_timestamp(1_771_405_200, 250_000_000).unwrap();
        let back = JulianDay::from_utc(datetime).to_utc().expect("to_utc");
        let delta_ns =
            back.timestamp_nanos_opt().unwrap() - datetime.timestamp_nanos_opt().unwrap();
        assert!(delta_ns.abs() < 10_000, "roundtrip error: {delta_ns} ns");
    }

    #[test]
    fn day_number_changes_at_noon() {
        let midnight = JulianDay::from_day_number(2_461_042);
        assert_eq!(midnight.value(), 2_461_041.5);
        assert_eq!(midnight.day_number(), 2_461_042);
        assert_eq!((midnight + Days::new(0.49)).day_number(), 2_461_042);
    }

    #[test]
    fn day_number_roundtrips_through_dates() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(JulianDay::day_number_of(date), 2_451_545);
        assert_eq!(JulianDay::date_of_day_number(2_451_545), Some(date));

        let ramadan = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let jdn = JulianDay::day_number_of(ramadan);
        assert_eq!(jdn, 2_461_090);
        assert_eq!(JulianDay::date_of_day_number(jdn), Some(ramadan));
    }

    #[test]
    fn julian_centuries_since_j2000() {
        let jd = JulianDay::J2000 + Days::new(36_525.0 * 0.26);
        assert!((jd.julian_centuries() - Centuries::new(0.26)).abs() < Centuries::new(1e-12));
    }

    #[test]
    fn arithmetic() {
        let a = JulianDay::new(10.0);
        let b = JulianDay::new(14.0);
        assert_eq!((b - a), Days::new(4.0));
        assert_eq!((a + Days::new(1.5)).value(), 11.5);
        assert_eq!((b - Days::new(0.5)).value(), 13.5);
    }

    #[test]
    fn display_labels_the_axis() {
        let s = format!("{}", JulianDay::J2000);
        assert!(s.starts_with("JD "), "{s}");
    }

    #[test]
    fn non_finite_values_do_not_convert() {
        assert_eq!(JulianDay::new(f64::NAN).to_utc(), None);
    }
}
