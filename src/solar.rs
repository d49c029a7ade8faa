// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sunrise, sunset, solar noon and twilight.
//!
//! The Sun's apparent position comes from the low-precision series of
//! Meeus, *Astronomical Algorithms* (2nd ed.) ch. 25, and the equation of
//! time from ch. 28. From the declination `δ` and a target altitude `h0`,
//! the hour angle of each event follows from
//!
//! ```text
//! cos H = (sin h0 − sin φ · sin δ) / (cos φ · cos δ)
//! ```
//!
//! and the event lies `H / 360°` days before (morning) or after (evening)
//! the meridian transit. Each event is refined once by re-evaluating the Sun
//! at the first estimate, which keeps the result within about a minute of
//! published almanac times for latitudes below the polar circles.
//!
//! When `|cos H| > 1` the Sun never reaches `h0` on that day and the
//! calculation fails with [`MiqatError::NoSolarEvent`].
//!
//! ## Which solar day?
//!
//! The events belong to the transit nearest to 12:00 local clock time on the
//! requested date, located with the UTC offset in effect at that local noon.
//! Each event is then converted to the zone individually, so the offsets
//! reported on a DST-transition day are the ones actually in force.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::clock::resolve_local;
use crate::error::{MiqatError, MiqatResult, PolarCondition};
use crate::geo::GeoPoint;
use crate::julian::JulianDay;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Altitude of the Sun's centre at sunrise/sunset in degrees: 34′ of
/// horizon refraction plus 16′ of solar semi-diameter.
pub const SUNRISE_ALTITUDE_DEG: f64 = -50.0 / 60.0;

/// Default depression of the Sun below the horizon at dawn and dusk
/// (astronomical twilight).
pub const DEFAULT_TWILIGHT_ANGLE_DEG: f64 = 18.0;

const MINUTES_PER_DAY: f64 = 1_440.0;

/// The five solar reference events of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SolarEventKind {
    Dawn,
    Sunrise,
    SolarNoon,
    Sunset,
    Dusk,
}

impl SolarEventKind {
    /// Whether the event precedes the transit.
    pub fn is_rising(self) -> bool {
        matches!(self, Self::Dawn | Self::Sunrise)
    }

    /// Target altitude of the Sun's centre in degrees.
    pub fn altitude_deg(self, twilight_angle_deg: f64) -> f64 {
        match self {
            Self::Dawn | Self::Dusk => -twilight_angle_deg,
            Self::Sunrise | Self::Sunset => SUNRISE_ALTITUDE_DEG,
            Self::SolarNoon => 90.0,
        }
    }
}

impl std::fmt::Display for SolarEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Dawn => "dawn",
            Self::Sunrise => "sunrise",
            Self::SolarNoon => "solar noon",
            Self::Sunset => "sunset",
            Self::Dusk => "dusk",
        })
    }
}

/// Solar events of one local calendar date.
///
/// Only valid for `date`; recompute when the local date changes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SolarEvents {
    pub date: NaiveDate,
    pub dawn: DateTime<Tz>,
    pub sunrise: DateTime<Tz>,
    pub solar_noon: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    pub dusk: DateTime<Tz>,
    /// Depression angle (degrees) used for `dawn` and `dusk`.
    pub twilight_angle_deg: f64,
}

impl SolarEvents {
    pub fn get(&self, kind: SolarEventKind) -> &DateTime<Tz> {
        match kind {
            SolarEventKind::Dawn => &self.dawn,
            SolarEventKind::Sunrise => &self.sunrise,
            SolarEventKind::SolarNoon => &self.solar_noon,
            SolarEventKind::Sunset => &self.sunset,
            SolarEventKind::Dusk => &self.dusk,
        }
    }

    /// Time between sunrise and sunset.
    pub fn day_length(&self) -> chrono::TimeDelta {
        self.sunset - self.sunrise
    }
}

/// Apparent solar coordinates needed for rise/set work.
#[derive(Debug, Clone, Copy)]
struct SunPosition {
    /// Apparent declination, radians.
    declination: f64,
    /// Equation of time (apparent − mean solar time), minutes.
    equation_of_time_min: f64,
}

fn sun_position(jd: JulianDay) -> SunPosition {
    let t = jd.julian_centuries().value();

    // Geometric mean longitude and mean anomaly (degrees).
    let l0 = (280.46646 + 36000.76983 * t + 0.0003032 * t * t).rem_euclid(360.0);
    let m = 357.52911 + 35999.05029 * t - 0.0001537 * t * t;
    let e = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;
    let m_rad = m.to_radians();

    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m_rad.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m_rad).sin()
        + 0.000289 * (3.0 * m_rad).sin();

    let omega = (125.04 - 1934.136 * t).to_radians();
    let apparent_lon = (l0 + c - 0.00569 - 0.00478 * omega.sin()).to_radians();

    let mean_obliquity =
        (84381.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t) / 3600.0;
    let obliquity = (mean_obliquity + 0.00256 * omega.cos()).to_radians();

    let declination = (obliquity.sin() * apparent_lon.sin()).asin();

    // Meeus eq. 28.3
    let y = (obliquity / 2.0).tan().powi(2);
    let l0_rad = l0.to_radians();
    let eot = y * (2.0 * l0_rad).sin() - 2.0 * e * m_rad.sin()
        + 4.0 * e * y * m_rad.sin() * (2.0 * l0_rad).cos()
        - 0.5 * y * y * (4.0 * l0_rad).sin()
        - 1.25 * e * e * (2.0 * m_rad).sin();

    SunPosition {
        declination,
        equation_of_time_min: eot.to_degrees() * 4.0,
    }
}

/// The day being solved: which UT day the transit falls in, and where.
struct SolarDay {
    point: GeoPoint,
    date: NaiveDate,
    /// 0h UT of the UT day holding the transit.
    base: JulianDay,
}

impl SolarDay {
    fn locate(point: GeoPoint, date: NaiveDate, tz: &Tz) -> Self {
        let local_noon = resolve_local(
            tz,
            date.and_time(NaiveTime::MIN) + chrono::Duration::hours(12),
        );
        let noon = JulianDay::from_utc(local_noon.with_timezone(&Utc));

        let mut day = Self {
            point,
            date,
            base: JulianDay::from_day_number(noon.day_number()),
        };
        // Far from the zone meridian the transit can land on the neighbouring
        // UT day; pick the one nearest local noon.
        let transit = day.transit(sun_position(noon));
        let drift = (transit - noon).value();
        if drift > 0.5 {
            day.base = day.base - qtty::Days::new(1.0);
        } else if drift < -0.5 {
            day.base = day.base + qtty::Days::new(1.0);
        }
        day
    }

    fn transit(&self, sun: SunPosition) -> JulianDay {
        let minutes = 720.0 - 4.0 * self.point.longitude() - sun.equation_of_time_min;
        self.base + qtty::Days::new(minutes / MINUTES_PER_DAY)
    }

    fn solar_noon(&self) -> JulianDay {
        let first = self.transit(sun_position(self.base + qtty::Days::new(0.5)));
        self.transit(sun_position(first))
    }

    fn hour_angle_deg(
        &self,
        kind: SolarEventKind,
        altitude_deg: f64,
        sun: SunPosition,
    ) -> MiqatResult<f64> {
        let phi = self.point.latitude_rad();
        let h0 = altitude_deg.to_radians();
        let cos_h = (h0.sin() - phi.sin() * sun.declination.sin())
            / (phi.cos() * sun.declination.cos());

        if cos_h.is_nan() || cos_h > 1.0 {
            return Err(self.no_event(kind, PolarCondition::NeverRises));
        }
        if cos_h < -1.0 {
            return Err(self.no_event(kind, PolarCondition::NeverSets));
        }
        // At the poles cos φ is ~1e-17 and the quotient blows up; caught above.
        Ok(cos_h.acos().to_degrees())
    }

    fn no_event(&self, event: SolarEventKind, condition: PolarCondition) -> MiqatError {
        MiqatError::NoSolarEvent {
            event,
            date: self.date,
            latitude: self.point.latitude(),
            condition,
        }
    }

    fn event(&self, kind: SolarEventKind, twilight_angle_deg: f64) -> MiqatResult<JulianDay> {
        if kind == SolarEventKind::SolarNoon {
            return Ok(self.solar_noon());
        }
        let altitude = kind.altitude_deg(twilight_angle_deg);
        let sign = if kind.is_rising() { -1.0 } else { 1.0 };

        let noon = self.solar_noon();
        let h = self.hour_angle_deg(kind, altitude, sun_position(noon))?;
        let estimate = noon + qtty::Days::new(sign * h / 360.0);

        let sun = sun_position(estimate);
        let h = self.hour_angle_deg(kind, altitude, sun)?;
        Ok(self.transit(sun) + qtty::Days::new(sign * h / 360.0))
    }
}

fn to_zone(jd: JulianDay, tz: &Tz) -> MiqatResult<DateTime<Tz>> {
    jd.to_utc()
        .map(|utc| utc.with_timezone(tz))
        .ok_or_else(|| {
            MiqatError::invalid_input("date", format!("{jd} is outside the supported range"))
        })
}

fn check_twilight(twilight_angle_deg: f64) -> MiqatResult<()> {
    if twilight_angle_deg.is_finite() && twilight_angle_deg > 0.0 && twilight_angle_deg < 90.0 {
        Ok(())
    } else {
        Err(MiqatError::invalid_input(
            "twilight angle",
            format!("{twilight_angle_deg}° is outside (0, 90)"),
        ))
    }
}

/// Compute a single solar event for `point` on the local date `date`.
///
/// Useful when only one event matters (e.g. sunset for an Iftar board) and
/// a missing twilight at high latitudes must not hide it.
pub fn solar_event(
    point: GeoPoint,
    date: NaiveDate,
    tz: &Tz,
    kind: SolarEventKind,
    twilight_angle_deg: f64,
) -> MiqatResult<DateTime<Tz>> {
    check_twilight(twilight_angle_deg)?;
    let day = SolarDay::locate(point, date, tz);
    to_zone(day.event(kind, twilight_angle_deg)?, tz)
}

/// Compute all solar events with the default twilight angle.
pub fn compute_solar_events(point: GeoPoint, date: NaiveDate, tz: &Tz) -> MiqatResult<SolarEvents> {
    compute_solar_events_with(point, date, tz, DEFAULT_TWILIGHT_ANGLE_DEG)
}

/// Compute all solar events, with dawn/dusk at `twilight_angle_deg` below
/// the horizon.
///
/// # Errors
///
/// [`MiqatError::NoSolarEvent`] for the first event that does not occur on
/// this date; [`MiqatError::InvalidInput`] for an unusable twilight angle.
pub fn compute_solar_events_with(
    point: GeoPoint,
    date: NaiveDate,
    tz: &Tz,
    twilight_angle_deg: f64,
) -> MiqatResult<SolarEvents> {
    check_twilight(twilight_angle_deg)?;
    let day = SolarDay::locate(point, date, tz);
    let at = |kind: SolarEventKind| -> MiqatResult<DateTime<Tz>> {
        to_zone(day.event(kind, twilight_angle_deg)?, tz)
    };

    let events = SolarEvents {
        date,
        dawn: at(SolarEventKind::Dawn)?,
        sunrise: at(SolarEventKind::Sunrise)?,
        solar_noon: at(SolarEventKind::SolarNoon)?,
        sunset: at(SolarEventKind::Sunset)?,
        dusk: at(SolarEventKind::Dusk)?,
        twilight_angle_deg,
    };
    log::debug!(
        "solar events for {point} on {date}: sunrise {} sunset {}",
        events.sunrise.format("%H:%M"),
        events.sunset.format("%H:%M")
    );
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Timelike;
    use chrono_tz::Europe::Berlin;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn minutes_of_day(dt: &DateTime<Tz>) -> i64 {
        i64::from(dt.hour()) * 60 + i64::from(dt.minute())
    }

    fn assert_near(actual: &DateTime<Tz>, hh: u32, mm: u32, tolerance_min: i64) {
        let expected = i64::from(hh) * 60 + i64::from(mm);
        let got = minutes_of_day(actual);
        assert!(
            (got - expected).abs() <= tolerance_min,
            "got {}, expected {hh:02}:{mm:02} ± {tolerance_min} min",
            actual.format("%H:%M:%S")
        );
    }

    #[test]
    fn aachen_mid_february() {
        let aachen = GeoPoint::new(50.7753, 6.0839).unwrap();
        let ev = compute_solar_events(aachen, date(2026, 2, 19), &Berlin).unwrap();
        assert_near(&ev.sunrise, 7, 40, 3);
        assert_near(&ev.solar_noon, 12, 49, 2);
        assert_near(&ev.sunset, 17, 59, 3);
        assert_near(&ev.dawn, 5, 51, 4);
        assert_near(&ev.dusk, 19, 49, 4);
        assert_eq!(ev.date, date(2026, 2, 19));
    }

    #[test]
    fn equator_equinox_has_twelve_hour_day() {
        let quito_ish = GeoPoint::new(0.0, 0.0).unwrap();
        let ev = compute_solar_events(quito_ish, date(2026, 3, 20), &chrono_tz::UTC).unwrap();
        // Refraction and the solar disc add a few minutes to the geometric 12 h.
        let minutes = ev.day_length().num_minutes();
        assert!((726..=730).contains(&minutes), "day length {minutes} min");
        assert_near(&ev.solar_noon, 12, 7, 2);
    }

    #[test]
    fn events_are_strictly_ordered() {
        let tz = chrono_tz::UTC;
        for lat in [-45.0, -20.0, 0.0, 21.4, 35.0, 45.0] {
            for month in 1..=12 {
                let p = GeoPoint::new(lat, 10.0).unwrap();
                let ev = compute_solar_events(p, date(2026, month, 15), &tz).unwrap();
                assert!(ev.dawn < ev.sunrise, "lat {lat} month {month}");
                assert!(ev.sunrise < ev.solar_noon, "lat {lat} month {month}");
                assert!(ev.solar_noon < ev.sunset, "lat {lat} month {month}");
                assert!(ev.sunset < ev.dusk, "lat {lat} month {month}");
            }
        }
    }

    #[test]
    fn events_stay_on_the_requested_local_date() {
        // Kiribati (UTC+14) and Samoa sit far from their zone meridians.
        let kiritimati = GeoPoint::new(1.87, -157.4).unwrap();
        let tz: Tz = "Pacific/Kiritimati".parse().unwrap();
        let ev = compute_solar_events(kiritimati, date(2026, 2, 18), &tz).unwrap();
        assert_eq!(ev.solar_noon.date_naive(), date(2026, 2, 18));
        assert_eq!(ev.sunrise.date_naive(), date(2026, 2, 18));
        assert_eq!(ev.sunset.date_naive(), date(2026, 2, 18));
    }

    #[test]
    fn polar_night_is_an_error() {
        let longyearbyen = GeoPoint::new(78.2232, 15.6267).unwrap();
        let tz = chrono_tz::Arctic::Longyearbyen;
        let err = compute_solar_events(longyearbyen, date(2026, 12, 21), &tz).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSolarEvent);
        match err {
            MiqatError::NoSolarEvent { condition, .. } => {
                assert_eq!(condition, PolarCondition::NeverRises)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn midnight_sun_is_an_error() {
        let longyearbyen = GeoPoint::new(78.2232, 15.6267).unwrap();
        let err = solar_event(
            longyearbyen,
            date(2026, 6, 21),
            &chrono_tz::Arctic::Longyearbyen,
            SolarEventKind::Sunset,
            DEFAULT_TWILIGHT_ANGLE_DEG,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MiqatError::NoSolarEvent {
                event: SolarEventKind::Sunset,
                condition: PolarCondition::NeverSets,
                ..
            }
        ));
    }

    #[test]
    fn poles_never_have_events() {
        let pole = GeoPoint::new(90.0, 0.0).unwrap();
        let err = compute_solar_events(pole, date(2026, 3, 1), &chrono_tz::UTC).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSolarEvent);
    }

    #[test]
    fn summer_twilight_fails_but_sunset_survives() {
        // Berlin in June: astronomical twilight never ends.
        let berlin = GeoPoint::new(52.52, 13.405).unwrap();
        let tz = chrono_tz::Europe::Berlin;
        let err = compute_solar_events(berlin, date(2026, 6, 21), &tz).unwrap_err();
        assert!(matches!(err, MiqatError::NoSolarEvent { event: SolarEventKind::Dawn, .. }));

        let sunset =
            solar_event(berlin, date(2026, 6, 21), &tz, SolarEventKind::Sunset, 18.0).unwrap();
        assert_near(&sunset, 21, 33, 4);

        // The Sun bottoms out near −14°, so nautical twilight still works.
        assert!(compute_solar_events_with(berlin, date(2026, 6, 21), &tz, 12.0).is_ok());
        assert!(compute_solar_events_with(berlin, date(2026, 6, 21), &tz, 15.0).is_err());
    }

    #[test]
    fn dst_day_uses_the_offset_in_force() {
        let aachen = GeoPoint::new(50.7753, 6.0839).unwrap();
        let ev = compute_solar_events(aachen, date(2026, 3, 29), &Berlin).unwrap();
        // After the 02:00 switch to CEST, noon sits near 13:40.
        assert_near(&ev.solar_noon, 13, 40, 3);
        assert_eq!(ev.solar_noon.offset().to_string(), "CEST");
    }

    #[test]
    fn rejects_bad_twilight_angles() {
        let p = GeoPoint::new(10.0, 10.0).unwrap();
        for angle in [0.0, -6.0, 90.0, f64::NAN] {
            let err =
                compute_solar_events_with(p, date(2026, 1, 1), &chrono_tz::UTC, angle).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn kind_metadata() {
        assert!(SolarEventKind::Dawn.is_rising());
        assert!(SolarEventKind::Sunrise.is_rising());
        assert!(!SolarEventKind::Sunset.is_rising());
        assert_eq!(SolarEventKind::Dusk.altitude_deg(18.0), -18.0);
        assert!((SolarEventKind::Sunrise.altitude_deg(18.0) + 0.8333).abs() < 1e-3);
    }
}
