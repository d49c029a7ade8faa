// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Ritual phase classification.
//!
//! ```text
//!            start                                                   end
//!  Before ───┤ Sahur ── fajr ── Fasting ── maghrib ── IftarPassed ── ... ├── Ended
//!                                                       └─ next boundary: local midnight
//! ```
//!
//! Each boundary is capped at the window end, so a season that closes
//! mid-day counts down to the close rather than to the next prayer.
//!
//! Classification is stateless. The caller supplies the clock, the season
//! and the prayer times of the clock's local date; the classifier only
//! compares instants.

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::clock::LocalClock;
use crate::error::{MiqatError, MiqatResult};
use crate::prayer::PrayerTimes;
use crate::ramadan::RamadanWindow;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Where "now" sits relative to the season and the day's prayers.
///
/// Variants are ordered as they occur, so within one local date the phase
/// never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Phase {
    BeforeRamadan,
    SahurWindow,
    FastingWindow,
    IftarPassed,
    RamadanEnded,
}

impl Phase {
    /// Whether the phase lies inside the season.
    pub fn is_ramadan(self) -> bool {
        matches!(
            self,
            Self::SahurWindow | Self::FastingWindow | Self::IftarPassed
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::BeforeRamadan => "before Ramadan",
            Self::SahurWindow => "sahur",
            Self::FastingWindow => "fasting",
            Self::IftarPassed => "iftar passed",
            Self::RamadanEnded => "Ramadan ended",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PhaseReport {
    pub phase: Phase,
    /// Time left until `next_boundary`; zero once the season has ended.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_seconds"))]
    pub remaining: TimeDelta,
    pub next_boundary: Option<DateTime<Tz>>,
}

impl PhaseReport {
    /// `remaining` split into hours, minutes and seconds.
    pub fn hms(&self) -> (i64, i64, i64) {
        let total = self.remaining.num_seconds();
        (total / 3600, (total % 3600) / 60, total % 60)
    }
}

impl std::fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{} ({h:02}:{m:02}:{s:02} left)", self.phase)
    }
}

/// `TimeDelta` has no serde support; durations are written as whole seconds.
#[cfg(feature = "serde")]
pub(crate) fn serialize_seconds<S>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(delta.num_seconds())
}

/// Classify `clock` against the season and the day's prayer times.
///
/// # Errors
///
/// [`MiqatError::InvalidClock`] when `prayers` belong to another local date
/// than `clock`, or when a computed remaining duration comes out negative.
pub fn classify_phase(
    clock: &LocalClock,
    ramadan: &RamadanWindow,
    prayers: &PrayerTimes,
) -> MiqatResult<PhaseReport> {
    if prayers.date != clock.date() {
        return Err(MiqatError::invalid_clock(format!(
            "prayer times are for {} but the local date is {}",
            prayers.date,
            clock.date()
        )));
    }

    let now = clock.now();
    let window = ramadan.resolve(&clock.timezone());

    let (phase, next_boundary) = if window.is_pending_at(now) {
        (Phase::BeforeRamadan, Some(window.start))
    } else if window.is_elapsed_at(now) {
        (Phase::RamadanEnded, None)
    } else if *now < prayers.fajr {
        (Phase::SahurWindow, Some(prayers.fajr.min(window.end)))
    } else if *now < prayers.maghrib {
        (Phase::FastingWindow, Some(prayers.maghrib.min(window.end)))
    } else {
        (Phase::IftarPassed, Some(clock.next_midnight().min(window.end)))
    };

    let remaining = match next_boundary {
        Some(boundary) => boundary - *now,
        None => TimeDelta::zero(),
    };
    if remaining < TimeDelta::zero() {
        return Err(MiqatError::invalid_clock(format!(
            "{phase} boundary lies {} s in the past",
            -remaining.num_seconds()
        )));
    }

    Ok(PhaseReport {
        phase,
        remaining,
        next_boundary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geo::GeoPoint;
    use crate::prayer::derive_prayer_times;
    use crate::solar::compute_solar_events;
    use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};
    use chrono_tz::Europe::Berlin;

    fn aachen() -> GeoPoint {
        GeoPoint::new(50.7753, 6.0839).unwrap()
    }

    fn prayers_on(date: NaiveDate) -> PrayerTimes {
        derive_prayer_times(&compute_solar_events(aachen(), date, &Berlin).unwrap())
    }

    fn clock_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> LocalClock {
        LocalClock::from_local(Berlin.with_ymd_and_hms(y, m, d, h, min, 0).unwrap())
    }

    fn classify(clock: &LocalClock) -> PhaseReport {
        classify_phase(clock, &RamadanWindow::fixed(), &prayers_on(clock.date())).unwrap()
    }

    #[test]
    fn before_ramadan_counts_down_to_the_first_midnight() {
        let report = classify(&clock_at(2026, 2, 17, 10, 0));
        assert_eq!(report.phase, Phase::BeforeRamadan);
        assert_eq!(report.remaining, Duration::hours(14));
        assert_eq!(report.hms(), (14, 0, 0));
    }

    #[test]
    fn fasting_counts_down_to_maghrib() {
        let clock = clock_at(2026, 2, 19, 12, 0);
        let prayers = prayers_on(clock.date());
        let report = classify_phase(&clock, &RamadanWindow::fixed(), &prayers).unwrap();
        assert_eq!(report.phase, Phase::FastingWindow);
        assert_eq!(report.next_boundary.as_ref(), Some(&prayers.maghrib));
        assert_eq!(report.remaining, prayers.maghrib - *clock.now());
        assert!(report.remaining > Duration::minutes(5 * 60 + 30));
        assert!(report.remaining < Duration::minutes(6 * 60 + 15));
    }

    #[test]
    fn sahur_and_iftar_passed() {
        let sahur = classify(&clock_at(2026, 2, 19, 4, 0));
        assert_eq!(sahur.phase, Phase::SahurWindow);

        let evening = classify(&clock_at(2026, 2, 19, 21, 0));
        assert_eq!(evening.phase, Phase::IftarPassed);
        assert_eq!(evening.remaining, Duration::hours(3));
    }

    #[test]
    fn last_evening_stops_at_the_window_end() {
        let report = classify(&clock_at(2026, 3, 19, 22, 0));
        assert_eq!(report.phase, Phase::IftarPassed);
        assert_eq!(
            report.next_boundary.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
        );
    }

    #[test]
    fn window_edges_are_half_open() {
        let opening = classify(&clock_at(2026, 2, 18, 0, 0));
        assert_eq!(opening.phase, Phase::SahurWindow);
        let closing = classify(&clock_at(2026, 3, 20, 0, 0));
        assert_eq!(closing.phase, Phase::RamadanEnded);
        assert_eq!(closing.remaining, TimeDelta::zero());
        assert!(closing.next_boundary.is_none());
    }

    #[test]
    fn phases_never_regress_within_a_day() {
        for day in [17, 18, 25] {
            let date = NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
            let prayers = prayers_on(date);
            let mut previous = None;
            let mut t = Berlin.with_ymd_and_hms(2026, 2, day, 0, 0, 0).unwrap();
            while t.date_naive() == date {
                let clock = LocalClock::from_local(t);
                let report = classify_phase(&clock, &RamadanWindow::fixed(), &prayers).unwrap();
                assert!(report.remaining >= TimeDelta::zero());
                if let Some(prev) = previous {
                    assert!(report.phase >= prev, "{t}: {prev:?} -> {:?}", report.phase);
                }
                previous = Some(report.phase);
                t += Duration::minutes(7);
            }
        }
    }

    fn window(start: (u32, u32), end: (u32, u32)) -> RamadanWindow {
        let at = |(day, hour): (u32, u32)| {
            NaiveDate::from_ymd_opt(2026, 2, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap()
        };
        RamadanWindow::new(at(start), at(end)).unwrap()
    }

    fn classify_in(window: &RamadanWindow, clock: &LocalClock) -> PhaseReport {
        classify_phase(clock, window, &prayers_on(clock.date())).unwrap()
    }

    #[test]
    fn season_opening_after_fajr_starts_with_the_fast() {
        let noon_start = window((18, 12), (20, 0));
        let before = classify_in(&noon_start, &clock_at(2026, 2, 18, 11, 0));
        assert_eq!(before.phase, Phase::BeforeRamadan);
        assert_eq!(before.remaining, Duration::hours(1));
        let opening = classify_in(&noon_start, &clock_at(2026, 2, 18, 12, 0));
        assert_eq!(opening.phase, Phase::FastingWindow);

        let night_start = window((18, 22), (20, 0));
        let opening = classify_in(&night_start, &clock_at(2026, 2, 18, 22, 0));
        assert_eq!(opening.phase, Phase::IftarPassed);
    }

    #[test]
    fn boundaries_stop_at_a_mid_day_close() {
        let short = window((18, 10), (18, 15));
        let report = classify_in(&short, &clock_at(2026, 2, 18, 14, 0));
        assert_eq!(report.phase, Phase::FastingWindow);
        assert_eq!(report.remaining, Duration::hours(1));
        assert_eq!(report.next_boundary.unwrap().hour(), 15);
        let closed = classify_in(&short, &clock_at(2026, 2, 18, 15, 0));
        assert_eq!(closed.phase, Phase::RamadanEnded);

        let early_close = window((17, 0), (18, 3));
        let report = classify_in(&early_close, &clock_at(2026, 2, 18, 1, 0));
        assert_eq!(report.phase, Phase::SahurWindow);
        assert_eq!(report.remaining, Duration::hours(2));
    }

    #[test]
    fn each_phase_holds_until_its_boundary() {
        // Edges before fajr, between fajr and maghrib, and after maghrib.
        let starts = [(18, 3), (18, 12), (18, 22)];
        let ends = [(19, 3), (19, 12), (19, 22)];
        for start in starts {
            for end in ends {
                let season = window(start, end);
                for day in 17..=20 {
                    let date = NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
                    let prayers = prayers_on(date);
                    let phase_at = |t: DateTime<Tz>| {
                        classify_phase(&LocalClock::from_local(t), &season, &prayers)
                            .unwrap_or_else(|e| panic!("{season} at {t}: {e}"))
                    };

                    let mut previous = None;
                    let mut t = Berlin.with_ymd_and_hms(2026, 2, day, 0, 0, 0).unwrap();
                    while t.date_naive() == date {
                        let report = phase_at(t);
                        assert!(report.remaining >= TimeDelta::zero());
                        if let Some(prev) = previous {
                            assert!(report.phase >= prev, "{season} at {t}");
                        }
                        previous = Some(report.phase);

                        if let Some(boundary) = report.next_boundary {
                            assert_eq!(boundary - t, report.remaining);
                            if boundary.date_naive() == date {
                                let held = phase_at(boundary - Duration::seconds(1));
                                assert_eq!(held.phase, report.phase, "{season} before {boundary}");
                                let changed = phase_at(boundary);
                                assert_ne!(changed.phase, report.phase, "{season} at {boundary}");
                            }
                        }
                        t += Duration::minutes(20);
                    }
                }
            }
        }
    }

    #[test]
    fn stale_prayer_times_are_rejected() {
        let clock = clock_at(2026, 2, 20, 9, 0);
        let yesterday = prayers_on(NaiveDate::from_ymd_opt(2026, 2, 19).unwrap());
        let err = classify_phase(&clock, &RamadanWindow::fixed(), &yesterday).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidClock);
    }

    #[test]
    fn local_date_decides_which_prayers_apply() {
        // 23:30 UTC on Feb 18 is already Feb 19 in Berlin.
        let utc = Utc.with_ymd_and_hms(2026, 2, 18, 23, 30, 0).unwrap();
        let clock = LocalClock::new(utc, Berlin);
        let report = classify(&clock);
        assert_eq!(report.phase, Phase::SahurWindow);
    }

    #[test]
    fn display() {
        let report = classify(&clock_at(2026, 2, 17, 10, 0));
        assert_eq!(report.to_string(), "before Ramadan (14:00:00 left)");
        assert!(Phase::FastingWindow.is_ramadan());
        assert!(!Phase::RamadanEnded.is_ramadan());
    }
}
