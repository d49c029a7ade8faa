// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Iftar times across several cities.
//!
//! Each city is evaluated on its own local date, so one board can mix
//! cities whose Iftar is hours away with cities already past it.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::clock::LocalClock;
use crate::error::MiqatResult;
use crate::location::{ResolvedLocation, PRESET_CITIES};
use crate::solar::{solar_event, SolarEventKind, DEFAULT_TWILIGHT_ANGLE_DEG};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Countdown {
    Remaining(
        #[cfg_attr(
            feature = "serde",
            serde(serialize_with = "crate::phase::serialize_seconds")
        )]
        TimeDelta,
    ),
    Passed,
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remaining(left) => {
                let secs = left.num_seconds();
                write!(f, "{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
            }
            Self::Passed => f.write_str("iftar passed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IftarTime {
    /// Sunset on the city's local date.
    pub maghrib: DateTime<Tz>,
    pub countdown: Countdown,
}

#[derive(Debug, Clone)]
pub struct IftarEntry {
    pub city: String,
    pub timezone: Tz,
    pub iftar: MiqatResult<IftarTime>,
}

/// Iftar time and countdown for every city at `now`.
pub fn iftar_board(cities: &[ResolvedLocation], now: DateTime<Utc>) -> Vec<IftarEntry> {
    cities
        .iter()
        .map(|city| {
            let clock = LocalClock::new(now, city.timezone);
            let iftar = solar_event(
                city.point(),
                clock.date(),
                &city.timezone,
                SolarEventKind::Sunset,
                DEFAULT_TWILIGHT_ANGLE_DEG,
            )
            .map(|maghrib| {
                let left = maghrib - *clock.now();
                let countdown = if left > TimeDelta::zero() {
                    Countdown::Remaining(left)
                } else {
                    Countdown::Passed
                };
                IftarTime { maghrib, countdown }
            });
            if let Err(err) = &iftar {
                log::warn!("no iftar time for {}: {err}", city.name());
            }
            IftarEntry {
                city: city.name().to_owned(),
                timezone: city.timezone,
                iftar,
            }
        })
        .collect()
}

/// [`iftar_board`] over the built-in cities.
pub fn preset_board(now: DateTime<Utc>) -> MiqatResult<Vec<IftarEntry>> {
    let cities = PRESET_CITIES
        .iter()
        .map(|city| city.resolve())
        .collect::<MiqatResult<Vec<_>>>()?;
    Ok(iftar_board(&cities, now))
}
