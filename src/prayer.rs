// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Daily prayer times derived from solar events.
//!
//! | Prayer | Source |
//! |--------|--------|
//! | Fajr | dawn |
//! | Shuruq | sunrise |
//! | Dhuhr | solar noon |
//! | Asr | midpoint of Dhuhr and Maghrib |
//! | Maghrib | sunset |
//! | Isha | dusk |
//!
//! Asr uses the midpoint rule rather than the shadow-length rule of the
//! juristic schools. It tends to fall later than the Shafi'i time in winter
//! and earlier in summer.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::solar::SolarEvents;

#[cfg(feature = "serde")]
use serde::Serialize;

/// The named daily prayer instants, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Prayer {
    Fajr,
    Shuruq,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Shuruq,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Shuruq => "Shuruq",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Prayer times of one local calendar date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PrayerTimes {
    pub date: NaiveDate,
    pub fajr: DateTime<Tz>,
    pub shuruq: DateTime<Tz>,
    pub dhuhr: DateTime<Tz>,
    pub asr: DateTime<Tz>,
    pub maghrib: DateTime<Tz>,
    pub isha: DateTime<Tz>,
}

/// Map solar events onto prayer times.
pub fn derive_prayer_times(events: &SolarEvents) -> PrayerTimes {
    let dhuhr = events.solar_noon;
    let maghrib = events.sunset;
    let asr = dhuhr + (maghrib - dhuhr) / 2;

    PrayerTimes {
        date: events.date,
        fajr: events.dawn,
        shuruq: events.sunrise,
        dhuhr,
        asr,
        maghrib,
        isha: events.dusk,
    }
}

impl PrayerTimes {
    pub fn get(&self, prayer: Prayer) -> &DateTime<Tz> {
        match prayer {
            Prayer::Fajr => &self.fajr,
            Prayer::Shuruq => &self.shuruq,
            Prayer::Dhuhr => &self.dhuhr,
            Prayer::Asr => &self.asr,
            Prayer::Maghrib => &self.maghrib,
            Prayer::Isha => &self.isha,
        }
    }

    /// All instants in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, &DateTime<Tz>)> + '_ {
        Prayer::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// The first prayer strictly after `now`, or `None` once Isha has passed.
    pub fn next_after(&self, now: &DateTime<Tz>) -> Option<(Prayer, &DateTime<Tz>)> {
        self.iter().find(|(_, at)| *at > now)
    }
}
