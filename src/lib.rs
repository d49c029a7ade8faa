// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Prayer times, Qibla and Ramadan countdowns.
//!
//! This crate computes the time events of a Muslim day for any point on
//! Earth and turns them into a live state a presentation layer can render:
//! which phase of the Ramadan day "now" falls in, how long until the next
//! boundary, the Qibla direction, and a dhikr counter with a day streak.
//!
//! # Pipeline
//!
//! ```text
//! GeoPoint + date + Tz ─► SolarEvents ─► PrayerTimes ─┐
//!                                                    ├─► PhaseReport
//! RamadanWindow (fixed or Hijri) + LocalClock ───────┘
//! GeoPoint ─► Qibla bearing          StreakState ◄─ tick(today)
//! ```
//!
//! # Core types
//!
//! | Type | Role |
//! |------|------|
//! | [`GeoPoint`] | validated latitude/longitude |
//! | [`SolarEvents`] | dawn, sunrise, noon, sunset, dusk in local time |
//! | [`PrayerTimes`] | Fajr … Isha for one local date |
//! | [`RamadanWindow`] | half-open local season bounds |
//! | [`PhaseReport`] | phase, time remaining, next boundary |
//! | [`StreakState`] | dhikr counter and day streak |
//! | [`Session`] | per-user owner of all of the above, with a tick loop |
//!
//! All instants are `chrono` values; the solar model runs on a
//! [`JulianDay`] axis measured in `qtty` days.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use miqat::{compute_solar_events, derive_prayer_times, qibla_bearing, GeoPoint};
//!
//! let aachen = GeoPoint::new(50.7753, 6.0839)?;
//! let date = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap();
//! let events = compute_solar_events(aachen, date, &chrono_tz::Europe::Berlin)?;
//! let prayers = derive_prayer_times(&events);
//!
//! assert!(prayers.fajr < prayers.maghrib);
//! assert!((qibla_bearing(aachen)? - 125.5).abs() < 0.5);
//! # Ok::<(), miqat::MiqatError>(())
//! ```

pub mod board;
pub mod clock;
pub mod config;
mod error;
mod geo;
pub mod hijri;
mod interval;
mod julian;
pub mod location;
mod phase;
mod prayer;
mod qibla;
mod ramadan;
pub mod session;
mod solar;
mod streak;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use board::{iftar_board, preset_board, Countdown, IftarEntry, IftarTime};
pub use clock::{Clock, FixedClock, LocalClock, SystemClock};
pub use config::{EngineConfig, RamadanSource};
pub use error::{ErrorKind, MiqatError, MiqatResult, PolarCondition};
pub use geo::{GeoPoint, KAABA};
pub use hijri::HijriDate;
pub use interval::{Interval, TimeInstant};
pub use julian::JulianDay;
pub use location::{
    resolve_location, Geocoder, Place, PresetCities, PresetCity, ResolvedLocation,
    TimezoneLookup, PRESET_CITIES,
};
pub use phase::{classify_phase, Phase, PhaseReport};
pub use prayer::{derive_prayer_times, Prayer, PrayerTimes};
pub use qibla::{distance_to_kaaba_km, qibla_bearing, EARTH_MEAN_RADIUS_KM};
pub use ramadan::RamadanWindow;
pub use session::{Session, Snapshot};
pub use solar::{
    compute_solar_events, compute_solar_events_with, solar_event, SolarEventKind, SolarEvents,
    DEFAULT_TWILIGHT_ANGLE_DEG, SUNRISE_ALTITUDE_DEG,
};
pub use streak::{SharedStreak, StreakState};
