// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Wall clocks and localized instants.
//!
//! The engine never reads the system time directly: every evaluation goes
//! through a [`Clock`] so sessions can be driven by a [`FixedClock`] in
//! tests. [`LocalClock`] pins an instant to the session's timezone; its
//! calendar date rolls over at local midnight.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;

/// Capability returning the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The operating system's clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock.
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.instant.lock();
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock()
    }
}

/// An instant observed in a specific timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalClock {
    now: DateTime<Tz>,
}

impl LocalClock {
    /// Localize a UTC instant.
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            now: now.with_timezone(&tz),
        }
    }

    pub fn from_local(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> &DateTime<Tz> {
        &self.now
    }

    pub fn timezone(&self) -> Tz {
        self.now.timezone()
    }

    /// Calendar date in the clock's timezone.
    pub fn date(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// The first instant of the following local calendar date.
    pub fn next_midnight(&self) -> DateTime<Tz> {
        let tomorrow = self
            .date()
            .succ_opt()
            .unwrap_or(NaiveDate::MAX)
            .and_time(chrono::NaiveTime::MIN);
        resolve_local(&self.timezone(), tomorrow)
    }
}

/// Pin a wall-clock time to `tz`.
///
/// Ambiguous times (the repeated hour when DST ends) resolve to the earlier
/// instant. Times that do not exist (the skipped hour when DST starts, or a
/// skipped midnight) move forward to the first wall-clock time that does.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    let mut probe = naive;
    for _ in 0..8 {
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt;
        }
        probe += Duration::minutes(15);
    }
    tz.from_utc_datetime(&naive)
}
