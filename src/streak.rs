// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Dhikr counter and Ramadan streak.
//!
//! [`StreakState`] is a plain value: every operation consumes the state and
//! returns the next one. The only automatic transition is the date rollover
//! in [`StreakState::tick`], which is idempotent per date.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreakState {
    dhikr_count: u64,
    ramadan_streak_days: u32,
    last_counted_date: NaiveDate,
}

impl StreakState {
    /// A fresh state whose rollover clock starts at `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self::restore(0, 0, today)
    }

    /// Rebuild a persisted state.
    pub fn restore(
        dhikr_count: u64,
        ramadan_streak_days: u32,
        last_counted_date: NaiveDate,
    ) -> Self {
        Self {
            dhikr_count,
            ramadan_streak_days,
            last_counted_date,
        }
    }

    #[inline]
    pub const fn dhikr_count(&self) -> u64 {
        self.dhikr_count
    }

    #[inline]
    pub const fn ramadan_streak_days(&self) -> u32 {
        self.ramadan_streak_days
    }

    #[inline]
    pub const fn last_counted_date(&self) -> NaiveDate {
        self.last_counted_date
    }

    /// One more tap.
    #[must_use]
    pub fn increment(self) -> Self {
        Self {
            dhikr_count: self.dhikr_count.saturating_add(1),
            ..self
        }
    }

    #[must_use]
    pub fn reset_count(self) -> Self {
        Self {
            dhikr_count: 0,
            ..self
        }
    }

    #[must_use]
    pub fn reset_streak(self) -> Self {
        Self {
            ramadan_streak_days: 0,
            ..self
        }
    }

    /// Apply the date rollover.
    ///
    /// When `today` is later than the last counted date the streak grows by
    /// one (however many days were skipped) and the counter clears. Any
    /// other date, including an earlier one after a clock correction,
    /// leaves the state untouched.
    #[must_use]
    pub fn tick(self, today: NaiveDate) -> Self {
        if today <= self.last_counted_date {
            return self;
        }
        let ramadan_streak_days = self.ramadan_streak_days.saturating_add(1);
        log::debug!(
            "streak rollover {} -> {today}: {ramadan_streak_days} days, {} taps cleared",
            self.last_counted_date,
            self.dhikr_count
        );
        Self {
            dhikr_count: 0,
            ramadan_streak_days,
            last_counted_date: today,
        }
    }

    /// Counter progress toward `target` taps, clamped to `[0, 1]`.
    pub fn dhikr_progress(&self, target: u32) -> f64 {
        if target == 0 {
            return 1.0;
        }
        (self.dhikr_count as f64 / f64::from(target)).min(1.0)
    }
}

/// A [`StreakState`] shared between a session's tick loop and its user
/// actions.
///
/// Each update runs under the lock, so a rollover racing a tap never loses
/// either; two rollovers for the same date collapse into one.
#[derive(Debug, Clone)]
pub struct SharedStreak(Arc<Mutex<StreakState>>);

impl SharedStreak {
    pub fn new(state: StreakState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    pub fn get(&self) -> StreakState {
        *self.0.lock()
    }

    /// Replace the state with `f(state)` and return the result.
    pub fn update(&self, f: impl FnOnce(StreakState) -> StreakState) -> StreakState {
        let mut guard = self.0.lock();
        *guard = f(*guard);
        *guard
    }

    pub fn increment(&self) -> StreakState {
        self.update(StreakState::increment)
    }

    pub fn reset_count(&self) -> StreakState {
        self.update(StreakState::reset_count)
    }

    pub fn reset_streak(&self) -> StreakState {
        self.update(StreakState::reset_streak)
    }

    pub fn tick(&self, today: NaiveDate) -> StreakState {
        self.update(|state| state.tick(today))
    }
}
