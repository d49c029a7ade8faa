// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Per-user session engine.
//!
//! A [`Session`] owns one resolved location, one clock, one configuration
//! and one streak. [`Session::evaluate`] produces a [`Snapshot`] of every
//! output for the current instant; [`Session::run`] repeats that on a fixed
//! tick until cancelled.
//!
//! Solar events, prayer times and the Ramadan window depend only on the
//! local date, so they are computed once per date and reused by every tick
//! of that day. The Qibla bearing depends only on the location and is
//! computed once.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, LocalClock};
use crate::config::EngineConfig;
use crate::error::MiqatResult;
use crate::location::ResolvedLocation;
use crate::phase::{classify_phase, PhaseReport};
use crate::prayer::{derive_prayer_times, Prayer, PrayerTimes};
use crate::qibla::qibla_bearing;
use crate::ramadan::RamadanWindow;
use crate::solar::{compute_solar_events_with, SolarEvents};
use crate::streak::{SharedStreak, StreakState};

/// Everything the engine knows at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub clock: LocalClock,
    pub solar: MiqatResult<SolarEvents>,
    pub prayers: MiqatResult<PrayerTimes>,
    pub qibla: MiqatResult<f64>,
    pub ramadan: MiqatResult<RamadanWindow>,
    /// One-based day of the season, when inside it.
    pub ramadan_day: Option<u32>,
    pub phase: MiqatResult<PhaseReport>,
    pub next_prayer: Option<(Prayer, DateTime<Tz>)>,
    pub streak: StreakState,
    /// Progress toward the configured dhikr target, in `[0, 1]`.
    pub dhikr_progress: f64,
}

/// Date-scoped results, shared by all ticks of one local date.
#[derive(Debug)]
struct DayPlan {
    date: NaiveDate,
    solar: MiqatResult<SolarEvents>,
    prayers: MiqatResult<PrayerTimes>,
    ramadan: MiqatResult<RamadanWindow>,
}

impl DayPlan {
    fn compute(location: &ResolvedLocation, config: &EngineConfig, date: NaiveDate) -> Self {
        log::debug!("computing day plan for {} on {date}", location.name());
        let solar = compute_solar_events_with(
            location.point(),
            date,
            &location.timezone,
            config.twilight_angle_deg,
        );
        let prayers = solar.as_ref().map(derive_prayer_times).map_err(Clone::clone);
        let ramadan = config.ramadan_window_for(date);
        Self {
            date,
            solar,
            prayers,
            ramadan,
        }
    }
}

pub struct Session {
    location: ResolvedLocation,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    qibla: MiqatResult<f64>,
    streak: SharedStreak,
    plan: Mutex<Option<Arc<DayPlan>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("location", &self.location)
            .field("config", &self.config)
            .field("streak", &self.streak)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session with a fresh streak counted from today.
    ///
    /// # Errors
    ///
    /// [`MiqatError::InvalidInput`](crate::MiqatError::InvalidInput) when
    /// `config` does not validate.
    pub fn new(
        location: ResolvedLocation,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> MiqatResult<Self> {
        config.validate()?;
        let today = LocalClock::new(clock.now(), location.timezone).date();
        let qibla = qibla_bearing(location.point());
        if let Err(err) = &qibla {
            log::warn!("{err}");
        }
        Ok(Self {
            location,
            config,
            clock,
            qibla,
            streak: SharedStreak::new(StreakState::new(today)),
            plan: Mutex::new(None),
        })
    }

    /// Replace the streak, e.g. with one restored from storage.
    pub fn with_streak(self, state: StreakState) -> Self {
        Self {
            streak: SharedStreak::new(state),
            ..self
        }
    }

    pub fn location(&self) -> &ResolvedLocation {
        &self.location
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle for user actions on the counter and streak.
    pub fn streak(&self) -> &SharedStreak {
        &self.streak
    }

    /// Evaluate at the clock's current instant.
    pub fn evaluate(&self) -> Snapshot {
        self.evaluate_at(self.clock.now())
    }

    pub fn evaluate_at(&self, now: DateTime<Utc>) -> Snapshot {
        let clock = LocalClock::new(now, self.location.timezone);
        let date = clock.date();
        let plan = self.day_plan(date);

        let phase = match (&plan.ramadan, &plan.prayers) {
            (Ok(window), Ok(prayers)) => classify_phase(&clock, window, prayers),
            (Err(err), _) | (_, Err(err)) => Err(err.clone()),
        };
        let next_prayer = plan.prayers.as_ref().ok().and_then(|prayers| {
            prayers
                .next_after(clock.now())
                .map(|(prayer, at)| (prayer, *at))
        });
        let ramadan_day = plan
            .ramadan
            .as_ref()
            .ok()
            .and_then(|window| window.day_of_ramadan(date));
        let streak = self.streak.tick(date);

        Snapshot {
            solar: plan.solar.clone(),
            prayers: plan.prayers.clone(),
            qibla: self.qibla.clone(),
            ramadan: plan.ramadan.clone(),
            ramadan_day,
            phase,
            next_prayer,
            streak,
            dhikr_progress: streak.dhikr_progress(self.config.dhikr_target),
            clock,
        }
    }

    fn day_plan(&self, date: NaiveDate) -> Arc<DayPlan> {
        let mut slot = self.plan.lock();
        match slot.as_ref() {
            Some(plan) if plan.date == date => Arc::clone(plan),
            _ => {
                let plan = Arc::new(DayPlan::compute(&self.location, &self.config, date));
                *slot = Some(Arc::clone(&plan));
                plan
            }
        }
    }

    /// Evaluate every `tick_interval` and hand each snapshot to
    /// `on_snapshot` until `cancel` fires.
    ///
    /// The first snapshot is produced immediately. Ticks missed while the
    /// callback runs long are skipped, not replayed.
    pub async fn run<F>(&self, cancel: CancellationToken, mut on_snapshot: F)
    where
        F: FnMut(Snapshot),
    {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::debug!(
            "session for {} ticking every {:?}",
            self.location.name(),
            self.config.tick_interval
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::debug!("session for {} cancelled", self.location.name());
                    break;
                }
                _ = ticker.tick() => {
                    let snapshot = self.evaluate();
                    if let Err(err) = &snapshot.phase {
                        log::warn!("phase unavailable at {}: {err}", snapshot.clock.now());
                    }
                    on_snapshot(snapshot);
                }
            }
        }
    }
}
