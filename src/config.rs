// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Engine configuration.
//!
//! [`EngineConfig::default`] is usable as-is. With the `serde` feature every
//! field may be omitted from a configuration file and falls back to its
//! default:
//!
//! ```text
//! { "twilight_angle_deg": 15.0, "ramadan": { "Hijri": { "offset_days": -1 } } }
//! ```

use std::time::Duration;

use chrono::NaiveDate;

use crate::error::{MiqatError, MiqatResult};
use crate::ramadan::RamadanWindow;
use crate::solar::DEFAULT_TWILIGHT_ANGLE_DEG;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the Ramadan window comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RamadanSource {
    /// A single configured season.
    Fixed { window: RamadanWindow },
    /// The current or next season of the tabular Hijri calendar, shifted by
    /// a local sighting offset.
    Hijri { offset_days: i32 },
}

impl Default for RamadanSource {
    fn default() -> Self {
        Self::Hijri { offset_days: 0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Solar depression angle for Fajr and Isha, in degrees.
    pub twilight_angle_deg: f64,
    pub ramadan: RamadanSource,
    /// Period of the session tick loop.
    pub tick_interval: Duration,
    /// Tap count that fills the dhikr progress bar.
    pub dhikr_target: u32,
    /// Upper bound on a single location resolution.
    pub resolve_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            twilight_angle_deg: DEFAULT_TWILIGHT_ANGLE_DEG,
            ramadan: RamadanSource::default(),
            tick_interval: Duration::from_secs(1),
            dhikr_target: 100,
            resolve_timeout: Duration::from_secs(10),
        }
    }
}

impl EngineConfig {
    pub fn with_twilight_angle(mut self, degrees: f64) -> Self {
        self.twilight_angle_deg = degrees;
        self
    }

    pub fn with_fixed_window(mut self, window: RamadanWindow) -> Self {
        self.ramadan = RamadanSource::Fixed { window };
        self
    }

    pub fn with_hijri_offset(mut self, offset_days: i32) -> Self {
        self.ramadan = RamadanSource::Hijri { offset_days };
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_dhikr_target(mut self, target: u32) -> Self {
        self.dhikr_target = target;
        self
    }

    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> MiqatResult<()> {
        let twilight = self.twilight_angle_deg;
        if !(twilight.is_finite() && twilight > 0.0 && twilight < 90.0) {
            return Err(MiqatError::invalid_input(
                "twilight_angle_deg",
                format!("{twilight} is outside (0, 90)"),
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(MiqatError::invalid_input("tick_interval", "must be positive"));
        }
        if self.resolve_timeout.is_zero() {
            return Err(MiqatError::invalid_input("resolve_timeout", "must be positive"));
        }
        if self.dhikr_target == 0 {
            return Err(MiqatError::invalid_input("dhikr_target", "must be positive"));
        }
        if let RamadanSource::Hijri { offset_days } = self.ramadan {
            if offset_days.abs() > 3 {
                return Err(MiqatError::invalid_input(
                    "ramadan.offset_days",
                    format!("{offset_days} is outside -3..=3"),
                ));
            }
        }
        Ok(())
    }

    /// The Ramadan window that applies on the local date `today`.
    pub fn ramadan_window_for(&self, today: NaiveDate) -> MiqatResult<RamadanWindow> {
        match self.ramadan {
            RamadanSource::Fixed { window } => Ok(window),
            RamadanSource::Hijri { offset_days } => RamadanWindow::season_for(today, offset_days),
        }
    }
}
