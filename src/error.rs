// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for the prayer-time engine.
//!
//! Every fallible operation returns [`MiqatResult<T>`]. The variants map onto
//! a small taxonomy exposed through [`ErrorKind`], which is what a
//! presentation layer should match on when deciding fallback text:
//!
//! | Kind | Raised by | Typical cause |
//! |------|-----------|---------------|
//! | [`NoSolarEvent`](ErrorKind::NoSolarEvent) | solar calculator | polar day / polar night, twilight that never ends |
//! | [`UndefinedBearing`](ErrorKind::UndefinedBearing) | Qibla calculator | point is the Kaaba's antipode |
//! | [`InvalidClock`](ErrorKind::InvalidClock) | phase classifier | stale prayer times, clock skew |
//! | [`UnresolvedLocation`](ErrorKind::UnresolvedLocation) | location resolution | geocoder failure or timeout |
//! | [`InvalidInput`](ErrorKind::InvalidInput) | constructors, config | out-of-range coordinates, bad dates |
//!
//! None of these are fatal: each one is scoped to a single evaluation.

use chrono::NaiveDate;
use thiserror::Error;

use crate::geo::GeoPoint;
use crate::solar::SolarEventKind;

/// Coarse classification of a [`MiqatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoSolarEvent,
    UndefinedBearing,
    InvalidClock,
    UnresolvedLocation,
    InvalidInput,
}

/// Why the Sun never reaches a target altitude on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolarCondition {
    /// The Sun stays below the target altitude all day (polar night).
    NeverRises,
    /// The Sun stays above the target altitude all day (midnight sun,
    /// or a twilight that never ends in high-latitude summers).
    NeverSets,
}

impl std::fmt::Display for PolarCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeverRises => f.write_str("never rises to the target altitude"),
            Self::NeverSets => f.write_str("never sinks below the target altitude"),
        }
    }
}

/// Unified error type for the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MiqatError {
    /// The hour-angle equation has no solution for this event on this date.
    #[error("no {event} on {date} at latitude {latitude:.4}°: the sun {condition}")]
    NoSolarEvent {
        event: SolarEventKind,
        date: NaiveDate,
        latitude: f64,
        condition: PolarCondition,
    },

    /// The great-circle bearing to the Kaaba is undefined from this point.
    #[error("qibla bearing is undefined at {point}: point is antipodal to the Kaaba")]
    UndefinedBearing { point: GeoPoint },

    /// The clock disagrees with the data it is being classified against.
    #[error("inconsistent clock: {message}")]
    InvalidClock { message: String },

    /// Upstream geocoding failed or timed out.
    #[error("could not resolve location {query:?}: {reason}")]
    UnresolvedLocation { query: String, reason: String },

    /// A caller-supplied value is outside its valid domain.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },
}

impl MiqatError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_clock(message: impl Into<String>) -> Self {
        Self::InvalidClock {
            message: message.into(),
        }
    }

    pub fn unresolved(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvedLocation {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoSolarEvent { .. } => ErrorKind::NoSolarEvent,
            Self::UndefinedBearing { .. } => ErrorKind::UndefinedBearing,
            Self::InvalidClock { .. } => ErrorKind::InvalidClock,
            Self::UnresolvedLocation { .. } => ErrorKind::UnresolvedLocation,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// Result alias used throughout the crate.
pub type MiqatResult<T> = Result<T, MiqatError>;
