// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Location capabilities.
//!
//! Geocoding and timezone lookup are external services. The engine sees
//! them through [`Geocoder`] and [`TimezoneLookup`] and resolves a query
//! once per location change with [`resolve_location`], which bounds the
//! geocoder with a caller-supplied timeout.
//!
//! [`PresetCities`] implements both capabilities offline for a handful of
//! well-known cities.

use std::future::Future;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::{MiqatError, MiqatResult};
use crate::geo::GeoPoint;
use crate::qibla::great_circle_km;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A named point returned by a geocoder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Place {
    pub name: String,
    pub point: GeoPoint,
}

/// Forward geocoding: free-text query to a named point.
pub trait Geocoder {
    /// Resolve `query`. Failures are reported as a human-readable reason.
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Place, String>> + Send;
}

/// Coordinates to IANA timezone name.
pub trait TimezoneLookup {
    fn timezone_at(&self, point: GeoPoint) -> Option<String>;
}

/// A place together with the timezone its local dates are counted in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ResolvedLocation {
    pub place: Place,
    pub timezone: Tz,
    /// `true` when no usable timezone was found and UTC stands in for it.
    pub timezone_fallback: bool,
}

impl ResolvedLocation {
    pub fn new(name: impl Into<String>, point: GeoPoint, timezone: Tz) -> Self {
        Self {
            place: Place {
                name: name.into(),
                point,
            },
            timezone,
            timezone_fallback: false,
        }
    }

    #[inline]
    pub fn point(&self) -> GeoPoint {
        self.place.point
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.place.name
    }
}

/// Parse an IANA name, falling back to UTC.
///
/// Returns the zone and whether the fallback was taken.
pub fn resolve_timezone(name: Option<&str>) -> (Tz, bool) {
    match name.map(|n| n.parse::<Tz>()) {
        Some(Ok(tz)) => (tz, false),
        Some(Err(_)) => {
            log::warn!("unknown timezone {:?}, falling back to UTC", name.unwrap_or_default());
            (Tz::UTC, true)
        }
        None => {
            log::warn!("no timezone found, falling back to UTC");
            (Tz::UTC, true)
        }
    }
}

/// Geocode `query` and attach its timezone.
///
/// # Errors
///
/// [`MiqatError::UnresolvedLocation`] when the query is blank, the geocoder
/// fails, or it does not answer within `timeout`. A missing timezone is not
/// an error; see [`ResolvedLocation::timezone_fallback`].
pub async fn resolve_location<G, L>(
    geocoder: &G,
    lookup: &L,
    query: &str,
    timeout: Duration,
) -> MiqatResult<ResolvedLocation>
where
    G: Geocoder + ?Sized,
    L: TimezoneLookup + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(MiqatError::unresolved(query, "empty query"));
    }

    let place = match tokio::time::timeout(timeout, geocoder.geocode(query)).await {
        Ok(Ok(place)) => place,
        Ok(Err(reason)) => return Err(MiqatError::unresolved(query, reason)),
        Err(_) => {
            return Err(MiqatError::unresolved(
                query,
                format!("geocoder timed out after {timeout:?}"),
            ))
        }
    };

    let zone_name = lookup.timezone_at(place.point);
    let (timezone, timezone_fallback) = resolve_timezone(zone_name.as_deref());
    log::debug!("resolved {query:?} to {} ({}) in {timezone}", place.name, place.point);

    Ok(ResolvedLocation {
        place,
        timezone,
        timezone_fallback,
    })
}

/// A city shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetCity {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: &'static str,
}

impl PresetCity {
    pub fn point(&self) -> MiqatResult<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// The city as a resolved location.
    pub fn resolve(&self) -> MiqatResult<ResolvedLocation> {
        let (timezone, timezone_fallback) = resolve_timezone(Some(self.timezone));
        Ok(ResolvedLocation {
            place: Place {
                name: self.name.to_owned(),
                point: self.point()?,
            },
            timezone,
            timezone_fallback,
        })
    }

    fn matches(&self, query: &str) -> bool {
        let short = self.name.split(',').next().unwrap_or(self.name);
        self.name.eq_ignore_ascii_case(query) || short.trim().eq_ignore_ascii_case(query)
    }
}

pub const PRESET_CITIES: [PresetCity; 5] = [
    PresetCity {
        name: "Mecca, Saudi Arabia",
        latitude: 21.3891,
        longitude: 39.8579,
        timezone: "Asia/Riyadh",
    },
    PresetCity {
        name: "Cairo, Egypt",
        latitude: 30.0444,
        longitude: 31.2357,
        timezone: "Africa/Cairo",
    },
    PresetCity {
        name: "Istanbul, Türkiye",
        latitude: 41.0082,
        longitude: 28.9784,
        timezone: "Europe/Istanbul",
    },
    PresetCity {
        name: "Berlin, Germany",
        latitude: 52.52,
        longitude: 13.405,
        timezone: "Europe/Berlin",
    },
    PresetCity {
        name: "Aachen, Germany",
        latitude: 50.7753,
        longitude: 6.0839,
        timezone: "Europe/Berlin",
    },
];

/// Offline geocoder and timezone lookup over a fixed city list.
#[derive(Debug, Clone)]
pub struct PresetCities {
    cities: Vec<PresetCity>,
    /// Radius within which a point is attributed to a city's timezone.
    radius_km: f64,
}

impl Default for PresetCities {
    fn default() -> Self {
        Self::new(PRESET_CITIES.to_vec())
    }
}

impl PresetCities {
    pub fn new(cities: Vec<PresetCity>) -> Self {
        Self {
            cities,
            radius_km: 75.0,
        }
    }

    pub fn cities(&self) -> &[PresetCity] {
        &self.cities
    }

    pub fn find(&self, query: &str) -> Option<&PresetCity> {
        let query = query.trim();
        self.cities.iter().find(|city| city.matches(query))
    }

    fn lookup(&self, query: &str) -> Result<Place, String> {
        let city = self
            .find(query)
            .ok_or_else(|| format!("{query:?} is not a preset city"))?;
        let point = city.point().map_err(|err| err.to_string())?;
        Ok(Place {
            name: city.name.to_owned(),
            point,
        })
    }
}

impl Geocoder for PresetCities {
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Place, String>> + Send {
        let result = self.lookup(query);
        async move { result }
    }
}

impl TimezoneLookup for PresetCities {
    fn timezone_at(&self, point: GeoPoint) -> Option<String> {
        self.cities
            .iter()
            .filter_map(|city| {
                let other = city.point().ok()?;
                Some((great_circle_km(point, other), city))
            })
            .filter(|(km, _)| *km <= self.radius_km)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, city)| city.timezone.to_owned())
    }
}
