// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Qibla direction and distance.
//!
//! The Qibla is the initial bearing of the great circle from the observer to
//! the Kaaba, measured clockwise from true north:
//!
//! ```text
//! θ = atan2(sin Δλ · cos φ₂, cos φ₁ · sin φ₂ − sin φ₁ · cos φ₂ · cos Δλ)
//! ```
//!
//! Every great circle through the Kaaba also passes through its antipode, so
//! no bearing exists there.

use std::f64::consts::PI;

use crate::error::{MiqatError, MiqatResult};
use crate::geo::{GeoPoint, KAABA};

/// Mean Earth radius (IUGG) in kilometres.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.0;

/// Central angle below which two points are treated as coincident, or
/// antipodal when measured from π (radians, ≈ 6 m on the ground).
const DEGENERATE_ANGLE_RAD: f64 = 1e-6;

/// Wrap a longitude difference into `[-180, 180)`.
fn wrap_degrees(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle central angle between two points (haversine), radians.
fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let (phi1, phi2) = (a.latitude_rad(), b.latitude_rad());
    let dphi = phi2 - phi1;
    let dlambda = wrap_degrees(b.longitude() - a.longitude()).to_radians();
    let h = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Great-circle distance between two points in kilometres.
pub(crate) fn great_circle_km(a: GeoPoint, b: GeoPoint) -> f64 {
    central_angle(a, b) * EARTH_MEAN_RADIUS_KM
}

/// Bearing from `point` to the Kaaba in degrees, in `[0, 360)`.
///
/// At the Kaaba itself the bearing is reported as `0.0`.
///
/// # Errors
///
/// [`MiqatError::UndefinedBearing`] at the Kaaba's antipode
/// (21.4225°S, 140.1738°W).
pub fn qibla_bearing(point: GeoPoint) -> MiqatResult<f64> {
    let sigma = central_angle(point, KAABA);
    if PI - sigma < DEGENERATE_ANGLE_RAD {
        return Err(MiqatError::UndefinedBearing { point });
    }
    if sigma < DEGENERATE_ANGLE_RAD {
        return Ok(0.0);
    }

    let (phi1, phi2) = (point.latitude_rad(), KAABA.latitude_rad());
    let dlambda = wrap_degrees(KAABA.longitude() - point.longitude()).to_radians();
    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0
    Ok(if bearing >= 360.0 { 0.0 } else { bearing })
}

/// Great-circle distance from `point` to the Kaaba in kilometres.
pub fn distance_to_kaaba_km(point: GeoPoint) -> f64 {
    great_circle_km(point, KAABA)
}
