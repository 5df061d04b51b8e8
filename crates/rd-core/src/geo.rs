//! Geographic coordinate type and spatial utilities.
//!
//! `Position` stores WGS-84 degrees as `f64`.  Path arithmetic treats
//! `(lng, lat)` as a flat plane, which is accurate enough at city and
//! regional scale; [`Position::distance_m`] is available when a real
//! ground distance is needed (reports, logging).

use std::f64::consts::TAU;

/// A WGS-84 geographic coordinate, longitude first.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    #[inline]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Euclidean distance in degree space.
    #[inline]
    pub fn planar_distance(self, other: Position) -> f64 {
        (other.lng - self.lng).hypot(other.lat - self.lat)
    }

    /// Linear blend towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: Position, t: f64) -> Position {
        Position {
            lng: self.lng + (other.lng - self.lng) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }

    /// Planar heading from `self` to `other` in radians: 0 = north,
    /// increasing clockwise, normalised to `[0, 2π)`.
    ///
    /// Returns `None` when the two points coincide.
    pub fn heading_to(self, other: Position) -> Option<f64> {
        let d_lng = other.lng - self.lng;
        let d_lat = other.lat - self.lat;
        if d_lng == 0.0 && d_lat == 0.0 {
            return None;
        }
        Some(d_lng.atan2(d_lat).rem_euclid(TAU))
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Position) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// `true` if both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}
