//! Geodetic and local-metric location types.
//!
//! The local metric frame is an equirectangular projection anchored at a
//! geodetic origin: x = East, y = North, both in meters. Accurate to
//! <0.1% within a few hundred kilometers of the origin.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::METERS_PER_DEGREE;

/// A geodetic coordinate on the Earth's surface (degrees).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// A location in the local metric frame (meters).
/// east = x, north = y, relative to some geodetic anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianLocation {
    pub east: f64,
    pub north: f64,
}

impl PolarLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Project into the local metric frame anchored at `origin`.
    pub fn to_cartesian(&self, origin: &PolarLocation) -> CartesianLocation {
        let east =
            (self.longitude - origin.longitude) * METERS_PER_DEGREE * origin.cos_latitude();
        let north = (self.latitude - origin.latitude) * METERS_PER_DEGREE;
        CartesianLocation { east, north }
    }

    /// Cached longitude scale factor: cos of this location's latitude.
    fn cos_latitude(&self) -> f64 {
        self.latitude.to_radians().cos()
    }
}

impl CartesianLocation {
    pub fn new(east: f64, north: f64) -> Self {
        Self { east, north }
    }

    /// Unproject back to geodetic coordinates, anchored at `origin`.
    pub fn to_polar(&self, origin: &PolarLocation) -> PolarLocation {
        let longitude =
            origin.longitude + self.east / (METERS_PER_DEGREE * origin.cos_latitude());
        let latitude = origin.latitude + self.north / METERS_PER_DEGREE;
        PolarLocation {
            latitude,
            longitude,
        }
    }

    /// Distance to another location in meters.
    pub fn distance_to(&self, other: &CartesianLocation) -> f64 {
        let dx = other.east - self.east;
        let dy = other.north - self.north;
        (dx * dx + dy * dy).sqrt()
    }

    /// View as a glam vector (east, north).
    pub fn to_dvec2(&self) -> DVec2 {
        DVec2::new(self.east, self.north)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self {
            east: v.x,
            north: v.y,
        }
    }
}
