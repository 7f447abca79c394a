//! Latitude/longitude coordinate with bit-exact identity.

use std::fmt;
use std::hash::{Hash, Hasher};

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// A position expressed as latitude and longitude in degrees.
///
/// Two coordinates are equal only if both components have identical bit
/// patterns. No epsilon is applied: vertices that must be shared between
/// neighbouring grid cells are always computed from the same grid lines, so
/// exact comparison is what collapses them to one vertex.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees. Positive = north.
    pub latitude: f64,
    /// Longitude in degrees. Positive = east.
    pub longitude: f64,
}

impl LatLon {
    /// Create a new coordinate.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The coordinate as a planar `(x = longitude, y = latitude)` vector.
    pub fn to_planar(self) -> DVec2 {
        DVec2::new(self.longitude, self.latitude)
    }

    /// Inverse of [`LatLon::to_planar`].
    pub fn from_planar(p: DVec2) -> Self {
        Self::new(p.y, p.x)
    }

    /// Render-space position: `(longitude, latitude, elevation)`.
    pub fn to_render_position(self, elevation: f64) -> DVec3 {
        DVec3::new(self.longitude, self.latitude, elevation)
    }

    /// Linear interpolation in degree space. `t = 0` yields `self`.
    pub fn lerp(self, other: LatLon, t: f64) -> LatLon {
        LatLon::new(
            self.latitude + (other.latitude - self.latitude) * t,
            self.longitude + (other.longitude - self.longitude) * t,
        )
    }

    /// Squared planar distance in degrees².
    pub fn distance_squared(self, other: LatLon) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        dlat * dlat + dlon * dlon
    }

    fn bits(&self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

impl PartialEq for LatLon {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for LatLon {}

impl Hash for LatLon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.6}\u{00B0}{}, {:.6}\u{00B0}{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir,
        )
    }
}
