//! Axis-aligned latitude/longitude bounding boxes.

use serde::{Deserialize, Serialize};

use crate::LatLon;

/// A rectangular region in lat/lon space.
///
/// Invariant: `min_latitude <= max_latitude` and `min_longitude <= max_longitude`.
/// [`Sector::new`] enforces this by swapping bounds if needed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl Sector {
    /// Create a sector from two latitude and two longitude bounds, in any order.
    pub fn new(lat_a: f64, lat_b: f64, lon_a: f64, lon_b: f64) -> Self {
        Self {
            min_latitude: lat_a.min(lat_b),
            max_latitude: lat_a.max(lat_b),
            min_longitude: lon_a.min(lon_b),
            max_longitude: lon_a.max(lon_b),
        }
    }

    /// Smallest sector containing every point. Returns `None` for an empty input.
    pub fn bounding<'a>(points: impl IntoIterator<Item = &'a LatLon>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut sector = Sector::new(
            first.latitude,
            first.latitude,
            first.longitude,
            first.longitude,
        );
        for p in iter {
            sector.min_latitude = sector.min_latitude.min(p.latitude);
            sector.max_latitude = sector.max_latitude.max(p.latitude);
            sector.min_longitude = sector.min_longitude.min(p.longitude);
            sector.max_longitude = sector.max_longitude.max(p.longitude);
        }
        Some(sector)
    }

    /// Latitude extent in degrees.
    pub fn delta_latitude(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    /// Longitude extent in degrees.
    pub fn delta_longitude(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }

    /// Returns true if the sector has zero (or non-finite) extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        !(self.delta_latitude() > 0.0 && self.delta_longitude() > 0.0)
            || !self.delta_latitude().is_finite()
            || !self.delta_longitude().is_finite()
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains(&self, p: LatLon) -> bool {
        p.latitude >= self.min_latitude
            && p.latitude <= self.max_latitude
            && p.longitude >= self.min_longitude
            && p.longitude <= self.max_longitude
    }

    /// Nearest point inside the sector (the point itself if already inside).
    pub fn clamp(&self, p: LatLon) -> LatLon {
        LatLon::new(
            p.latitude.clamp(self.min_latitude, self.max_latitude),
            p.longitude.clamp(self.min_longitude, self.max_longitude),
        )
    }

    /// Smallest sector enclosing both.
    pub fn union(&self, other: &Sector) -> Sector {
        Sector {
            min_latitude: self.min_latitude.min(other.min_latitude),
            max_latitude: self.max_latitude.max(other.max_latitude),
            min_longitude: self.min_longitude.min(other.min_longitude),
            max_longitude: self.max_longitude.max(other.max_longitude),
        }
    }

    /// Centre of the sector.
    pub fn centroid(&self) -> LatLon {
        LatLon::new(
            self.min_latitude + self.delta_latitude() / 2.0,
            self.min_longitude + self.delta_longitude() / 2.0,
        )
    }

    /// Corners in the order min-min, min-max, max-max, max-min
    /// (latitude first, then longitude).
    pub fn corners(&self) -> [LatLon; 4] {
        [
            LatLon::new(self.min_latitude, self.min_longitude),
            LatLon::new(self.min_latitude, self.max_longitude),
            LatLon::new(self.max_latitude, self.max_longitude),
            LatLon::new(self.max_latitude, self.min_longitude),
        ]
    }

    /// Area in degrees².
    pub fn area(&self) -> f64 {
        self.delta_latitude() * self.delta_longitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_bounds() {
        let s = Sector::new(10.0, -10.0, 5.0, -5.0);
        assert_eq!(s.min_latitude, -10.0);
        assert_eq!(s.max_latitude, 10.0);
        assert_eq!(s.min_longitude, -5.0);
        assert_eq!(s.max_longitude, 5.0);
    }

    #[test]
    fn test_bounding_box_of_points() {
        let pts = [
            LatLon::new(1.0, 2.0),
            LatLon::new(-3.0, 7.0),
            LatLon::new(4.0, -1.0),
        ];
        let s = Sector::bounding(&pts).unwrap();
        assert_eq!(s, Sector::new(-3.0, 4.0, -1.0, 7.0));
        assert!(Sector::bounding(&[]).is_none());
    }

    #[test]
    fn test_contains_includes_boundary() {
        let s = Sector::new(0.0, 1.0, 0.0, 1.0);
        assert!(s.contains(LatLon::new(0.0, 0.0)));
        assert!(s.contains(LatLon::new(1.0, 1.0)));
        assert!(!s.contains(LatLon::new(1.000_001, 0.5)));
    }

    #[test]
    fn test_clamp_moves_outside_points_to_boundary() {
        let s = Sector::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(s.clamp(LatLon::new(2.0, -1.0)), LatLon::new(1.0, 0.0));
        let inside = LatLon::new(0.25, 0.75);
        assert_eq!(s.clamp(inside), inside);
    }

    #[test]
    fn test_degenerate() {
        assert!(Sector::new(0.0, 0.0, 0.0, 1.0).is_degenerate());
        assert!(Sector::new(0.0, 1.0, 3.0, 3.0).is_degenerate());
        assert!(Sector::new(0.0, f64::NAN, 0.0, 1.0).is_degenerate());
        assert!(!Sector::new(0.0, 1.0, 0.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_corners_order() {
        let s = Sector::new(0.0, 2.0, 10.0, 14.0);
        let c = s.corners();
        assert_eq!(c[0], LatLon::new(0.0, 10.0));
        assert_eq!(c[1], LatLon::new(0.0, 14.0));
        assert_eq!(c[2], LatLon::new(2.0, 14.0));
        assert_eq!(c[3], LatLon::new(2.0, 10.0));
    }

    #[test]
    fn test_union_and_centroid() {
        let a = Sector::new(0.0, 1.0, 0.0, 1.0);
        let b = Sector::new(2.0, 3.0, -1.0, 0.5);
        let u = a.union(&b);
        assert_eq!(u, Sector::new(0.0, 3.0, -1.0, 1.0));
        assert_eq!(u.centroid(), LatLon::new(1.5, 0.0));
        assert_eq!(u.area(), 6.0);
    }
}
