//! Validated polygon rings.

use rustc_hash::FxHashSet;
use terra_geo::LatLon;

use crate::contour::ShapeId;
use crate::error::TessellationError;

/// Traversal direction of a ring in the `(longitude, latitude)` plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// A ring with the explicit closing vertex removed.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    vertices: Vec<LatLon>,
}

impl Ring {
    /// Accepts both explicitly closed (`first == last`) and open vertex lists.
    pub fn new(shape: ShapeId, vertices: &[LatLon]) -> Result<Self, TessellationError> {
        if let Some(position) = vertices
            .iter()
            .position(|v| !(v.latitude.is_finite() && v.longitude.is_finite()))
        {
            return Err(TessellationError::NonFiniteVertex { shape, position });
        }
        let mut vertices = vertices.to_vec();
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        let distinct = vertices.iter().collect::<FxHashSet<_>>().len();
        if distinct < 3 {
            return Err(TessellationError::DegenerateRing {
                shape,
                vertices: distinct,
            });
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[LatLon] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        signed_area(self.vertices.iter().copied())
    }

    /// Collinear rings count as counter-clockwise.
    pub fn winding(&self) -> Winding {
        if self.signed_area() >= 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, p: LatLon) -> bool {
        let mut inside = false;
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if (a.latitude > p.latitude) != (b.latitude > p.latitude) {
                let t = (p.latitude - a.latitude) / (b.latitude - a.latitude);
                let crossing = a.longitude + t * (b.longitude - a.longitude);
                if p.longitude < crossing {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Shoelace area of a closed polyline in the `(longitude, latitude)` plane.
pub(crate) fn signed_area(points: impl IntoIterator<Item = LatLon>) -> f64 {
    let points: Vec<LatLon> = points.into_iter().collect();
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.longitude * b.latitude - b.longitude * a.latitude
        })
        .sum();
    twice / 2.0
}
