//! Input polygons.

use serde::{Deserialize, Serialize};
use terra_geo::{LatLon, Sector};

/// One polygon: an outer ring followed by any number of hole rings.
///
/// Rings may repeat their first vertex at the end or leave the closure implicit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    pub parts: Vec<Vec<LatLon>>,
}

impl PolygonRecord {
    pub fn new(parts: Vec<Vec<LatLon>>) -> Self {
        Self { parts }
    }

    /// A record with a single ring.
    pub fn ring(vertices: Vec<LatLon>) -> Self {
        Self {
            parts: vec![vertices],
        }
    }

    pub fn vertices(&self) -> impl Iterator<Item = &LatLon> {
        self.parts.iter().flatten()
    }
}

/// Bounding sector of every vertex of every record.
pub fn bounding_sector(records: &[PolygonRecord]) -> Option<Sector> {
    Sector::bounding(records.iter().flat_map(PolygonRecord::vertices))
}
