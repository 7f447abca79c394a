//! Mesh data structure holding render-space positions and triangle indices.

use std::ops::Range;

use glam::DVec3;

/// The mesh output of one tessellation run.
///
/// All triangles share one position array. Indices form one global triangle
/// list; each input record owns a contiguous range of it, so a renderer can
/// draw records separately or the whole list at once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoMesh {
    /// Vertex positions as `(longitude, latitude, elevation)`.
    pub positions: Vec<DVec3>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    /// One index range per record, in record order.
    pub record_ranges: Vec<Range<usize>>,
}

impl GeoMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh over the given positions with no triangles yet.
    pub fn with_positions(positions: Vec<DVec3>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    /// Appends one record's triangles as a new index range.
    pub fn push_record(&mut self, triangles: &[[u32; 3]]) {
        let start = self.indices.len();
        self.indices.extend(triangles.iter().flatten());
        self.record_ranges.push(start..self.indices.len());
    }

    /// The index buffer of one record, or `None` if the record does not exist.
    pub fn record_indices(&self, record: usize) -> Option<&[u32]> {
        self.record_ranges
            .get(record)
            .map(|range| &self.indices[range.clone()])
    }

    /// Iterates over every record's index buffer in record order.
    pub fn index_buffers(&self) -> impl Iterator<Item = &[u32]> {
        self.record_ranges
            .iter()
            .map(|range| &self.indices[range.clone()])
    }

    /// Iterates over triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }

    /// Sum of the planar (x/y) areas of all triangles, in degrees².
    pub fn planar_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let ab = b - a;
                let ac = c - a;
                (ab.x * ac.y - ab.y * ac.x).abs() / 2.0
            })
            .sum()
    }

    /// Returns the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the mesh contains no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
