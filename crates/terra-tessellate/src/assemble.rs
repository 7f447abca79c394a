//! Concatenates per-record triangles into one indexed mesh.

use terra_mesh::GeoMesh;

use crate::vertex_store::VertexStore;

/// Elevation given to every output vertex.
pub const SURFACE_ELEVATION: f64 = 0.0;

/// Collects triangles per record, then builds the final [`GeoMesh`].
#[derive(Clone, Debug, Default)]
pub struct MeshAssembler {
    records: Vec<Vec<[u32; 3]>>,
}

impl MeshAssembler {
    pub fn new(record_count: usize) -> Self {
        Self {
            records: vec![Vec::new(); record_count],
        }
    }

    /// Appends triangles to `record`, growing the record list if needed.
    pub fn push(&mut self, record: usize, triangles: impl IntoIterator<Item = [u32; 3]>) {
        if record >= self.records.len() {
            self.records.resize_with(record + 1, Vec::new);
        }
        self.records[record].extend(triangles);
    }

    pub fn triangle_count(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }

    /// One index range per record, in record order, over the store's positions.
    pub fn finish(self, store: &VertexStore) -> GeoMesh {
        let mut mesh = GeoMesh::with_positions(store.to_render_positions(SURFACE_ELEVATION));
        for triangles in &self.records {
            mesh.push_record(triangles);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_geo::LatLon;

    #[test]
    fn test_records_keep_their_order() {
        let mut store = VertexStore::new();
        for p in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)] {
            store.insert(LatLon::from(p));
        }
        let mut assembler = MeshAssembler::new(3);
        assembler.push(2, [[0, 2, 3]]);
        assembler.push(0, [[0, 1, 2]]);
        assert_eq!(assembler.triangle_count(), 2);

        let mesh = assembler.finish(&store);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.record_indices(0), Some(&[0, 1, 2][..]));
        assert_eq!(mesh.record_indices(1), Some(&[][..]));
        assert_eq!(mesh.record_indices(2), Some(&[0, 2, 3][..]));
    }

    #[test]
    fn test_positions_are_lon_lat_zero() {
        let mut store = VertexStore::new();
        store.insert(LatLon::new(-33.8, 151.2));
        let mesh = MeshAssembler::new(0).finish(&store);
        assert_eq!(mesh.positions[0].x, 151.2);
        assert_eq!(mesh.positions[0].y, -33.8);
        assert_eq!(mesh.positions[0].z, SURFACE_ELEVATION);
    }

    #[test]
    fn test_push_grows_record_list() {
        let mut assembler = MeshAssembler::default();
        assembler.push(1, [[0, 1, 2]]);
        let mesh = assembler.finish(&VertexStore::new());
        assert_eq!(mesh.record_ranges.len(), 2);
    }
}
