//! Top-level driver: records in, one mesh out.

use std::collections::BTreeMap;

use terra_geo::Sector;
use terra_mesh::GeoMesh;
use tracing::{debug, info, warn};

use crate::assemble::MeshAssembler;
use crate::closure::close_touched;
use crate::contour::{Contour, ShapeId};
use crate::error::TessellationError;
use crate::grid::Grid;
use crate::interior::fill_interior;
use crate::record::{PolygonRecord, bounding_sector};
use crate::report::{AnomalyCounts, RecordFailure, TessellationReport};
use crate::ring::Ring;
use crate::stitch::stitch_contours;
use crate::triangulate::CellTessellator;
use crate::vertex_store::VertexStore;
use crate::walker::BoundaryWalker;

/// Grid parameters for tessellating datasets.
///
/// Holds no state between runs; every call to [`GridTessellator::tessellate`]
/// builds a fresh grid and vertex store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTessellator {
    sector: Sector,
    subdivisions: u32,
}

/// Result of one run.
#[derive(Clone, Debug)]
pub struct Tessellation {
    pub mesh: GeoMesh,
    pub report: TessellationReport,
    grid: Grid,
    store: VertexStore,
}

impl Tessellation {
    /// The grid with every cell's final contours.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The vertex store backing the mesh positions.
    pub fn store(&self) -> &VertexStore {
        &self.store
    }
}

impl GridTessellator {
    pub fn new(sector: Sector, subdivisions: u32) -> Result<Self, TessellationError> {
        if subdivisions == 0 {
            return Err(TessellationError::InvalidSubdivisions(subdivisions));
        }
        if sector.is_degenerate() {
            return Err(TessellationError::DegenerateSector(sector));
        }
        Ok(Self {
            sector,
            subdivisions,
        })
    }

    /// Uses the bounding box of all record vertices as the sector.
    pub fn for_records(
        records: &[PolygonRecord],
        subdivisions: u32,
    ) -> Result<Self, TessellationError> {
        let sector = bounding_sector(records).ok_or(TessellationError::NoVertices)?;
        Self::new(sector, subdivisions)
    }

    pub fn sector(&self) -> &Sector {
        &self.sector
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    /// Tessellates all records against one shared grid and vertex store.
    ///
    /// A record whose ring is degenerate or does not close is dropped and
    /// listed in the report; the others are unaffected.
    pub fn tessellate(&self, records: &[PolygonRecord]) -> Result<Tessellation, TessellationError> {
        info!(
            records = records.len(),
            subdivisions = self.subdivisions,
            "tessellating dataset"
        );
        let mut grid = Grid::new(self.sector, self.subdivisions)?;
        let mut store = VertexStore::new();
        let mut report = TessellationReport::default();
        let mut shape_records: Vec<usize> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let first_shape = shape_records.len() as u32;
            let walked = walk_record(
                &mut grid,
                &mut store,
                &mut report.anomalies,
                &mut shape_records,
                index,
                record,
            );
            match walked {
                Ok(rings) => report.rings += rings,
                Err(error) => {
                    warn!("record {} dropped: {}", index, error);
                    grid.discard_shapes(first_shape..shape_records.len() as u32);
                    report.failed_records.push(RecordFailure {
                        record: index,
                        error,
                    });
                }
            }
        }

        let mut assembler = MeshAssembler::new(records.len());
        let mut tessellator = CellTessellator::new();
        for cell in grid.cells() {
            for (record, contours) in group_by_record(cell.contours(), &shape_records) {
                match tessellator.tessellate(cell, contours, &mut store) {
                    Ok(triangles) => assembler.push(record, triangles),
                    Err(error) => {
                        warn!("record {}: {}", record, error);
                        report.anomalies.triangulation_failures += 1;
                    }
                }
            }
        }

        report.touched_cells = grid.touched_cells().count();
        report.filled_cells = grid.filled_cells().count();
        report.triangles = assembler.triangle_count();
        let mesh = assembler.finish(&store);

        info!(
            rings = report.rings,
            failed = report.failed_records.len(),
            vertices = store.len(),
            triangles = report.triangles,
            anomalies = report.anomalies.total(),
            "tessellation complete"
        );
        Ok(Tessellation {
            mesh,
            report,
            grid,
            store,
        })
    }
}

/// Walks, stitches, fills and closes every ring of one record.
fn walk_record(
    grid: &mut Grid,
    store: &mut VertexStore,
    anomalies: &mut AnomalyCounts,
    shape_records: &mut Vec<usize>,
    record_index: usize,
    record: &PolygonRecord,
) -> Result<usize, TessellationError> {
    for part in &record.parts {
        let shape = ShapeId(shape_records.len() as u32);
        shape_records.push(record_index);

        let ring = Ring::new(shape, part)?;
        let touched = BoundaryWalker::new(grid, store, anomalies, shape).walk(&ring);
        let stitched = stitch_contours(grid, shape, &touched, anomalies);
        let filled = fill_interior(grid, store, shape, &touched)?;
        let loops = close_touched(grid, shape, &ring, &touched, store);
        debug!(
            record = record_index,
            %shape,
            touched = touched.len(),
            stitched,
            filled = filled.len(),
            loops,
            "ring done"
        );
    }
    Ok(record.parts.len())
}

/// Closed contours of a cell grouped by record. Synthetic squares of the same
/// record cancel in pairs, as they would under the even-odd rule.
fn group_by_record<'c>(
    contours: &'c [Contour],
    shape_records: &[usize],
) -> BTreeMap<usize, Vec<&'c Contour>> {
    let mut groups: BTreeMap<usize, Vec<&Contour>> = BTreeMap::new();
    let mut squares: BTreeMap<usize, Vec<&Contour>> = BTreeMap::new();
    for contour in contours.iter().filter(|c| c.is_closed() && !c.is_empty()) {
        let Some(&record) = shape_records.get(contour.shape().0 as usize) else {
            continue;
        };
        if contour.is_synthetic() {
            squares.entry(record).or_default().push(contour);
        } else {
            groups.entry(record).or_default().push(contour);
        }
    }
    for (record, squares) in squares {
        if squares.len() % 2 == 1 {
            groups.entry(record).or_default().push(squares[0]);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, CellId};
    use std::collections::BTreeSet;
    use terra_geo::LatLon;

    fn ring(pts: &[(f64, f64)]) -> Vec<LatLon> {
        pts.iter().map(|&p| LatLon::from(p)).collect()
    }

    fn mesh_area(mesh: &GeoMesh) -> f64 {
        mesh.planar_area()
    }

    fn tessellate(sector: Sector, n: u32, records: &[PolygonRecord]) -> Tessellation {
        GridTessellator::new(sector, n)
            .unwrap()
            .tessellate(records)
            .unwrap()
    }

    #[test]
    fn test_rejects_invalid_setup() {
        let sector = Sector::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(
            GridTessellator::new(sector, 0),
            Err(TessellationError::InvalidSubdivisions(0))
        );
        assert_eq!(
            GridTessellator::for_records(&[], 4),
            Err(TessellationError::NoVertices)
        );
    }

    #[test]
    fn test_full_sector_square() {
        let sector = Sector::new(0.0, 4.0, 0.0, 4.0);
        let square = ring(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        let result = tessellate(sector, 4, &[PolygonRecord::ring(square)]);

        let cells = result.grid().cells();
        assert!(cells.iter().all(|c| c.is_touched() || c.is_filled()));
        assert_eq!(result.report.touched_cells, 12);
        assert_eq!(result.report.filled_cells, 4);
        assert_eq!(result.mesh.triangle_count(), 32);
        assert!((mesh_area(&result.mesh) - 16.0).abs() < 1e-9);
        assert!(result.report.is_clean());
    }

    #[test]
    fn test_ring_inside_one_cell() {
        let sector = Sector::new(0.0, 4.0, 0.0, 4.0);
        let small = ring(&[(2.2, 1.2), (2.2, 1.8), (2.8, 1.5)]);
        let result = tessellate(sector, 4, &[PolygonRecord::ring(small)]);

        let touched: Vec<CellId> = result.grid().touched_cells().map(|c| c.id()).collect();
        assert_eq!(touched, vec![CellId::new(1, 2)]);
        assert_eq!(result.grid().cell(CellId::new(1, 2)).contours().len(), 1);
        assert_eq!(result.report.filled_cells, 0);
        assert_eq!(result.mesh.triangle_count(), 1);
        assert!((mesh_area(&result.mesh) - 0.18).abs() < 1e-9);
    }

    #[test]
    fn test_diamond_area() {
        let sector = Sector::new(0.0, 10.0, 0.0, 10.0);
        let diamond = ring(&[(1.0, 5.0), (5.0, 9.0), (9.0, 5.0), (5.0, 1.0)]);
        let result = tessellate(sector, 5, &[PolygonRecord::ring(diamond)]);
        assert!((mesh_area(&result.mesh) - 32.0).abs() < 1e-6);
        assert_eq!(result.report.failed_records, vec![]);
    }

    #[test]
    fn test_concave_ring_with_hole() {
        let sector = Sector::new(0.0, 8.0, 0.0, 8.0);
        // An L shape: 8x8 minus the 4x4 upper-right quadrant = 48.
        let outer = ring(&[
            (0.0, 0.0),
            (0.0, 8.0),
            (4.0, 8.0),
            (4.0, 4.0),
            (8.0, 4.0),
            (8.0, 0.0),
        ]);
        // A 1.5 x 1.5 hole straddling cell edges, wound clockwise.
        let hole = ring(&[(1.25, 1.25), (2.75, 1.25), (2.75, 2.75), (1.25, 2.75)]);
        let record = PolygonRecord::new(vec![outer, hole]);
        let result = tessellate(sector, 7, &[record]);
        assert!((mesh_area(&result.mesh) - (48.0 - 2.25)).abs() < 1e-6);
    }

    #[test]
    fn test_irregular_ring_area_matches_polygon_area() {
        let pts = ring(&[
            (0.3, 0.2),
            (0.9, 2.7),
            (2.1, 3.9),
            (3.6, 3.1),
            (2.4, 2.2),
            (3.8, 0.6),
            (1.7, 1.1),
        ]);
        let expected = Ring::new(ShapeId(0), &pts).unwrap().signed_area().abs();
        let sector = Sector::new(0.0, 4.0, 0.0, 4.0);
        for n in [1, 3, 4, 9] {
            let result = tessellate(sector, n, &[PolygonRecord::ring(pts.clone())]);
            assert!(
                (mesh_area(&result.mesh) - expected).abs() < 1e-6,
                "n = {n}: {} vs {expected}",
                mesh_area(&result.mesh)
            );
        }
    }

    #[test]
    fn test_shared_boundary_vertices_are_exact() {
        // Grid lines at fractions that have no exact f32 representation.
        let sector = Sector::new(0.1, 0.7, 0.3, 1.1);
        let tri = ring(&[(0.13, 0.33), (0.61, 0.47), (0.42, 1.07)]);
        let result = tessellate(sector, 3, &[PolygonRecord::ring(tri.clone())]);
        let grid = result.grid();
        let store = result.store();

        // Indices strictly inside the shared edge, collected from one cell's contours.
        let on_edge = |cell: &Cell, vertical: bool, line: f64, lo: f64, hi: f64| {
            cell.contours()
                .iter()
                .flat_map(|c| c.vertices().iter().copied())
                .filter(|&i| {
                    let p = store[i];
                    let (across, along) = if vertical {
                        (p.longitude, p.latitude)
                    } else {
                        (p.latitude, p.longitude)
                    };
                    across == line && along > lo && along < hi
                })
                .collect::<BTreeSet<u32>>()
        };

        let mut shared = 0;
        for y in 0..3 {
            for x in 0..3 {
                let a = grid.cell(CellId::new(x, y));
                let bounds = *a.bounds();
                if x < 2 {
                    let b = grid.cell(CellId::new(x + 1, y));
                    let (line, lo, hi) =
                        (bounds.max_longitude, bounds.min_latitude, bounds.max_latitude);
                    let left = on_edge(a, true, line, lo, hi);
                    assert_eq!(left, on_edge(b, true, line, lo, hi));
                    shared += left.len();
                }
                if y < 2 {
                    let b = grid.cell(CellId::new(x, y + 1));
                    let (line, lo, hi) =
                        (bounds.max_latitude, bounds.min_longitude, bounds.max_longitude);
                    let below = on_edge(a, false, line, lo, hi);
                    assert_eq!(below, on_edge(b, false, line, lo, hi));
                    shared += below.len();
                }
            }
        }
        assert!(shared > 0);

        // The mesh references exactly the contour vertices, nothing re-derived.
        let contour_indices: BTreeSet<u32> = grid
            .cells()
            .iter()
            .flat_map(|c| c.contours())
            .flat_map(|c| c.vertices().iter().copied())
            .collect();
        let mesh_indices: BTreeSet<u32> = result.mesh.indices.iter().copied().collect();
        assert!(mesh_indices.is_subset(&contour_indices));
        assert_eq!(store.len(), contour_indices.len());

        let expected = Ring::new(ShapeId(0), &tri).unwrap().signed_area().abs();
        assert!((mesh_area(&result.mesh) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fine_geographic_grid_keeps_area() {
        let sector = Sector::new(-33.9, -33.7, 151.1, 151.3);
        let tri = ring(&[(-33.88, 151.12), (-33.71, 151.2), (-33.8, 151.29)]);
        let result = tessellate(sector, 7, &[PolygonRecord::ring(tri.clone())]);

        assert!(result.report.is_clean());
        let expected = Ring::new(ShapeId(0), &tri).unwrap().signed_area().abs();
        assert!((mesh_area(&result.mesh) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_vertex_fails_only_its_record() {
        let sector = Sector::new(0.0, 4.0, 0.0, 4.0);
        let records = vec![
            PolygonRecord::ring(ring(&[(0.5, 0.5), (f64::NAN, 3.5), (3.5, 1.0)])),
            PolygonRecord::ring(ring(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)])),
        ];
        let result = tessellate(sector, 4, &records);

        assert_eq!(result.report.failed_records.len(), 1);
        assert_eq!(result.report.failed_records[0].record, 0);
        assert!(matches!(
            result.report.failed_records[0].error,
            TessellationError::NonFiniteVertex { position: 1, .. }
        ));
        assert_eq!(result.mesh.record_indices(0), Some(&[][..]));
        assert!((mesh_area(&result.mesh) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let sector = Sector::new(-10.0, 10.0, 100.0, 120.0);
        let records = vec![
            PolygonRecord::ring(ring(&[(-8.0, 101.0), (7.5, 104.0), (3.0, 119.0)])),
            PolygonRecord::ring(ring(&[(0.0, 110.0), (5.0, 112.0), (-5.0, 115.0)])),
        ];
        let a = tessellate(sector, 6, &records);
        let b = tessellate(sector, 6, &records);
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_failed_record_is_isolated() {
        let sector = Sector::new(0.0, 4.0, 0.0, 4.0);
        let good = PolygonRecord::ring(ring(&[(0.5, 0.5), (0.5, 3.5), (3.5, 2.0)]));
        let degenerate = PolygonRecord::ring(ring(&[(1.0, 1.0), (2.0, 2.0), (1.0, 1.0)]));

        let alone = tessellate(sector, 4, std::slice::from_ref(&good));
        let mixed = tessellate(sector, 4, &[degenerate, good]);

        assert_eq!(mixed.report.failed_records.len(), 1);
        assert_eq!(mixed.report.failed_records[0].record, 0);
        assert!(matches!(
            mixed.report.failed_records[0].error,
            TessellationError::DegenerateRing { .. }
        ));
        assert_eq!(mixed.mesh.record_indices(0), Some(&[][..]));
        assert_eq!(
            mixed.mesh.record_indices(1).map(<[u32]>::len),
            alone.mesh.record_indices(0).map(<[u32]>::len)
        );
        assert!((mesh_area(&mixed.mesh) - mesh_area(&alone.mesh)).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_records_each_get_triangles() {
        let sector = Sector::new(0.0, 2.0, 0.0, 2.0);
        let square = ring(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let records = vec![
            PolygonRecord::ring(square.clone()),
            PolygonRecord::ring(square),
        ];
        let result = tessellate(sector, 2, &records);
        assert_eq!(result.mesh.record_indices(0).map(<[u32]>::len), Some(24));
        assert_eq!(result.mesh.record_indices(1).map(<[u32]>::len), Some(24));
        assert!((mesh_area(&result.mesh) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_larger_than_sector_is_clamped() {
        let sector = Sector::new(0.0, 3.0, 0.0, 3.0);
        let big = ring(&[(-1.0, -1.0), (-1.0, 4.0), (4.0, 4.0), (4.0, -1.0)]);
        let result = tessellate(sector, 3, &[PolygonRecord::ring(big)]);
        assert_eq!(result.report.anomalies.clamped_vertices, 4);
        assert!(result.grid().cells().iter().all(|c| c.is_touched() || c.is_filled()));
        assert!(result.grid().cell(CellId::new(1, 1)).is_filled());
        assert!((mesh_area(&result.mesh) - 9.0).abs() < 1e-9);
    }
}
