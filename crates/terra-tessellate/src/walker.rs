//! Distributes a ring's boundary into per-cell contours.

use terra_geo::LatLon;
use tracing::{debug, warn};

use crate::cell::CellId;
use crate::clip::clip_segment;
use crate::contour::ShapeId;
use crate::grid::Grid;
use crate::raster::{GridPoint, rasterize_line};
use crate::report::AnomalyCounts;
use crate::ring::Ring;
use crate::vertex_store::VertexStore;

/// Candidate cells whose overlap with a segment is shorter than this (in
/// segment parameter) are treated as corner touches and skipped.
const MIN_OVERLAP: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
struct OpenContour {
    cell: CellId,
    slot: usize,
}

/// Walks one ring through the grid.
///
/// Every cell transition splits the boundary at an entry point snapped onto
/// the shared grid line, closing the fragment in the cell being left and
/// opening one in the cell being entered. Because entry points are computed
/// from the same grid lines on both sides, the two fragments share the exact
/// vertex index.
pub struct BoundaryWalker<'a> {
    grid: &'a mut Grid,
    store: &'a mut VertexStore,
    anomalies: &'a mut AnomalyCounts,
    shape: ShapeId,
    touched: Vec<CellId>,
    open: Option<OpenContour>,
    origin: Option<(LatLon, CellId)>,
    previous: Option<(LatLon, CellId)>,
}

impl<'a> BoundaryWalker<'a> {
    pub fn new(
        grid: &'a mut Grid,
        store: &'a mut VertexStore,
        anomalies: &'a mut AnomalyCounts,
        shape: ShapeId,
    ) -> Self {
        Self {
            grid,
            store,
            anomalies,
            shape,
            touched: Vec::new(),
            open: None,
            origin: None,
            previous: None,
        }
    }

    /// Walks every vertex plus the implicit return to the first one and
    /// returns the touched-cell sequence, one entry per visit. The return
    /// reuses the first vertex as settled, so it is clamped only once.
    pub fn walk(mut self, ring: &Ring) -> Vec<CellId> {
        let vertices = ring.vertices();
        debug!(shape = %self.shape, vertices = vertices.len(), "walking ring");
        for &vertex in vertices {
            self.visit(vertex);
        }
        if let Some((vertex, cell)) = self.origin {
            self.advance(vertex, cell);
        }
        self.touched
    }

    fn visit(&mut self, raw: LatLon) {
        let cell = self.grid.locate(raw);
        let vertex = self.settle(cell, raw);
        if self.origin.is_none() {
            self.origin = Some((vertex, cell));
        }
        self.advance(vertex, cell);
    }

    fn advance(&mut self, vertex: LatLon, cell: CellId) {
        let index = self.store.insert(vertex);

        match self.previous {
            None => {
                self.open_in(cell, false, index);
                self.touched.push(cell);
            }
            Some((_, previous_cell)) if previous_cell == cell => {
                self.append(index);
                self.touched.push(cell);
            }
            Some((previous_vertex, previous_cell)) => {
                self.cross(previous_vertex, previous_cell, vertex, cell, index);
            }
        }
        self.previous = Some((vertex, cell));
    }

    /// Clamps a vertex that lies outside its own cell.
    fn settle(&mut self, cell: CellId, raw: LatLon) -> LatLon {
        let bounds = self.grid.cell(cell).bounds();
        if bounds.contains(raw) {
            return raw;
        }
        let clamped = bounds.clamp(raw);
        warn!(
            "{}: vertex {} lies outside cell {}, clamped to {}",
            self.shape, raw, cell, clamped
        );
        self.anomalies.clamped_vertices += 1;
        clamped
    }

    /// Handles a segment ending in a different cell than it started in.
    fn cross(&mut self, from: LatLon, from_cell: CellId, to: LatLon, to_cell: CellId, to_index: u32) {
        let grid = &*self.grid;
        let start = GridPoint::new(from_cell, grid.cell_offset(from_cell, from));
        let end = GridPoint::new(to_cell, grid.cell_offset(to_cell, to));

        let mut crossings: Vec<(f64, CellId, LatLon)> = rasterize_line(start, end)
            .into_iter()
            .filter(|&c| c != from_cell && c != to_cell)
            .filter_map(|c| {
                let clip = clip_segment(grid.cell(c).bounds(), from, to)?;
                (clip.length() > MIN_OVERLAP).then_some((clip.t_enter, c, clip.entry))
            })
            .collect();
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut current = from_cell;
        for (_, cell, entry) in crossings {
            self.check_adjacent(current, cell);
            let index = self.store.insert(entry);
            self.close_open(index);
            self.open_in(cell, true, index);
            self.touched.push(cell);
            current = cell;
        }
        self.check_adjacent(current, to_cell);

        match clip_segment(self.grid.cell(to_cell).bounds(), from, to) {
            Some(clip) => {
                let index = self.store.insert(clip.entry);
                self.close_open(index);
                self.open_in(to_cell, true, index);
                self.append(to_index);
            }
            None => {
                warn!(
                    "{}: did not find an edge point entering cell {} from {}",
                    self.shape, to_cell, current
                );
                self.anomalies.missing_edge_points += 1;
                self.close_open(to_index);
                self.open_in(to_cell, true, to_index);
            }
        }
        self.touched.push(to_cell);
    }

    fn check_adjacent(&mut self, from: CellId, to: CellId) {
        if from.is_edge_adjacent(to) {
            return;
        }
        if from.is_corner_adjacent(to) {
            debug!(shape = %self.shape, %from, %to, "boundary passes through a shared corner");
            return;
        }
        warn!(
            "{}: boundary jumps from cell {} to non-adjacent cell {}",
            self.shape, from, to
        );
        self.anomalies.non_adjacent_crossings += 1;
    }

    fn open_in(&mut self, cell: CellId, entered: bool, first: u32) {
        let slot = self.grid.cell_mut(cell).open_contour(self.shape, entered, first);
        self.open = Some(OpenContour { cell, slot });
    }

    fn append(&mut self, index: u32) {
        if let Some(open) = self.open {
            self.grid.cell_mut(open.cell).contour_mut(open.slot).push(index);
        }
    }

    fn close_open(&mut self, index: u32) {
        if let Some(open) = self.open.take() {
            let contour = self.grid.cell_mut(open.cell).contour_mut(open.slot);
            contour.push(index);
            contour.mark_exited();
        }
    }
}
