//! Grid cells and their identifiers.

use std::fmt;

use terra_geo::{LatLon, Sector};

use crate::contour::{Contour, ShapeId};

/// Column/row address of a cell. `x` runs along longitude, `y` along latitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub x: u32,
    pub y: u32,
}

impl CellId {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Cells sharing an edge.
    pub fn is_edge_adjacent(self, other: CellId) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx + dy == 1
    }

    /// Cells sharing exactly one corner.
    pub fn is_corner_adjacent(self, other: CellId) -> bool {
        self.x.abs_diff(other.x) == 1 && self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One rectangle of the grid with the contours that fall inside it.
#[derive(Clone, Debug)]
pub struct Cell {
    id: CellId,
    bounds: Sector,
    contours: Vec<Contour>,
    filled: bool,
}

impl Cell {
    pub(crate) fn new(id: CellId, bounds: Sector) -> Self {
        Self {
            id,
            bounds,
            contours: Vec::new(),
            filled: false,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn bounds(&self) -> &Sector {
        &self.bounds
    }

    /// Corners in the order min-min, min-lat/max-lon, max-max, max-lat/min-lon.
    pub fn corners(&self) -> [LatLon; 4] {
        self.bounds.corners()
    }

    pub fn center(&self) -> LatLon {
        self.bounds.centroid()
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Returns `true` if some ring's interior covers the whole cell.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Returns `true` if a ring boundary passes through the cell.
    pub fn is_touched(&self) -> bool {
        self.contours.iter().any(|c| !c.is_synthetic())
    }

    pub fn contains(&self, p: LatLon) -> bool {
        self.bounds.contains(p)
    }

    /// `p` itself if inside the closed rectangle, otherwise the nearest point on it.
    pub fn nearest_inside(&self, p: LatLon) -> LatLon {
        self.bounds.clamp(p)
    }

    pub(crate) fn contours_mut(&mut self) -> &mut Vec<Contour> {
        &mut self.contours
    }

    pub(crate) fn contour_mut(&mut self, index: usize) -> &mut Contour {
        &mut self.contours[index]
    }

    /// Opens a fragment and returns its slot in this cell.
    pub(crate) fn open_contour(&mut self, shape: ShapeId, entered: bool, first: u32) -> usize {
        self.contours.push(Contour::new(shape, entered, first));
        self.contours.len() - 1
    }

    /// Adds the four corner indices as a synthetic contour and marks the cell filled.
    pub(crate) fn fill(&mut self, shape: ShapeId, corners: [u32; 4]) {
        self.contours.push(Contour::cell_square(shape, corners));
        self.filled = true;
    }

    /// Removes every contour of the given shapes.
    pub(crate) fn discard_shapes(&mut self, shapes: &std::ops::Range<u32>) {
        self.contours.retain(|c| !shapes.contains(&c.shape().0));
        self.filled = self.contours.iter().any(Contour::is_synthetic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cell() -> Cell {
        Cell::new(CellId::new(0, 0), Sector::new(0.0, 1.0, 0.0, 1.0))
    }

    #[test]
    fn test_adjacency() {
        let c = CellId::new(2, 2);
        assert!(c.is_edge_adjacent(CellId::new(3, 2)));
        assert!(c.is_edge_adjacent(CellId::new(2, 1)));
        assert!(!c.is_edge_adjacent(CellId::new(3, 3)));
        assert!(c.is_corner_adjacent(CellId::new(1, 3)));
        assert!(!c.is_corner_adjacent(CellId::new(4, 2)));
        assert!(!c.is_edge_adjacent(c));
    }

    #[test]
    fn test_nearest_inside_clamps() {
        let cell = unit_cell();
        let inside = LatLon::new(0.25, 0.75);
        assert_eq!(cell.nearest_inside(inside), inside);
        assert_eq!(
            cell.nearest_inside(LatLon::new(1.5, -0.5)),
            LatLon::new(1.0, 0.0)
        );
    }

    #[test]
    fn test_fill_marks_cell() {
        let mut cell = unit_cell();
        assert!(!cell.is_filled());
        cell.fill(ShapeId(0), [0, 1, 2, 3]);
        assert!(cell.is_filled());
        assert!(!cell.is_touched());
        assert_eq!(cell.contours().len(), 1);
    }

    #[test]
    fn test_discard_shapes_resets_fill() {
        let mut cell = unit_cell();
        cell.fill(ShapeId(1), [0, 1, 2, 3]);
        cell.open_contour(ShapeId(0), false, 7);
        cell.discard_shapes(&(1..2));
        assert!(!cell.is_filled());
        assert!(cell.is_touched());
        assert_eq!(cell.contours()[0].shape(), ShapeId(0));
    }

    #[test]
    fn test_cell_id_display() {
        assert_eq!(CellId::new(3, 4).to_string(), "(3, 4)");
    }
}
