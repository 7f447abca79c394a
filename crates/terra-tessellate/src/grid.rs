//! Regular N×N partition of a bounding sector.

use std::ops::Range;

use glam::DVec2;
use terra_geo::{LatLon, Sector};

use crate::cell::{Cell, CellId};
use crate::error::TessellationError;

/// The grid of cells over a sector.
///
/// Grid lines are computed once, so every cell edge and every entry point
/// snapped onto a line uses the identical `f64` value. The last line of each
/// axis is exactly the sector maximum.
#[derive(Clone, Debug)]
pub struct Grid {
    sector: Sector,
    subdivisions: u32,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    cells: Vec<Cell>,
}

impl Grid {
    /// Lays an `subdivisions × subdivisions` grid over `sector`.
    pub fn new(sector: Sector, subdivisions: u32) -> Result<Self, TessellationError> {
        if subdivisions == 0 {
            return Err(TessellationError::InvalidSubdivisions(subdivisions));
        }
        if sector.is_degenerate() {
            return Err(TessellationError::DegenerateSector(sector));
        }

        let latitudes = grid_lines(sector.min_latitude, sector.max_latitude, subdivisions);
        let longitudes = grid_lines(sector.min_longitude, sector.max_longitude, subdivisions);

        let n = subdivisions as usize;
        let mut cells = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                let bounds = Sector {
                    min_latitude: latitudes[y],
                    max_latitude: latitudes[y + 1],
                    min_longitude: longitudes[x],
                    max_longitude: longitudes[x + 1],
                };
                cells.push(Cell::new(CellId::new(x as u32, y as u32), bounds));
            }
        }

        Ok(Self {
            sector,
            subdivisions,
            latitudes,
            longitudes,
            cells,
        })
    }

    pub fn sector(&self) -> &Sector {
        &self.sector
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    /// The `N + 1` latitude lines, ascending.
    pub fn latitude_lines(&self) -> &[f64] {
        &self.latitudes
    }

    /// The `N + 1` longitude lines, ascending.
    pub fn longitude_lines(&self) -> &[f64] {
        &self.longitudes
    }

    /// Cells in row-major order (`index = y * N + x`).
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[self.index_of(id)]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        let index = self.index_of(id);
        &mut self.cells[index]
    }

    pub fn index_of(&self, id: CellId) -> usize {
        id.y as usize * self.subdivisions as usize + id.x as usize
    }

    /// Fractional position in cell units: `(0, 0)` is the min-min corner of
    /// the sector, `(N, N)` the max-max corner.
    pub fn grid_position(&self, p: LatLon) -> DVec2 {
        let n = self.subdivisions as f64;
        DVec2::new(
            (p.longitude - self.sector.min_longitude) / self.sector.delta_longitude() * n,
            (p.latitude - self.sector.min_latitude) / self.sector.delta_latitude() * n,
        )
    }

    /// The cell containing `p`, clamped to the grid. Points on an interior
    /// grid line belong to the cell above/right of it.
    pub fn locate(&self, p: LatLon) -> CellId {
        let position = self.grid_position(p);
        let max = i64::from(self.subdivisions) - 1;
        let x = (position.x.floor() as i64).clamp(0, max);
        let y = (position.y.floor() as i64).clamp(0, max);
        CellId::new(x as u32, y as u32)
    }

    /// Offset of `p` from the centre of `cell`, in cell units. Inside the cell
    /// both components lie in `[-0.5, 0.5]`.
    pub fn cell_offset(&self, cell: CellId, p: LatLon) -> DVec2 {
        let position = self.grid_position(p);
        DVec2::new(
            position.x - f64::from(cell.x) - 0.5,
            position.y - f64::from(cell.y) - 0.5,
        )
    }

    /// Cells holding a boundary contour.
    pub fn touched_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_touched())
    }

    /// Cells covered entirely by some ring.
    pub fn filled_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_filled())
    }

    /// Drops all contours belonging to the given shape range.
    pub(crate) fn discard_shapes(&mut self, shapes: Range<u32>) {
        for cell in &mut self.cells {
            cell.discard_shapes(&shapes);
        }
    }
}

fn grid_lines(min: f64, max: f64, subdivisions: u32) -> Vec<f64> {
    let n = f64::from(subdivisions);
    let delta = max - min;
    (0..=subdivisions)
        .map(|i| {
            if i == subdivisions {
                max
            } else {
                min + delta * f64::from(i) / n
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: u32) -> Grid {
        Grid::new(Sector::new(0.0, 4.0, 0.0, 4.0), n).unwrap()
    }

    #[test]
    fn test_rejects_zero_subdivisions() {
        let err = Grid::new(Sector::new(0.0, 1.0, 0.0, 1.0), 0).unwrap_err();
        assert_eq!(err, TessellationError::InvalidSubdivisions(0));
    }

    #[test]
    fn test_rejects_degenerate_sector() {
        let sector = Sector::new(0.0, 0.0, 0.0, 1.0);
        assert!(matches!(
            Grid::new(sector, 4),
            Err(TessellationError::DegenerateSector(_))
        ));
    }

    #[test]
    fn test_grid_lines_end_exactly_at_max() {
        let grid = Grid::new(Sector::new(-33.9, -33.7, 151.1, 151.3), 7).unwrap();
        assert_eq!(grid.latitude_lines().len(), 8);
        assert_eq!(grid.latitude_lines()[0], -33.9);
        assert_eq!(*grid.latitude_lines().last().unwrap(), -33.7);
        assert_eq!(*grid.longitude_lines().last().unwrap(), 151.3);
        assert!(grid.longitude_lines().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_cells_are_row_major() {
        let grid = grid(4);
        assert_eq!(grid.cells().len(), 16);
        let id = CellId::new(3, 1);
        assert_eq!(grid.index_of(id), 7);
        assert_eq!(grid.cell(id).id(), id);
        assert_eq!(grid.cell(id).bounds().min_longitude, 3.0);
        assert_eq!(grid.cell(id).bounds().min_latitude, 1.0);
    }

    #[test]
    fn test_neighbouring_cells_share_edges_exactly() {
        let grid = Grid::new(Sector::new(0.1, 0.7, 0.3, 1.1), 9).unwrap();
        for y in 0..9 {
            for x in 0..8 {
                let left = grid.cell(CellId::new(x, y)).bounds();
                let right = grid.cell(CellId::new(x + 1, y)).bounds();
                assert_eq!(left.max_longitude, right.min_longitude);
            }
        }
    }

    #[test]
    fn test_locate_clamps_to_grid() {
        let grid = grid(4);
        assert_eq!(grid.locate(LatLon::new(0.5, 0.5)), CellId::new(0, 0));
        assert_eq!(grid.locate(LatLon::new(4.0, 4.0)), CellId::new(3, 3));
        assert_eq!(grid.locate(LatLon::new(-1.0, 9.0)), CellId::new(3, 0));
        // Interior grid lines belong to the cell above/right.
        assert_eq!(grid.locate(LatLon::new(2.0, 1.0)), CellId::new(1, 2));
    }

    #[test]
    fn test_cell_offset_range() {
        let grid = grid(4);
        let p = LatLon::new(1.5, 2.25);
        let offset = grid.cell_offset(grid.locate(p), p);
        assert!((offset.x - -0.25).abs() < 1e-12);
        assert!(offset.y.abs() < 1e-12);

        let corner = LatLon::new(4.0, 4.0);
        let offset = grid.cell_offset(grid.locate(corner), corner);
        assert_eq!(offset, DVec2::new(0.5, 0.5));
    }
}
