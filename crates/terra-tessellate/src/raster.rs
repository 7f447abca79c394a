//! Cell rasterization of a segment.
//!
//! A Bresenham-style sweep along the dominant axis. Per unit step it emits at
//! most the two minor-axis cells the line can occupy within that column (or
//! row), so the result is a superset of the cells the segment actually
//! crosses. Cells the segment only grazes are dropped later by clipping.

use glam::DVec2;

use crate::cell::CellId;

/// A point in grid space: its cell plus the offset from that cell's centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPoint {
    pub cell: CellId,
    pub offset: DVec2,
}

impl GridPoint {
    pub fn new(cell: CellId, offset: DVec2) -> Self {
        Self { cell, offset }
    }

    /// Fractional grid position, `cell + 0.5 + offset`.
    pub fn position(&self) -> DVec2 {
        DVec2::new(
            f64::from(self.cell.x) + 0.5 + self.offset.x,
            f64::from(self.cell.y) + 0.5 + self.offset.y,
        )
    }
}

/// Candidate cells from `from` to `to`, in travel order, both endpoints included.
pub fn rasterize_line(from: GridPoint, to: GridPoint) -> Vec<CellId> {
    let (x0, y0) = (i64::from(from.cell.x), i64::from(from.cell.y));
    let (x1, y1) = (i64::from(to.cell.x), i64::from(to.cell.y));

    if y0 == y1 {
        return run(x0, x1).map(|x| cell(x, y0)).collect();
    }
    if x0 == x1 {
        return run(y0, y1).map(|y| cell(x0, y)).collect();
    }

    let p0 = from.position();
    let p1 = to.position();
    let delta = p1 - p0;

    let mut cells = Vec::new();
    if delta.x.abs() >= delta.y.abs() {
        sweep(
            (p0.x, p0.y),
            (p1.x, p1.y),
            (x0, x1),
            (y0, y1),
            |major, minor| cells.push(cell(major, minor)),
        );
    } else {
        sweep(
            (p0.y, p0.x),
            (p1.y, p1.x),
            (y0, y1),
            (x0, x1),
            |major, minor| cells.push(cell(minor, major)),
        );
    }

    cells.dedup();
    if cells.first() != Some(&from.cell) {
        cells.insert(0, from.cell);
    }
    if cells.last() != Some(&to.cell) {
        cells.push(to.cell);
    }
    cells
}

/// Walks the major axis one cell at a time. Points are `(major, minor)`.
fn sweep(
    p0: (f64, f64),
    p1: (f64, f64),
    major: (i64, i64),
    minor: (i64, i64),
    mut emit: impl FnMut(i64, i64),
) {
    let span = p1.0 - p0.0;
    let minor_lo = minor.0.min(minor.1);
    let minor_hi = minor.0.max(minor.1);

    if span.abs() < f64::EPSILON {
        emit(major.0, minor.0);
        emit(major.1, minor.1);
        return;
    }

    let slope = (p1.1 - p0.1) / span;
    let minor_at = |u: f64| p0.1 + (u - p0.0) * slope;
    let (lo, hi) = (p0.0.min(p1.0), p0.0.max(p1.0));
    let forward = major.1 >= major.0;

    for m in run(major.0, major.1) {
        let near = m as f64;
        let far = near + 1.0;
        let (enter, exit) = if forward {
            (near.max(lo), far.min(hi))
        } else {
            (far.min(hi), near.max(lo))
        };
        let a = (minor_at(enter).floor() as i64).clamp(minor_lo, minor_hi);
        let b = (minor_at(exit).floor() as i64).clamp(minor_lo, minor_hi);
        for n in run(a, b) {
            emit(m, n);
        }
    }
}

/// Inclusive integer range in either direction.
fn run(a: i64, b: i64) -> impl Iterator<Item = i64> {
    let step = if b >= a { 1 } else { -1 };
    (0..=(b - a).abs()).map(move |i| a + i * step)
}

fn cell(x: i64, y: i64) -> CellId {
    CellId::new(x as u32, y as u32)
}
