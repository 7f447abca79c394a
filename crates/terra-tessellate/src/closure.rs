//! Closes boundary fragments along the cell perimeter.
//!
//! A fragment that enters and exits a cell cuts it in two. Which side is
//! covered follows from the ring's winding: a counter-clockwise ring has its
//! interior on the left, so from a fragment's exit the covered region
//! continues counter-clockwise around the cell edge until the next fragment's
//! entry (clockwise for clockwise rings). Corners passed on the way are added
//! as vertices.

use rustc_hash::FxHashSet;
use terra_geo::{LatLon, Sector};
use tracing::trace;

use crate::cell::{Cell, CellId};
use crate::contour::{Contour, ShapeId};
use crate::grid::Grid;
use crate::ring::{Ring, Winding, signed_area};
use crate::vertex_store::VertexStore;

/// Length of the normalized cell perimeter, one unit per side.
const PERIMETER: f64 = 4.0;

/// Closes the fragments of `shape` in every touched cell. Returns the number
/// of loops produced.
pub fn close_touched(
    grid: &mut Grid,
    shape: ShapeId,
    ring: &Ring,
    touched: &[CellId],
    store: &mut VertexStore,
) -> usize {
    let mut seen = FxHashSet::default();
    touched
        .iter()
        .filter(|&&id| seen.insert(id))
        .map(|&id| close_fragments(grid.cell_mut(id), shape, ring, store))
        .sum()
}

/// Replaces the entered-and-exited fragments of `shape` in `cell` with closed loops.
pub fn close_fragments(
    cell: &mut Cell,
    shape: ShapeId,
    ring: &Ring,
    store: &mut VertexStore,
) -> usize {
    let bounds = *cell.bounds();
    let center = cell.center();
    let (fragments, others): (Vec<Contour>, Vec<Contour>) = std::mem::take(cell.contours_mut())
        .into_iter()
        .partition(|c| c.shape() == shape && c.is_boundary_fragment());
    *cell.contours_mut() = others;
    if fragments.is_empty() {
        return 0;
    }

    let winding = ring.winding();
    let ends: Vec<(f64, f64)> = fragments
        .iter()
        .map(|f| {
            let position = |index: Option<u32>| {
                index.map_or(0.0, |i| perimeter_position(&bounds, store[i]))
            };
            (position(f.first()), position(f.last()))
        })
        .collect();
    let corners = bounds.corners();

    let mut used = vec![false; fragments.len()];
    let mut loops = 0;
    for start in 0..fragments.len() {
        if used[start] {
            continue;
        }
        let mut vertices = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            vertices.extend_from_slice(fragments[current].vertices());

            let exit = ends[current].1;
            let next = (0..fragments.len())
                .filter(|&j| !used[j] || j == start)
                .min_by(|&a, &b| {
                    travel(exit, ends[a].0, winding).total_cmp(&travel(exit, ends[b].0, winding))
                })
                .unwrap_or(start);

            let mut distance = travel(exit, ends[next].0, winding);
            if next == start && current == start && distance == 0.0 {
                distance = self_loop_travel(&fragments[start], ring, center, store);
            }
            for k in corners_between(exit, distance, winding) {
                vertices.push(store.insert(corners[k]));
            }

            if next == start {
                break;
            }
            current = next;
        }
        trace!(%shape, cell = %cell.id(), vertices = vertices.len(), "closed boundary loop");
        cell.contours_mut().push(Contour::closed_loop(shape, vertices));
        loops += 1;
    }
    loops
}

/// Position of a boundary point along the perimeter in `[0, 4)`: south side
/// `[0, 1)` west to east, then east side, north side and west side
/// counter-clockwise. Corner `k` of [`Sector::corners`] sits at `k`.
pub fn perimeter_position(bounds: &Sector, p: LatLon) -> f64 {
    let distances = [
        (p.latitude - bounds.min_latitude).abs(),
        (bounds.max_longitude - p.longitude).abs(),
        (bounds.max_latitude - p.latitude).abs(),
        (p.longitude - bounds.min_longitude).abs(),
    ];
    let side = (1..4).fold(0, |best, i| {
        if distances[i] < distances[best] {
            i
        } else {
            best
        }
    });

    let width = bounds.delta_longitude();
    let height = bounds.delta_latitude();
    let along = match side {
        0 => (p.longitude - bounds.min_longitude) / width,
        1 => (p.latitude - bounds.min_latitude) / height,
        2 => (bounds.max_longitude - p.longitude) / width,
        _ => (bounds.max_latitude - p.latitude) / height,
    }
    .clamp(0.0, 1.0);

    let s = side as f64 + along;
    if s >= PERIMETER { 0.0 } else { s }
}

/// Perimeter distance from `from` to `to` walking in the covered direction.
fn travel(from: f64, to: f64, winding: Winding) -> f64 {
    let d = match winding {
        Winding::CounterClockwise => to - from,
        Winding::Clockwise => from - to,
    }
    .rem_euclid(PERIMETER);
    if d >= PERIMETER { 0.0 } else { d }
}

/// Corners strictly between `exit` and `exit + distance`, in travel order.
fn corners_between(exit: f64, distance: f64, winding: Winding) -> Vec<usize> {
    let mut corners: Vec<(f64, usize)> = (0..4)
        .map(|k| (travel(exit, k as f64, winding), k))
        .filter(|&(d, _)| d > 0.0 && d < distance)
        .collect();
    corners.sort_by(|a, b| a.0.total_cmp(&b.0));
    corners.into_iter().map(|(_, k)| k).collect()
}

/// A single fragment leaving where it entered either encloses the covered
/// region itself or covers everything around it.
fn self_loop_travel(fragment: &Contour, ring: &Ring, center: LatLon, store: &VertexStore) -> f64 {
    let area = signed_area(fragment.loop_vertices().iter().map(|&i| store[i]));
    let covers_outside = match ring.winding() {
        Winding::CounterClockwise => area < 0.0,
        Winding::Clockwise => area > 0.0,
    };
    if covers_outside || (area == 0.0 && ring.contains(center)) {
        PERIMETER
    } else {
        0.0
    }
}
