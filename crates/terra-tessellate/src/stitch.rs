//! Joins the two halves of a contour split at the ring's starting vertex.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::cell::{Cell, CellId};
use crate::contour::ShapeId;
use crate::grid::Grid;
use crate::report::AnomalyCounts;

/// Stitches the orphan pair of `shape` in every cell of `touched`.
///
/// Returns the number of cells where a pair was joined.
pub fn stitch_contours(
    grid: &mut Grid,
    shape: ShapeId,
    touched: &[CellId],
    anomalies: &mut AnomalyCounts,
) -> usize {
    let mut seen = FxHashSet::default();
    touched
        .iter()
        .filter(|&&id| seen.insert(id))
        .filter(|&&id| stitch_cell(grid.cell_mut(id), shape, anomalies))
        .count()
}

/// Joins the no-entry contour (the ring's start) onto the end of the no-exit
/// contour (the ring's return) of `shape` in `cell`.
///
/// Only the first such pair is joined. The merged contour is marked as both
/// entered and exited.
pub fn stitch_cell(cell: &mut Cell, shape: ShapeId, anomalies: &mut AnomalyCounts) -> bool {
    let id = cell.id();
    let contours = cell.contours_mut();
    let head = contours
        .iter()
        .position(|c| c.shape() == shape && !c.is_synthetic() && !c.entered() && c.exited());
    let tail = contours
        .iter()
        .position(|c| c.shape() == shape && !c.is_synthetic() && c.entered() && !c.exited());
    let (Some(head), Some(tail)) = (head, tail) else {
        return false;
    };

    let start = contours.remove(head);
    let tail = if tail > head { tail - 1 } else { tail };
    let merged = &mut contours[tail];

    let skip = if merged.last() == start.first() {
        1
    } else {
        warn!(
            "{}: orphan contours in cell {} do not meet ({:?} vs {:?})",
            shape,
            id,
            merged.last(),
            start.first()
        );
        anomalies.orphan_mismatches += 1;
        0
    };
    merged.extend_from_slice(&start.vertices()[skip..]);
    merged.mark_exited();
    debug!(%shape, cell = %id, vertices = merged.len(), "stitched orphan contours");
    true
}
