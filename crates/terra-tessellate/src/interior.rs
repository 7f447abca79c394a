//! Marks cells entirely inside a ring using per-row crossing parity.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::cell::CellId;
use crate::contour::ShapeId;
use crate::error::TessellationError;
use crate::grid::Grid;
use crate::vertex_store::VertexStore;

/// Fills every untouched cell whose row parity says it lies inside the ring.
///
/// `touched` is the walker's visit sequence, which must start and end in the
/// same cell. Each visit that changes row on exactly one side (previous and
/// next in different half-planes around it) counts as one vertical crossing
/// of that row. Scanning a row left to right, an untouched cell with an odd
/// running count is inside.
///
/// Returns the filled cells in row-major order.
pub fn fill_interior(
    grid: &mut Grid,
    store: &mut VertexStore,
    shape: ShapeId,
    touched: &[CellId],
) -> Result<Vec<CellId>, TessellationError> {
    if touched.first() != touched.last() || touched.is_empty() {
        return Err(TessellationError::RingNotClosed {
            shape,
            first: touched.first().copied(),
            last: touched.last().copied(),
        });
    }

    let cycle = cyclic_visits(touched);
    let n = grid.subdivisions() as usize;
    let mut crossings = vec![0_u32; n * n];
    let mut on_boundary = FxHashSet::default();

    let len = cycle.len();
    for (i, &current) in cycle.iter().enumerate() {
        on_boundary.insert(current);
        if len < 3 {
            continue;
        }
        let previous = cycle[(i + len - 1) % len];
        let next = cycle[(i + 1) % len];
        if (previous.y > current.y) != (next.y > current.y) {
            crossings[grid.index_of(current)] += 1;
        }
    }

    let mut filled = Vec::new();
    for y in 0..n as u32 {
        let mut parity = 0_u32;
        for x in 0..n as u32 {
            let id = CellId::new(x, y);
            parity += crossings[grid.index_of(id)];
            if parity % 2 == 1 && !on_boundary.contains(&id) {
                filled.push(id);
            }
        }
    }

    for &id in &filled {
        let corners = grid.cell(id).corners().map(|c| store.insert(c));
        grid.cell_mut(id).fill(shape, corners);
    }
    debug!(%shape, filled = filled.len(), "interior cells filled");
    Ok(filled)
}

/// Drops the closing repeat and collapses consecutive repeats, wrapping around.
fn cyclic_visits(touched: &[CellId]) -> Vec<CellId> {
    let mut cycle: Vec<CellId> = touched[..touched.len() - 1].to_vec();
    cycle.dedup();
    while cycle.len() > 1 && cycle.first() == cycle.last() {
        cycle.pop();
    }
    cycle
}
