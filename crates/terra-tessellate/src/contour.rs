//! Per-cell boundary fragments.

use std::fmt;

/// Identifies one ring within a run. Assigned sequentially as rings are walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// A polyline of vertex-store indices lying inside a single cell.
///
/// `entered` means the polyline begins on the cell boundary because the ring
/// came in from a neighbour; `exited` means it ends on the boundary because
/// the ring left. Synthetic contours are the four corners of a filled cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    shape: ShapeId,
    vertices: Vec<u32>,
    entered: bool,
    exited: bool,
    synthetic: bool,
}

impl Contour {
    /// Starts a new fragment at `first`.
    pub fn new(shape: ShapeId, entered: bool, first: u32) -> Self {
        Self {
            shape,
            vertices: vec![first],
            entered,
            exited: false,
            synthetic: false,
        }
    }

    /// A fragment that already forms a closed loop inside its cell.
    pub fn closed_loop(shape: ShapeId, vertices: Vec<u32>) -> Self {
        let mut contour = Self {
            shape,
            vertices: Vec::with_capacity(vertices.len()),
            entered: true,
            exited: true,
            synthetic: false,
        };
        for index in vertices {
            contour.push(index);
        }
        contour
    }

    /// The four corners of a fully covered cell.
    pub fn cell_square(shape: ShapeId, corners: [u32; 4]) -> Self {
        Self {
            shape,
            vertices: corners.to_vec(),
            entered: false,
            exited: false,
            synthetic: true,
        }
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    pub fn entered(&self) -> bool {
        self.entered
    }

    pub fn exited(&self) -> bool {
        self.exited
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// A contour is closed when it either never touched the boundary or both
    /// entered and exited through it.
    pub fn is_closed(&self) -> bool {
        self.entered == self.exited
    }

    /// Returns `true` for a boundary fragment that still needs joining along
    /// the cell perimeter.
    pub fn is_boundary_fragment(&self) -> bool {
        !self.synthetic && self.entered && self.exited
    }

    pub fn first(&self) -> Option<u32> {
        self.vertices.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.vertices.last().copied()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends an index unless it repeats the current last vertex.
    pub fn push(&mut self, index: u32) {
        if self.vertices.last() != Some(&index) {
            self.vertices.push(index);
        }
    }

    /// Appends a run of indices, collapsing repeats at the seam.
    pub fn extend_from_slice(&mut self, indices: &[u32]) {
        for &index in indices {
            self.push(index);
        }
    }

    pub(crate) fn mark_exited(&mut self) {
        self.exited = true;
    }

    /// The vertices as a cyclic loop: the closing repeat of the first vertex
    /// (if any) is left out.
    pub fn loop_vertices(&self) -> &[u32] {
        match self.vertices.as_slice() {
            [first, rest @ .., last] if !rest.is_empty() && first == last => {
                &self.vertices[..self.vertices.len() - 1]
            }
            all => all,
        }
    }

    /// Number of distinct indices in the loop.
    pub fn distinct_vertex_count(&self) -> usize {
        let mut seen: Vec<u32> = self.loop_vertices().to_vec();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
