//! Tessellation error types.

use terra_geo::Sector;

use crate::cell::CellId;
use crate::contour::ShapeId;

/// Errors that abort a tessellation run or a single record.
///
/// Recoverable geometric anomalies are not errors: they are logged and
/// counted in [`crate::TessellationReport`]. `DegenerateRing`,
/// `NonFiniteVertex` and `RingNotClosed` abort only the record they occur in.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TessellationError {
    /// The grid needs at least one subdivision per axis.
    #[error("subdivision count must be at least 1, got {0}")]
    InvalidSubdivisions(u32),

    /// The bounding sector has no area, so no grid can be laid over it.
    #[error("sector has zero extent: {0:?}")]
    DegenerateSector(Sector),

    /// No record contained any vertex, so no bounding sector exists.
    #[error("input contains no vertices")]
    NoVertices,

    /// A ring has fewer than three distinct vertices.
    #[error("{shape} has {vertices} distinct vertices, at least 3 are required")]
    DegenerateRing { shape: ShapeId, vertices: usize },

    /// A ring vertex has a NaN or infinite component.
    #[error("{shape} has a non-finite vertex at position {position}")]
    NonFiniteVertex { shape: ShapeId, position: usize },

    /// The cells touched by a ring do not start and end in the same cell.
    #[error("{shape} is not closed: touched cells run from {first:?} to {last:?}")]
    RingNotClosed {
        shape: ShapeId,
        first: Option<CellId>,
        last: Option<CellId>,
    },

    /// The polygon triangulator rejected a cell's contours.
    #[error("triangulation failed in cell {cell}: {reason}")]
    Triangulation { cell: CellId, reason: String },
}
