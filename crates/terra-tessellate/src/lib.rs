//! Grid-based polygon tessellation.
//!
//! A uniform `N × N` grid is laid over the bounding sector of a dataset. Each
//! ring is walked through the grid, split into per-cell contours at exact
//! grid-line crossings, stitched where the ring started, interior cells are
//! filled by row parity, and every cell's contours are closed along the cell
//! perimeter and triangulated with the even-odd rule. All cells share one
//! [`VertexStore`], so vertices on a cell edge get one index on both sides.
//!
//! ```ignore
//! let tessellator = GridTessellator::for_records(&records, 8)?;
//! let tessellation = tessellator.tessellate(&records)?;
//! let mesh = tessellation.mesh;
//! ```

pub mod assemble;
pub mod cell;
pub mod clip;
pub mod closure;
pub mod contour;
pub mod error;
pub mod grid;
pub mod interior;
pub mod raster;
pub mod record;
pub mod report;
pub mod ring;
pub mod stitch;
pub mod tessellator;
pub mod triangulate;
pub mod vertex_store;
pub mod walker;

pub use assemble::MeshAssembler;
pub use cell::{Cell, CellId};
pub use contour::{Contour, ShapeId};
pub use error::TessellationError;
pub use grid::Grid;
pub use record::{PolygonRecord, bounding_sector};
pub use report::{AnomalyCounts, RecordFailure, TessellationReport};
pub use ring::{Ring, Winding};
pub use tessellator::{GridTessellator, Tessellation};
pub use triangulate::CellTessellator;
pub use vertex_store::VertexStore;
pub use walker::BoundaryWalker;

pub use terra_geo::{LatLon, Sector};
pub use terra_mesh::GeoMesh;
