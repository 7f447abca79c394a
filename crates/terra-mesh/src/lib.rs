//! Indexed triangle meshes produced by the grid tessellator, and their packed GPU form.

pub mod geo_mesh;
pub mod packed;

pub use geo_mesh::GeoMesh;
pub use packed::{GeoVertex, PackedGeoMesh};
