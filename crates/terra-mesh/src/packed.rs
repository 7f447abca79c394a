//! Packed mesh data structures for GPU upload.
//!
//! Geographic positions need `f64` precision, GPUs want `f32`. [`PackedGeoMesh`]
//! stores every vertex as an `f32` offset from a per-mesh `f64` origin, which
//! keeps offsets small enough for `f32` across a whole tessellated dataset.

use glam::DVec3;

use crate::GeoMesh;

/// A single vertex, 12 bytes: position relative to the mesh origin.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GeoVertex {
    /// `(longitude, latitude, elevation)` offset from [`PackedGeoMesh::origin`].
    pub position: [f32; 3],
}

static_assertions::assert_eq_size!(GeoVertex, [u8; 12]);

impl GeoVertex {
    /// Pack a render-space position relative to `origin`.
    pub fn new(position: DVec3, origin: DVec3) -> Self {
        let offset = (position - origin).as_vec3();
        Self {
            position: offset.to_array(),
        }
    }

    /// Reconstruct the render-space position.
    pub fn unpack(&self, origin: DVec3) -> DVec3 {
        origin + glam::Vec3::from_array(self.position).as_dvec3()
    }
}

/// A packed mesh containing vertex and index buffers ready for GPU upload.
pub struct PackedGeoMesh {
    /// Origin every vertex position is relative to.
    pub origin: DVec3,
    /// Packed vertex buffer.
    pub vertices: Vec<GeoVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
}

impl PackedGeoMesh {
    /// Pack a mesh around the centre of its position bounds.
    pub fn from_mesh(mesh: &GeoMesh) -> Self {
        let origin = bounds_center(&mesh.positions);
        Self::from_mesh_with_origin(mesh, origin)
    }

    /// Pack a mesh around a caller-chosen origin.
    pub fn from_mesh_with_origin(mesh: &GeoMesh, origin: DVec3) -> Self {
        Self {
            origin,
            vertices: mesh
                .positions
                .iter()
                .map(|&p| GeoVertex::new(p, origin))
                .collect(),
            indices: mesh.indices.clone(),
        }
    }

    /// Returns `true` if the mesh contains no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the size of the vertex buffer in bytes.
    pub fn vertex_buffer_bytes(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<GeoVertex>()
    }

    /// Returns the size of the index buffer in bytes.
    pub fn index_buffer_bytes(&self) -> usize {
        self.indices.len() * std::mem::size_of::<u32>()
    }

    /// Returns the vertex data as a byte slice for GPU upload (zero-copy).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Returns the index data as a byte slice for GPU upload (zero-copy).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

fn bounds_center(positions: &[DVec3]) -> DVec3 {
    let Some(&first) = positions.first() else {
        return DVec3::ZERO;
    };
    let (min, max) = positions
        .iter()
        .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    (min + max) / 2.0
}
