//! Even-odd triangulation of one cell's closed contours.

use glam::DVec2;
use lyon::math::{Point, point};
use lyon::path::{EndpointId, Path};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use terra_geo::LatLon;

use crate::cell::Cell;
use crate::contour::Contour;
use crate::error::TessellationError;
use crate::vertex_store::VertexStore;

/// Contour area, in cell units, below which an empty triangulation is not an error.
const MIN_ENCLOSED_AREA: f64 = 1e-9;

/// Triangulates a set of closed contours inside a cell under the even-odd rule.
///
/// Contours are fed to the tessellator in cell units: `(0, 0)` is the cell's
/// min-min corner and `(1, 1)` its max-max corner, so thin cells of a fine
/// geographic grid keep full `f32` resolution. Endpoint ids travel through the
/// tessellator, so output vertices that correspond to an input vertex reuse its
/// store index; any vertex the tessellator creates (self-intersections) is
/// scaled back and added to the store.
pub struct CellTessellator {
    tessellator: FillTessellator,
    options: FillOptions,
}

impl Default for CellTessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl CellTessellator {
    pub fn new() -> Self {
        Self {
            tessellator: FillTessellator::new(),
            options: FillOptions::default().with_fill_rule(FillRule::EvenOdd),
        }
    }

    /// Triangles as store-index triples. Contours with fewer than three
    /// distinct vertices are skipped; zero-area triangles are dropped.
    ///
    /// Contours that enclose area but come back without a single triangle are
    /// reported as [`TessellationError::Triangulation`].
    pub fn tessellate<'c>(
        &mut self,
        cell: &Cell,
        contours: impl IntoIterator<Item = &'c Contour>,
        store: &mut VertexStore,
    ) -> Result<Vec<[u32; 3]>, TessellationError> {
        let bounds = cell.bounds();
        let origin = cell.corners()[0].to_planar();
        let scale = DVec2::new(bounds.delta_longitude(), bounds.delta_latitude());
        let to_cell_units = |p: LatLon| (p.to_planar() - origin) / scale;

        let mut builder = Path::builder();
        let mut endpoints: Vec<u32> = Vec::new();
        let mut record = |id: EndpointId, index: u32| {
            let slot = id.0 as usize;
            if endpoints.len() <= slot {
                endpoints.resize(slot + 1, u32::MAX);
            }
            endpoints[slot] = index;
        };

        let mut paths = 0;
        let mut enclosed = 0.0;
        for contour in contours {
            if contour.distinct_vertex_count() < 3 {
                continue;
            }
            // Wound in reverse of the stored order. Coverage is decided by the
            // even-odd rule alone, so orientation is not validated.
            let local: Vec<(u32, DVec2)> = contour
                .loop_vertices()
                .iter()
                .rev()
                .map(|&index| (index, to_cell_units(store[index])))
                .collect();
            let Some(&(first, at)) = local.first() else {
                continue;
            };
            enclosed += shoelace(local.iter().map(|&(_, p)| p)).abs();

            record(builder.begin(point(at.x as f32, at.y as f32)), first);
            for &(index, p) in &local[1..] {
                record(builder.line_to(point(p.x as f32, p.y as f32)), index);
            }
            builder.end(true);
            paths += 1;
        }
        if paths == 0 {
            return Ok(Vec::new());
        }
        let path = builder.build();

        let mut buffers: VertexBuffers<(Option<EndpointId>, Point), u32> = VertexBuffers::new();
        self.tessellator
            .tessellate_with_ids(
                path.id_iter(),
                &path,
                None,
                &self.options,
                &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                    (vertex.as_endpoint_id(), vertex.position())
                }),
            )
            .map_err(|err| TessellationError::Triangulation {
                cell: cell.id(),
                reason: err.to_string(),
            })?;

        let indices: Vec<u32> = buffers
            .vertices
            .iter()
            .map(|&(endpoint, position)| {
                let known = endpoint
                    .and_then(|id| endpoints.get(id.0 as usize).copied())
                    .filter(|&i| i != u32::MAX);
                known.unwrap_or_else(|| {
                    let local = DVec2::new(f64::from(position.x), f64::from(position.y));
                    store.insert(LatLon::from_planar(origin + local * scale))
                })
            })
            .collect();

        let triangles: Vec<[u32; 3]> = buffers
            .indices
            .chunks_exact(3)
            .map(|t| {
                [
                    indices[t[0] as usize],
                    indices[t[1] as usize],
                    indices[t[2] as usize],
                ]
            })
            .filter(|t| t[0] != t[1] && t[1] != t[2] && t[0] != t[2])
            .collect();

        if triangles.is_empty() && enclosed > MIN_ENCLOSED_AREA {
            return Err(TessellationError::Triangulation {
                cell: cell.id(),
                reason: format!("no triangles for contours enclosing {enclosed:.3e} of the cell"),
            });
        }
        Ok(triangles)
    }
}

/// Signed area of a closed polygon in the plane.
fn shoelace(points: impl Iterator<Item = DVec2> + Clone) -> f64 {
    let next = points.clone().cycle().skip(1);
    points.zip(next).map(|(a, b)| a.perp_dot(b)).sum::<f64>() / 2.0
}
