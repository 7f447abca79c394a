//! Deduplicating vertex registry shared by every cell of one run.

use std::ops::Index;

use glam::DVec3;
use rustc_hash::FxHashMap;
use terra_geo::LatLon;

/// Append-only array of unique coordinates.
///
/// [`VertexStore::insert`] returns the existing index for a coordinate that
/// was seen before (bit-exact comparison), otherwise appends it. Indices never
/// change once issued, so contours can hold plain `u32` indices.
#[derive(Clone, Debug, Default)]
pub struct VertexStore {
    coordinates: Vec<LatLon>,
    lookup: FxHashMap<LatLon, u32>,
}

impl VertexStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `coordinate`, registering it if new.
    pub fn insert(&mut self, coordinate: LatLon) -> u32 {
        if let Some(&index) = self.lookup.get(&coordinate) {
            return index;
        }
        debug_assert!(self.coordinates.len() < u32::MAX as usize);
        let index = self.coordinates.len() as u32;
        self.coordinates.push(coordinate);
        self.lookup.insert(coordinate, index);
        index
    }

    /// Index of a previously inserted coordinate.
    pub fn index_of(&self, coordinate: LatLon) -> Option<u32> {
        self.lookup.get(&coordinate).copied()
    }

    /// Coordinate at `index`, if issued.
    pub fn get(&self, index: u32) -> Option<LatLon> {
        self.coordinates.get(index as usize).copied()
    }

    /// All coordinates in index order.
    pub fn coordinates(&self) -> &[LatLon] {
        &self.coordinates
    }

    /// Render-space positions `(longitude, latitude, elevation)` in index order.
    pub fn to_render_positions(&self, elevation: f64) -> Vec<DVec3> {
        self.coordinates
            .iter()
            .map(|c| c.to_render_position(elevation))
            .collect()
    }

    /// Number of unique coordinates.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns `true` if nothing was inserted yet.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

impl Index<u32> for VertexStore {
    type Output = LatLon;

    fn index(&self, index: u32) -> &LatLon {
        &self.coordinates[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates() {
        let mut store = VertexStore::new();
        let a = store.insert(LatLon::new(1.0, 2.0));
        let b = store.insert(LatLon::new(3.0, 4.0));
        let c = store.insert(LatLon::new(1.0, 2.0));
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(c, a);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_indices_are_stable() {
        let mut store = VertexStore::new();
        let first = store.insert(LatLon::new(0.5, 0.5));
        for i in 0..100 {
            store.insert(LatLon::new(i as f64, -(i as f64)));
        }
        assert_eq!(store[first], LatLon::new(0.5, 0.5));
        assert_eq!(store.index_of(LatLon::new(0.5, 0.5)), Some(first));
    }

    #[test]
    fn test_get_out_of_range() {
        let store = VertexStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(0), None);
    }

    #[test]
    fn test_render_positions_follow_index_order() {
        let mut store = VertexStore::new();
        store.insert(LatLon::new(10.0, 20.0));
        store.insert(LatLon::new(-5.0, 7.0));
        let positions = store.to_render_positions(0.0);
        assert_eq!(positions[0], DVec3::new(20.0, 10.0, 0.0));
        assert_eq!(positions[1], DVec3::new(7.0, -5.0, 0.0));
    }
}
