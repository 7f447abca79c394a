//! Geographic primitives: latitude/longitude coordinates and bounding sectors.
//!
//! Coordinates are plain degrees on a flat lat/lon plane. Equality and hashing
//! are bit-exact so that points computed from the same grid lines collapse to
//! the same key.

mod latlon;
mod sector;

pub use latlon::LatLon;
pub use sector::Sector;
