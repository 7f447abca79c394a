//! Segment/cell intersection (Liang–Barsky).

use terra_geo::{LatLon, Sector};

/// Sides of a cell rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    South,
    East,
    North,
    West,
}

/// The part of a segment inside a closed rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clip {
    /// Segment parameter where it enters the rectangle (0 if it starts inside).
    pub t_enter: f64,
    /// Segment parameter where it leaves the rectangle (1 if it ends inside).
    pub t_exit: f64,
    /// Side crossed on entry, `None` when the segment starts inside or on the boundary.
    pub side: Option<Side>,
    /// Entry point, snapped exactly onto the entry side's grid line.
    pub entry: LatLon,
}

impl Clip {
    /// Parametric length of the inside portion.
    pub fn length(&self) -> f64 {
        self.t_exit - self.t_enter
    }
}

/// Clips `from → to` against `bounds`. `None` if the segment misses it.
pub fn clip_segment(bounds: &Sector, from: LatLon, to: LatLon) -> Option<Clip> {
    let dx = to.longitude - from.longitude;
    let dy = to.latitude - from.latitude;
    let boundaries = [
        (-dx, from.longitude - bounds.min_longitude, Side::West),
        (dx, bounds.max_longitude - from.longitude, Side::East),
        (-dy, from.latitude - bounds.min_latitude, Side::South),
        (dy, bounds.max_latitude - from.latitude, Side::North),
    ];

    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;
    let mut side = None;
    for (p, q, s) in boundaries {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t_exit {
                return None;
            }
            if r > t_enter {
                t_enter = r;
                side = Some(s);
            }
        } else {
            if r < t_enter {
                return None;
            }
            if r < t_exit {
                t_exit = r;
            }
        }
    }

    let entry = match side {
        None => from,
        Some(s) => snap(bounds, s, from.lerp(to, t_enter)),
    };
    Some(Clip {
        t_enter,
        t_exit,
        side,
        entry,
    })
}

/// Puts `p` exactly on the given side and clamps it into the side's span.
fn snap(bounds: &Sector, side: Side, p: LatLon) -> LatLon {
    let p = bounds.clamp(p);
    match side {
        Side::South => LatLon::new(bounds.min_latitude, p.longitude),
        Side::North => LatLon::new(bounds.max_latitude, p.longitude),
        Side::West => LatLon::new(p.latitude, bounds.min_longitude),
        Side::East => LatLon::new(p.latitude, bounds.max_longitude),
    }
}
