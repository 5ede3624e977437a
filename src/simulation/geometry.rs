//! Wrap-around geometry on a periodic rectangle
//!
//! Every coordinate lives in the half-open canonical range
//! `[-extent/2, extent/2)`. A value sitting exactly on `+extent/2` belongs
//! to the negative side, so the same point never flips between the two
//! edges from one step to the next.

use super::states::{NVec2, World};

/// Below this both displacement components count as zero and the direction
/// falls back to `0.0`
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// Reduce `c` into `[-extent/2, extent/2)`
///
/// Uses Euclidean remainder so negative inputs never leak a negative
/// modulus. `extent` must be positive.
pub fn wrap(c: f64, extent: f64) -> f64 {
    let half = extent / 2.0;
    let mut r = (c + half).rem_euclid(extent);
    // rem_euclid may round up to `extent` for tiny negative inputs
    if r >= extent {
        r -= extent;
    }
    r - half
}

/// Shortest signed displacement from `a` to `b` on one periodic axis
pub fn displacement(a: f64, b: f64, extent: f64) -> f64 {
    wrap(b - a, extent)
}

/// Wrapped displacement vector from `from` to `to`
pub fn delta(from: &NVec2, to: &NVec2, world: &World) -> NVec2 {
    NVec2::new(
        displacement(from.x, to.x, world.width_f64()),
        displacement(from.y, to.y, world.height_f64()),
    )
}

/// Shortest distance between two points across the periodic edges
pub fn distance(from: &NVec2, to: &NVec2, world: &World) -> f64 {
    delta(from, to, world).norm()
}

/// Angle of the wrapped displacement `from -> to`
pub fn direction(from: &NVec2, to: &NVec2, world: &World) -> f64 {
    angle_of(&delta(from, to, world))
}

/// `atan2` of a displacement, `0.0` when the displacement is (near) zero
pub fn angle_of(d: &NVec2) -> f64 {
    if d.x.abs() < DIRECTION_EPSILON && d.y.abs() < DIRECTION_EPSILON {
        return 0.0;
    }
    d.y.atan2(d.x)
}

/// Canonicalise a position on both axes
pub fn wrap_position(p: &NVec2, world: &World) -> NVec2 {
    NVec2::new(wrap(p.x, world.width_f64()), wrap(p.y, world.height_f64()))
}
