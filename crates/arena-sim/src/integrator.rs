//! Kinematic integration, once per actor per tick.

use arena_core::{Bounds, Vec2};

/// `clamp(position + velocity)` into the closed world rectangle.
///
/// Per-axis clamping: an actor pushing into a wall slides along it.  There is
/// no bounce and no wraparound.
#[inline]
pub fn integrate(position: Vec2, velocity: Vec2, bounds: Bounds) -> Vec2 {
    bounds.clamp(position + velocity)
}
