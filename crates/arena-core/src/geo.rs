//! Planar geometry for the arena: vectors, distance, clamping.
//!
//! World coordinates are `f64` with the origin in the top-left corner; the
//! playable area is the closed rectangle `[0, width] × [0, height]`.

use std::ops::{Add, Sub};

/// A 2D vector used for positions, relative offsets and
/// velocities alike.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    /// Scale the vector by `min(1, max / |v|)`.
    ///
    /// The direction and the sign of each component are preserved; the
    /// result's magnitude (and therefore each axis) never exceeds `max`.
    /// Vectors already within the limit, including the zero vector, are
    /// returned unchanged.
    pub fn clamp_speed(self, max: f64) -> Vec2 {
        let len = self.length();
        if len <= max || len == 0.0 {
            return self;
        }
        let scale = max / len;
        Vec2::new(self.x * scale, self.y * scale)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// The rectangular world region `[0, width] × [0, height]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width:  f64,
    pub height: f64,
}

impl Bounds {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` if `p` lies inside the closed rectangle (edges included).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Clamp each component of `p` into the rectangle.
    #[inline]
    pub fn clamp(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1400.0, 1000.0)
    }
}
