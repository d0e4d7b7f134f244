//! Lux math - the 2D geometry kernel shared by the tracer and its tools.
//!
//! Points and vectors are `glam::Vec2`, colors are `glam::Vec3` holding
//! unclamped (r, g, b) radiance.

// Re-export glam for convenience
pub use glam::*;

mod bounds;
mod interval;
mod ray;

pub use bounds::Bounds;
pub use interval::Interval;
pub use ray::Ray;

use std::cmp::Ordering;

/// A position in the scene plane.
pub type Point = Vec2;

/// A direction or displacement in the scene plane.
pub type Vector = Vec2;

/// Radiance as (r, g, b). Values above 1.0 are legal until the frame is encoded.
pub type Color = Vec3;

/// Reflect `v` about the normal `n`: `v - 2(v·n)n`.
#[inline]
pub fn reflect(v: Vector, n: Vector) -> Vector {
    v - 2.0 * v.dot(n) * n
}

/// Total luminance of a color, the plain sum of its channels.
#[inline]
pub fn luminance(c: Color) -> f32 {
    c.element_sum()
}

/// Order two colors by their luminance sum.
pub fn compare_luminance(a: Color, b: Color) -> Ordering {
    luminance(a)
        .partial_cmp(&luminance(b))
        .unwrap_or(Ordering::Equal)
}
