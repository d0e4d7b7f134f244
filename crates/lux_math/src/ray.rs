use crate::{Point, Vector};

/// A ray in the scene plane.
///
/// The direction is normalized on construction so that ray parameters are
/// distances. A zero direction stays zero and such a ray hits nothing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vector,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Point, direction: Vector) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Whether the ray has no direction at all.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vector::ZERO
    }

    /// Get the point along the ray at distance t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Point {
        self.origin + self.direction * t
    }
}
