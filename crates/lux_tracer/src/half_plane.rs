//! Half-plane primitive: everything on one side of an infinite line.

use crate::shape::BOUNDARY_EPSILON;
use lux_math::{Bounds, Interval, Point, Ray, Vector};

/// The region `a·x + b·y + c >= 0`.
///
/// Coefficients are scaled so that `(a, b)` has unit length, which makes
/// `a·x + b·y + c` the signed distance to the boundary line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    a: f32,
    b: f32,
    c: f32,
    normal: Vector,
}

impl HalfPlane {
    /// Create a half-plane from line coefficients.
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        let len = (a * a + b * b).sqrt();
        let (a, b, c) = if len > 0.0 {
            (a / len, b / len, c / len)
        } else {
            (a, b, c)
        };
        Self {
            a,
            b,
            c,
            normal: Vector::new(-a, -b).normalize_or_zero(),
        }
    }

    /// The half-plane bounded by the line through `p1` and `p2` that contains `inside`.
    pub fn through(p1: Point, p2: Point, inside: Point) -> Self {
        let plane = Self::new(p2.y - p1.y, p1.x - p2.x, p2.x * p1.y - p1.x * p2.y);
        if plane.is_inside(inside) {
            plane
        } else {
            plane.flipped()
        }
    }

    /// The complementary half-plane.
    pub fn flipped(&self) -> Self {
        Self::new(-self.a, -self.b, -self.c)
    }

    /// Signed distance of `p` from the boundary, positive inside.
    #[inline]
    pub fn signed_distance(&self, p: Point) -> f32 {
        self.a * p.x + self.b * p.y + self.c
    }

    pub fn is_inside(&self, p: Point) -> bool {
        self.signed_distance(p) >= 0.0
    }

    pub fn is_on_boundary(&self, p: Point) -> bool {
        self.signed_distance(p).abs() <= BOUNDARY_EPSILON
    }

    /// Outward normal, constant over the whole boundary.
    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Distance along the ray to the boundary line, if it lies within `ray_t`.
    ///
    /// A ray parallel to the line never crosses it.
    pub fn crossing(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let denom = self.a * ray.direction.x + self.b * ray.direction.y;
        if denom == 0.0 {
            return None;
        }
        let t = -self.signed_distance(ray.origin) / denom;
        ray_t.surrounds(t).then_some(t)
    }

    /// The covered part of the plane. Only axis-aligned boundaries give a finite edge.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::UNIVERSE;
        if self.b == 0.0 && self.a != 0.0 {
            let edge = -self.c / self.a;
            if self.a > 0.0 {
                bounds.left = edge;
            } else {
                bounds.right = edge;
            }
        } else if self.a == 0.0 && self.b != 0.0 {
            let edge = -self.c / self.b;
            if self.b > 0.0 {
                bounds.up = edge;
            } else {
                bounds.down = edge;
            }
        }
        bounds
    }
}
