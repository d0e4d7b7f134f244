//! Circle primitive for ray tracing.

use crate::shape::BOUNDARY_EPSILON;
use lux_math::{Bounds, Interval, Point, Ray, Vector};

/// A filled disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f32,
}

impl Circle {
    /// Create a new circle. Negative radii are clamped to zero.
    pub fn new(center: Point, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_inside(&self, p: Point) -> bool {
        (self.center - p).length() <= self.radius
    }

    pub fn is_on_boundary(&self, p: Point) -> bool {
        ((self.center - p).length() - self.radius).abs() <= BOUNDARY_EPSILON
    }

    /// Radial direction from the center.
    pub fn normal(&self, p: Point) -> Vector {
        (p - self.center).normalize_or_zero()
    }

    /// Cheap existence test for a forward hit.
    pub fn hits(&self, ray: &Ray) -> bool {
        if ray.is_degenerate() {
            return false;
        }
        let to_center = self.center - ray.origin;
        if to_center.length() < self.radius {
            // Any ray leaves a circle it starts in
            return true;
        }
        let proj = to_center.dot(ray.direction);
        if proj <= 0.0 {
            return false;
        }
        let foot = ray.at(proj);
        (self.center - foot).length() < self.radius
    }

    /// Nearest boundary distance within `ray_t`.
    ///
    /// Projects the center onto the ray to find the perpendicular foot, then
    /// steps half a chord either way. From inside the circle only the far root
    /// lies ahead of the origin.
    pub fn crossing(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        if ray.is_degenerate() {
            return None;
        }
        let proj = (self.center - ray.origin).dot(ray.direction);
        let foot = ray.at(proj);
        let dist_sq = (self.center - foot).length_squared();
        let r_sq = self.radius * self.radius;
        if dist_sq > r_sq {
            return None;
        }
        let half_chord = (r_sq - dist_sq).sqrt();

        [proj - half_chord, proj + half_chord]
            .into_iter()
            .find(|&t| ray_t.surrounds(t))
    }

    pub fn bounds(&self) -> Bounds {
        let r = Vector::splat(self.radius);
        Bounds::from_points(self.center - r, self.center + r)
    }
}
