//! The capability the spatial index needs from the things it stores.

use crate::Shape;
use lux_math::{Bounds, Point, Ray};

/// Anything that can be placed in a [`QuadTree`](crate::QuadTree).
pub trait Traceable: Send + Sync {
    /// Whether the object lies entirely within `bounds`.
    fn contained(&self, bounds: &Bounds) -> bool;

    /// Nearest point where the ray meets the object, ahead of its origin.
    fn intersect(&self, ray: &Ray) -> Option<Point>;
}

impl Traceable for Shape {
    fn contained(&self, bounds: &Bounds) -> bool {
        Shape::contained(self, bounds)
    }

    fn intersect(&self, ray: &Ray) -> Option<Point> {
        Shape::intersect(self, ray)
    }
}

/// The nearest object along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the object in the slice that was searched
    pub index: usize,
    /// Where the ray meets the object
    pub point: Point,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

impl Hit {
    /// Record `index` hitting at `point` if it is nearer than the current best.
    #[inline]
    pub(crate) fn offer(best: &mut Option<Hit>, ray: &Ray, index: usize, point: Point) {
        let distance = (point - ray.origin).length();
        if best.map_or(true, |b| distance < b.distance) {
            *best = Some(Hit {
                index,
                point,
                distance,
            });
        }
    }
}

/// Brute-force nearest hit over every item.
pub fn nearest_linear<T: Traceable>(items: &[T], ray: &Ray) -> Option<Hit> {
    let mut best = None;
    for (index, item) in items.iter().enumerate() {
        if let Some(point) = item.intersect(ray) {
            Hit::offer(&mut best, ray, index, point);
        }
    }
    best
}
