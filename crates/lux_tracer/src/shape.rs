//! Constructive solid geometry over half-planes and circles.
//!
//! A [`Shape`] is an immutable tree. Every query is a single recursive match
//! over the variants, so the boolean combination rules live in one place.

use crate::{Circle, HalfPlane};
use lux_math::{Bounds, Interval, Point, Ray, Vector};
use thiserror::Error;

/// Distance within which a point counts as lying on a boundary.
pub const BOUNDARY_EPSILON: f32 = 1e-5;

/// Upper bound on boundary crossings a combinator inspects along one ray.
const MAX_CSG_STEPS: usize = 64;

/// Normal reported for points that lie on no boundary.
const FALLBACK_NORMAL: Vector = Vector::new(0.0, 1.0);

/// Errors from the shape construction helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon edge {0} has coincident endpoints")]
    DegenerateEdge(usize),
}

/// A 2D region built from primitives and boolean combinators.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    HalfPlane(HalfPlane),
    Circle(Circle),
    /// Points in either child.
    Union(Box<Shape>, Box<Shape>),
    /// Points in both children.
    Intersection(Box<Shape>, Box<Shape>),
    /// Points in the first child but not the second.
    Difference(Box<Shape>, Box<Shape>),
}

impl Shape {
    pub fn circle(center: Point, radius: f32) -> Self {
        Shape::Circle(Circle::new(center, radius))
    }

    /// The half-plane `a·x + b·y + c >= 0`.
    pub fn half_plane(a: f32, b: f32, c: f32) -> Self {
        Shape::HalfPlane(HalfPlane::new(a, b, c))
    }

    /// The half-plane bounded by the line through `p1` and `p2` that contains `inside`.
    pub fn half_plane_through(p1: Point, p2: Point, inside: Point) -> Self {
        Shape::HalfPlane(HalfPlane::through(p1, p2, inside))
    }

    pub fn union(a: Shape, b: Shape) -> Self {
        Shape::Union(Box::new(a), Box::new(b))
    }

    pub fn intersection(a: Shape, b: Shape) -> Self {
        Shape::Intersection(Box::new(a), Box::new(b))
    }

    pub fn difference(a: Shape, b: Shape) -> Self {
        Shape::Difference(Box::new(a), Box::new(b))
    }

    /// A convex polygon as the intersection of the half-planes along its edges.
    ///
    /// Vertices are taken in order and the closing edge is added automatically.
    /// Each edge is oriented so the vertex centroid is inside.
    ///
    /// The four axis-aligned half-planes of the vertex bounding box are added
    /// too. They leave the region unchanged but give the shape finite
    /// [`bounds`](Self::bounds), so the quadtree can sink it below the root.
    pub fn convex_polygon(vertices: &[Point]) -> Result<Shape, ShapeError> {
        if vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }
        let centroid = vertices.iter().copied().sum::<Point>() / vertices.len() as f32;
        let min = vertices.iter().copied().fold(Point::INFINITY, Point::min);
        let max = vertices.iter().copied().fold(Point::NEG_INFINITY, Point::max);

        let mut polygon: Option<Shape> = None;
        let edges = vertices.iter().zip(vertices.iter().cycle().skip(1));
        for (i, (&p1, &p2)) in edges.enumerate() {
            if p1 == p2 {
                return Err(ShapeError::DegenerateEdge(i));
            }
            let edge = Shape::half_plane_through(p1, p2, centroid);
            polygon = Some(match polygon {
                Some(acc) => Shape::intersection(acc, edge),
                None => edge,
            });
        }

        let boxed = [
            Shape::half_plane(1.0, 0.0, -min.x),
            Shape::half_plane(-1.0, 0.0, max.x),
            Shape::half_plane(0.0, 1.0, -min.y),
            Shape::half_plane(0.0, -1.0, max.y),
        ]
        .into_iter()
        .fold(polygon, |acc, side| acc.map(|acc| Shape::intersection(acc, side)));
        boxed.ok_or(ShapeError::TooFewVertices(vertices.len()))
    }

    /// Whether the ray meets the boundary anywhere ahead of its origin.
    pub fn hits(&self, ray: &Ray) -> bool {
        match self {
            Shape::Circle(c) => c.hits(ray),
            Shape::HalfPlane(h) => h.crossing(ray, Interval::FORWARD).is_some(),
            Shape::Union(a, b) => a.hits(ray) || b.hits(ray),
            Shape::Intersection(..) | Shape::Difference(..) => {
                self.crossing(ray, Interval::FORWARD).is_some()
            }
        }
    }

    /// The nearest boundary point ahead of the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Point> {
        self.crossing(ray, Interval::FORWARD).map(|t| ray.at(t))
    }

    /// Distance to the nearest boundary crossing strictly inside `ray_t`.
    ///
    /// Union takes the nearer child crossing. Intersection and difference walk
    /// the children's crossings in order and keep the first one that lies on
    /// the combined boundary:
    ///
    /// - intersection: a crossing of one child must be inside the other;
    /// - difference: a crossing of the first child must be outside the second,
    ///   a crossing of the second child must be inside the first.
    pub fn crossing(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        match self {
            Shape::HalfPlane(h) => h.crossing(ray, ray_t),
            Shape::Circle(c) => c.crossing(ray, ray_t),
            Shape::Union(a, b) => nearest(a.crossing(ray, ray_t), b.crossing(ray, ray_t)),
            Shape::Intersection(a, b) => first_valid_crossing(
                a,
                b,
                ray,
                ray_t,
                |p| b.is_inside(p),
                |p| a.is_inside(p),
            ),
            Shape::Difference(a, b) => first_valid_crossing(
                a,
                b,
                ray,
                ray_t,
                |p| !b.is_inside(p),
                |p| a.is_inside(p),
            ),
        }
    }

    pub fn is_inside(&self, p: Point) -> bool {
        match self {
            Shape::HalfPlane(h) => h.is_inside(p),
            Shape::Circle(c) => c.is_inside(p),
            Shape::Union(a, b) => a.is_inside(p) || b.is_inside(p),
            Shape::Intersection(a, b) => a.is_inside(p) && b.is_inside(p),
            Shape::Difference(a, b) => a.is_inside(p) && !b.is_inside(p),
        }
    }

    pub fn is_on_boundary(&self, p: Point) -> bool {
        match self {
            Shape::HalfPlane(h) => h.is_on_boundary(p),
            Shape::Circle(c) => c.is_on_boundary(p),
            Shape::Union(a, b) | Shape::Intersection(a, b) | Shape::Difference(a, b) => {
                a.is_on_boundary(p) || b.is_on_boundary(p)
            }
        }
    }

    /// Outward normal at a boundary point.
    ///
    /// Where both children's boundaries meet the normals are averaged, so the
    /// result is not necessarily unit length. Points on no boundary get `(0, 1)`.
    pub fn normal(&self, p: Point) -> Vector {
        match self {
            Shape::HalfPlane(h) => h.normal(),
            Shape::Circle(c) => c.normal(p),
            Shape::Union(a, b) | Shape::Intersection(a, b) => {
                match (a.is_on_boundary(p), b.is_on_boundary(p)) {
                    (true, true) => (a.normal(p) + b.normal(p)) / 2.0,
                    (true, false) => a.normal(p),
                    (false, true) => b.normal(p),
                    (false, false) => FALLBACK_NORMAL,
                }
            }
            // The subtracted child's boundary faces the other way
            Shape::Difference(a, b) => match (a.is_on_boundary(p), b.is_on_boundary(p)) {
                (true, true) => (a.normal(p) - b.normal(p)) / 2.0,
                (true, false) => a.normal(p),
                (false, true) => -b.normal(p),
                (false, false) => FALLBACK_NORMAL,
            },
        }
    }

    /// A box enclosing the shape, unbounded where the shape is.
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::HalfPlane(h) => h.bounds(),
            Shape::Circle(c) => c.bounds(),
            Shape::Union(a, b) => a.bounds().union(&b.bounds()),
            Shape::Intersection(a, b) => a.bounds().intersection(&b.bounds()),
            Shape::Difference(a, _) => a.bounds(),
        }
    }

    /// Whether the whole shape fits inside `bounds`.
    pub fn contained(&self, bounds: &Bounds) -> bool {
        bounds.contains_bounds(&self.bounds())
    }
}

#[inline]
fn nearest(a: Option<f32>, b: Option<f32>) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Walk the crossings of `a` and `b` in ray order until one passes its filter.
fn first_valid_crossing(
    a: &Shape,
    b: &Shape,
    ray: &Ray,
    mut ray_t: Interval,
    keep_a: impl Fn(Point) -> bool,
    keep_b: impl Fn(Point) -> bool,
) -> Option<f32> {
    for _ in 0..MAX_CSG_STEPS {
        let (t, valid) = match (a.crossing(ray, ray_t), b.crossing(ray, ray_t)) {
            (None, None) => return None,
            (Some(ta), Some(tb)) if tb < ta => (tb, keep_b(ray.at(tb))),
            (Some(ta), _) => (ta, keep_a(ray.at(ta))),
            (None, Some(tb)) => (tb, keep_b(ray.at(tb))),
        };
        if valid {
            return Some(t);
        }
        ray_t = ray_t.starting_at(t);
    }
    None
}
