use crate::{Point, Ray, Vector};

/// Axis-aligned rectangle used by the spatial index.
///
/// `left..right` spans x and `up..down` spans y. The y axis grows downward,
/// matching image rows, so `up <= down` for a valid box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub up: f32,
    pub down: f32,
}

/// Where a coordinate sits relative to one axis of a box.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Zone {
    Before,
    Within,
    After,
}

impl Zone {
    fn classify(x: f32, min: f32, max: f32) -> Zone {
        if x < min {
            Zone::Before
        } else if x < max {
            Zone::Within
        } else {
            Zone::After
        }
    }

    /// Whether a ray component `d` starting in this zone can move towards the slab.
    fn heads_in(self, d: f32) -> bool {
        match self {
            Zone::Before => d > 0.0,
            Zone::Within => true,
            Zone::After => d <= 0.0,
        }
    }
}

impl Bounds {
    /// Create bounds from their four edges.
    pub fn new(left: f32, right: f32, up: f32, down: f32) -> Self {
        Self {
            left,
            right,
            up,
            down,
        }
    }

    /// Bounds spanning two corner points.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.x.max(b.x), a.y.min(b.y), a.y.max(b.y))
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Whether `p` lies strictly inside the box.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x > self.left && p.x < self.right && p.y > self.up && p.y < self.down
    }

    /// Whether `other` lies entirely within this box (edges may touch).
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.up >= self.up
            && other.down <= self.down
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.left.min(other.left),
            self.right.max(other.right),
            self.up.min(other.up),
            self.down.max(other.down),
        )
    }

    /// Overlap of both boxes, possibly empty.
    pub fn intersection(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.left.max(other.left),
            self.right.min(other.right),
            self.up.max(other.up),
            self.down.min(other.down),
        )
    }

    /// Split into four equal quadrants, ordered NW, SW, NE, SE.
    pub fn quadrants(&self) -> [Bounds; 4] {
        let mid_x = (self.left + self.right) / 2.0;
        let mid_y = (self.up + self.down) / 2.0;
        [
            Bounds::new(self.left, mid_x, self.up, mid_y),
            Bounds::new(self.left, mid_x, mid_y, self.down),
            Bounds::new(mid_x, self.right, self.up, mid_y),
            Bounds::new(mid_x, self.right, mid_y, self.down),
        ]
    }

    /// Conservative test whether a ray can pass through the box.
    ///
    /// First the origin is classified into one of nine regions around the box.
    /// Inside the box is an immediate hit; in any other region the ray must move
    /// towards the box along every axis it is outside of. Survivors are then
    /// checked for the ray's line separating at least one pair of diagonal
    /// corners. Together the two stages decide ray (not just line) intersection.
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let p = ray.origin;
        let d = ray.direction;

        if self.contains_point(p) {
            return true;
        }

        let zx = Zone::classify(p.x, self.left, self.right);
        let zy = Zone::classify(p.y, self.up, self.down);
        if zx == Zone::Within && zy == Zone::Within {
            // On the edge of the box
            return true;
        }
        if !zx.heads_in(d.x) || !zy.heads_in(d.y) {
            return false;
        }

        let side = |corner: Point| line_side(p, d, corner);
        let nw = Point::new(self.left, self.up);
        let se = Point::new(self.right, self.down);
        let sw = Point::new(self.left, self.down);
        let ne = Point::new(self.right, self.up);
        side(nw) * side(se) < 0.0 || side(sw) * side(ne) < 0.0
    }

    /// The unit square every scene is framed in.
    pub const UNIT: Bounds = Bounds {
        left: 0.0,
        right: 1.0,
        up: 0.0,
        down: 1.0,
    };

    /// The whole plane, contained by no finite box.
    pub const UNIVERSE: Bounds = Bounds {
        left: f32::NEG_INFINITY,
        right: f32::INFINITY,
        up: f32::NEG_INFINITY,
        down: f32::INFINITY,
    };
}

/// Signed side of `corner` relative to the line through `p` along `d`.
#[inline]
fn line_side(p: Point, d: Vector, corner: Point) -> f32 {
    d.y * (corner.x - p.x) - d.x * (corner.y - p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(ox: f32, oy: f32, dx: f32, dy: f32) -> Ray {
        Ray::new(Point::new(ox, oy), Vector::new(dx, dy))
    }

    #[test]
    fn test_contains_bounds() {
        let outer = Bounds::UNIT;
        let inner = Bounds::new(0.1, 0.2, 0.3, 0.4);
        assert!(outer.contains_bounds(&inner));
        assert!(!inner.contains_bounds(&outer));
        assert!(outer.contains_bounds(&outer));
        assert!(!outer.contains_bounds(&Bounds::UNIVERSE));
    }

    #[test]
    fn test_quadrants() {
        let [nw, sw, ne, se] = Bounds::UNIT.quadrants();
        assert_eq!(nw, Bounds::new(0.0, 0.5, 0.0, 0.5));
        assert_eq!(sw, Bounds::new(0.0, 0.5, 0.5, 1.0));
        assert_eq!(ne, Bounds::new(0.5, 1.0, 0.0, 0.5));
        assert_eq!(se, Bounds::new(0.5, 1.0, 0.5, 1.0));
    }

    #[test]
    fn test_union_and_intersection() {
        let a = Bounds::new(0.0, 0.5, 0.0, 0.5);
        let b = Bounds::new(0.25, 1.0, 0.25, 1.0);
        assert_eq!(a.union(&b), Bounds::UNIT);
        assert_eq!(a.intersection(&b), Bounds::new(0.25, 0.5, 0.25, 0.5));
        let apart = a.intersection(&Bounds::new(0.6, 0.7, 0.6, 0.7));
        assert!(apart.left > apart.right && apart.up > apart.down);
    }

    #[test]
    fn test_ray_from_inside() {
        let b = Bounds::new(0.25, 0.75, 0.25, 0.75);
        assert!(b.intersects_ray(&ray(0.5, 0.5, -1.0, 0.3)));
    }

    #[test]
    fn test_ray_from_side_regions() {
        let b = Bounds::new(0.25, 0.75, 0.25, 0.75);

        // Left of the box
        assert!(b.intersects_ray(&ray(0.0, 0.5, 1.0, 0.0)));
        assert!(!b.intersects_ray(&ray(0.0, 0.5, -1.0, 0.0)));
        // Line crosses the box only behind a steep ray
        assert!(!b.intersects_ray(&ray(0.0, 0.5, 1.0, 10.0)));

        // Above the box (small y)
        assert!(b.intersects_ray(&ray(0.5, 0.0, 0.0, 1.0)));
        assert!(!b.intersects_ray(&ray(0.5, 0.0, 0.0, -1.0)));

        // Right of and below the box
        assert!(b.intersects_ray(&ray(1.0, 0.5, -1.0, 0.1)));
        assert!(b.intersects_ray(&ray(0.5, 1.0, 0.1, -1.0)));
    }

    #[test]
    fn test_ray_from_corner_regions() {
        let b = Bounds::new(0.25, 0.75, 0.25, 0.75);

        // North-west corner region must move +x and +y
        assert!(b.intersects_ray(&ray(0.0, 0.0, 1.0, 1.0)));
        assert!(!b.intersects_ray(&ray(0.0, 0.0, 1.0, -1.0)));
        // Heading the right way but passing beside the box
        assert!(!b.intersects_ray(&ray(0.0, 0.0, 1.0, 0.05)));

        // South-east corner region must move -x and -y
        assert!(b.intersects_ray(&ray(1.0, 1.0, -1.0, -1.0)));
        assert!(!b.intersects_ray(&ray(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_ray_matches_slab_test() {
        // Compare against a straightforward slab test on a grid of rays.
        let b = Bounds::new(0.3, 0.6, 0.2, 0.7);
        let slab = |r: &Ray| {
            let mut t_min = 0.0f32;
            let mut t_max = f32::INFINITY;
            for (o, d, lo, hi) in [
                (r.origin.x, r.direction.x, b.left, b.right),
                (r.origin.y, r.direction.y, b.up, b.down),
            ] {
                if d == 0.0 {
                    if o < lo || o > hi {
                        return false;
                    }
                    continue;
                }
                let (mut t0, mut t1) = ((lo - o) / d, (hi - o) / d);
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
            }
            t_max > t_min
        };

        for i in 0..12 {
            for j in 0..12 {
                let origin = Point::new(i as f32 * 0.1 - 0.07, j as f32 * 0.1 - 0.03);
                for k in 0..16 {
                    let a = std::f32::consts::TAU * (k as f32 + 0.37) / 16.0;
                    let r = Ray::new(origin, Vector::new(a.cos(), a.sin()));
                    assert_eq!(b.intersects_ray(&r), slab(&r), "origin {origin:?} angle {a}");
                }
            }
        }
    }
}
