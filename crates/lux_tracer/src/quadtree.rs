//! Quadtree acceleration structure.
//!
//! Each node covers an axis-aligned box and holds the indices of the items
//! that fit in that box but in none of its quadrants. The items themselves
//! stay in the caller's slice, so the tree can be rebuilt without moving them.

use crate::traceable::{Hit, Traceable};
use lux_math::{Bounds, Ray};

/// Cells narrower than this are not split any further.
pub const MIN_NODE_SIZE: f32 = 0.1;

/// A single cell of the tree.
#[derive(Debug, Clone)]
struct QuadNode {
    bounds: Bounds,
    items: Vec<usize>,
    /// NW, SW, NE, SE. Quadrants that received no items are dropped.
    children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    fn build<T: Traceable>(
        bounds: Bounds,
        mut items: Vec<usize>,
        all: &[T],
        min_node_size: f32,
    ) -> Self {
        let mut children: [Option<Box<QuadNode>>; 4] = Default::default();

        if bounds.width() > min_node_size {
            for (slot, quadrant) in children.iter_mut().zip(bounds.quadrants()) {
                let (inside, rest): (Vec<usize>, Vec<usize>) = items
                    .into_iter()
                    .partition(|&i| all[i].contained(&quadrant));
                items = rest;

                if !inside.is_empty() {
                    *slot = Some(Box::new(Self::build(quadrant, inside, all, min_node_size)));
                }
            }
        }

        QuadNode {
            bounds,
            items,
            children,
        }
    }

    /// Nearest hit in this subtree, merged into `best`.
    ///
    /// `check_bounds` is false only for the root, whose items may lie outside
    /// its box.
    fn nearest<T: Traceable>(
        &self,
        all: &[T],
        ray: &Ray,
        check_bounds: bool,
        best: &mut Option<Hit>,
    ) {
        if check_bounds && !self.bounds.intersects_ray(ray) {
            return;
        }

        for &index in &self.items {
            if let Some(point) = all[index].intersect(ray) {
                Hit::offer(best, ray, index, point);
            }
        }

        for child in self.children.iter().flatten() {
            child.nearest(all, ray, true, best);
        }
    }

    fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.node_count())
            .sum::<usize>()
    }
}

/// Spatial index over a slice of [`Traceable`] items.
///
/// The tree only remembers indices; every query takes the same slice the
/// tree was built from.
#[derive(Debug, Clone)]
pub struct QuadTree {
    root: QuadNode,
    len: usize,
}

impl QuadTree {
    /// Build the tree over `items`, splitting `bounds` until cells are no
    /// wider than `min_node_size`.
    pub fn build<T: Traceable>(items: &[T], bounds: Bounds, min_node_size: f32) -> Self {
        let root = QuadNode::build(bounds, (0..items.len()).collect(), items, min_node_size);
        let tree = QuadTree {
            root,
            len: items.len(),
        };

        log::debug!(
            "Quadtree: {} items in {} nodes, depth {}, {} at root",
            tree.len,
            tree.node_count(),
            tree.depth(),
            tree.root.items.len()
        );

        tree
    }

    /// Nearest item hit by the ray.
    ///
    /// Returns the same answer as [`nearest_linear`](crate::nearest_linear)
    /// over the whole slice; subtrees whose box the ray misses are skipped.
    pub fn nearest<T: Traceable>(&self, items: &[T], ray: &Ray) -> Option<Hit> {
        debug_assert_eq!(items.len(), self.len, "quadtree queried with a different slice");
        let mut best = None;
        self.root.nearest(items, ray, false, &mut best);
        best
    }

    /// Number of items indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bounds(&self) -> Bounds {
        self.root.bounds
    }

    /// Levels in the tree, counting the root.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}
