//! Explicit 2-D k-d tree over `[latitude, longitude]` coordinates.
//!
//! Built once over a static coordinate array and queried many times. The tree
//! is a flat node vector with bucket leaves: `order` is a permutation of the
//! original point indices and each leaf owns a contiguous range of it, so the
//! whole structure serializes as three plain vectors and reloads without any
//! pointer fixup.

use serde::{Deserialize, Serialize};

/// Maximum number of points per leaf bucket.
const LEAF_SIZE: usize = 16;

/// Child slot marker for leaf nodes.
const NO_CHILD: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Node {
    /// Split axis: 0 = latitude, 1 = longitude. Alternates per level.
    axis: u8,
    /// Coordinate of the median on `axis`. The left subtree holds values
    /// `<= split`, the right subtree values `>= split`.
    split: f64,
    left: u32,
    right: u32,
    /// Leaf range into `order`; unused for internal nodes.
    start: u32,
    end: u32,
}

/// Balanced k-d tree with bucket leaves.
///
/// Children are pushed before their parent during the recursive build, so the
/// root is always the last node in the vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KdTree {
    points: Vec<[f64; 2]>,
    order: Vec<u32>,
    nodes: Vec<Node>,
}

impl KdTree {
    /// Builds a tree by median split, axis alternating per level.
    ///
    /// Points with identical coordinates all occupy the tree; deterministic
    /// downstream ordering comes from [`KdTree::within_radius`] returning
    /// ascending insertion indices.
    pub fn build(points: Vec<[f64; 2]>) -> Self {
        let order: Vec<u32> = (0..points.len() as u32).collect();
        let mut tree = KdTree {
            points,
            order,
            nodes: Vec::new(),
        };
        if !tree.points.is_empty() {
            tree.nodes.reserve(2 * tree.points.len() / LEAF_SIZE + 1);
            tree.build_range(0, tree.points.len(), 0);
        }
        tree
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The indexed coordinates, in insertion order.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    fn build_range(&mut self, start: usize, end: usize, depth: usize) -> u32 {
        let count = end - start;
        if count <= LEAF_SIZE {
            self.nodes.push(Node {
                axis: 0,
                split: 0.0,
                left: NO_CHILD,
                right: NO_CHILD,
                start: start as u32,
                end: end as u32,
            });
            return (self.nodes.len() - 1) as u32;
        }

        let axis = (depth % 2) as u8;
        let mid = start + count / 2;
        let points = &self.points;
        self.order[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
            let va = points[a as usize][axis as usize];
            let vb = points[b as usize][axis as usize];
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });
        let split = self.points[self.order[mid] as usize][axis as usize];

        let left = self.build_range(start, mid, depth + 1);
        let right = self.build_range(mid, end, depth + 1);
        self.nodes.push(Node {
            axis,
            split,
            left,
            right,
            start: 0,
            end: 0,
        });
        (self.nodes.len() - 1) as u32
    }

    /// All insertion indices whose Euclidean distance from `center` is within
    /// `radius`, in the tree's native degree units, ascending by index.
    pub fn within_radius(&self, center: [f64; 2], radius: f64) -> Vec<usize> {
        let mut hits = Vec::new();
        if self.nodes.is_empty() || radius < 0.0 {
            return hits;
        }
        let root = (self.nodes.len() - 1) as u32;
        self.collect_within(root, center, radius, radius * radius, &mut hits);
        hits.sort_unstable();
        hits
    }

    fn collect_within(
        &self,
        node_index: u32,
        center: [f64; 2],
        radius: f64,
        radius_sq: f64,
        hits: &mut Vec<usize>,
    ) {
        let node = &self.nodes[node_index as usize];

        if node.left == NO_CHILD {
            for &index in &self.order[node.start as usize..node.end as usize] {
                let point = self.points[index as usize];
                let dx = point[0] - center[0];
                let dy = point[1] - center[1];
                if dx * dx + dy * dy <= radius_sq {
                    hits.push(index as usize);
                }
            }
            return;
        }

        // Branch and bound on the splitting plane: a subtree is skipped only
        // when every value it can hold is more than `radius` away on the
        // split axis.
        let delta = center[node.axis as usize] - node.split;
        if delta <= radius {
            self.collect_within(node.left, center, radius, radius_sq, hits);
        }
        if -delta <= radius {
            self.collect_within(node.right, center, radius, radius_sq, hits);
        }
    }
}
