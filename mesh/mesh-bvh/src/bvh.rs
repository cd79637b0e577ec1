//! Bounding Volume Hierarchy construction.
//!
//! Triangles are split recursively at the median of their box centers
//! along the longest axis of the enclosing box.

use mesh_types::{Aabb, Point3, Vertex};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{BvhError, BvhResult};
use crate::params::BvhParams;

/// Axis-aligned bounding box for BVH nodes.
///
/// Unlike [`Aabb`], a node box starts inverted so it can accumulate
/// triangle boxes.
#[derive(Debug, Clone, Copy)]
pub struct NodeBounds {
    /// Minimum corner of the bounding box.
    pub min: Point3<f64>,
    /// Maximum corner of the bounding box.
    pub max: Point3<f64>,
}

impl Default for NodeBounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl NodeBounds {
    /// Create an empty (inverted) bounding box.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create a bounding box from a triangle.
    #[must_use]
    pub fn from_triangle(v0: &Point3<f64>, v1: &Point3<f64>, v2: &Point3<f64>) -> Self {
        Self {
            min: Point3::new(
                v0.x.min(v1.x).min(v2.x),
                v0.y.min(v1.y).min(v2.y),
                v0.z.min(v1.z).min(v2.z),
            ),
            max: Point3::new(
                v0.x.max(v1.x).max(v2.x),
                v0.y.max(v1.y).max(v2.y),
                v0.z.max(v1.z).max(v2.z),
            ),
        }
    }

    /// Expand this bounding box to include another.
    pub fn expand(&mut self, other: &Self) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    /// Get the center of this bounding box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Get the index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let dx = self.max.x - self.min.x;
        let dy = self.max.y - self.min.y;
        let dz = self.max.z - self.min.z;

        if dx >= dy && dx >= dz {
            0
        } else if dy >= dz {
            1
        } else {
            2
        }
    }

    /// Check if this bounding box is valid (non-empty).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Convert to a mesh [`Aabb`], or `None` while still inverted.
    #[must_use]
    pub fn to_aabb(&self) -> Option<Aabb> {
        self.is_valid().then(|| Aabb {
            min: self.min,
            max: self.max,
        })
    }
}

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Bounding box of all triangles in this leaf.
        bbox: NodeBounds,
        /// Triangle indices stored in this leaf.
        triangles: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        /// Bounding box of all triangles in this subtree.
        bbox: NodeBounds,
        /// Left child node.
        left: Box<Self>,
        /// Right child node.
        right: Box<Self>,
    },
}

impl BvhNode {
    /// Get the bounding box of this node.
    #[must_use]
    pub fn bbox(&self) -> &NodeBounds {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Bounding Volume Hierarchy over indexed triangles.
#[derive(Debug)]
pub struct Bvh {
    /// Root node of the BVH (None for zero triangles).
    root: Option<BvhNode>,
    /// Total number of triangles in the BVH.
    triangle_count: usize,
}

impl Bvh {
    /// Build a BVH from vertices and a flat triangle index list.
    ///
    /// # Arguments
    ///
    /// * `vertices` - Vertex positions
    /// * `indices` - Flat index list, three entries per triangle
    /// * `triangle_count` - Number of triangles described by `indices`
    /// * `params` - Construction parameters
    ///
    /// # Errors
    ///
    /// Returns an error if `indices.len() != triangle_count * 3` or if any
    /// index is out of range for `vertices`.
    pub fn build(
        vertices: &[Vertex],
        indices: &[u32],
        triangle_count: usize,
        params: &BvhParams,
    ) -> BvhResult<Self> {
        if triangle_count.checked_mul(3) != Some(indices.len()) {
            return Err(BvhError::TriangleCountMismatch {
                triangle_count,
                index_count: indices.len(),
            });
        }

        let triangles = triangle_bounds(vertices, indices)?;
        if triangles.is_empty() {
            return Ok(Self {
                root: None,
                triangle_count: 0,
            });
        }

        let order: Vec<usize> = (0..triangles.len()).collect();
        let max_leaf = params.max_leaf_size.max(1);
        let root = if params.parallel && triangles.len() >= params.parallel_threshold {
            Self::build_recursive_parallel(&triangles, order, max_leaf, params.parallel_threshold)
        } else {
            Self::build_recursive(&triangles, order, max_leaf)
        };

        let bvh = Self {
            root: Some(root),
            triangle_count,
        };
        let stats = bvh.stats();
        debug!(
            triangles = triangle_count,
            leaves = stats.leaf_count,
            depth = stats.max_depth,
            "Built BVH"
        );
        Ok(bvh)
    }

    fn build_recursive(
        triangles: &[(u32, NodeBounds)],
        order: Vec<usize>,
        max_leaf_size: usize,
    ) -> BvhNode {
        match split_node(triangles, order, max_leaf_size) {
            Split::Leaf(leaf) => leaf,
            Split::Internal { bbox, left, right } => BvhNode::Internal {
                bbox,
                left: Box::new(Self::build_recursive(triangles, left, max_leaf_size)),
                right: Box::new(Self::build_recursive(triangles, right, max_leaf_size)),
            },
        }
    }

    fn build_recursive_parallel(
        triangles: &[(u32, NodeBounds)],
        order: Vec<usize>,
        max_leaf_size: usize,
        parallel_threshold: usize,
    ) -> BvhNode {
        match split_node(triangles, order, max_leaf_size) {
            Split::Leaf(leaf) => leaf,
            Split::Internal { bbox, left, right } => {
                let (left, right) =
                    if left.len() >= parallel_threshold || right.len() >= parallel_threshold {
                        rayon::join(
                            || {
                                Self::build_recursive_parallel(
                                    triangles,
                                    left,
                                    max_leaf_size,
                                    parallel_threshold,
                                )
                            },
                            || {
                                Self::build_recursive_parallel(
                                    triangles,
                                    right,
                                    max_leaf_size,
                                    parallel_threshold,
                                )
                            },
                        )
                    } else {
                        (
                            Self::build_recursive(triangles, left, max_leaf_size),
                            Self::build_recursive(triangles, right, max_leaf_size),
                        )
                    };
                BvhNode::Internal {
                    bbox,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        }
    }

    /// Get the total number of triangles in the BVH.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Check if the BVH is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Get the root node.
    #[must_use]
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Get the bounding box of the whole hierarchy.
    ///
    /// Returns `None` for a BVH built from zero triangles.
    #[must_use]
    pub fn root_bounds(&self) -> Option<Aabb> {
        self.root().and_then(|root| root.bbox().to_aabb())
    }

    /// Get statistics about the BVH structure.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        if let Some(root) = self.root() {
            Self::collect_stats(root, 0, &mut stats);
        }
        stats
    }

    fn collect_stats(node: &BvhNode, depth: usize, stats: &mut BvhStats) {
        stats.max_depth = stats.max_depth.max(depth);

        match node {
            BvhNode::Leaf { triangles, .. } => {
                stats.leaf_count += 1;
                stats.total_triangles_in_leaves += triangles.len();
                stats.max_leaf_size = stats.max_leaf_size.max(triangles.len());
            }
            BvhNode::Internal { left, right, .. } => {
                stats.internal_count += 1;
                Self::collect_stats(left, depth + 1, stats);
                Self::collect_stats(right, depth + 1, stats);
            }
        }
    }
}

/// Statistics about BVH structure.
#[derive(Debug, Default, Clone)]
pub struct BvhStats {
    /// Number of internal (branch) nodes.
    pub internal_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Maximum depth of the tree.
    pub max_depth: usize,
    /// Maximum number of triangles in any leaf.
    pub max_leaf_size: usize,
    /// Total triangles stored across all leaves.
    pub total_triangles_in_leaves: usize,
}

/// Per-triangle bounding boxes, tagged with the triangle index.
#[allow(clippy::cast_possible_truncation)]
// Truncation: triangle ids are u32 like vertex indices
fn triangle_bounds(vertices: &[Vertex], indices: &[u32]) -> BvhResult<Vec<(u32, NodeBounds)>> {
    indices
        .chunks_exact(3)
        .enumerate()
        .map(|(triangle, face)| {
            let position = |index: u32| {
                vertices
                    .get(index as usize)
                    .map(|v| v.position)
                    .ok_or(BvhError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count: vertices.len(),
                    })
            };
            let v0 = position(face[0])?;
            let v1 = position(face[1])?;
            let v2 = position(face[2])?;
            Ok((triangle as u32, NodeBounds::from_triangle(&v0, &v1, &v2)))
        })
        .collect()
}

/// Outcome of splitting one node's triangle set.
enum Split {
    Leaf(BvhNode),
    Internal {
        bbox: NodeBounds,
        left: Vec<usize>,
        right: Vec<usize>,
    },
}

fn split_node(triangles: &[(u32, NodeBounds)], order: Vec<usize>, max_leaf_size: usize) -> Split {
    let mut bbox = NodeBounds::empty();
    for &i in &order {
        bbox.expand(&triangles[i].1);
    }

    if order.len() <= max_leaf_size {
        return Split::Leaf(BvhNode::Leaf {
            bbox,
            triangles: order.iter().map(|&i| triangles[i].0).collect(),
        });
    }

    let axis = bbox.longest_axis();
    let mut sorted = order;
    sorted.sort_by(|&a, &b| {
        let ca = triangles[a].1.center()[axis];
        let cb = triangles[b].1.center()[axis];
        ca.total_cmp(&cb)
    });

    let right = sorted.split_off(sorted.len() / 2);
    Split::Internal {
        bbox,
        left: sorted,
        right,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn cube() -> (Vec<Vertex>, Vec<u32>) {
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 1.0, 0.0),
            Vertex::from_coords(0.0, 1.0, 0.0),
            Vertex::from_coords(0.0, 0.0, 1.0),
            Vertex::from_coords(1.0, 0.0, 1.0),
            Vertex::from_coords(1.0, 1.0, 1.0),
            Vertex::from_coords(0.0, 1.0, 1.0),
        ];
        let indices = vec![
            0, 1, 2, 0, 2, 3, // bottom
            4, 6, 5, 4, 7, 6, // top
            0, 5, 1, 0, 4, 5, // front
            2, 7, 3, 2, 6, 7, // back
            0, 3, 7, 0, 7, 4, // left
            1, 5, 6, 1, 6, 2, // right
        ];
        (vertices, indices)
    }

    #[test]
    fn node_bounds_from_triangle() {
        let bbox = NodeBounds::from_triangle(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.5, 1.0, 0.5),
        );
        assert_eq!(bbox.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Point3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn node_bounds_longest_axis() {
        let along = |max: Point3<f64>| NodeBounds {
            min: Point3::origin(),
            max,
        };
        assert_eq!(along(Point3::new(10.0, 1.0, 1.0)).longest_axis(), 0);
        assert_eq!(along(Point3::new(1.0, 10.0, 1.0)).longest_axis(), 1);
        assert_eq!(along(Point3::new(1.0, 1.0, 10.0)).longest_axis(), 2);
    }

    #[test]
    fn empty_node_bounds_has_no_aabb() {
        assert!(!NodeBounds::empty().is_valid());
        assert!(NodeBounds::empty().to_aabb().is_none());
    }

    #[test]
    fn infinite_coordinates_keep_root_bounds_minimal() {
        let vertices = [
            Vertex::from_coords(f64::INFINITY, 0.0, 0.0),
            Vertex::from_coords(f64::INFINITY, 1.0, 0.0),
            Vertex::from_coords(f64::INFINITY, 0.0, 1.0),
        ];
        let bvh = Bvh::build(&vertices, &[0, 1, 2], 1, &BvhParams::default()).unwrap();
        let bounds = bvh.root_bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(f64::INFINITY, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(f64::INFINITY, 1.0, 1.0));
    }

    #[test]
    fn build_empty() {
        let bvh = Bvh::build(&[], &[], 0, &BvhParams::default()).unwrap();
        assert!(bvh.is_empty());
        assert_eq!(bvh.triangle_count(), 0);
        assert!(bvh.root_bounds().is_none());
    }

    #[test]
    fn build_cube() {
        let (vertices, indices) = cube();
        let params = BvhParams::default().with_max_leaf_size(4);
        let bvh = Bvh::build(&vertices, &indices, 12, &params).unwrap();

        assert!(!bvh.is_empty());
        assert_eq!(bvh.triangle_count(), 12);

        let stats = bvh.stats();
        assert!(stats.leaf_count > 1);
        assert!(stats.max_leaf_size <= 4);
        assert_eq!(stats.total_triangles_in_leaves, 12);

        let bounds = bvh.root_bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn child_boxes_nest_inside_parents() {
        fn check(node: &BvhNode, seen: &mut Vec<u32>) {
            match node {
                BvhNode::Leaf { triangles, .. } => seen.extend(triangles.iter().copied()),
                BvhNode::Internal { bbox, left, right } => {
                    for child in [left, right] {
                        let inner = child.bbox();
                        assert!((0..3).all(|a| bbox.min[a] <= inner.min[a]));
                        assert!((0..3).all(|a| inner.max[a] <= bbox.max[a]));
                        check(child, seen);
                    }
                }
            }
        }

        let (vertices, indices) = cube();
        let params = BvhParams::default().with_max_leaf_size(1);
        let bvh = Bvh::build(&vertices, &indices, indices.len() / 3, &params).unwrap();

        let mut seen = Vec::new();
        check(bvh.root().unwrap(), &mut seen);
        seen.sort_unstable();
        let expected: Vec<u32> = (0..bvh.triangle_count() as u32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn leaf_size_zero_is_clamped() {
        let (vertices, indices) = cube();
        let params = BvhParams::default().with_max_leaf_size(0);
        let bvh = Bvh::build(&vertices, &indices, 12, &params).unwrap();
        assert_eq!(bvh.stats().max_leaf_size, 1);
        assert_eq!(bvh.stats().leaf_count, 12);
    }

    #[test]
    fn parallel_build_matches_serial() {
        let (vertices, indices) = cube();
        let serial = Bvh::build(
            &vertices,
            &indices,
            12,
            &BvhParams::default().with_max_leaf_size(1),
        )
        .unwrap();
        let params = BvhParams::default()
            .with_max_leaf_size(1)
            .with_parallel(true)
            .with_parallel_threshold(2);
        let parallel = Bvh::build(&vertices, &indices, 12, &params).unwrap();

        assert_eq!(serial.root_bounds(), parallel.root_bounds());
        assert_eq!(
            serial.stats().total_triangles_in_leaves,
            parallel.stats().total_triangles_in_leaves
        );
    }

    #[test]
    fn unreferenced_vertices_do_not_widen_root() {
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.0, 1.0, 0.0),
            Vertex::from_coords(-50.0, 80.0, 99.0),
        ];
        let bvh = Bvh::build(&vertices, &[0, 1, 2], 1, &BvhParams::default()).unwrap();
        let bounds = bvh.root_bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn rejects_triangle_count_mismatch() {
        let (vertices, indices) = cube();
        let err = Bvh::build(&vertices, &indices, 11, &BvhParams::default()).unwrap_err();
        assert_eq!(
            err,
            BvhError::TriangleCountMismatch {
                triangle_count: 11,
                index_count: 36,
            }
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        let vertices = vec![Vertex::from_coords(0.0, 0.0, 0.0); 3];
        let err = Bvh::build(&vertices, &[0, 1, 2, 2, 1, 3], 2, &BvhParams::default())
            .unwrap_err();
        assert_eq!(
            err,
            BvhError::IndexOutOfRange {
                triangle: 1,
                index: 3,
                vertex_count: 3,
            }
        );
    }
}
