//! Construction parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters controlling BVH construction.
///
/// # Example
///
/// ```
/// use mesh_bvh::BvhParams;
///
/// let params = BvhParams::default().with_max_leaf_size(4).with_parallel(true);
/// assert_eq!(params.max_leaf_size, 4);
/// assert!(params.parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BvhParams {
    /// Maximum triangles per leaf node.
    /// Values below 1 are treated as 1.
    pub max_leaf_size: usize,

    /// Whether to build subtrees in parallel (via rayon).
    pub parallel: bool,

    /// Subtrees with at least this many triangles are built in parallel
    /// when `parallel` is set.
    pub parallel_threshold: usize,
}

impl Default for BvhParams {
    fn default() -> Self {
        Self {
            max_leaf_size: 8,
            parallel: false,
            parallel_threshold: 1024,
        }
    }
}

impl BvhParams {
    /// Set the maximum leaf size.
    #[must_use]
    pub const fn with_max_leaf_size(mut self, max_leaf_size: usize) -> Self {
        self.max_leaf_size = max_leaf_size;
        self
    }

    /// Enable or disable parallel construction.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the triangle count above which subtrees are built in parallel.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }
}
