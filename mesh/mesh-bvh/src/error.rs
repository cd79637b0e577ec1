//! Error types for BVH construction.

use thiserror::Error;

/// Result type for BVH construction.
pub type BvhResult<T> = Result<T, BvhError>;

/// Errors that can occur while building a BVH.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BvhError {
    /// The declared triangle count does not match the index list.
    #[error("triangle count {triangle_count} does not match {index_count} indices")]
    TriangleCountMismatch {
        /// Declared number of triangles.
        triangle_count: usize,
        /// Length of the index list.
        index_count: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index} (only {vertex_count} vertices)")]
    IndexOutOfRange {
        /// Triangle containing the bad index.
        triangle: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices supplied.
        vertex_count: usize,
    },
}
