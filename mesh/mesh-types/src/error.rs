//! Error types for mesh construction.

use thiserror::Error;

/// Result type for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while assembling a [`MeshData`](crate::MeshData).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The flat index list does not describe whole triangles.
    #[error("index count {count} is not a multiple of 3")]
    IndexCountNotTriangular {
        /// Number of indices supplied.
        count: usize,
    },
}
