//! Error types for mesh auditing.

use mesh_bvh::BvhError;
use thiserror::Error;

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Errors that can occur while auditing a mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuditError {
    /// An index references a vertex that does not exist.
    #[error(
        "invalid mesh topology: index {index} at position {position} (mesh has {vertex_count} vertices)"
    )]
    InvalidMeshTopology {
        /// Position of the offending entry in the flat index list.
        position: usize,
        /// The offending vertex index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The mesh has no triangles, so no bounding box can be formed.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A contributing vertex has a NaN coordinate.
    #[error("vertex {vertex} has a NaN coordinate")]
    NanCoordinate {
        /// Index of the vertex.
        vertex: usize,
    },

    /// The BVH oracle could not be built.
    #[error("BVH oracle failed: {0}")]
    Oracle(#[from] BvhError),

    /// The BVH oracle was built but reported no bounds.
    #[error("BVH oracle reported no bounds for {triangle_count} triangles")]
    OracleBoundsMissing {
        /// Number of triangles handed to the oracle.
        triangle_count: usize,
    },
}
