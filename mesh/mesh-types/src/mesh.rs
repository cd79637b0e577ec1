//! Indexed triangle mesh.

use crate::{MeshError, MeshResult, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vertex list plus a flat triangle index list.
///
/// Every three consecutive entries of `indices` form one triangle. Indices
/// may repeat and may skip vertices. Whether every index actually refers to
/// an existing vertex is *not* checked here; that is the validator's job.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Vertex positions
/// - `indices`: `Vec<u32>` - `[a0, b0, c0, a1, b1, c1, ...]`
///
/// The mesh is immutable once built.
///
/// # Example
///
/// ```
/// use mesh_types::{MeshData, Vertex};
///
/// let vertices = vec![
///     Vertex::from_coords(0.0, 0.0, 0.0),
///     Vertex::from_coords(1.0, 0.0, 0.0),
///     Vertex::from_coords(0.0, 1.0, 0.0),
/// ];
///
/// let mesh = MeshData::from_parts(vertices, vec![0, 1, 2]).unwrap();
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// assert_eq!(mesh.triangles().next(), Some([0, 1, 2]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshData {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshData {
    /// Create a mesh with no vertices and no indices.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh from vertices and a flat index list.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexCountNotTriangular`] if `indices.len()` is
    /// not divisible by 3.
    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> MeshResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangular {
                count: indices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Vertex data.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Flat triangle index list.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles (`indices.len() / 3`).
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Take the vertex and index lists back out of the mesh.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Vertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}
