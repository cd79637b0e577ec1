//! Topology validation.
//!
//! A mesh is valid when every entry of its index list refers to an existing
//! vertex. Nothing else (winding, degenerate triangles, duplicates) is
//! checked.

use mesh_types::MeshData;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

/// Check that every index is strictly less than the vertex count.
///
/// A mesh with no indices is vacuously valid; an empty mesh is rejected
/// later, by the bounding-box computation.
///
/// # Example
///
/// ```
/// use mesh_audit::is_valid_mesh;
/// use mesh_types::{MeshData, Vertex};
///
/// let vertices = vec![Vertex::from_coords(0.0, 0.0, 0.0); 3];
/// let good = MeshData::from_parts(vertices.clone(), vec![0, 1, 2]).unwrap();
/// let bad = MeshData::from_parts(vertices, vec![0, 1, 3]).unwrap();
///
/// assert!(is_valid_mesh(&good));
/// assert!(!is_valid_mesh(&bad));
/// ```
#[must_use]
pub fn is_valid_mesh(mesh: &MeshData) -> bool {
    let vertex_count = mesh.vertex_count();
    mesh.indices()
        .iter()
        .all(|&index| (index as usize) < vertex_count)
}

/// Check topology, reporting the first out-of-range index.
///
/// # Errors
///
/// Returns [`AuditError::InvalidMeshTopology`] naming the first index that
/// is not less than the vertex count.
pub fn check_topology(mesh: &MeshData) -> AuditResult<()> {
    let vertex_count = mesh.vertex_count();
    match mesh
        .indices()
        .iter()
        .position(|&index| index as usize >= vertex_count)
    {
        Some(position) => Err(AuditError::InvalidMeshTopology {
            position,
            index: mesh.indices()[position],
            vertex_count,
        }),
        None => {
            debug!(
                vertices = vertex_count,
                triangles = mesh.triangle_count(),
                "Mesh topology is valid"
            );
            Ok(())
        }
    }
}

/// Summary of a mesh's index/vertex relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopologyReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of triangles.
    pub triangle_count: usize,
    /// Distinct vertices referenced by at least one triangle.
    pub referenced_vertex_count: usize,
    /// Vertices no triangle refers to.
    pub unreferenced_vertex_count: usize,
    /// Index entries that are out of range.
    pub invalid_index_count: usize,
}

impl TopologyReport {
    /// Check if every index is in range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid_index_count == 0
    }
}

impl std::fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Topology Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Referenced vertices: {}", self.referenced_vertex_count)?;
        if self.unreferenced_vertex_count > 0 {
            writeln!(
                f,
                "  Unreferenced vertices: {}",
                self.unreferenced_vertex_count
            )?;
        }
        writeln!(
            f,
            "  Valid: {}",
            if self.is_valid() { "Yes" } else { "No" }
        )?;
        if self.invalid_index_count > 0 {
            writeln!(f, "  Invalid indices: {}", self.invalid_index_count)?;
        }
        Ok(())
    }
}

/// Build a [`TopologyReport`] for a mesh.
#[must_use]
pub fn validate_mesh(mesh: &MeshData) -> TopologyReport {
    let mut referenced = vec![false; mesh.vertex_count()];
    let mut invalid_index_count = 0;

    for &index in mesh.indices() {
        match referenced.get_mut(index as usize) {
            Some(seen) => *seen = true,
            None => invalid_index_count += 1,
        }
    }

    let referenced_vertex_count = referenced.iter().filter(|&&seen| seen).count();

    TopologyReport {
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        referenced_vertex_count,
        unreferenced_vertex_count: mesh.vertex_count() - referenced_vertex_count,
        invalid_index_count,
    }
}
