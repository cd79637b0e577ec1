//! Axis-aligned bounding boxes of a mesh.
//!
//! The default policy only considers vertices that some triangle refers to,
//! so stray control points or leftover vertices never widen the box. This
//! matches what a BVH built from the same triangles reports.

use mesh_types::{Aabb, MeshData, Point3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};
use crate::validate::check_topology;

/// Which vertices contribute to a mesh's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AabbPolicy {
    /// Only vertices referenced by at least one triangle.
    #[default]
    ReferencedOnly,
    /// Every vertex, referenced or not.
    AllVertices,
}

impl std::fmt::Display for AabbPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReferencedOnly => f.write_str("referenced"),
            Self::AllVertices => f.write_str("all"),
        }
    }
}

/// Compute a mesh's bounding box under the given policy.
///
/// # Errors
///
/// - [`AuditError::EmptyMesh`] if the mesh has no triangles.
/// - [`AuditError::InvalidMeshTopology`] if an index is out of range.
/// - [`AuditError::NanCoordinate`] if a contributing vertex has a NaN coordinate.
pub fn compute_aabb(mesh: &MeshData, policy: AabbPolicy) -> AuditResult<Aabb> {
    match policy {
        AabbPolicy::ReferencedOnly => compute_aabb_referenced(mesh),
        AabbPolicy::AllVertices => compute_aabb_all_vertices(mesh),
    }
}

/// Bounding box of the vertices referenced by at least one triangle.
///
/// Each referenced vertex contributes once, however many triangles share it.
///
/// # Errors
///
/// See [`compute_aabb`].
///
/// # Example
///
/// ```
/// use mesh_audit::compute_aabb_referenced;
/// use mesh_types::{MeshData, Point3, Vertex};
///
/// let vertices = vec![
///     Vertex::from_coords(0.0, 0.0, 0.0),
///     Vertex::from_coords(1.0, 0.0, 0.0),
///     Vertex::from_coords(0.0, 1.0, 0.0),
///     Vertex::from_coords(100.0, 100.0, 100.0), // unreferenced
/// ];
/// let mesh = MeshData::from_parts(vertices, vec![0, 1, 2]).unwrap();
///
/// let aabb = compute_aabb_referenced(&mesh).unwrap();
/// assert_eq!(aabb.max, Point3::new(1.0, 1.0, 0.0));
/// ```
pub fn compute_aabb_referenced(mesh: &MeshData) -> AuditResult<Aabb> {
    if mesh.triangle_count() == 0 {
        return Err(AuditError::EmptyMesh);
    }

    let vertex_count = mesh.vertex_count();
    let mut referenced = vec![false; vertex_count];
    for (position, &index) in mesh.indices().iter().enumerate() {
        let seen = referenced.get_mut(index as usize).ok_or(
            AuditError::InvalidMeshTopology {
                position,
                index,
                vertex_count,
            },
        )?;
        *seen = true;
    }

    let contributing = mesh
        .vertices()
        .iter()
        .zip(&referenced)
        .enumerate()
        .filter(|(_, (_, seen))| **seen)
        .map(|(i, (vertex, _))| (i, &vertex.position));

    let aabb = accumulate(contributing)?;
    debug!(
        referenced = referenced.iter().filter(|&&seen| seen).count(),
        total = vertex_count,
        "Computed referenced-only bounding box"
    );
    Ok(aabb)
}

/// Bounding box of every vertex in the mesh.
///
/// The mesh must still be valid and non-empty: the policy only changes which
/// vertices contribute.
///
/// # Errors
///
/// See [`compute_aabb`].
pub fn compute_aabb_all_vertices(mesh: &MeshData) -> AuditResult<Aabb> {
    if mesh.triangle_count() == 0 {
        return Err(AuditError::EmptyMesh);
    }
    check_topology(mesh)?;

    let aabb = accumulate(
        mesh.vertices()
            .iter()
            .enumerate()
            .map(|(i, vertex)| (i, &vertex.position)),
    )?;
    debug!(
        total = mesh.vertex_count(),
        "Computed all-vertex bounding box"
    );
    Ok(aabb)
}

/// Per-axis running min/max, starting from the infinities so that infinite
/// coordinates still produce the minimal box.
fn accumulate<'a>(points: impl Iterator<Item = (usize, &'a Point3<f64>)>) -> AuditResult<Aabb> {
    let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut any = false;

    for (vertex, point) in points {
        if point.iter().any(|c| c.is_nan()) {
            return Err(AuditError::NanCoordinate { vertex });
        }
        any = true;
        for axis in 0..3 {
            if point[axis] < min[axis] {
                min[axis] = point[axis];
            }
            if point[axis] > max[axis] {
                max[axis] = point[axis];
            }
        }
    }

    // Unreachable for a non-empty valid mesh.
    if !any {
        return Err(AuditError::EmptyMesh);
    }

    Ok(Aabb { min, max })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use mesh_types::Vertex;

    fn two_triangles_with_stray() -> MeshData {
        MeshData::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 1.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
                Vertex::from_coords(-50.0, 20.0, 9.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
        .unwrap()
    }

    #[test]
    fn referenced_ignores_stray_vertex() {
        let aabb = compute_aabb_referenced(&two_triangles_with_stray()).unwrap();
        assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn all_vertices_includes_stray_vertex() {
        let aabb = compute_aabb_all_vertices(&two_triangles_with_stray()).unwrap();
        assert_eq!(aabb.min, Point3::new(-50.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 20.0, 9.0));
    }

    #[test]
    fn policies_agree_without_stray_vertices() {
        let mesh = MeshData::from_parts(
            vec![
                Vertex::from_coords(-1.0, 2.0, 3.0),
                Vertex::from_coords(4.0, -5.0, 6.0),
                Vertex::from_coords(7.0, 8.0, -9.0),
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        assert_eq!(
            compute_aabb(&mesh, AabbPolicy::ReferencedOnly).unwrap(),
            compute_aabb(&mesh, AabbPolicy::AllVertices).unwrap()
        );
    }

    #[test]
    fn shared_vertices_are_idempotent() {
        let mesh = MeshData::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(2.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 3.0, 0.0),
            ],
            vec![0, 1, 2, 2, 1, 0, 0, 0, 0],
        )
        .unwrap();
        let aabb = compute_aabb_referenced(&mesh).unwrap();
        assert_eq!(aabb.max, Point3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn single_vertex_box_is_degenerate() {
        let mesh = MeshData::from_parts(vec![Vertex::from_coords(3.0, -1.0, 2.5)], vec![0, 0, 0])
            .unwrap();
        let aabb = compute_aabb_referenced(&mesh).unwrap();
        assert_eq!(aabb.min, aabb.max);
        assert_eq!(aabb.min, Point3::new(3.0, -1.0, 2.5));
    }

    #[test]
    fn extreme_magnitudes_are_kept() {
        let mesh = MeshData::from_parts(
            vec![
                Vertex::from_coords(f64::MAX, -f64::MAX, 0.0),
                Vertex::from_coords(-f64::MAX, f64::MAX, 0.0),
                Vertex::from_coords(0.0, 0.0, 0.0),
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        let aabb = compute_aabb_referenced(&mesh).unwrap();
        assert_eq!(aabb.min, Point3::new(-f64::MAX, -f64::MAX, 0.0));
        assert_eq!(aabb.max, Point3::new(f64::MAX, f64::MAX, 0.0));
    }

    #[test]
    fn infinite_coordinates_give_minimal_box() {
        let mesh = MeshData::from_parts(
            vec![
                Vertex::from_coords(f64::INFINITY, 0.0, 0.0),
                Vertex::from_coords(f64::INFINITY, 1.0, 0.0),
                Vertex::from_coords(f64::INFINITY, 0.0, f64::NEG_INFINITY),
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        let aabb = compute_aabb_referenced(&mesh).unwrap();
        assert_eq!(aabb.min, Point3::new(f64::INFINITY, 0.0, f64::NEG_INFINITY));
        assert_eq!(aabb.max, Point3::new(f64::INFINITY, 1.0, 0.0));
    }

    #[test]
    fn empty_mesh_is_rejected() {
        assert_eq!(
            compute_aabb_referenced(&MeshData::empty()),
            Err(AuditError::EmptyMesh)
        );
        let vertices_only =
            MeshData::from_parts(vec![Vertex::from_coords(1.0, 1.0, 1.0)], vec![]).unwrap();
        assert_eq!(
            compute_aabb_all_vertices(&vertices_only),
            Err(AuditError::EmptyMesh)
        );
    }

    #[test]
    fn invalid_index_is_rejected_by_both_policies() {
        let mesh = MeshData::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 3],
        )
        .unwrap();
        let expected = AuditError::InvalidMeshTopology {
            position: 2,
            index: 3,
            vertex_count: 3,
        };
        assert_eq!(compute_aabb_referenced(&mesh), Err(expected.clone()));
        assert_eq!(compute_aabb_all_vertices(&mesh), Err(expected));
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let mesh = MeshData::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(f64::NAN, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        assert_eq!(
            compute_aabb_referenced(&mesh),
            Err(AuditError::NanCoordinate { vertex: 1 })
        );
    }

    #[test]
    fn nan_in_unreferenced_vertex_only_matters_for_all_vertices() {
        let mesh = MeshData::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
                Vertex::from_coords(0.0, f64::NAN, 0.0),
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        assert!(compute_aabb_referenced(&mesh).is_ok());
        assert_eq!(
            compute_aabb_all_vertices(&mesh),
            Err(AuditError::NanCoordinate { vertex: 3 })
        );
    }

    #[test]
    fn policy_default_and_display() {
        assert_eq!(AabbPolicy::default(), AabbPolicy::ReferencedOnly);
        assert_eq!(AabbPolicy::ReferencedOnly.to_string(), "referenced");
        assert_eq!(AabbPolicy::AllVertices.to_string(), "all");
    }
}
