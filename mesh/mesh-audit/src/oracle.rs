//! Cross-checking local bounds against an independently built BVH.
//!
//! A ray-tracing or collision backend receives exactly the same vertex and
//! index buffers as this crate and builds its own hierarchy. If its root box
//! disagrees with the box computed here, one of the two is wrong about the
//! geometry, and the disagreement is worth surfacing before the mesh goes any
//! further.
//!
//! The backend is abstracted behind [`BvhBuilder`] / [`BvhHandle`]; the
//! in-tree implementation is [`BvhOracle`], backed by `mesh-bvh`.

use mesh_bvh::{Bvh, BvhParams};
use mesh_types::{Aabb, MeshData, Point3, Vertex};
use tracing::{info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::{AabbPolicy, compute_aabb};
use crate::compare::{AabbComparison, compare_aabbs};
use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};
use crate::validate::check_topology;

/// A backend that can build a bounding volume hierarchy from raw buffers.
pub trait BvhBuilder {
    /// The built hierarchy.
    type Handle: BvhHandle;

    /// Build a hierarchy over `triangle_count` triangles.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the buffers.
    fn build(
        &self,
        vertices: &[Vertex],
        indices: &[u32],
        triangle_count: usize,
    ) -> AuditResult<Self::Handle>;
}

/// A built hierarchy that can report its root bounds.
pub trait BvhHandle {
    /// Minimum corner of the root box, `None` if the hierarchy is empty.
    fn aabb_min(&self) -> Option<Point3<f64>>;

    /// Maximum corner of the root box, `None` if the hierarchy is empty.
    fn aabb_max(&self) -> Option<Point3<f64>>;

    /// Root box as reported, corners taken verbatim.
    fn aabb(&self) -> Option<Aabb> {
        Some(Aabb {
            min: self.aabb_min()?,
            max: self.aabb_max()?,
        })
    }
}

impl BvhHandle for Bvh {
    fn aabb_min(&self) -> Option<Point3<f64>> {
        self.root_bounds().map(|b| b.min)
    }

    fn aabb_max(&self) -> Option<Point3<f64>> {
        self.root_bounds().map(|b| b.max)
    }

    fn aabb(&self) -> Option<Aabb> {
        self.root_bounds()
    }
}

/// [`BvhBuilder`] backed by `mesh-bvh`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhOracle {
    params: BvhParams,
}

impl BvhOracle {
    /// Create an oracle with the given construction parameters.
    #[must_use]
    pub const fn new(params: BvhParams) -> Self {
        Self { params }
    }
}

impl BvhBuilder for BvhOracle {
    type Handle = Bvh;

    fn build(
        &self,
        vertices: &[Vertex],
        indices: &[u32],
        triangle_count: usize,
    ) -> AuditResult<Bvh> {
        Ok(Bvh::build(vertices, indices, triangle_count, &self.params)?)
    }
}

/// Result of a cross-check.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrossCheck {
    /// Policy the local box was computed with.
    pub policy: AabbPolicy,
    /// Corner-by-corner comparison.
    pub comparison: AabbComparison,
}

impl CrossCheck {
    /// Check if the local box agrees with the oracle.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.comparison.is_match()
    }
}

impl std::fmt::Display for CrossCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Policy: {}", self.policy)?;
        write!(f, "{}", self.comparison)
    }
}

/// Validate a mesh, compute its bounding box, and compare it with an oracle.
///
/// A mismatch is not an error. It is logged as a warning naming both boxes
/// and reported through [`CrossCheck::is_match`].
///
/// # Errors
///
/// - [`AuditError::InvalidMeshTopology`] if an index is out of range.
/// - [`AuditError::EmptyMesh`] if the mesh has no triangles.
/// - [`AuditError::NanCoordinate`] if a contributing vertex is NaN.
/// - [`AuditError::Oracle`] or [`AuditError::OracleBoundsMissing`] if the
///   oracle fails.
pub fn cross_check<B: BvhBuilder>(
    mesh: &MeshData,
    builder: &B,
    config: &AuditConfig,
) -> AuditResult<CrossCheck> {
    check_topology(mesh)?;
    let local = compute_aabb(mesh, config.policy)?;

    let triangle_count = mesh.triangle_count();
    let handle = builder.build(mesh.vertices(), mesh.indices(), triangle_count)?;
    let oracle = handle
        .aabb()
        .ok_or(AuditError::OracleBoundsMissing { triangle_count })?;

    let comparison = compare_aabbs(&local, &oracle, &config.tolerance);
    if comparison.is_match() {
        info!(
            triangles = triangle_count,
            policy = %config.policy,
            "Bounding box matches oracle: {local}"
        );
    } else {
        if !comparison.min_matches {
            warn!(
                "AABB min mismatch: local {:?} vs oracle {:?}",
                local.min.coords.as_slice(),
                oracle.min.coords.as_slice()
            );
        }
        if !comparison.max_matches {
            warn!(
                "AABB max mismatch: local {:?} vs oracle {:?}",
                local.max.coords.as_slice(),
                oracle.max.coords.as_slice()
            );
        }
        warn!(
            deviation = comparison.max_deviation,
            tolerance = %config.tolerance,
            "Bounding box disagrees with oracle"
        );
    }

    Ok(CrossCheck {
        policy: config.policy,
        comparison,
    })
}
