//! Mesh auditing: topology validation, bounding boxes, and oracle cross-checks.
//!
//! This crate provides:
//! - Topology validation ([`is_valid_mesh`], [`check_topology`], [`validate_mesh`])
//! - Bounding boxes over referenced or all vertices ([`compute_aabb`])
//! - Tolerant vector and box comparison ([`nearly_equal`], [`compare_aabbs`])
//! - Cross-checking against an independent BVH ([`cross_check`])
//!
//! # Example
//!
//! ```
//! use mesh_audit::{AuditConfig, BvhOracle, compute_aabb_referenced, cross_check};
//! use mesh_types::{MeshData, Point3, Vertex};
//!
//! let vertices = vec![
//!     Vertex::from_coords(0.0, 0.0, 0.0),
//!     Vertex::from_coords(1.0, 0.0, 0.0),
//!     Vertex::from_coords(0.0, 1.0, 0.0),
//! ];
//! let mesh = MeshData::from_parts(vertices, vec![0, 1, 2]).unwrap();
//!
//! let aabb = compute_aabb_referenced(&mesh).unwrap();
//! assert_eq!(aabb.max, Point3::new(1.0, 1.0, 0.0));
//!
//! let config = AuditConfig::default();
//! let check = cross_check(&mesh, &BvhOracle::new(config.bvh), &config).unwrap();
//! assert!(check.is_match());
//! ```
//!
//! # Errors vs. diagnostics
//!
//! Invalid topology and empty meshes are errors ([`AuditError`]). A bounding
//! box that disagrees with the oracle is not an error: it is reported in the
//! returned [`CrossCheck`] and logged as a warning.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod bounds;
mod compare;
mod config;
mod error;
mod oracle;
mod validate;

pub use bounds::{AabbPolicy, compute_aabb, compute_aabb_all_vertices, compute_aabb_referenced};
pub use compare::{AabbComparison, DEFAULT_EPSILON, Tolerance, compare_aabbs, nearly_equal};
pub use config::AuditConfig;
pub use error::{AuditError, AuditResult};
pub use oracle::{BvhBuilder, BvhHandle, BvhOracle, CrossCheck, cross_check};
pub use validate::{TopologyReport, check_topology, is_valid_mesh, validate_mesh};
