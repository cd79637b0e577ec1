//! Core value types for the mesh audit pipeline.
//!
//! This crate provides the data model shared by the loader, the validator
//! and the bounding-box computations:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`MeshData`] - A vertex list plus a flat triangle index list
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Example
//!
//! ```
//! use mesh_types::{MeshData, Vertex};
//!
//! let vertices = vec![
//!     Vertex::from_coords(0.0, 0.0, 0.0),
//!     Vertex::from_coords(1.0, 0.0, 0.0),
//!     Vertex::from_coords(0.0, 1.0, 0.0),
//! ];
//! let mesh = MeshData::from_parts(vertices, vec![0, 1, 2]).unwrap();
//!
//! assert_eq!(mesh.triangle_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod error;
mod mesh;
mod vertex;

pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use mesh::MeshData;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
