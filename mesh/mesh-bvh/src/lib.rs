//! Bounding volume hierarchy over indexed triangles.
//!
//! The hierarchy is built straight from a vertex slice and a flat index
//! list, the same input a GPU or ray-tracing BVH backend would receive.
//! Its root bounding box is an independent estimate of the mesh bounds and
//! is used by `mesh-audit` as a cross-check oracle.
//!
//! # Example
//!
//! ```
//! use mesh_bvh::{Bvh, BvhParams};
//! use mesh_types::{Point3, Vertex};
//!
//! let vertices = [
//!     Vertex::from_coords(0.0, 0.0, 0.0),
//!     Vertex::from_coords(1.0, 0.0, 0.0),
//!     Vertex::from_coords(0.5, 1.0, 0.0),
//! ];
//!
//! let bvh = Bvh::build(&vertices, &[0, 1, 2], 1, &BvhParams::default()).unwrap();
//! assert_eq!(bvh.triangle_count(), 1);
//!
//! let bounds = bvh.root_bounds().unwrap();
//! assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bvh;
mod error;
mod params;

pub use bvh::{Bvh, BvhNode, BvhStats, NodeBounds};
pub use error::{BvhError, BvhResult};
pub use params::BvhParams;
