//! Text mesh loading.
//!
//! This crate reads the plain-text mesh description consumed by the audit
//! pipeline:
//!
//! - [`parse_vector3`] - One delimited coordinate triple, e.g. `(1.0, 2.3, 33.0)`
//! - [`parse_mesh`] / [`parse_mesh_str`] - A full mesh from a reader or string
//! - [`load_mesh`] / [`try_load_mesh`] - A full mesh from a file
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::load_mesh;
//!
//! let loaded = load_mesh("mesh_triangles.txt").unwrap();
//! for issue in &loaded.truncated_lines {
//!     eprintln!("{issue}");
//! }
//! println!("{} triangles", loaded.mesh.triangle_count());
//! ```
//!
//! # Recoverable vs. fatal failures
//!
//! A source that cannot be opened is recoverable: [`load_mesh`] logs it and
//! yields an empty mesh. A vertex line that cannot be parsed is fatal to the
//! load and is returned as [`IoError::Parse`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod text;
mod vector;

pub use error::{IoError, IoResult};
pub use text::{
    INDEX_SECTION_MARKER, LoadedMesh, TruncatedLine, load_mesh, parse_mesh, parse_mesh_str,
    try_load_mesh,
};
pub use vector::parse_vector3;
