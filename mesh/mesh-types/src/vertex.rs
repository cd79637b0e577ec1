//! Vertex type.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh vertex: a position and nothing else.
///
/// Backends that need padded or SIMD-aligned vertex layouts convert from
/// this type themselves.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Vector3, Vertex};
///
/// let parsed: Vertex = Vector3::new(1.0, 2.3, 33.0).into();
/// assert_eq!(parsed, Vertex::new(Point3::new(1.0, 2.3, 33.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Position in model space.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Vertex at `position`.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Vertex at `(x, y, z)`.
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

/// The vector is read as the offset from the origin.
impl From<Vector3<f64>> for Vertex {
    fn from(coords: Vector3<f64>) -> Self {
        Self::new(Point3::from(coords))
    }
}

impl From<[f64; 3]> for Vertex {
    fn from(coords: [f64; 3]) -> Self {
        Self::new(Point3::from(coords))
    }
}
