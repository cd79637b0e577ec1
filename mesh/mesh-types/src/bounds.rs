//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box given by its two extreme corners.
///
/// Boxes built with [`Aabb::new`] or [`Aabb::from_points`] satisfy
/// `min <= max` on every axis. There is no empty box: a set of zero points
/// has no bounds, so [`Aabb::from_points`] returns `None` for it.
///
/// The fields are public so that a box reported by an external backend can
/// be represented exactly as reported, inverted corners included.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
/// assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
/// assert!(!aabb.contains(&Point3::new(5.0, 11.0, 5.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Corner with the smallest coordinate on each axis.
    pub min: Point3<f64>,
    /// Corner with the largest coordinate on each axis.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Box spanned by two opposite corners, in either order.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Zero-volume box around one point.
    #[inline]
    #[must_use]
    pub const fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box containing every point, `None` for no points.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let points = [
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(10.0, 5.0, 3.0),
    ///     Point3::new(-2.0, 8.0, 1.0),
    /// ];
    ///
    /// let aabb = Aabb::from_points(points.iter()).unwrap();
    /// assert_eq!(aabb.min, Point3::new(-2.0, 0.0, 0.0));
    /// assert_eq!(aabb.max, Point3::new(10.0, 8.0, 3.0));
    ///
    /// assert!(Aabb::from_points(std::iter::empty()).is_none());
    /// ```
    #[must_use]
    pub fn from_points<'a>(mut points: impl Iterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let first = Self::from_point(*points.next()?);
        Some(points.fold(first, |mut aabb, point| {
            aabb.expand_to_include(point);
            aabb
        }))
    }

    /// Grow the box so that it contains `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Midpoint of the two corners.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Check if `point` lies inside the box or on its boundary.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }
}

impl std::fmt::Display for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (lo, hi) = (&self.min, &self.max);
        write!(
            f,
            "min=({}, {}, {}) max=({}, {}, {})",
            lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
        )
    }
}
