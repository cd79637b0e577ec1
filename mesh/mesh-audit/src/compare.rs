//! Tolerant comparison of vectors and bounding boxes.

use mesh_types::{Aabb, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default absolute tolerance: the machine epsilon of `f64`.
pub const DEFAULT_EPSILON: f64 = f64::EPSILON;

/// Check if two vectors agree component-wise within an absolute tolerance.
///
/// Each of `|a.x - b.x|`, `|a.y - b.y|`, `|a.z - b.z|` must be `<= epsilon`.
/// The test is not scaled by magnitude, so with [`DEFAULT_EPSILON`] large
/// coordinates only compare equal when they are bit-identical or adjacent.
///
/// Bit-identical components always match, so the test is reflexive even for
/// infinite or NaN components. Otherwise a NaN component never matches.
///
/// # Example
///
/// ```
/// use mesh_audit::{DEFAULT_EPSILON, nearly_equal};
/// use mesh_types::Vector3;
///
/// let a = Vector3::new(1.0, 2.0, 3.0);
/// assert!(nearly_equal(&a, &a, DEFAULT_EPSILON));
/// assert!(!nearly_equal(&a, &Vector3::new(1.0, 2.0, 3.1), DEFAULT_EPSILON));
/// ```
#[must_use]
pub fn nearly_equal(a: &Vector3<f64>, b: &Vector3<f64>, epsilon: f64) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(&x, &y)| within(x, y, epsilon))
}

/// `inf - inf` is NaN, so identical components are matched before subtracting.
/// A non-finite component only matches itself.
fn within(x: f64, y: f64, allowed: f64) -> bool {
    x.to_bits() == y.to_bits() || (x.is_finite() && y.is_finite() && (x - y).abs() <= allowed)
}

/// Absolute difference, zero for identical components.
fn deviation(x: f64, y: f64) -> f64 {
    if x.to_bits() == y.to_bits() {
        0.0
    } else {
        (x - y).abs()
    }
}

/// Tolerance used when comparing bounding boxes.
///
/// A component pair `(a, b)` matches when
/// `|a - b| <= max(absolute, relative * max(|a|, |b|))`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tolerance {
    /// Absolute tolerance.
    pub absolute: f64,
    /// Relative tolerance, scaled by the larger magnitude.
    pub relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::absolute(DEFAULT_EPSILON)
    }
}

impl Tolerance {
    /// A purely absolute tolerance.
    #[must_use]
    pub const fn absolute(epsilon: f64) -> Self {
        Self {
            absolute: epsilon,
            relative: 0.0,
        }
    }

    /// An absolute floor combined with a relative tolerance.
    #[must_use]
    pub const fn combined(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    /// Exact comparison.
    #[must_use]
    pub const fn exact() -> Self {
        Self::absolute(0.0)
    }

    /// Check a single component pair.
    #[must_use]
    pub fn component_matches(&self, a: f64, b: f64) -> bool {
        let allowed = self.absolute.max(self.relative * a.abs().max(b.abs()));
        within(a, b, allowed)
    }

    /// Check every component of two vectors.
    #[must_use]
    pub fn vectors_match(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        a.iter()
            .zip(b.iter())
            .all(|(&x, &y)| self.component_matches(x, y))
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.relative == 0.0 {
            write!(f, "abs {:e}", self.absolute)
        } else {
            write!(f, "abs {:e}, rel {:e}", self.absolute, self.relative)
        }
    }
}

/// Outcome of comparing a locally computed box against an oracle's.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AabbComparison {
    /// Box computed by this crate.
    pub local: Aabb,
    /// Box reported by the oracle.
    pub oracle: Aabb,
    /// Tolerance the verdicts were made with.
    pub tolerance: Tolerance,
    /// Whether the minimum corners match.
    pub min_matches: bool,
    /// Whether the maximum corners match.
    pub max_matches: bool,
    /// Largest absolute component difference across both corners.
    pub max_deviation: f64,
}

impl AabbComparison {
    /// Check if both corners match.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.min_matches && self.max_matches
    }
}

impl std::fmt::Display for AabbComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.is_match() { "match" } else { "MISMATCH" };
        writeln!(f, "AABB comparison: {verdict} ({})", self.tolerance)?;
        writeln!(f, "  local:  {}", self.local)?;
        writeln!(f, "  oracle: {}", self.oracle)?;
        if !self.min_matches {
            writeln!(f, "  min corners differ")?;
        }
        if !self.max_matches {
            writeln!(f, "  max corners differ")?;
        }
        write!(f, "  max deviation: {:e}", self.max_deviation)
    }
}

/// Compare two bounding boxes corner by corner.
///
/// # Example
///
/// ```
/// use mesh_audit::{Tolerance, compare_aabbs};
/// use mesh_types::{Aabb, Point3};
///
/// let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// let b = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.5));
///
/// assert!(compare_aabbs(&a, &a, &Tolerance::default()).is_match());
///
/// let result = compare_aabbs(&a, &b, &Tolerance::default());
/// assert!(result.min_matches);
/// assert!(!result.max_matches);
/// ```
#[must_use]
pub fn compare_aabbs(local: &Aabb, oracle: &Aabb, tolerance: &Tolerance) -> AabbComparison {
    let max_deviation = local
        .min
        .iter()
        .zip(oracle.min.iter())
        .chain(local.max.iter().zip(oracle.max.iter()))
        .map(|(&a, &b)| deviation(a, b))
        .fold(0.0_f64, f64::max);

    AabbComparison {
        local: *local,
        oracle: *oracle,
        tolerance: *tolerance,
        min_matches: tolerance.vectors_match(&local.min.coords, &oracle.min.coords),
        max_matches: tolerance.vectors_match(&local.max.coords, &oracle.max.coords),
        max_deviation,
    }
}
