//! Configuration and presets for mesh audits.
//!
//! # Presets
//!
//! - [`AuditConfig::default()`] - Referenced-only bounds, machine-epsilon tolerance
//! - [`AuditConfig::strict()`] - Exact corner comparison
//! - [`AuditConfig::for_cross_check()`] - Combined absolute/relative tolerance for
//!   comparing against backends that may round differently
//!
//! # Example
//!
//! ```
//! use mesh_audit::{AabbPolicy, AuditConfig, Tolerance};
//!
//! let config = AuditConfig::default()
//!     .with_policy(AabbPolicy::AllVertices)
//!     .with_tolerance(Tolerance::absolute(1e-6));
//! assert_eq!(config.policy, AabbPolicy::AllVertices);
//! ```

use mesh_bvh::BvhParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::AabbPolicy;
use crate::compare::Tolerance;

/// Configuration for a mesh audit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuditConfig {
    /// Which vertices contribute to the local bounding box.
    pub policy: AabbPolicy,

    /// Tolerance for comparing the local box against the oracle.
    pub tolerance: Tolerance,

    /// Parameters for the BVH oracle.
    pub bvh: BvhParams,
}

impl AuditConfig {
    /// Exact comparison: any difference between the boxes is a mismatch.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_audit::AuditConfig;
    ///
    /// let config = AuditConfig::strict();
    /// assert_eq!(config.tolerance.absolute, 0.0);
    /// ```
    #[must_use]
    pub fn strict() -> Self {
        Self {
            tolerance: Tolerance::exact(),
            ..Self::default()
        }
    }

    /// Combined tolerance, absolute `1e-9` and relative `1e-12`.
    #[must_use]
    pub fn for_cross_check() -> Self {
        Self {
            tolerance: Tolerance::combined(1e-9, 1e-12),
            ..Self::default()
        }
    }

    /// Set the bounding-box policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: AabbPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the comparison tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the BVH oracle parameters.
    #[must_use]
    pub const fn with_bvh_params(mut self, bvh: BvhParams) -> Self {
        self.bvh = bvh;
        self
    }
}
