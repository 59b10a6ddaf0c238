//! # Jawview Core
//!
//! Core library for the jaw scan viewer.
//!
//! This crate provides everything that does not touch the filesystem or a screen:
//! - **Naming**: patient id and jaw role parsed from scan file names
//! - **Pairing**: grouping file names into complete upper/lower pairs
//! - **Mesh**: triangle mesh with an optional per-point RGB attribute
//! - **Alignment**: bounding-box scale normalization and center matching
//! - **Coloring**: tooth/gum classification from curvature or height
//! - **Navigation**: clamped index stepping through the pair list

pub mod align;
pub mod colorize;
pub mod curvature;
pub mod math;
pub mod mesh;
pub mod naming;
pub mod navigation;
pub mod pairing;

pub use align::{AlignParams, Centering, normalize_scale, prepare_pair, scale_factors};
pub use colorize::{ColorMode, ColorizeParams, MaskSource, RegionMask, classify_regions, colorize, paint_pair};
pub use math::{Aabb, quantile};
pub use mesh::{Mesh, Rgb};
pub use naming::{FileNameRecord, PatientId, Role, detect_role, extract_id};
pub use navigation::{Browser, Navigator, NavigatorStatus};
pub use pairing::{PairPlan, PlannedPair, SkipReason, Skipped, plan_pairs};

use thiserror::Error;

/// Core errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Face {face} references point {index}, mesh has {count} points")]
    FaceOutOfBounds { face: usize, index: u32, count: usize },
}

impl CoreError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// One patient's prepared upper and lower scans.
#[derive(Debug, Clone)]
pub struct PatientPair {
    /// Upper jaw mesh
    pub upper: Mesh,
    /// Lower jaw mesh
    pub lower: Mesh,
    /// Patient id shared by both files
    pub id: PatientId,
}

impl PatientPair {
    pub fn new(upper: Mesh, lower: Mesh, id: PatientId) -> Self {
        Self { upper, lower, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = CoreError::invalid("top_fraction", "must be in (0, 1]");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `top_fraction`: must be in (0, 1]"
        );
    }
}
