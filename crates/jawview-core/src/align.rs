//! Alignment heuristic
//!
//! Brings the lower scan to the upper scan's bounding-box size, matches the
//! centers and applies fixed presentation offsets. There is no error metric:
//! the result is only meant to look roughly aligned for typical scans.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;
use crate::{CoreError, CoreResult};

/// Which point stands for a mesh's position when matching centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Centering {
    /// Center of the axis-aligned bounding box
    #[default]
    BoundsCenter,
    /// Mean of all points
    PointMean,
}

/// Alignment parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignParams {
    /// Center used for matching
    pub centering: Centering,
    /// Extra offset applied to the lower scan after centering
    pub lower_offset: Vec3,
    /// Offset applied to the upper scan
    pub upper_offset: Vec3,
    /// Stand-in denominator for a zero lower extent
    pub zero_extent_epsilon: f32,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            centering: Centering::BoundsCenter,
            lower_offset: Vec3::new(0.0, -8.0, 0.0),
            upper_offset: Vec3::new(-1.0, 1.0, 3.0),
            zero_extent_epsilon: 1e-9,
        }
    }
}

impl AlignParams {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.zero_extent_epsilon.is_finite() && self.zero_extent_epsilon > 0.0) {
            return Err(CoreError::invalid(
                "zero_extent_epsilon",
                format!("must be a positive number, got {}", self.zero_extent_epsilon),
            ));
        }
        if !self.lower_offset.is_finite() || !self.upper_offset.is_finite() {
            return Err(CoreError::invalid("offset", "offsets must be finite"));
        }
        Ok(())
    }

    fn center_of(&self, mesh: &Mesh) -> Vec3 {
        match self.centering {
            Centering::BoundsCenter => mesh.center(),
            Centering::PointMean => mesh.centroid(),
        }
    }
}

/// Per-axis factor that maps the lower extent onto the upper extent.
///
/// A zero lower extent is replaced by `epsilon` so the division stays finite.
pub fn scale_factors(upper_extent: Vec3, lower_extent: Vec3, epsilon: f32) -> Vec3 {
    let guard = |e: f32| if e == 0.0 { epsilon } else { e };
    let denominator = Vec3::new(
        guard(lower_extent.x),
        guard(lower_extent.y),
        guard(lower_extent.z),
    );
    upper_extent / denominator
}

/// Scale `lower` about the origin so its bounding box matches `upper`'s.
/// Returns the factor that was applied.
pub fn normalize_scale(upper: &Mesh, lower: &mut Mesh, epsilon: f32) -> Vec3 {
    let factor = scale_factors(upper.bounds().extent(), lower.bounds().extent(), epsilon);
    lower.scale(factor);
    factor
}

/// Prepare a pair for display: normalize the lower scan's scale, move it
/// onto the upper scan's center plus the lower offset, then shift the upper
/// scan by its own offset.
pub fn prepare_pair(upper: &mut Mesh, lower: &mut Mesh, params: &AlignParams) {
    let factor = normalize_scale(upper, lower, params.zero_extent_epsilon);

    let translation = params.center_of(upper) - params.center_of(lower) + params.lower_offset;
    lower.translate(translation);
    upper.translate(params.upper_offset);

    log::trace!("aligned pair: scale {:?}, lower shift {:?}", factor, translation);
}
