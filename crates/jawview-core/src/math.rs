//! Math utilities
//!
//! Bounding boxes over glam vectors and order statistics over point attributes.

pub use glam::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty AABB
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Build the tightest box around a set of points.
    ///
    /// Non-finite points are ignored; with no finite points the result is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for point in points {
            if point.is_finite() {
                aabb.expand_to_include(*point);
            }
        }
        aabb
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Per-axis span (max - min); zero for an empty box
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    /// Check if the AABB is empty
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand the AABB to include a point
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Quantile of the finite values using linear interpolation between order
/// statistics (`q = 0` is the minimum, `q = 1` the maximum).
///
/// Returns `None` when no value is finite.
pub fn quantile(values: impl IntoIterator<Item = f32>, q: f64) -> Option<f64> {
    let mut finite: Vec<f64> = values
        .into_iter()
        .filter(|v| v.is_finite())
        .map(f64::from)
        .collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);

    let q = q.clamp(0.0, 1.0);
    let position = q * (finite.len() - 1) as f64;
    let lo = position.floor() as usize;
    let hi = position.ceil() as usize;
    let fraction = position - lo as f64;
    Some(finite[lo] + (finite[hi] - finite[lo]) * fraction)
}
