//! Orthographic camera
//!
//! Looks straight down one coordinate axis and fits the given points into
//! the frame with a margin.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Which coordinate plane faces the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraView {
    /// x to the right, y up, viewer on +z
    #[default]
    Xy,
    /// x to the right, z up, viewer on -y
    Xz,
    /// y to the right, z up, viewer on +x
    Yz,
}

impl CameraView {
    /// Screen right, screen up and toward-viewer axes
    pub fn axes(&self) -> (Vec3, Vec3, Vec3) {
        match self {
            Self::Xy => (Vec3::X, Vec3::Y, Vec3::Z),
            Self::Xz => (Vec3::X, Vec3::Z, Vec3::NEG_Y),
            Self::Yz => (Vec3::Y, Vec3::Z, Vec3::X),
        }
    }
}

impl std::str::FromStr for CameraView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xy" => Ok(Self::Xy),
            "xz" => Ok(Self::Xz),
            "yz" => Ok(Self::Yz),
            other => Err(format!("unknown camera view `{other}` (expected xy, xz or yz)")),
        }
    }
}

/// Camera fitted to a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    right: Vec3,
    up: Vec3,
    toward: Vec3,
    /// Scene point (in screen-plane coordinates) mapped to the frame center
    center: Vec2,
    /// Pixels per scene unit
    scale: f32,
    half_size: Vec2,
}

impl Camera {
    /// Fit the finite `points` into a `width` x `height` frame, leaving
    /// `margin` (a fraction of each side) free around them.
    pub fn fit<'a>(
        view: CameraView,
        points: impl IntoIterator<Item = &'a Vec3>,
        width: u32,
        height: u32,
        margin: f32,
    ) -> Self {
        let (right, up, toward) = view.axes();
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in points.into_iter().filter(|p| p.is_finite()) {
            let q = Vec2::new(p.dot(right), p.dot(up));
            min = min.min(q);
            max = max.max(q);
        }

        let half_size = Vec2::new(width as f32, height as f32) * 0.5;
        if min.x > max.x {
            return Self {
                right,
                up,
                toward,
                center: Vec2::ZERO,
                scale: 1.0,
                half_size,
            };
        }

        let span = max - min;
        let usable = Vec2::new(width as f32, height as f32) * (1.0 - 2.0 * margin).max(0.05);
        let scale = match (span.x > 0.0, span.y > 0.0) {
            (true, true) => (usable.x / span.x).min(usable.y / span.y),
            (true, false) => usable.x / span.x,
            (false, true) => usable.y / span.y,
            (false, false) => 1.0,
        };

        Self {
            right,
            up,
            toward,
            center: (min + max) * 0.5,
            scale,
            half_size,
        }
    }

    /// Direction from the scene toward the viewer
    pub fn toward(&self) -> Vec3 {
        self.toward
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Screen position in pixels (origin top-left, y down) and depth
    /// (larger is closer to the viewer).
    pub fn project(&self, p: Vec3) -> Vec3 {
        let q = Vec2::new(p.dot(self.right), p.dot(self.up)) - self.center;
        Vec3::new(
            self.half_size.x + q.x * self.scale,
            self.half_size.y - q.y * self.scale,
            p.dot(self.toward),
        )
    }
}
