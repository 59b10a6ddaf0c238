//! # Jawview Renderer
//!
//! CPU renderer that turns a prepared pair into an RGB snapshot.
//!
//! ## Features
//! - Orthographic camera looking down a coordinate axis, fitted to the scene
//! - Z-buffered triangle fill with per-point color interpolation
//! - Two-sided Lambert shading against the view direction
//! - PNG encoding for the web view and snapshot files

pub mod camera;
pub mod raster;

pub use camera::{Camera, CameraView};
pub use raster::Framebuffer;

use std::io::Cursor;
use std::path::Path;

use glam::Vec3;
use image::{ImageFormat, RgbImage};
use jawview_core::{Mesh, PatientPair, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Renderer errors
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Invalid frame size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Invalid render setting: {0}")]
    InvalidSetting(String),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Largest accepted frame side in pixels
pub const MAX_FRAME_SIDE: u32 = 8192;

/// Snapshot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    pub background: Rgb,
    pub view: CameraView,
    /// Free border around the scene, as a fraction of each side
    pub margin: f32,
    /// Light level of surfaces seen edge-on
    pub ambient: f32,
    /// Color for meshes without a color attribute
    pub default_color: Rgb,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            background: [255, 255, 255],
            view: CameraView::Xy,
            margin: 0.05,
            ambient: 0.35,
            default_color: [200, 200, 200],
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> RendererResult<()> {
        let side_ok = |side: u32| (1..=MAX_FRAME_SIDE).contains(&side);
        if !side_ok(self.width) || !side_ok(self.height) {
            return Err(RendererError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..0.5).contains(&self.margin) {
            return Err(RendererError::InvalidSetting(format!(
                "margin must be in [0, 0.5), got {}",
                self.margin
            )));
        }
        if !(0.0..=1.0).contains(&self.ambient) {
            return Err(RendererError::InvalidSetting(format!(
                "ambient must be in [0, 1], got {}",
                self.ambient
            )));
        }
        Ok(())
    }
}

/// Renderer statistics for the last frame
#[derive(Debug, Clone, Default)]
pub struct RendererStats {
    /// Triangles submitted
    pub triangles: u32,
    /// Pixels that passed the depth test
    pub pixels_written: u64,
}

/// Main renderer instance
pub struct Renderer {
    settings: RenderSettings,
    stats: RendererStats,
    frame_number: u64,
}

impl Renderer {
    /// Create a new renderer
    pub fn new(settings: RenderSettings) -> RendererResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            stats: RendererStats::default(),
            frame_number: 0,
        })
    }

    /// Get the render settings
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Get statistics of the last frame
    pub fn stats(&self) -> &RendererStats {
        &self.stats
    }

    /// Get the number of frames rendered so far
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Render both scans of a pair into one frame
    pub fn render_pair(&mut self, pair: &PatientPair) -> RgbImage {
        self.render(&[&pair.upper, &pair.lower])
    }

    /// Render meshes into one frame, framing all of them
    pub fn render(&mut self, meshes: &[&Mesh]) -> RgbImage {
        self.frame_number += 1;
        self.stats = RendererStats::default();

        let settings = &self.settings;
        let camera = Camera::fit(
            settings.view,
            meshes.iter().flat_map(|m| m.points.iter()),
            settings.width,
            settings.height,
            settings.margin,
        );
        let mut framebuffer = Framebuffer::new(settings.width, settings.height, settings.background);
        let fallback = color_vec(settings.default_color);

        for mesh in meshes {
            let projected: Vec<Vec3> = mesh.points.iter().map(|p| camera.project(*p)).collect();
            let color_of = |i: u32| mesh.color(i as usize).map(color_vec).unwrap_or(fallback);

            for (f, &[a, b, c]) in mesh.faces.iter().enumerate() {
                let [pa, pb, pc] = mesh.triangle(f);
                let normal = (pb - pa).cross(pc - pa).normalize_or_zero();
                let light = settings.ambient + (1.0 - settings.ambient) * normal.dot(camera.toward()).abs();

                self.stats.triangles += 1;
                self.stats.pixels_written += framebuffer.fill_triangle(
                    [projected[a as usize], projected[b as usize], projected[c as usize]],
                    [color_of(a) * light, color_of(b) * light, color_of(c) * light],
                );
            }
        }

        log::trace!(
            "frame {}: {} triangles, {} pixels",
            self.frame_number,
            self.stats.triangles,
            self.stats.pixels_written
        );
        framebuffer.into_image()
    }
}

fn color_vec(color: Rgb) -> Vec3 {
    Vec3::new(color[0] as f32, color[1] as f32, color[2] as f32)
}

/// Encode a frame as PNG bytes
pub fn encode_png(image: &RgbImage) -> RendererResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Write a frame to a PNG file
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> RendererResult<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
