//! Z-buffered triangle rasterizer

use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};

/// Color target plus depth buffer
pub struct Framebuffer {
    color: RgbImage,
    depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self {
            color: RgbImage::from_pixel(width, height, Rgb(background)),
            depth: vec![f32::NEG_INFINITY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn into_image(self) -> RgbImage {
        self.color
    }

    /// Fill a triangle given in screen space (x, y in pixels, z = depth with
    /// larger values closer). Corner colors are in `[0, 255]` and are
    /// interpolated across the triangle. Returns the number of pixels written.
    pub fn fill_triangle(&mut self, corners: [Vec3; 3], colors: [Vec3; 3]) -> u64 {
        let [a, b, c] = corners;
        let area = edge(a.truncate(), b.truncate(), c.truncate());
        if !area.is_finite() || area.abs() < 1e-12 {
            return 0;
        }

        let (width, height) = (self.width() as f32, self.height() as f32);
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0);
        let max_x = a.x.max(b.x).max(c.x).ceil().min(width - 1.0);
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0);
        let max_y = a.y.max(b.y).max(c.y).ceil().min(height - 1.0);
        if min_x > max_x || min_y > max_y {
            return 0;
        }

        let mut written = 0;
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b.truncate(), c.truncate(), p) / area;
                let w1 = edge(c.truncate(), a.truncate(), p) / area;
                let w2 = edge(a.truncate(), b.truncate(), p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * a.z + w1 * b.z + w2 * c.z;
                let slot = (y * self.width() + x) as usize;
                if depth <= self.depth[slot] {
                    continue;
                }
                self.depth[slot] = depth;

                let color = (colors[0] * w0 + colors[1] * w1 + colors[2] * w2)
                    .round()
                    .clamp(Vec3::ZERO, Vec3::splat(255.0));
                self.color
                    .put_pixel(x, y, Rgb([color.x as u8, color.y as u8, color.z as u8]));
                written += 1;
            }
        }
        written
    }
}

/// Twice the signed area of triangle (a, b, p)
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
