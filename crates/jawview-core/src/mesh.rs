//! Triangle mesh
//!
//! Points, triangular faces and an optional per-point color attribute.

use glam::Vec3;

use crate::math::Aabb;
use crate::{CoreError, CoreResult};

/// 8-bit RGB color
pub type Rgb = [u8; 3];

/// Triangle mesh with an optional per-point RGB attribute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Point positions
    pub points: Vec<Vec3>,
    /// Triangles as indices into `points`
    pub faces: Vec<[u32; 3]>,
    /// Per-point colors, one entry per point when present
    pub colors: Option<Vec<Rgb>>,
}

impl Mesh {
    /// Create a mesh, checking that every face index is in range
    pub fn new(points: Vec<Vec3>, faces: Vec<[u32; 3]>) -> CoreResult<Self> {
        let count = points.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
                return Err(CoreError::FaceOutOfBounds { face, index, count });
            }
        }
        Ok(Self {
            points,
            faces,
            colors: None,
        })
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Axis-aligned bounds of the points
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.points)
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        self.bounds().center()
    }

    /// Mean of the finite points; origin for a mesh without points
    pub fn centroid(&self) -> Vec3 {
        let (sum, count) = self
            .points
            .iter()
            .filter(|p| p.is_finite())
            .fold((Vec3::ZERO, 0usize), |(sum, count), p| (sum + *p, count + 1));
        if count == 0 {
            Vec3::ZERO
        } else {
            sum / count as f32
        }
    }

    /// Scale every point about the origin by a per-axis factor
    pub fn scale(&mut self, factor: Vec3) {
        for point in &mut self.points {
            *point *= factor;
        }
    }

    /// Translate every point
    pub fn translate(&mut self, offset: Vec3) {
        for point in &mut self.points {
            *point += offset;
        }
    }

    /// Positions of a face's three corners
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let [a, b, c] = self.faces[face];
        [
            self.points[a as usize],
            self.points[b as usize],
            self.points[c as usize],
        ]
    }

    /// Assign the same color to every point
    pub fn paint(&mut self, color: Rgb) {
        self.colors = Some(vec![color; self.points.len()]);
    }

    /// Color of a point, if the mesh carries colors
    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors.as_ref().and_then(|c| c.get(index).copied())
    }
}
