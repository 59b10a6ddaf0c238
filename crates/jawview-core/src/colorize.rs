//! Region coloring
//!
//! Splits a scan into "tooth" and "gum" points and paints each class a flat
//! color. Classification tries, in order:
//!
//! 1. mean curvature magnitude at or above its upper quantile,
//! 2. height (z) at or above its quantile,
//! 3. the highest `top_fraction` of points by z.
//!
//! A mask is only accepted when it selects some but not all points.

use serde::{Deserialize, Serialize};

use crate::curvature::mean_curvature;
use crate::math::quantile;
use crate::mesh::{Mesh, Rgb};
use crate::{CoreError, CoreResult};

/// How a prepared pair is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Tooth/gum region coloring on both scans
    #[default]
    Regions,
    /// Solid color per jaw
    Jaw,
}

/// Region coloring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorizeParams {
    /// Quantile of |H| above which a point is tooth
    pub curvature_quantile: f64,
    /// Quantile of z above which a point is tooth
    pub height_quantile: f64,
    /// Share of highest points marked tooth by the last fallback
    pub top_fraction: f64,
    pub tooth_color: Rgb,
    pub gum_color: Rgb,
    /// Solid colors used by [`ColorMode::Jaw`]
    pub upper_color: Rgb,
    pub lower_color: Rgb,
}

impl Default for ColorizeParams {
    fn default() -> Self {
        Self {
            curvature_quantile: 0.65,
            height_quantile: 0.60,
            top_fraction: 0.40,
            tooth_color: [255, 255, 255],
            gum_color: [242, 153, 153],
            upper_color: [0, 0, 255],
            lower_color: [255, 0, 0],
        }
    }
}

impl ColorizeParams {
    pub fn validate(&self) -> CoreResult<()> {
        for (name, q) in [
            ("curvature_quantile", self.curvature_quantile),
            ("height_quantile", self.height_quantile),
        ] {
            if !(0.0..=1.0).contains(&q) {
                return Err(CoreError::invalid(name, format!("must be in [0, 1], got {q}")));
            }
        }
        if !(self.top_fraction > 0.0 && self.top_fraction <= 1.0) {
            return Err(CoreError::invalid(
                "top_fraction",
                format!("must be in (0, 1], got {}", self.top_fraction),
            ));
        }
        Ok(())
    }
}

/// Which heuristic produced a mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskSource {
    Curvature,
    Height,
    TopFraction,
}

/// Per-point tooth classification
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMask {
    /// `true` for tooth points
    pub tooth: Vec<bool>,
    pub source: MaskSource,
}

impl RegionMask {
    /// Number of tooth points
    pub fn tooth_count(&self) -> usize {
        self.tooth.iter().filter(|t| **t).count()
    }
}

/// Points whose mean curvature magnitude reaches the quantile threshold.
/// `None` when no point has a finite curvature.
pub fn curvature_mask(mesh: &Mesh, q: f64) -> Option<Vec<bool>> {
    let magnitude: Vec<f32> = mean_curvature(mesh).into_iter().map(f32::abs).collect();
    threshold_mask(&magnitude, q)
}

/// Points whose height reaches the quantile threshold.
/// `None` when no point has a finite z.
pub fn height_mask(mesh: &Mesh, q: f64) -> Option<Vec<bool>> {
    let heights: Vec<f32> = mesh.points.iter().map(|p| p.z).collect();
    threshold_mask(&heights, q)
}

fn threshold_mask(values: &[f32], q: f64) -> Option<Vec<bool>> {
    let threshold = quantile(values.iter().copied(), q)?;
    Some(
        values
            .iter()
            .map(|v| v.is_finite() && f64::from(*v) >= threshold)
            .collect(),
    )
}

/// The `max(1, ceil(fraction * n))` highest points by z; ties keep point order.
pub fn top_fraction_mask(mesh: &Mesh, fraction: f64) -> Vec<bool> {
    let n = mesh.n_points();
    let mut mask = vec![false; n];
    if n == 0 {
        return mask;
    }

    let count = ((fraction * n as f64).ceil() as usize).clamp(1, n);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| mesh.points[a].z.total_cmp(&mesh.points[b].z));
    for &index in &order[n - count..] {
        mask[index] = true;
    }
    mask
}

fn is_informative(mask: &[bool]) -> bool {
    let selected = mask.iter().filter(|t| **t).count();
    selected != 0 && selected != mask.len()
}

/// Classify every point as tooth or gum.
pub fn classify_regions(mesh: &Mesh, params: &ColorizeParams) -> RegionMask {
    if let Some(tooth) = curvature_mask(mesh, params.curvature_quantile).filter(|m| is_informative(m)) {
        return RegionMask {
            tooth,
            source: MaskSource::Curvature,
        };
    }
    if let Some(tooth) = height_mask(mesh, params.height_quantile).filter(|m| is_informative(m)) {
        return RegionMask {
            tooth,
            source: MaskSource::Height,
        };
    }
    RegionMask {
        tooth: top_fraction_mask(mesh, params.top_fraction),
        source: MaskSource::TopFraction,
    }
}

/// Paint tooth and gum colors onto the mesh's per-point color attribute.
pub fn colorize(mesh: &mut Mesh, params: &ColorizeParams) -> MaskSource {
    let mask = classify_regions(mesh, params);
    log::debug!(
        "colored {} of {} points as tooth ({:?})",
        mask.tooth_count(),
        mesh.n_points(),
        mask.source
    );
    mesh.colors = Some(
        mask.tooth
            .iter()
            .map(|&tooth| if tooth { params.tooth_color } else { params.gum_color })
            .collect(),
    );
    mask.source
}

/// Apply a color mode to a prepared pair.
pub fn paint_pair(upper: &mut Mesh, lower: &mut Mesh, mode: ColorMode, params: &ColorizeParams) {
    match mode {
        ColorMode::Regions => {
            colorize(upper, params);
            colorize(lower, params);
        }
        ColorMode::Jaw => {
            upper.paint(params.upper_color);
            lower.paint(params.lower_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::square;
    use glam::Vec3;

    /// `n` points at the same height and no faces
    fn point_cloud(n: usize) -> Mesh {
        Mesh::new(
            (0..n).map(|i| Vec3::new(i as f32, (i * i) as f32, 0.0)).collect(),
            Vec::new(),
        )
        .unwrap()
    }

    /// Zig-zag strip whose middle row is raised, so curvature varies
    fn ridge() -> Mesh {
        let mut points = Vec::new();
        for i in 0..6 {
            let x = i as f32;
            points.push(Vec3::new(x, 0.0, 0.0));
            points.push(Vec3::new(x, 1.0, 1.0 + 0.5 * (i % 2) as f32));
            points.push(Vec3::new(x, 2.0, 0.0));
        }
        let mut faces = Vec::new();
        for i in 0..5u32 {
            for row in 0..2u32 {
                let a = i * 3 + row;
                let b = a + 3;
                faces.push([a, b, b + 1]);
                faces.push([a, b + 1, a + 1]);
            }
        }
        Mesh::new(points, faces).unwrap()
    }

    #[test]
    fn test_fallback_marks_ceil_fraction() {
        for n in [1, 2, 5, 7, 10, 11] {
            let mesh = point_cloud(n);
            let mask = classify_regions(&mesh, &ColorizeParams::default());
            let expected = ((0.4 * n as f64).ceil() as usize).max(1);
            assert_eq!(mask.source, MaskSource::TopFraction);
            assert_eq!(mask.tooth.len(), n);
            assert_eq!(mask.tooth_count(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_flat_surface_falls_back() {
        let mut mesh = square();
        let source = colorize(&mut mesh, &ColorizeParams::default());
        assert_eq!(source, MaskSource::TopFraction);

        let colors = mesh.colors.unwrap();
        let tooth = colors.iter().filter(|c| **c == [255, 255, 255]).count();
        let gum = colors.iter().filter(|c| **c == [242, 153, 153]).count();
        assert_eq!(tooth, 2);
        assert_eq!(tooth + gum, 4);
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = Mesh::default();
        let mask = classify_regions(&mesh, &ColorizeParams::default());
        assert!(mask.tooth.is_empty());
        colorize(&mut mesh, &ColorizeParams::default());
        assert_eq!(mesh.colors, Some(Vec::new()));
    }

    #[test]
    fn test_top_fraction_picks_highest() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 3.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 5.0),
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(0.0, 0.0, 4.0),
            ],
            Vec::new(),
        )
        .unwrap();
        let mask = top_fraction_mask(&mesh, 0.4);
        assert_eq!(mask, vec![false, false, true, false, true]);
    }

    #[test]
    fn test_height_mask_used_when_curvature_missing() {
        let mesh = Mesh::new(
            (0..10).map(|i| Vec3::new(0.0, 0.0, i as f32)).collect(),
            Vec::new(),
        )
        .unwrap();
        let mask = classify_regions(&mesh, &ColorizeParams::default());
        assert_eq!(mask.source, MaskSource::Height);
        // quantile 0.6 of 0..=9 is 5.4, so z = 6..=9 are tooth
        assert_eq!(mask.tooth_count(), 4);
        assert!(mask.tooth[9] && !mask.tooth[5]);
    }

    #[test]
    fn test_curvature_mask_on_ridge() {
        let mesh = ridge();
        let mask = classify_regions(&mesh, &ColorizeParams::default());
        assert_eq!(mask.source, MaskSource::Curvature);
        let count = mask.tooth_count();
        assert!(count > 0 && count < mesh.n_points());
    }

    #[test]
    fn test_jaw_mode_paints_solid() {
        let mut upper = square();
        let mut lower = square();
        let params = ColorizeParams::default();
        paint_pair(&mut upper, &mut lower, ColorMode::Jaw, &params);
        assert_eq!(upper.color(0), Some(params.upper_color));
        assert_eq!(lower.color(3), Some(params.lower_color));
    }

    #[test]
    fn test_validate() {
        assert!(ColorizeParams::default().validate().is_ok());
        let params = ColorizeParams {
            top_fraction: 0.0,
            ..ColorizeParams::default()
        };
        assert!(params.validate().is_err());
        let params = ColorizeParams {
            height_quantile: 1.5,
            ..ColorizeParams::default()
        };
        assert!(params.validate().is_err());
    }
}
