//! Discrete mean curvature
//!
//! Per point: `H = 3/4 * sum(|e| * theta_e) / sum(A_f)` over the interior
//! edges `e` and faces `f` touching the point, where `theta_e` is the signed
//! angle between the normals of the two faces sharing `e` (positive on convex
//! ridges of a consistently oriented surface).
//!
//! Points with no incident area get a non-finite value.

use ahash::AHashMap;
use glam::Vec3;

use crate::mesh::Mesh;

/// Oriented edge as it appears in its first face, plus the faces sharing it
struct EdgeFaces {
    from: u32,
    to: u32,
    first: usize,
    second: Option<usize>,
    extra: bool,
}

/// Mean curvature for every point of the mesh.
pub fn mean_curvature(mesh: &Mesh) -> Vec<f32> {
    let n = mesh.n_points();
    let mut edge_sum = vec![0.0f64; n];
    let mut area_sum = vec![0.0f64; n];

    let normals: Vec<Vec3> = (0..mesh.n_faces())
        .map(|f| {
            let [a, b, c] = mesh.triangle(f);
            (b - a).cross(c - a)
        })
        .collect();

    let mut edges: AHashMap<(u32, u32), EdgeFaces> = AHashMap::with_capacity(mesh.n_faces() * 3 / 2);
    for (f, face) in mesh.faces.iter().enumerate() {
        let area = f64::from(normals[f].length()) * 0.5;
        for &v in face {
            area_sum[v as usize] += area;
        }

        for k in 0..3 {
            let (from, to) = (face[k], face[(k + 1) % 3]);
            if from == to {
                continue;
            }
            let key = (from.min(to), from.max(to));
            edges
                .entry(key)
                .and_modify(|e| {
                    if e.second.is_none() {
                        e.second = Some(f);
                    } else {
                        e.extra = true;
                    }
                })
                .or_insert(EdgeFaces {
                    from,
                    to,
                    first: f,
                    second: None,
                    extra: false,
                });
        }
    }

    for edge in edges.values() {
        // boundary and non-manifold edges contribute no bending
        let Some(second) = edge.second else { continue };
        if edge.extra {
            continue;
        }

        let n1 = normals[edge.first].normalize_or_zero();
        let n2 = normals[second].normalize_or_zero();
        if n1 == Vec3::ZERO || n2 == Vec3::ZERO {
            continue;
        }

        let from = mesh.points[edge.from as usize];
        let to = mesh.points[edge.to as usize];
        let direction = (to - from).normalize_or_zero();
        let length = f64::from((to - from).length());

        let angle = f64::from(n1.cross(n2).dot(direction)).atan2(f64::from(n1.dot(n2)));
        let bend = length * angle;
        edge_sum[edge.from as usize] += bend;
        edge_sum[edge.to as usize] += bend;
    }

    edge_sum
        .iter()
        .zip(&area_sum)
        .map(|(&bend, &area)| (0.75 * bend / area) as f32)
        .collect()
}
