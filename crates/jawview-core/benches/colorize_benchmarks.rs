//! Coloring Benchmarks
//!
//! Curvature and region classification on synthetic scan-like surfaces

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::Vec3;
use jawview_core::curvature::mean_curvature;
use jawview_core::{ColorizeParams, Mesh, classify_regions};

/// Height field `z = sin(x) * cos(y)` on a `size x size` grid
fn wavy_grid(size: u32) -> Mesh {
    let mut points = Vec::with_capacity((size * size) as usize);
    for j in 0..size {
        for i in 0..size {
            let (x, y) = (i as f32 * 0.1, j as f32 * 0.1);
            points.push(Vec3::new(x, y, x.sin() * y.cos()));
        }
    }

    let mut faces = Vec::with_capacity(((size - 1) * (size - 1) * 2) as usize);
    for j in 0..size - 1 {
        for i in 0..size - 1 {
            let a = j * size + i;
            let b = a + 1;
            let c = a + size;
            let d = c + 1;
            faces.push([a, b, d]);
            faces.push([a, d, c]);
        }
    }

    Mesh::new(points, faces).expect("grid indices are in range")
}

fn bench_mean_curvature(c: &mut Criterion) {
    let mut group = c.benchmark_group("mean_curvature");

    for size in [32u32, 128, 256].iter() {
        let mesh = wavy_grid(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &mesh, |b, mesh| {
            b.iter(|| black_box(mean_curvature(mesh)));
        });
    }

    group.finish();
}

fn bench_classify_regions(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_regions");
    let params = ColorizeParams::default();

    for size in [32u32, 128, 256].iter() {
        let mesh = wavy_grid(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &mesh, |b, mesh| {
            b.iter(|| black_box(classify_regions(mesh, &params)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mean_curvature, bench_classify_regions);
criterion_main!(benches);
