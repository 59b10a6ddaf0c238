//! Directory scan to navigable pair list

use std::path::Path;

use glam::Vec3;
use jawview_assets::{PairPipeline, collect_pairs, save_stl};
use jawview_core::{Browser, Mesh, PatientId};

fn tetrahedron(scale: f32) -> Mesh {
    Mesh::new(
        vec![
            Vec3::ZERO,
            Vec3::new(scale, 0.0, 0.0),
            Vec3::new(0.0, scale, 0.0),
            Vec3::new(0.0, 0.0, scale),
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
    .unwrap()
}

fn write_scan(dir: &Path, name: &str, scale: f32) {
    save_stl(&tetrahedron(scale), dir.join(name)).unwrap();
}

#[test]
fn test_bilingual_pair_and_navigation() {
    let dir = tempfile::tempdir().unwrap();
    write_scan(dir.path(), "10_upper.stl", 2.0);
    write_scan(dir.path(), "10_нижняя_low.stl", 1.0);
    write_scan(dir.path(), "11_top.stl", 1.0);

    let pairs = collect_pairs(dir.path(), &PairPipeline::default()).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].id, PatientId(10));
    assert_eq!(pairs[0].lower.bounds().extent(), Vec3::splat(2.0));

    let mut browser = Browser::new(pairs);
    assert_eq!(browser.next().map(|p| p.id), Some(PatientId(10)));
    assert_eq!(browser.next().map(|p| p.id), Some(PatientId(10)));
    assert_eq!(browser.index(), 0);

    assert!(browser.jump("abc").is_none());
    assert_eq!(browser.current().map(|p| p.id), Some(PatientId(10)));
}

#[test]
fn test_unreadable_pair_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_scan(dir.path(), "1_upper.stl", 1.0);
    write_scan(dir.path(), "1_lower.stl", 1.0);
    write_scan(dir.path(), "2_upper.stl", 1.0);
    std::fs::write(dir.path().join("2_lower.stl"), b"broken").unwrap();
    write_scan(dir.path(), "3_verh.STL", 1.0);
    write_scan(dir.path(), "003_niz.stl", 1.0);

    let pairs = collect_pairs(dir.path(), &PairPipeline::default()).unwrap();
    let ids: Vec<PatientId> = pairs.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PatientId(1), PatientId(3)]);
    assert!(pairs.iter().all(|p| p.upper.colors.is_some() && p.lower.colors.is_some()));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let pairs = collect_pairs(dir.path(), &PairPipeline::default()).unwrap();
    assert!(pairs.is_empty());

    let mut browser = Browser::new(pairs);
    assert!(browser.next().is_none());
    assert_eq!(browser.index(), 0);
}
