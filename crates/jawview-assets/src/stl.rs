//! STL reading and writing
//!
//! Parsing is done by `stl_io`, which detects ASCII vs binary and welds
//! bit-identical vertices so that neighbouring triangles share points.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use glam::Vec3;
use jawview_core::Mesh;
use stl_io::{Normal, Triangle, Vertex};

use crate::{AssetError, AssetResult};

/// Load a mesh from an ASCII or binary STL file.
///
/// Files with no triangles are rejected with [`AssetError::EmptyMesh`].
pub fn load_stl(path: impl AsRef<Path>) -> AssetResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AssetError::NotFound(path.to_path_buf())
        } else {
            AssetError::IoError(e)
        }
    })?;

    let mut reader = BufReader::new(file);
    let indexed = stl_io::read_stl(&mut reader).map_err(|e| AssetError::InvalidStl {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if indexed.faces.is_empty() {
        return Err(AssetError::EmptyMesh(path.to_path_buf()));
    }
    if u32::try_from(indexed.vertices.len()).is_err() {
        return Err(AssetError::InvalidStl {
            path: path.to_path_buf(),
            reason: format!("{} vertices exceed the u32 index range", indexed.vertices.len()),
        });
    }

    let points = indexed
        .vertices
        .iter()
        .map(|v| Vec3::new(v[0], v[1], v[2]))
        .collect();
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex count checked against u32 above
    let faces = indexed
        .faces
        .iter()
        .map(|f| [f.vertices[0] as u32, f.vertices[1] as u32, f.vertices[2] as u32])
        .collect();

    let mesh = Mesh::new(points, faces)?;
    log::debug!(
        "loaded {}: {} points, {} faces",
        path.display(),
        mesh.n_points(),
        mesh.n_faces()
    );
    Ok(mesh)
}

/// Write a mesh as binary STL. Per-point colors are not stored.
pub fn save_stl(mesh: &Mesh, path: impl AsRef<Path>) -> AssetResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<Triangle> = (0..mesh.n_faces())
        .map(|f| {
            let [a, b, c] = mesh.triangle(f);
            let normal = (b - a).cross(c - a).normalize_or_zero();
            Triangle {
                normal: Normal::new(normal.to_array()),
                vertices: [
                    Vertex::new(a.to_array()),
                    Vertex::new(b.to_array()),
                    Vertex::new(c.to_array()),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_ascii(path: &Path) {
        let text = "solid square\n\
            facet normal 0 0 1\n outer loop\n  vertex 0 0 0\n  vertex 1 0 0\n  vertex 1 1 0\n endloop\nendfacet\n\
            facet normal 0 0 1\n outer loop\n  vertex 0 0 0\n  vertex 1 1 0\n  vertex 0 1 0\n endloop\nendfacet\n\
            endsolid square\n";
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_load_ascii_welds_vertices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1_upper.stl");
        write_ascii(&path);

        let mesh = load_stl(&path).unwrap();
        assert_eq!(mesh.n_faces(), 2);
        assert_eq!(mesh.n_points(), 4);
        assert_eq!(mesh.bounds().extent(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_binary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("1_upper.stl");
        write_ascii(&source);
        let mesh = load_stl(&source).unwrap();

        let copy = dir.path().join("copy.stl");
        save_stl(&mesh, &copy).unwrap();
        let reloaded = load_stl(&copy).unwrap();
        assert_eq!(reloaded.n_faces(), mesh.n_faces());
        assert_eq!(reloaded.bounds(), mesh.bounds());
    }

    #[test]
    fn test_missing_file() {
        let err = load_stl("/definitely/not/here.stl").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2_lower.stl");
        std::fs::write(&path, b"not a mesh").unwrap();
        assert!(load_stl(&path).is_err());
    }
}
