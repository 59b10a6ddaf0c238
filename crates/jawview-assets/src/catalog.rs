//! Scan directory catalog
//!
//! Lists the STL files of a directory and turns them into a pairing plan.

use std::path::{Path, PathBuf};

use jawview_core::{PairPlan, PlannedPair, SkipReason, plan_pairs};

use crate::{AssetError, AssetResult};

/// Check for a case-insensitive `.stl` extension
pub fn is_stl_name(name: &str) -> bool {
    name.len() >= 4
        && name.is_char_boundary(name.len() - 4)
        && name[name.len() - 4..].eq_ignore_ascii_case(".stl")
}

/// Names of the STL files directly inside `dir`, sorted.
///
/// Subdirectories are not searched. Entries whose names are not valid UTF-8
/// are skipped with a warning.
pub fn scan_directory(dir: impl AsRef<Path>) -> AssetResult<Vec<String>> {
    let dir = dir.as_ref();
    let directory_error = |source| AssetError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(directory_error)? {
        let entry = entry.map_err(directory_error)?;
        // follows symlinks, so linked scans are listed like regular files
        if !entry.path().is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            log::warn!("skip {}: file name is not valid UTF-8", entry.path().display());
            continue;
        };
        if is_stl_name(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// A pairing plan anchored to the directory it was built from
#[derive(Debug, Clone)]
pub struct PairCatalog {
    root: PathBuf,
    plan: PairPlan,
}

impl PairCatalog {
    /// Scan `dir` and pair its STL files
    pub fn scan(dir: impl AsRef<Path>) -> AssetResult<Self> {
        let root = dir.as_ref().to_path_buf();
        let names = scan_directory(&root)?;
        let catalog = Self {
            plan: plan_pairs(names),
            root,
        };
        catalog.log_skipped();
        Ok(catalog)
    }

    pub fn plan(&self) -> &PairPlan {
        &self.plan
    }

    pub fn pairs(&self) -> &[PlannedPair] {
        &self.plan.pairs
    }

    /// Full paths of a planned pair's upper and lower files
    pub fn paths(&self, pair: &PlannedPair) -> (PathBuf, PathBuf) {
        (
            self.root.join(&pair.upper_file),
            self.root.join(&pair.lower_file),
        )
    }

    fn log_skipped(&self) {
        for skipped in &self.plan.skipped {
            match (skipped.reason, skipped.id) {
                (SkipReason::MissingUpper | SkipReason::MissingLower, Some(id)) => {
                    log::warn!("id={}: {}, pair skipped ({})", id, skipped.reason, skipped.subject);
                }
                _ => log::info!("skip {}: {}", skipped.subject, skipped.reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stl_name() {
        assert!(is_stl_name("1_upper.stl"));
        assert!(is_stl_name("1_upper.STL"));
        assert!(is_stl_name("1_верх.Stl"));
        assert!(!is_stl_name("1_upper.obj"));
        assert!(!is_stl_name("stl"));
        assert!(!is_stl_name("1_upperstl"));
    }

    #[test]
    fn test_scan_directory_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2_lower.STL", "1_upper.stl", "notes.txt", "1_lower.stl"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("3_upper.stl")).unwrap();

        let names = scan_directory(dir.path()).unwrap();
        assert_eq!(names, vec!["1_lower.stl", "1_upper.stl", "2_lower.STL"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_directory_follows_symlinks() {
        let store = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        for name in ["1_upper.stl", "1_lower.stl"] {
            std::fs::write(store.path().join(name), b"").unwrap();
            std::os::unix::fs::symlink(store.path().join(name), data.path().join(name)).unwrap();
        }
        std::os::unix::fs::symlink(store.path().join("gone.stl"), data.path().join("2_upper.stl")).unwrap();

        let names = scan_directory(data.path()).unwrap();
        assert_eq!(names, vec!["1_lower.stl", "1_upper.stl"]);
    }

    #[test]
    fn test_missing_directory() {
        let err = scan_directory("/definitely/not/a/dir").unwrap_err();
        assert!(matches!(err, AssetError::Directory { .. }));
    }

    #[test]
    fn test_catalog_paths() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["7_top.stl", "7_bottom.stl", "8_top.stl"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let catalog = PairCatalog::scan(dir.path()).unwrap();
        assert_eq!(catalog.pairs().len(), 1);
        assert_eq!(catalog.plan().skipped.len(), 1);

        let (upper, lower) = catalog.paths(&catalog.pairs()[0]);
        assert_eq!(upper, dir.path().join("7_top.stl"));
        assert_eq!(lower, dir.path().join("7_bottom.stl"));
    }
}
