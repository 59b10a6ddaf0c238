//! # Jawview Assets
//!
//! Everything between the scan directory and a list of display-ready pairs.
//!
//! ## Features
//! - Case-insensitive `.stl` discovery in one directory (no recursion)
//! - ASCII and binary STL loading with welded vertices
//! - Pair loading with per-pair failure isolation
//! - Alignment and coloring applied in parallel across pairs

pub mod catalog;
pub mod pipeline;
pub mod stl;

pub use catalog::{PairCatalog, scan_directory};
pub use pipeline::{PairPipeline, collect_pairs, load_pairs};
pub use stl::{load_stl, save_stl};

use std::path::PathBuf;

use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Scan not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot read scan directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid STL {}: {reason}", path.display())]
    InvalidStl { path: PathBuf, reason: String },

    #[error("Scan has no triangles: {}", .0.display())]
    EmptyMesh(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] jawview_core::CoreError),
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;
