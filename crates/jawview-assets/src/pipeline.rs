//! Pair loading pipeline
//!
//! Loads every planned pair, aligns it and paints it. A pair whose files
//! cannot be read is logged and left out; only an unreadable directory is
//! an error.

use std::path::Path;

use jawview_core::{
    AlignParams, ColorMode, ColorizeParams, CoreResult, Mesh, PatientId, PatientPair, PlannedPair,
    paint_pair, prepare_pair,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::PairCatalog;
use crate::stl::load_stl;
use crate::{AssetError, AssetResult};

/// Everything applied to a pair between loading and display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairPipeline {
    pub align: AlignParams,
    pub colorize: ColorizeParams,
    pub color_mode: ColorMode,
}

impl PairPipeline {
    pub fn validate(&self) -> CoreResult<()> {
        self.align.validate()?;
        self.colorize.validate()
    }

    /// Align and paint a freshly loaded pair
    pub fn prepare(&self, mut upper: Mesh, mut lower: Mesh, id: PatientId) -> PatientPair {
        prepare_pair(&mut upper, &mut lower, &self.align);
        paint_pair(&mut upper, &mut lower, self.color_mode, &self.colorize);
        PatientPair::new(upper, lower, id)
    }
}

fn load_pair(catalog: &PairCatalog, planned: &PlannedPair, pipeline: &PairPipeline) -> Option<PatientPair> {
    let (upper_path, lower_path) = catalog.paths(planned);
    let loaded = load_stl(&upper_path).and_then(|upper| Ok((upper, load_stl(&lower_path)?)));
    match loaded {
        Ok((upper, lower)) => Some(pipeline.prepare(upper, lower, planned.id)),
        Err(e) => {
            log::log!(failure_level(&e), "loading id={}: {}", planned.id, e);
            None
        }
    }
}

/// A scan without triangles is a data problem, not a read failure
fn failure_level(error: &AssetError) -> log::Level {
    match error {
        AssetError::EmptyMesh(_) => log::Level::Warn,
        _ => log::Level::Error,
    }
}

/// Load and prepare every pair of a catalog, in ascending id order.
pub fn load_pairs(catalog: &PairCatalog, pipeline: &PairPipeline) -> Vec<PatientPair> {
    let pairs: Vec<PatientPair> = catalog
        .pairs()
        .par_iter()
        .filter_map(|planned| load_pair(catalog, planned, pipeline))
        .collect();

    log::info!(
        "found {} pairs from {} files",
        pairs.len(),
        catalog.plan().file_count
    );
    pairs
}

/// Scan `dir`, pair its files and load every complete pair.
pub fn collect_pairs(dir: impl AsRef<Path>, pipeline: &PairPipeline) -> AssetResult<Vec<PatientPair>> {
    let catalog = PairCatalog::scan(dir)?;
    Ok(load_pairs(&catalog, pipeline))
}
