//! Application configuration
//!
//! Built-in defaults, optionally replaced by a JSON file. Environment
//! variables and flags are applied on top by [`crate::Cli`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jawview_assets::PairPipeline;
use jawview_core::{AlignParams, ColorMode, ColorizeParams};
use jawview_renderer::RenderSettings;
use jawview_viewer::ViewerConfig;
use jawview_web::ServerConfig;
use serde::{Deserialize, Serialize};

/// Everything the commands need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the STL scans
    pub data_dir: PathBuf,
    pub color_mode: ColorMode,
    pub align: AlignParams,
    pub colorize: ColorizeParams,
    pub render: RenderSettings,
    pub server: ServerConfig,
    pub viewer: ViewerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            color_mode: ColorMode::default(),
            align: AlignParams::default(),
            colorize: ColorizeParams::default(),
            render: RenderSettings::default(),
            server: ServerConfig::default(),
            viewer: ViewerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Check every parameter group
    pub fn validate(&self) -> Result<()> {
        self.pipeline().validate().context("invalid pipeline parameters")?;
        self.render.validate().context("invalid render settings")?;
        Ok(())
    }

    /// Preparation settings for the asset pipeline
    pub fn pipeline(&self) -> PairPipeline {
        PairPipeline {
            align: self.align.clone(),
            colorize: self.colorize.clone(),
            color_mode: self.color_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.server.port, 8080);
        assert!(config.viewer.show_toolbar);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"data_dir": "/scans", "color_mode": "jaw", "render": {{"width": 640}}, "server": {{"port": 9000}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/scans"));
        assert_eq!(config.color_mode, ColorMode::Jaw);
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.height, 900);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.colorize, ColorizeParams::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.colorize.curvature_quantile = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.render.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
        assert!(AppConfig::load("/no/such/config.json").is_err());
    }
}
