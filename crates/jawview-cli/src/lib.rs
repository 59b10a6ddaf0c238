//! # Jawview CLI
//!
//! Command-line interface for the jaw scan viewer.
//!
//! ## Commands
//! - `list` - Show how the scan files pair up
//! - `snapshot` - Render every pair to PNG files
//! - `serve` - Run the web viewer
//! - `view` - Open the desktop viewer

pub mod config;

pub use config::AppConfig;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jawview_assets::{PairCatalog, load_pairs, save_stl};
use jawview_core::{ColorMode, PatientPair};
use jawview_renderer::{CameraView, Renderer, save_png};

/// Jaw scan pair viewer
#[derive(Parser)]
#[command(name = "jawview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory with the STL scans
    #[arg(short, long, global = true, env = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Coloring: `regions` (tooth/gum) or `jaw` (upper blue, lower red)
    #[arg(long, global = true, value_parser = parse_color_mode)]
    pub color_mode: Option<ColorMode>,

    /// Axis the camera looks down: xy, xz or yz
    #[arg(long = "camera", global = true)]
    pub camera_view: Option<CameraView>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the pairs and the skipped files
    List,

    /// Render every pair to `<out>/pair_<id>.png`
    Snapshot {
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Also write the prepared meshes as STL
        #[arg(long)]
        with_stl: bool,
    },

    /// Run the web viewer
    Serve {
        /// Listen host
        #[arg(long)]
        host: Option<String>,

        /// Listen port
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Open the desktop viewer
    View {
        /// Hide the Prev/Next toolbar
        #[arg(long)]
        no_toolbar: bool,
    },
}

fn parse_color_mode(s: &str) -> Result<ColorMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "regions" => Ok(ColorMode::Regions),
        "jaw" => Ok(ColorMode::Jaw),
        other => Err(format!("unknown color mode `{other}` (expected regions or jaw)")),
    }
}

impl Cli {
    /// Defaults, then the config file, then environment and flags
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(mode) = self.color_mode {
            config.color_mode = mode;
        }
        if let Some(view) = self.camera_view {
            config.render.view = view;
        }
        match &self.command {
            Commands::Serve { host, port } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
            }
            Commands::View { no_toolbar: true } => config.viewer.show_toolbar = false,
            _ => {}
        }
        config.validate()?;
        Ok(config)
    }
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = cli.resolve_config()?;
    log::debug!("using data directory {}", config.data_dir.display());

    match cli.command {
        Commands::List => {
            let catalog = scan(&config)?;
            let plan = catalog.plan();
            println!("{} files, {} pairs", plan.file_count, plan.pairs.len());
            for pair in &plan.pairs {
                println!("  {:>6}  {}  {}", pair.id, pair.upper_file, pair.lower_file);
            }
            for skipped in &plan.skipped {
                println!("  skipped {}: {}", skipped.subject, skipped.reason);
            }
        }

        Commands::Snapshot { out, with_stl } => {
            let pairs = load(&config)?;
            if pairs.is_empty() {
                log::info!("No pairs to display");
                return Ok(());
            }
            write_snapshots(&pairs, &config, &out, with_stl)?;
            log::info!("wrote {} snapshots to {}", pairs.len(), out.display());
        }

        Commands::Serve { .. } => {
            let pairs = load(&config)?;
            if pairs.is_empty() {
                log::info!("No pairs to display");
            }
            let renderer = Renderer::new(config.render.clone())?;
            let session = jawview_web::Session::new(pairs, renderer)?;
            let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
            runtime.block_on(jawview_web::serve(&config.server, session))?;
        }

        Commands::View { .. } => {
            let pairs = load(&config)?;
            if pairs.is_empty() {
                log::info!("No pairs to display");
                return Ok(());
            }
            let frames = jawview_viewer::render_frames(&pairs, &config.render)?;
            drop(pairs);
            let legend = jawview_viewer::legend(config.color_mode, &config.colorize);
            jawview_viewer::run(frames, config.viewer.clone(), legend)?;
        }
    }

    Ok(())
}

fn scan(config: &AppConfig) -> Result<PairCatalog> {
    PairCatalog::scan(&config.data_dir)
        .with_context(|| format!("scanning {}", config.data_dir.display()))
}

fn load(config: &AppConfig) -> Result<Vec<PatientPair>> {
    let catalog = scan(config)?;
    Ok(load_pairs(&catalog, &config.pipeline()))
}

fn write_snapshots(pairs: &[PatientPair], config: &AppConfig, out: &Path, with_stl: bool) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    let mut renderer = Renderer::new(config.render.clone())?;
    for pair in pairs {
        let path = out.join(format!("pair_{}.png", pair.id));
        save_png(&renderer.render_pair(pair), &path).with_context(|| format!("writing {}", path.display()))?;
        if with_stl {
            save_stl(&pair.upper, out.join(format!("pair_{}_upper.stl", pair.id)))?;
            save_stl(&pair.lower, out.join(format!("pair_{}_lower.stl", pair.id)))?;
        }
    }
    Ok(())
}
