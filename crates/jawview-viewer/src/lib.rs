//! # Jawview Viewer
//!
//! Desktop window for stepping through prepared jaw scan pairs.
//!
//! ## Features
//! - Every pair is rendered once at startup; navigation only swaps textures
//! - Keyboard navigation (`A`/`Left` previous, `D`/`Right` next)
//! - Optional toolbar with Prev/Next buttons and a position slider
//! - HUD line with the pair id and position, plus a color legend

use eframe::egui;
use image::RgbImage;
use jawview_core::{Browser, ColorMode, ColorizeParams, PatientId, PatientPair, Rgb};
use jawview_renderer::{RenderSettings, Renderer, RendererError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Viewer errors
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Render failed: {0}")]
    Render(#[from] RendererError),

    #[error("Window failed: {0}")]
    Window(String),
}

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Show the Prev/Next toolbar with the position slider
    pub show_toolbar: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            show_toolbar: true,
            window_width: 1280.0,
            window_height: 960.0,
        }
    }
}

/// A pre-rendered pair
#[derive(Debug, Clone)]
pub struct PairFrame {
    pub id: PatientId,
    pub image: RgbImage,
}

/// Render every pair in parallel, keeping the input order.
pub fn render_frames(pairs: &[PatientPair], settings: &RenderSettings) -> ViewerResult<Vec<PairFrame>> {
    settings.validate()?;
    let frames = pairs
        .par_iter()
        .map(|pair| {
            let mut renderer = Renderer::new(settings.clone())?;
            Ok(PairFrame {
                id: pair.id,
                image: renderer.render_pair(pair),
            })
        })
        .collect::<ViewerResult<Vec<_>>>()?;
    log::info!("rendered {} frames", frames.len());
    Ok(frames)
}

/// Legend entries for the active color mode
pub fn legend(mode: ColorMode, params: &ColorizeParams) -> Vec<(&'static str, Rgb)> {
    match mode {
        ColorMode::Regions => vec![("Tooth", params.tooth_color), ("Gum", params.gum_color)],
        ColorMode::Jaw => vec![("Upper", params.upper_color), ("Lower", params.lower_color)],
    }
}

/// User navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Prev,
    Next,
    Goto(usize),
}

impl Action {
    /// Map a pressed key to an action
    pub fn from_key(key: egui::Key) -> Option<Self> {
        match key {
            egui::Key::A | egui::Key::ArrowLeft => Some(Self::Prev),
            egui::Key::D | egui::Key::ArrowRight => Some(Self::Next),
            _ => None,
        }
    }
}

/// Navigation state of the window, independent of egui
pub struct ViewerState {
    browser: Browser<PairFrame>,
    /// Slider position; follows the browser except while dragging
    slider: usize,
}

impl ViewerState {
    pub fn new(frames: Vec<PairFrame>) -> Self {
        Self {
            browser: Browser::new(frames),
            slider: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.browser.index()
    }

    pub fn len(&self) -> usize {
        self.browser.len()
    }

    pub fn is_empty(&self) -> bool {
        self.browser.is_empty()
    }

    pub fn current(&self) -> Option<&PairFrame> {
        self.browser.current()
    }

    /// Apply an action. Returns true when the visible pair changed.
    pub fn apply(&mut self, action: Action) -> bool {
        let before = self.browser.index();
        match action {
            Action::Prev => {
                self.browser.prev();
            }
            Action::Next => {
                self.browser.next();
            }
            Action::Goto(index) => {
                self.browser.goto(i64::try_from(index).unwrap_or(i64::MAX));
            }
        }
        self.slider = self.browser.index();
        let changed = self.browser.index() != before;
        if changed {
            if let Some(frame) = self.browser.current() {
                log::debug!("showing pair {}", frame.id);
            }
        }
        changed
    }

    /// Slider bounds; the slider is shown whenever there is a pair
    pub fn slider_range(&self) -> Option<std::ops::RangeInclusive<usize>> {
        (!self.browser.is_empty()).then(|| 0..=self.browser.len() - 1)
    }

    /// HUD line for the current pair
    pub fn hud_text(&self) -> String {
        match self.browser.current() {
            Some(frame) => format!(
                "Pair ID: {}   [{}/{}]   A - Prev, D - Next",
                frame.id,
                self.browser.index() + 1,
                self.browser.len()
            ),
            None => String::from("No pairs to display"),
        }
    }
}

/// eframe application
pub struct ViewerApp {
    state: ViewerState,
    config: ViewerConfig,
    legend: Vec<(&'static str, Rgb)>,
    textures: Vec<Option<egui::TextureHandle>>,
}

impl ViewerApp {
    pub fn new(frames: Vec<PairFrame>, config: ViewerConfig, legend: Vec<(&'static str, Rgb)>) -> Self {
        let textures = vec![None; frames.len()];
        Self {
            state: ViewerState::new(frames),
            config,
            legend,
            textures,
        }
    }

    /// Upload the current frame on first use
    fn current_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        let index = self.state.index();
        let frame = self.state.current()?;
        let slot = self.textures.get_mut(index)?;
        let texture = slot.get_or_insert_with(|| {
            let size = [frame.image.width() as usize, frame.image.height() as usize];
            let image = egui::ColorImage::from_rgb(size, frame.image.as_raw());
            ctx.load_texture(format!("pair_{}", frame.id), image, egui::TextureOptions::LINEAR)
        });
        Some(texture.clone())
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Prev").clicked() {
                self.state.apply(Action::Prev);
            }
            if ui.button("Next").clicked() {
                self.state.apply(Action::Next);
            }
            if let Some(range) = self.state.slider_range() {
                let response = ui.add(egui::Slider::new(&mut self.state.slider, range).text("Pair"));
                if response.drag_stopped() || (response.changed() && !response.dragged()) {
                    let target = self.state.slider;
                    self.state.apply(Action::Goto(target));
                }
            }
        });
    }

    fn legend_row(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (label, [r, g, b]) in &self.legend {
                ui.colored_label(egui::Color32::from_rgb(*r, *g, *b), "■");
                ui.label(*label);
            }
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let actions: Vec<Action> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key, pressed: true, ..
                    } => Action::from_key(*key),
                    _ => None,
                })
                .collect()
        });
        for action in actions {
            self.state.apply(action);
        }

        if self.config.show_toolbar {
            egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        }

        egui::TopBottomPanel::bottom("hud").show(ctx, |ui| {
            ui.label(self.state.hud_text());
            self.legend_row(ui);
        });

        let texture = self.current_texture(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match texture {
            Some(texture) => {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new(egui::load::SizedTexture::from_handle(&texture)).shrink_to_fit());
                });
            }
            None => {
                ui.centered_and_justified(|ui| ui.heading("No pairs to display"));
            }
        });
    }
}

/// Open the window and block until it is closed
pub fn run(frames: Vec<PairFrame>, config: ViewerConfig, legend: Vec<(&'static str, Rgb)>) -> ViewerResult<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Jaw Viewer")
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };
    let app = ViewerApp::new(frames, config, legend);
    eframe::run_native("Jaw Viewer", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| ViewerError::Window(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use jawview_core::Mesh;

    fn frames(ids: &[u64]) -> Vec<PairFrame> {
        ids.iter()
            .map(|&id| PairFrame {
                id: PatientId(id),
                image: RgbImage::new(4, 4),
            })
            .collect()
    }

    #[test]
    fn test_keys_map_to_actions() {
        assert_eq!(Action::from_key(egui::Key::A), Some(Action::Prev));
        assert_eq!(Action::from_key(egui::Key::ArrowLeft), Some(Action::Prev));
        assert_eq!(Action::from_key(egui::Key::D), Some(Action::Next));
        assert_eq!(Action::from_key(egui::Key::ArrowRight), Some(Action::Next));
        assert_eq!(Action::from_key(egui::Key::W), None);
    }

    #[test]
    fn test_navigation_and_hud() {
        let mut state = ViewerState::new(frames(&[7, 12, 30]));
        assert_eq!(state.hud_text(), "Pair ID: 7   [1/3]   A - Prev, D - Next");
        assert!(!state.apply(Action::Prev));
        assert!(state.apply(Action::Next));
        assert_eq!(state.current().map(|f| f.id), Some(PatientId(12)));
        assert!(state.apply(Action::Goto(10)));
        assert_eq!(state.index(), 2);
        assert_eq!(state.slider, 2);
        assert!(!state.apply(Action::Next));
        assert_eq!(state.hud_text(), "Pair ID: 30   [3/3]   A - Prev, D - Next");
    }

    #[test]
    fn test_slider_shown_for_single_pair() {
        assert_eq!(ViewerState::new(frames(&[5])).slider_range(), Some(0..=0));
        assert_eq!(ViewerState::new(frames(&[5, 6, 7])).slider_range(), Some(0..=2));
    }

    #[test]
    fn test_empty_state() {
        let mut state = ViewerState::new(Vec::new());
        assert!(state.is_empty());
        assert_eq!(state.slider_range(), None);
        assert!(!state.apply(Action::Next));
        assert_eq!(state.hud_text(), "No pairs to display");
    }

    #[test]
    fn test_render_frames_keeps_order() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]]).unwrap();
        let pairs: Vec<PatientPair> = (1..=4)
            .map(|id| PatientPair::new(mesh.clone(), mesh.clone(), PatientId(id)))
            .collect();
        let settings = RenderSettings {
            width: 16,
            height: 12,
            ..RenderSettings::default()
        };
        let frames = render_frames(&pairs, &settings).unwrap();
        let ids: Vec<u64> = frames.iter().map(|f| f.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(frames[0].image.dimensions(), (16, 12));
    }

    #[test]
    fn test_legend_follows_mode() {
        let params = ColorizeParams::default();
        let jaw = legend(ColorMode::Jaw, &params);
        assert_eq!(jaw, vec![("Upper", [0, 0, 255]), ("Lower", [255, 0, 0])]);
        let regions = legend(ColorMode::Regions, &params);
        assert_eq!(regions[1], ("Gum", [242, 153, 153]));
    }
}
