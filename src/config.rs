//! Configuration types: plot geometry, presentation options and the
//! session-level settings that the host or a config file supplies.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::color::NamedColor;
use crate::error::{PlotError, Result};
use crate::hotkeys::Hotkey;

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Pixel geometry of the plot area and its margins.
///
/// Immutable for the duration of a draw; rebuilt from the host config on
/// every (re)build of the plot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub border_width: f64,
    /// Vertical spacing between legend rows.
    pub legend_v_space: f64,
}

impl Default for PlotGeometry {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            margin_top: 0.0,
            margin_right: 0.0,
            margin_bottom: 50.0,
            margin_left: 70.0,
            border_width: 1.0,
            legend_v_space: 25.0,
        }
    }
}

impl PlotGeometry {
    pub fn tick_label_font(&self) -> f64 {
        (self.margin_bottom + self.margin_left) / 8.0
    }

    pub fn axis_label_font(&self) -> f64 {
        (self.margin_bottom + self.margin_left) / 6.0
    }

    /// Width including margins.
    pub fn outer_width(&self) -> f64 {
        self.width + self.margin_left + self.margin_right
    }

    /// Height including margins.
    pub fn outer_height(&self) -> f64 {
        self.height + self.margin_top + self.margin_bottom
    }

    /// Same margins, new plot-area size (used on window resize).
    pub fn resized(&self, width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            ..self.clone()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation options
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable presentation options. Changing them and redrawing never alters
/// the pan/zoom transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotOptions {
    /// Point radius in pixels.
    pub point_size: f32,
    pub background_color: NamedColor,
    pub text_color: NamedColor,
    /// Ring color for hovered and selected points.
    pub highlight_color: NamedColor,
    pub lasso_color: NamedColor,
    pub x_label: String,
    pub y_label: String,
    pub plot_title: String,
    pub legend_title: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            point_size: 4.0,
            background_color: NamedColor::Ivory,
            text_color: NamedColor::Grey,
            highlight_color: NamedColor::Steelblue,
            lasso_color: NamedColor::Black,
            x_label: "x data".to_string(),
            y_label: "y data".to_string(),
            plot_title: "Plot Title".to_string(),
            legend_title: "Legend Title".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Level of detail
// ─────────────────────────────────────────────────────────────────────────────

/// Subsampling policy used while a zoom gesture is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LodPolicy {
    /// Datasets larger than this are subsampled mid-gesture.
    pub threshold: usize,
}

impl Default for LodPolicy {
    fn default() -> Self {
        Self { threshold: 6000 }
    }
}

impl LodPolicy {
    /// Whether a dataset of `len` points is subsampled mid-gesture.
    pub fn applies(&self, len: usize) -> bool {
        len > self.threshold
    }

    /// Draw every `stride`-th element of a sequence of length `len`.
    pub fn stride(&self, len: usize) -> usize {
        let t = self.threshold.max(1);
        if len < 2 * t {
            2
        } else {
            (len / t).max(2)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlotConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level session configuration.
///
/// | Field               | Purpose |
/// |---------------------|---------|
/// | `axis`              | Host axis name this plot serves (e.g. `"column"`) |
/// | `geometry`          | Plot area size and margins |
/// | `options`           | Colors, labels, point size |
/// | `mode_toggle`       | Key switching between zoom and lasso mode |
/// | `lod`               | Mid-gesture subsampling policy |
/// | `shuffle_seed`      | Seed of the presentation-order shuffle |
/// | `clip_settled_draws`| Skip off-screen points on settled redraws |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotConfig {
    pub axis: String,
    pub geometry: PlotGeometry,
    pub options: PlotOptions,
    pub mode_toggle: Hotkey,
    pub lod: LodPolicy,
    pub shuffle_seed: u64,
    pub clip_settled_draws: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            axis: "column".to_string(),
            geometry: PlotGeometry::default(),
            options: PlotOptions::default(),
            mode_toggle: Hotkey::mode_toggle_default(),
            lod: LodPolicy::default(),
            shuffle_seed: crate::data::point::SHUFFLE_SEED,
            clip_settled_draws: true,
        }
    }
}

impl PlotConfig {
    pub fn from_yaml(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| PlotError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| PlotError::Config(e.to_string()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_yaml(&s)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// `~/.canvasplot/config.yaml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|e| PlotError::Config(format!("HOME env var not set: {}", e)))?;
        Ok(PathBuf::from(home).join(".canvasplot").join("config.yaml"))
    }

    /// Load the default config file, falling back to defaults when absent.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(p) => p,
            Err(_) => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(cfg) => {
                log::info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
