//! Point rendering onto the four plot layers, with level-of-detail
//! subsampling for in-flight zoom gestures.

use crate::config::{LodPolicy, PlotOptions};
use crate::data::point::Point;
use crate::surface::{Layer, Layers, ShapeLayer, Surface};
use crate::transform::{LinearScale, TransformManager};

/// Stroke width of highlight rings and lasso edges.
pub const HIGHLIGHT_STROKE: f32 = 2.0;

/// Stride for mid-gesture subsampling of a sequence of `len` elements, or
/// `None` when everything is drawn.
///
/// `dataset_len` gates the decision; `len` picks the stride. For the base
/// layer both are the dataset length, for the selection layer `len` is the
/// selection's own length.
pub fn lod_step(policy: &LodPolicy, dataset_len: usize, len: usize) -> Option<usize> {
    if policy.applies(dataset_len) {
        Some(policy.stride(len))
    } else {
        None
    }
}

/// Every `step`-th element starting at index 0. Yields `ceil(len / step)`
/// elements.
pub fn lod_subset<T: Clone>(items: &[T], step: Option<usize>) -> Vec<T> {
    match step {
        Some(n) if n > 1 => items.iter().step_by(n).cloned().collect(),
        _ => items.to_vec(),
    }
}

fn to_f32(p: [f64; 2]) -> [f32; 2] {
    [p[0] as f32, p[1] as f32]
}

/// Counters describing what the last redraw put on each layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub base_points: usize,
    pub selection_points: usize,
    pub base_redraws: u64,
}

/// Tick positions of both axes for the current scales.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisFrame {
    /// `(screen x, data value)` pairs along the bottom axis.
    pub x_ticks: Vec<(f64, f64)>,
    /// `(screen y, data value)` pairs along the left axis.
    pub y_ticks: Vec<(f64, f64)>,
    pub x_label: String,
    pub y_label: String,
    pub tick_font: f64,
    pub label_font: f64,
}

impl AxisFrame {
    const TICK_COUNT: usize = 10;

    pub fn build(x: &LinearScale, y: &LinearScale, options: &PlotOptions, tick_font: f64, label_font: f64) -> Self {
        let ticks = |s: &LinearScale| {
            s.ticks(Self::TICK_COUNT)
                .into_iter()
                .map(|v| (s.apply(v), v))
                .collect()
        };
        Self {
            x_ticks: ticks(x),
            y_ticks: ticks(y),
            x_label: options.x_label.clone(),
            y_label: options.y_label.clone(),
            tick_font,
            label_font,
        }
    }
}

/// Draws points, highlights and lasso edges onto a [`Layers`] set.
#[derive(Debug, Clone, Default)]
pub struct Renderer<S: Surface = ShapeLayer> {
    layers: Layers<S>,
    stats: DrawStats,
}

impl<S: Surface> Renderer<S> {
    pub fn new(layers: Layers<S>) -> Self {
        Self {
            layers,
            stats: DrawStats::default(),
        }
    }

    pub fn layers(&self) -> &Layers<S> {
        &self.layers
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    pub fn clear(&mut self, layer: Layer) {
        self.layers.get_mut(layer).clear();
    }

    /// Filled circle of radius `point_size` in the point's color.
    /// Non-finite positions are skipped; returns whether anything was drawn.
    pub fn draw_point(surface: &mut S, tm: &TransformManager, p: &Point, options: &PlotOptions) -> bool {
        if !p.is_finite() {
            return false;
        }
        let c = to_f32(tm.to_screen(p.x, p.y));
        surface.fill_circle(c, options.point_size, p.color);
        true
    }

    /// The point plus a ring in the highlight color.
    pub fn draw_highlight(surface: &mut S, tm: &TransformManager, p: &Point, options: &PlotOptions) -> bool {
        if !Self::draw_point(surface, tm, p, options) {
            return false;
        }
        let c = to_f32(tm.to_screen(p.x, p.y));
        surface.stroke_circle(
            c,
            options.point_size,
            HIGHLIGHT_STROKE,
            options.highlight_color.color32(),
        );
        true
    }

    /// Clear and redraw the base layer. With `clip`, points outside the
    /// visible data window are skipped.
    pub fn draw_base<'a, I>(&mut self, points: I, tm: &TransformManager, options: &PlotOptions, clip: bool) -> usize
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let surface = &mut self.layers.base;
        surface.clear();
        let mut n = 0;
        for p in points {
            if clip && !tm.in_view(p.x, p.y) {
                continue;
            }
            if Self::draw_point(surface, tm, p, options) {
                n += 1;
            }
        }
        self.stats.base_points = n;
        self.stats.base_redraws += 1;
        n
    }

    /// Clear and redraw the persistent selection layer.
    pub fn draw_selection<'a, I>(&mut self, points: I, tm: &TransformManager, options: &PlotOptions) -> usize
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let surface = &mut self.layers.selection;
        surface.clear();
        let mut n = 0;
        for p in points {
            if Self::draw_highlight(surface, tm, p, options) {
                n += 1;
            }
        }
        self.stats.selection_points = n;
        n
    }

    /// Show `p` as the hovered point, or clear the hover layer.
    pub fn draw_hover(&mut self, p: Option<&Point>, tm: &TransformManager, options: &PlotOptions) {
        let surface = &mut self.layers.hover;
        surface.clear();
        if let Some(p) = p {
            Self::draw_highlight(surface, tm, p, options);
        }
    }

    /// One lasso edge on the overlay layer, in screen coordinates.
    pub fn draw_lasso_segment(&mut self, from: [f64; 2], to: [f64; 2], options: &PlotOptions) {
        self.layers.overlay.stroke_segment(
            to_f32(from),
            to_f32(to),
            HIGHLIGHT_STROKE,
            options.lasso_color.color32(),
        );
    }
}
