//! The plot session: single owner of dataset, transform, selection,
//! geometry, options, spatial index and layers.
//!
//! Every operation takes the session explicitly. Nothing here touches a
//! window system; the app layer feeds [`InputEvent`]s in and paints the
//! resulting layers.

use std::fmt;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use crate::config::{PlotConfig, PlotGeometry, PlotOptions};
use crate::data::batches::{BatchIndex, Legend, PlotInfo};
use crate::data::point::{Axis, Dataset, Point};
use crate::error::{PlotError, Result};
use crate::host::{ClickType, HiLiteRequest, HostChannel, HostRequest, PlotRequest};
use crate::hotkeys::KeyModifiers;
use crate::interaction::{
    wheel_factor, Binding, Gesture, InputEvent, InteractionState, LassoGesture, Mode, ZoomGesture,
    ZoomSource,
};
use crate::render::{lod_step, lod_subset, AxisFrame, Renderer};
use crate::selection::SelectionManager;
use crate::spatial::{hover_radius, QuadTree};
use crate::surface::{Layer, Layers, ShapeLayer, Surface};
use crate::transform::{TransformManager, ZoomTransform, MIN_COMPOSE_K};

/// Non-fatal problem found while loading a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadWarning {
    /// Every coordinate on this axis is NaN; a unit domain is used instead.
    AllNan(Axis),
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::AllNan(Axis::X) => write!(f, "all x coordinates are NaN"),
            LoadWarning::AllNan(Axis::Y) => write!(f, "all y coordinates are NaN"),
        }
    }
}

/// Label shown next to the hovered point.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    /// Top-left corner in plot-area pixels.
    pub anchor: [f64; 2],
}

/// Outcome of [`PlotSession::drain_requests`].
#[derive(Debug, Default)]
pub struct Drained {
    /// Requests that applied.
    pub applied: usize,
    /// Warnings of the last request that applied.
    pub warnings: Vec<LoadWarning>,
    /// Fatal load errors, in arrival order.
    pub errors: Vec<PlotError>,
}

// Tooltip offset from the hovered point, in pixels.
const TOOLTIP_OFFSET: [f64; 2] = [1.0, -40.0];

pub struct PlotSession<S: Surface = ShapeLayer> {
    config: PlotConfig,
    geometry: PlotGeometry,
    options: PlotOptions,
    dataset: Dataset,
    batches: BatchIndex,
    legend: Legend,
    info: PlotInfo,
    transform: TransformManager,
    index: QuadTree,
    hover_radius: f64,
    selection: SelectionManager,
    renderer: Renderer<S>,
    interaction: InteractionState,
    channel: HostChannel,
    axis_frame: AxisFrame,
    hovered: Option<usize>,
    tooltip: Option<Tooltip>,
    pending_redraw: bool,
    loaded: bool,
}

impl PlotSession<ShapeLayer> {
    /// Session drawing onto display-list layers.
    pub fn new(config: PlotConfig, channel: HostChannel) -> Self {
        Self::with_layers(config, channel, Layers::default())
    }
}

impl<S: Surface> PlotSession<S> {
    pub fn with_layers(config: PlotConfig, channel: HostChannel, layers: Layers<S>) -> Self {
        let interaction = InteractionState::new(config.mode_toggle);
        Self {
            geometry: config.geometry.clone(),
            options: config.options.clone(),
            config,
            dataset: Dataset::default(),
            batches: BatchIndex::default(),
            legend: Legend::default(),
            info: PlotInfo::default(),
            transform: TransformManager::new(),
            index: QuadTree::default(),
            hover_radius: 0.0,
            selection: SelectionManager::new(),
            renderer: Renderer::new(layers),
            interaction,
            channel,
            axis_frame: AxisFrame::default(),
            hovered: None,
            tooltip: None,
            pending_redraw: false,
            loaded: false,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Host axis this plot reports on.
    pub fn axis(&self) -> &str {
        &self.config.axis
    }

    pub fn geometry(&self) -> &PlotGeometry {
        &self.geometry
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn batches(&self) -> &BatchIndex {
        &self.batches
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn info(&self) -> PlotInfo {
        self.info
    }

    pub fn transform(&self) -> &TransformManager {
        &self.transform
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn layers(&self) -> &Layers<S> {
        self.renderer.layers()
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn axis_frame(&self) -> &AxisFrame {
        &self.axis_frame
    }

    pub fn channel(&self) -> &HostChannel {
        &self.channel
    }

    pub fn mode(&self) -> Mode {
        self.interaction.mode()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn hovered_point(&self) -> Option<&Point> {
        self.hovered.and_then(|i| self.dataset.get(i))
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn gesture_active(&self) -> bool {
        self.interaction.gesture().is_active()
    }

    pub fn has_pending_redraw(&self) -> bool {
        self.pending_redraw
    }

    /// Hover search radius in data units at the current zoom.
    pub fn hover_query_radius(&self) -> f64 {
        self.hover_radius / self.transform.transform().k.max(MIN_COMPOSE_K)
    }

    // ── Host requests ───────────────────────────────────────────────────

    pub fn handle_request(&mut self, req: HostRequest) -> Result<Vec<LoadWarning>> {
        match req {
            HostRequest::Plot(plot) => self.load_plot(&plot),
            HostRequest::MakeHiLite(hl) => {
                self.hilite(&hl);
                Ok(Vec::new())
            }
        }
    }

    /// Apply every queued request. Fatal load errors are collected and
    /// returned; the session keeps its previous state for each of them.
    pub fn drain_requests(&mut self, rx: &Receiver<HostRequest>) -> Drained {
        let mut out = Drained::default();
        while let Ok(req) = rx.try_recv() {
            match self.handle_request(req) {
                Ok(warnings) => {
                    out.applied += 1;
                    out.warnings = warnings;
                }
                Err(e) => out.errors.push(e),
            }
        }
        out
    }

    /// Load (or refresh) the dataset and presentation settings.
    ///
    /// Duplicate labels and positional length mismatches are fatal: an
    /// error is returned and nothing in the session changes. The pan/zoom
    /// transform survives reloads until [`reset_view`](Self::reset_view).
    pub fn load_plot(&mut self, req: &PlotRequest) -> Result<Vec<LoadWarning>> {
        let dataset = match req.to_dataset() {
            Ok(ds) => ds.shuffled(self.config.shuffle_seed),
            Err(e) => {
                log::error!("rejecting plot data: {}", e);
                return Err(e);
            }
        };

        if let Some(axis) = &req.axis {
            self.config.axis = axis.clone();
        }
        if let Some(g) = &req.geometry {
            self.geometry = g.clone();
        }
        self.options = req.options.clone();

        match &req.selected_labels {
            Some(labels) => {
                let seeded: Vec<Point> = dataset.matching_labels(labels).into_iter().cloned().collect();
                self.selection.replace(seeded);
            }
            None if self.loaded => self.selection.patch_after_dataset_refresh(&dataset),
            None => self.selection.clear(),
        }

        self.batches = BatchIndex::build(&dataset);
        self.legend = match req.color_map_entries() {
            Some(map) => Legend::from_color_map(&self.options.legend_title, &map),
            None => Legend::from_batches(&self.options.legend_title, &self.batches, &dataset),
        };
        self.info = PlotInfo {
            n_points: dataset.len(),
            n_batches: self.batches.len(),
        };
        self.index = QuadTree::build(dataset.points());
        self.hover_radius = hover_radius(dataset.extent(Axis::X), dataset.extent(Axis::Y));
        self.transform.rebuild(&dataset, &self.geometry);

        let mut warnings = Vec::new();
        for axis in [Axis::X, Axis::Y] {
            if dataset.all_nan(axis) {
                warnings.push(LoadWarning::AllNan(axis));
            }
        }
        for w in &warnings {
            log::warn!("{}", w);
        }

        self.dataset = dataset;
        self.loaded = true;
        self.hovered = None;
        self.tooltip = None;
        log::info!(
            "loaded {} points in {} batches ({} selected)",
            self.info.n_points,
            self.info.n_batches,
            self.selection.len()
        );

        if let Gesture::Zoom(z) = self.interaction.gesture_mut() {
            let (base, sel) = Self::lod_snapshot(&self.config, &self.dataset, self.selection.points());
            z.base_subset = base;
            z.selection_subset = sel;
        }
        self.request_redraw();
        Ok(warnings)
    }

    /// Replace the selection with the listed labels if `axis` matches the
    /// configured axis (case-insensitively). Never notifies the host.
    /// Returns whether the request applied.
    pub fn hilite(&mut self, req: &HiLiteRequest) -> bool {
        if !req.axis.eq_ignore_ascii_case(&self.config.axis) {
            log::debug!("ignoring highlight for axis '{}'", req.axis);
            return false;
        }
        let points: Vec<Point> = self
            .dataset
            .matching_labels(&req.point_ids)
            .into_iter()
            .cloned()
            .collect();
        self.selection.replace(points);
        self.renderer
            .draw_selection(self.selection.points(), &self.transform, &self.options);
        true
    }

    // ── Presentation changes ────────────────────────────────────────────

    /// Change the point radius. The index and transform are untouched.
    pub fn set_point_size(&mut self, size: f32) {
        self.options.point_size = size.max(0.0);
        self.request_redraw();
    }

    pub fn set_options(&mut self, options: PlotOptions) {
        self.options = options;
        self.request_redraw();
    }

    /// New plot-area size; margins are kept.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width == self.geometry.width && height == self.geometry.height {
            return;
        }
        self.geometry = self.geometry.resized(width, height);
        self.transform.rebuild(&self.dataset, &self.geometry);
        self.request_redraw();
    }

    /// Drop the cached pan/zoom and redraw on the base scales.
    pub fn reset_view(&mut self) {
        self.transform.reset();
        self.request_redraw();
    }

    // ── Redraw scheduling ───────────────────────────────────────────────

    /// Redraw now, or once the active gesture ends.
    pub fn request_redraw(&mut self) {
        if self.gesture_active() {
            self.pending_redraw = true;
        } else {
            self.redraw_settled();
        }
    }

    fn redraw_settled(&mut self) {
        self.pending_redraw = false;
        self.rebuild_axis_frame();
        let clip = self.config.clip_settled_draws;
        self.renderer
            .draw_base(self.dataset.iter(), &self.transform, &self.options, clip);
        self.renderer
            .draw_selection(self.selection.points(), &self.transform, &self.options);
        self.renderer.clear(Layer::Overlay);
        self.clear_hover();
    }

    fn rebuild_axis_frame(&mut self) {
        self.axis_frame = AxisFrame::build(
            self.transform.x_scale(),
            self.transform.y_scale(),
            &self.options,
            self.geometry.tick_label_font(),
            self.geometry.axis_label_font(),
        );
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.tooltip = None;
        self.renderer.draw_hover(None, &self.transform, &self.options);
    }

    // ── Mode switching ──────────────────────────────────────────────────

    /// Switch modes, finishing any in-flight gesture of the old mode.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.interaction.mode() {
            return;
        }
        let g = self.interaction.exit();
        self.finish_gesture(g);
        self.interaction.enter(mode);
        log::info!("interaction mode: {}", mode);
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.interaction.mode().toggled());
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Dispatch one input event to the handlers of the active mode.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, modifiers } => {
                if self.interaction.is_toggle(key, modifiers) {
                    self.toggle_mode();
                }
            }
            InputEvent::PointerDown { pos, modifiers } => self.pointer_down(pos, modifiers),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::PointerLeave => self.hover_out(),
            InputEvent::Wheel { pos, delta_y, now } => self.wheel(pos, delta_y, now),
        }
    }

    /// Advance time-based state. Ends a wheel burst after it goes idle.
    /// Returns whether a gesture ended.
    pub fn poll(&mut self, now: Instant) -> bool {
        let expired = matches!(self.interaction.gesture(), Gesture::Zoom(z) if z.wheel_expired(now));
        if expired {
            self.end_gesture();
        }
        expired
    }

    fn pointer_down(&mut self, pos: [f64; 2], modifiers: KeyModifiers) {
        if self.interaction.is_bound(Binding::DragPan) {
            if self.gesture_active() {
                self.end_gesture();
            }
            self.zoom_start(ZoomSource::Drag, pos, None);
        } else if self.interaction.is_bound(Binding::LassoDrag) {
            self.lasso_start(pos, modifiers);
        }
    }

    fn pointer_move(&mut self, pos: [f64; 2]) {
        if matches!(self.interaction.gesture(), Gesture::Lasso(_)) {
            self.lasso_move(pos);
            return;
        }
        let delta = match self.interaction.gesture_mut() {
            Gesture::Zoom(z) if z.source == ZoomSource::Drag => {
                let d = [pos[0] - z.last_pos[0], pos[1] - z.last_pos[1]];
                z.last_pos = pos;
                Some(d)
            }
            Gesture::Zoom(_) => return,
            _ => None,
        };
        match delta {
            Some([dx, dy]) => {
                let t = self.transform.transform().translate_by(dx, dy);
                self.zoom_tick(t);
            }
            None => {
                self.hover(pos);
            }
        }
    }

    fn pointer_up(&mut self) {
        let ends = match self.interaction.gesture() {
            Gesture::Zoom(z) => z.source == ZoomSource::Drag,
            Gesture::Lasso(_) => true,
            Gesture::Idle => false,
        };
        if ends {
            self.end_gesture();
        }
    }

    fn wheel(&mut self, pos: [f64; 2], delta_y: f64, now: Instant) {
        if !self.interaction.is_bound(Binding::WheelZoom) {
            return;
        }
        let idle = match self.interaction.gesture_mut() {
            Gesture::Zoom(z) => {
                if z.source == ZoomSource::Wheel {
                    z.last_wheel = Some(now);
                }
                false
            }
            Gesture::Idle => true,
            Gesture::Lasso(_) => return,
        };
        if idle {
            self.zoom_start(ZoomSource::Wheel, pos, Some(now));
        }
        let t = self
            .transform
            .transform()
            .scale_about(wheel_factor(delta_y), pos);
        self.zoom_tick(t);
    }

    // ── Zoom gesture ────────────────────────────────────────────────────

    fn lod_snapshot(config: &PlotConfig, dataset: &Dataset, selected: &[Point]) -> (Vec<usize>, Vec<Point>) {
        let n = dataset.len();
        let base_step = lod_step(&config.lod, n, n).unwrap_or(1);
        let base = (0..n).step_by(base_step).collect();
        let sel = lod_subset(selected, lod_step(&config.lod, n, selected.len()));
        (base, sel)
    }

    fn zoom_start(&mut self, source: ZoomSource, pos: [f64; 2], now: Option<Instant>) {
        let (base_subset, selection_subset) =
            Self::lod_snapshot(&self.config, &self.dataset, self.selection.points());
        log::debug!(
            "zoom gesture start ({:?}): drawing {} of {} points",
            source,
            base_subset.len(),
            self.dataset.len()
        );
        self.interaction.begin(Gesture::Zoom(ZoomGesture {
            source,
            last_pos: pos,
            last_wheel: now,
            base_subset,
            selection_subset,
            ticks: 0,
        }));
    }

    fn zoom_tick(&mut self, t: ZoomTransform) {
        self.transform.apply(t);
        self.rebuild_axis_frame();
        self.renderer.clear(Layer::Overlay);
        if let Gesture::Zoom(z) = self.interaction.gesture_mut() {
            z.ticks += 1;
            let ds = &self.dataset;
            self.renderer.draw_base(
                z.base_subset.iter().filter_map(|&i| ds.get(i)),
                &self.transform,
                &self.options,
                false,
            );
            self.renderer
                .draw_selection(z.selection_subset.iter(), &self.transform, &self.options);
        }
        self.clear_hover();
    }

    // ── Lasso gesture ───────────────────────────────────────────────────

    fn lasso_start(&mut self, pos: [f64; 2], modifiers: KeyModifiers) {
        let mut g = LassoGesture::default();
        g.path.begin(pos);
        if !modifiers.extends_selection() {
            self.selection.clear();
            self.renderer.clear(Layer::Selection);
            self.renderer.clear(Layer::Overlay);
        }
        log::debug!("lasso start at {:?}", pos);
        self.interaction.begin(Gesture::Lasso(g));
    }

    fn lasso_move(&mut self, pos: [f64; 2]) {
        let data = self.transform.to_data(pos);
        let Gesture::Lasso(l) = self.interaction.gesture_mut() else {
            return;
        };
        l.moved = true;
        let segment = l.path.extend(data, pos);
        let path = &l.path;
        l.matches = self
            .dataset
            .iter()
            .filter(|p| p.is_finite() && path.contains([p.x, p.y]))
            .cloned()
            .collect();
        // Kept selection plus live matches, rebuilt each tick.
        self.renderer.draw_selection(
            self.selection.points().iter().chain(&l.matches),
            &self.transform,
            &self.options,
        );
        if let Some((from, to)) = segment {
            self.renderer.draw_lasso_segment(from, to, &self.options);
        }
    }

    // ── Gesture end ─────────────────────────────────────────────────────

    fn end_gesture(&mut self) {
        let g = self.interaction.take_gesture();
        self.finish_gesture(g);
    }

    fn finish_gesture(&mut self, g: Gesture) {
        match g {
            Gesture::Idle => {}
            Gesture::Zoom(z) => {
                log::debug!("zoom gesture end after {} ticks", z.ticks);
                self.renderer
                    .draw_base(self.dataset.iter(), &self.transform, &self.options, false);
                self.renderer
                    .draw_selection(self.selection.points(), &self.transform, &self.options);
            }
            Gesture::Lasso(l) => {
                if l.moved {
                    if let Some((from, to)) = l.path.closing_segment() {
                        self.renderer.draw_lasso_segment(from, to, &self.options);
                    }
                }
                log::debug!("lasso end: {} points matched", l.matches.len());
                self.selection.merge_drag_result(l.matches);
                self.renderer
                    .draw_selection(self.selection.points(), &self.transform, &self.options);
                self.selection
                    .notify(&self.channel, &self.config.axis, ClickType::CtrlClick);
            }
        }
        if self.pending_redraw {
            self.redraw_settled();
        }
    }

    // ── Hover ───────────────────────────────────────────────────────────

    /// Hover at a plot-area position. On a hit, highlight the nearest point,
    /// show its tooltip and report selection plus hovered point followed by
    /// a `mouseover`. On a miss, clear the highlight and re-report the plain
    /// selection (de-duplicated). Returns whether a point was hit.
    pub fn hover(&mut self, pos: [f64; 2]) -> bool {
        if self.gesture_active() || self.dataset.is_empty() {
            return false;
        }
        let query = self.transform.to_data(pos);
        let hit = self
            .index
            .nearest(query, self.hover_query_radius())
            .map(|e| e.index);
        let axis = self.config.axis.as_str();
        match hit.and_then(|i| self.dataset.get(i).map(|p| (i, p))) {
            Some((i, p)) => {
                let screen = self.transform.to_screen(p.x, p.y);
                self.hovered = Some(i);
                self.tooltip = Some(Tooltip {
                    text: p.text.clone(),
                    anchor: [screen[0] + TOOLTIP_OFFSET[0], screen[1] + TOOLTIP_OFFSET[1]],
                });
                self.renderer.draw_hover(Some(p), &self.transform, &self.options);
                self.selection
                    .notify_with(&self.channel, axis, p, ClickType::CtrlClick);
                self.selection.notify_hover(&self.channel, axis, p);
                true
            }
            None => {
                self.hovered = None;
                self.tooltip = None;
                self.renderer.draw_hover(None, &self.transform, &self.options);
                self.selection.notify(&self.channel, axis, ClickType::CtrlClick);
                false
            }
        }
    }

    /// Pointer left the plot: hide the tooltip.
    pub fn hover_out(&mut self) {
        self.tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostMessage;

    fn request(points: &[(&str, f64, f64)]) -> PlotRequest {
        PlotRequest {
            x: points.iter().map(|p| p.1).collect(),
            y: points.iter().map(|p| p.2).collect(),
            batches: points.iter().map(|_| "b".to_string()).collect(),
            colors: points.iter().map(|_| "#ff0000".to_string()).collect(),
            labels: points.iter().map(|p| p.0.to_string()).collect(),
            ..PlotRequest::default()
        }
    }

    fn session() -> PlotSession {
        PlotSession::new(PlotConfig::default(), HostChannel::new())
    }

    #[test]
    fn load_draws_every_point_and_counts_batches() {
        let mut s = session();
        let warnings = s
            .load_plot(&request(&[("a", 0.0, 0.0), ("b", 1.0, 1.0), ("c", 2.0, 5.0)]))
            .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(s.layers().base.filled_count(), 3);
        assert_eq!(s.info(), PlotInfo { n_points: 3, n_batches: 1 });
        assert!(!s.axis_frame().x_ticks.is_empty());
    }

    #[test]
    fn nan_axis_is_a_warning() {
        let mut s = session();
        let w = s
            .load_plot(&request(&[("a", f64::NAN, 0.0), ("b", f64::NAN, 1.0)]))
            .unwrap();
        assert_eq!(w, vec![LoadWarning::AllNan(Axis::X)]);
        assert_eq!(s.layers().base.filled_count(), 0);
    }

    #[test]
    fn selected_labels_seed_selection() {
        let mut s = session();
        let mut req = request(&[("a", 0.0, 0.0), ("b", 1.0, 1.0)]);
        req.selected_labels = Some(vec!["b".into()]);
        s.load_plot(&req).unwrap();
        assert_eq!(s.selection().labels(), vec!["b"]);
        assert_eq!(s.layers().selection.ring_count(), 1);
    }

    #[test]
    fn point_size_change_keeps_transform() {
        let mut s = session();
        s.load_plot(&request(&[("a", 0.0, 0.0), ("b", 10.0, 10.0)])).unwrap();
        s.handle_input(InputEvent::PointerDown {
            pos: [100.0, 100.0],
            modifiers: KeyModifiers::NONE,
        });
        s.handle_input(InputEvent::PointerMove { pos: [130.0, 90.0] });
        s.handle_input(InputEvent::PointerUp { pos: [130.0, 90.0] });
        let t = s.transform().transform();
        s.set_point_size(9.0);
        assert_eq!(s.transform().transform(), t);
        assert_eq!(s.options().point_size, 9.0);
    }

    #[test]
    fn redraw_during_gesture_is_deferred() {
        let mut s = session();
        s.load_plot(&request(&[("a", 0.0, 0.0), ("b", 10.0, 10.0)])).unwrap();
        let now = Instant::now();
        s.handle_input(InputEvent::Wheel {
            pos: [50.0, 50.0],
            delta_y: -100.0,
            now,
        });
        assert!(s.gesture_active());
        s.set_point_size(7.0);
        assert!(s.has_pending_redraw());
        assert!(!s.poll(now + std::time::Duration::from_millis(50)));
        assert!(s.poll(now + std::time::Duration::from_millis(200)));
        assert!(!s.gesture_active());
        assert!(!s.has_pending_redraw());
    }

    #[test]
    fn hover_hit_then_miss_sends_dedup_sequence() {
        let mut s = session();
        let rx = s.channel().subscribe_all();
        s.load_plot(&request(&[("a", 0.0, 0.0), ("b", 100.0, 100.0)])).unwrap();
        let pa = s.transform().to_screen(0.0, 0.0);
        assert!(s.hover(pa));
        assert_eq!(s.tooltip().map(|t| t.text.as_str()), Some("a"));
        let msgs: Vec<HostMessage> = rx.try_iter().collect();
        assert_eq!(msgs.len(), 2);
        assert!(matches!(&msgs[0], HostMessage::SelectLabels(n) if n.point_ids == vec!["a"]));
        assert!(matches!(&msgs[1], HostMessage::Mouseover(n) if n.point_id == "a"));

        // hovering the same point again only repeats the mouseover
        assert!(s.hover(pa));
        assert_eq!(rx.try_iter().count(), 1);

        // miss: empty selection is reported once
        assert!(!s.hover([400.0, 10.0]));
        assert!(s.layers().hover.is_empty());
        assert!(!s.hover([400.0, 12.0]));
        let msgs: Vec<HostMessage> = rx.try_iter().collect();
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn mode_switch_finishes_lasso() {
        let mut s = session();
        let rx = s.channel().subscribe_all();
        s.load_plot(&request(&[("a", 0.0, 0.0), ("b", 100.0, 100.0)])).unwrap();
        s.set_mode(Mode::Lasso);
        let p = s.transform().to_screen(0.0, 0.0);
        s.handle_input(InputEvent::PointerDown {
            pos: [p[0] - 20.0, p[1] - 20.0],
            modifiers: KeyModifiers::NONE,
        });
        for d in [[-20.0, 20.0], [20.0, 20.0], [20.0, -20.0], [-20.0, -20.0]] {
            s.handle_input(InputEvent::PointerMove {
                pos: [p[0] + d[0], p[1] + d[1]],
            });
        }
        s.handle_input(InputEvent::Key {
            key: 's',
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(s.mode(), Mode::Zoom);
        assert!(!s.gesture_active());
        assert_eq!(s.selection().labels(), vec!["a"]);
        assert_eq!(rx.try_iter().count(), 1);
    }
}
