//! Per-frame update for [`ScatterPlotApp`]: drain host requests, lay out the
//! panels, translate egui input into session events and paint.

use std::time::{Duration, Instant};

use eframe::egui;
use egui_phosphor::regular::{ARROW_COUNTER_CLOCKWISE, FLOPPY_DISK, GEAR, MAGNIFYING_GLASS_PLUS, SELECTION};

use crate::config::PlotConfig;
use crate::data::color::{NamedColor, BACKGROUND_CHOICES, LASSO_CHOICES, SELECTION_CHOICES, TEXT_CHOICES};
use crate::hotkeys::KeyModifiers;
use crate::interaction::{InputEvent, Mode};

use super::paint::{legend_ui, paint_axes, paint_grid, paint_layers, paint_tooltip};
use super::ScatterPlotApp;

fn key_modifiers(m: egui::Modifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: m.ctrl,
        alt: m.alt,
        shift: m.shift,
        command: m.mac_cmd,
    }
}

fn color_combo(ui: &mut egui::Ui, label: &str, value: &mut NamedColor, choices: &[NamedColor]) -> bool {
    let mut changed = false;
    egui::ComboBox::from_label(label)
        .selected_text(value.label())
        .show_ui(ui, |ui| {
            for c in choices {
                changed |= ui.selectable_value(value, *c, c.label()).changed();
            }
        });
    changed
}

impl ScatterPlotApp {
    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mode = self.session.mode();
            let toggle = self.session.interaction().toggle_key();
            if ui
                .selectable_label(mode == Mode::Zoom, format!("{} Zoom/Pan", MAGNIFYING_GLASS_PLUS))
                .on_hover_text(format!("Drag to pan, scroll to zoom ({} toggles)", toggle))
                .clicked()
            {
                self.session.set_mode(Mode::Zoom);
            }
            if ui
                .selectable_label(mode == Mode::Lasso, format!("{} Lasso", SELECTION))
                .on_hover_text("Drag to select; hold Ctrl/Cmd to add to the selection")
                .clicked()
            {
                self.session.set_mode(Mode::Lasso);
            }
            ui.separator();
            if ui
                .button(format!("{} Reset view", ARROW_COUNTER_CLOCKWISE))
                .clicked()
            {
                self.session.reset_view();
            }
            if ui.button(format!("{} Save PNG", FLOPPY_DISK)).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("scatter.png")
                    .add_filter("PNG", &["png"])
                    .save_file()
                {
                    self.status = Some(match crate::export::save_png(&self.session, &path) {
                        Ok(()) => format!("saved {}", path.display()),
                        Err(e) => format!("save failed: {}", e),
                    });
                }
            }
            if ui
                .button(format!("{} Save settings", GEAR))
                .on_hover_text("Write colors, labels and geometry to the config file")
                .clicked()
            {
                self.status = Some(self.save_settings());
            }
        });
    }

    fn save_settings(&self) -> String {
        let cfg = PlotConfig {
            geometry: self.session.geometry().clone(),
            options: self.session.options().clone(),
            ..self.session.config().clone()
        };
        match PlotConfig::default_path().and_then(|p| cfg.save_to(&p).map(|_| p)) {
            Ok(p) => format!("settings saved to {}", p.display()),
            Err(e) => format!("settings not saved: {}", e),
        }
    }

    fn side_ui(&mut self, ui: &mut egui::Ui) {
        let mut options = self.session.options().clone();
        let mut changed = false;
        let mut size = options.point_size;
        if ui
            .add(egui::Slider::new(&mut size, 0.5..=20.0).text("Point size"))
            .changed()
        {
            self.session.set_point_size(size);
            options.point_size = size;
        }
        changed |= color_combo(ui, "Background", &mut options.background_color, &BACKGROUND_CHOICES);
        changed |= color_combo(ui, "Text", &mut options.text_color, &TEXT_CHOICES);
        changed |= color_combo(ui, "Selection", &mut options.highlight_color, &SELECTION_CHOICES);
        changed |= color_combo(ui, "Lasso", &mut options.lasso_color, &LASSO_CHOICES);
        if changed {
            self.session.set_options(options);
        }

        ui.separator();
        let info = self.session.info();
        ui.label(format!("Points: {}", info.n_points));
        ui.label(format!("Batches: {}", info.n_batches));
        ui.label(format!("Selected: {}", self.session.selection().len()));
        ui.separator();
        legend_ui(ui, self.session.legend(), self.session.geometry().legend_v_space as f32);

        ui.separator();
        egui::CollapsingHeader::new("Host messages").show(ui, |ui| {
            for line in self.message_log.iter().rev() {
                ui.monospace(line);
            }
        });
    }

    /// Allocate the plot area, feed its input into the session and paint it.
    fn plot_ui(&mut self, ui: &mut egui::Ui) {
        let g = self.session.geometry().clone();
        let avail = ui.available_rect_before_wrap();
        let width = (avail.width() as f64 - g.margin_left - g.margin_right).max(50.0);
        let height = (avail.height() as f64 - g.margin_top - g.margin_bottom).max(50.0);
        self.session.resize(width.floor(), height.floor());

        let outer = ui.allocate_rect(avail, egui::Sense::hover());
        let plot_rect = egui::Rect::from_min_size(
            egui::pos2(
                avail.min.x + g.margin_left as f32,
                avail.min.y + g.margin_top as f32,
            ),
            egui::vec2(width.floor() as f32, height.floor() as f32),
        );
        let response = ui.interact(plot_rect, outer.id.with("plot"), egui::Sense::click_and_drag());
        self.handle_input(ui, &response, plot_rect);

        let opts = self.session.options().clone();
        let painter = ui.painter();
        painter.rect_filled(plot_rect, 0.0, opts.background_color.color32());
        paint_grid(painter, plot_rect, self.session.axis_frame(), opts.text_color.color32());
        paint_layers(painter, plot_rect, &self.session);
        paint_axes(
            painter,
            plot_rect,
            self.session.axis_frame(),
            g.border_width as f32,
            opts.text_color.color32(),
        );
        if let Some(tip) = self.session.tooltip() {
            paint_tooltip(
                painter,
                plot_rect,
                tip,
                opts.text_color.color32(),
                opts.background_color.color32(),
            );
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) {
        let local = |p: egui::Pos2| [(p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64];
        let modifiers = key_modifiers(ui.input(|i| i.modifiers));

        let keys: Vec<(char, KeyModifiers)> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } => {
                        let mut chars = key.name().chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => Some((c, key_modifiers(*modifiers))),
                            _ => None,
                        }
                    }
                    _ => None,
                })
                .collect()
        });
        for (key, modifiers) in keys {
            self.session.handle_input(InputEvent::Key { key, modifiers });
        }

        if response.drag_started() {
            if let Some(p) = response.interact_pointer_pos() {
                self.session.handle_input(InputEvent::PointerDown {
                    pos: local(p),
                    modifiers,
                });
            }
        } else if response.dragged() {
            if let Some(p) = response.interact_pointer_pos() {
                self.session.handle_input(InputEvent::PointerMove { pos: local(p) });
            }
        }
        if response.drag_stopped() {
            let pos = response.interact_pointer_pos().map(local).unwrap_or([0.0, 0.0]);
            self.session.handle_input(InputEvent::PointerUp { pos });
        }

        match response.hover_pos() {
            Some(p) => {
                self.pointer_inside = true;
                let pos = local(p);
                if !response.dragged() && self.last_hover != Some(pos) {
                    self.last_hover = Some(pos);
                    self.session.handle_input(InputEvent::PointerMove { pos });
                }
                let scroll = ui.input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    // egui reports scrolling up as positive; wheel deltas are the opposite
                    self.session.handle_input(InputEvent::Wheel {
                        pos,
                        delta_y: -scroll as f64,
                        now: Instant::now(),
                    });
                }
            }
            None => {
                if self.pointer_inside {
                    self.pointer_inside = false;
                    self.last_hover = None;
                    self.session.handle_input(InputEvent::PointerLeave);
                }
            }
        }
    }
}

impl eframe::App for ScatterPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();
        if self.session.poll(Instant::now()) {
            ctx.request_repaint();
        }
        if self.session.gesture_active() {
            ctx.request_repaint_after(Duration::from_millis(30));
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&self.session.options().plot_title);
            });
            self.controls_ui(ui);
            if let Some(status) = &self.status {
                ui.small(status);
            }
            for w in &self.warnings {
                ui.colored_label(egui::Color32::from_rgb(200, 120, 0), w);
            }
        });

        egui::SidePanel::right("legend")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.side_ui(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| self.plot_ui(ui));

        if !self.errors.is_empty() {
            let mut open = true;
            egui::Window::new("Invalid plot data")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    for e in &self.errors {
                        ui.label(e);
                    }
                    ui.label("The previous plot is still shown.");
                });
            if !open {
                self.errors.clear();
            }
        }
    }
}
