//! Painting the session's layers and decorations with egui shapes.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, StrokeKind};

use crate::data::batches::Legend;
use crate::render::AxisFrame;
use crate::session::{PlotSession, Tooltip};
use crate::surface::{Layer, Shape};

const TICK_LEN: f32 = 5.0;
const GRID_OPACITY: f32 = 0.4;

fn at(origin: Pos2, p: [f32; 2]) -> Pos2 {
    egui::pos2(origin.x + p[0], origin.y + p[1])
}

/// Paint all four layers inside `rect`, bottom to top.
pub(crate) fn paint_layers(painter: &egui::Painter, rect: Rect, session: &PlotSession) {
    let clipped = painter.with_clip_rect(rect);
    for layer in Layer::ALL {
        for shape in session.layers().get(layer).shapes() {
            match *shape {
                Shape::FilledCircle {
                    center,
                    radius,
                    color,
                } => {
                    clipped.circle_filled(at(rect.min, center), radius, color);
                }
                Shape::Ring {
                    center,
                    radius,
                    width,
                    color,
                } => {
                    clipped.circle_stroke(at(rect.min, center), radius, Stroke::new(width, color));
                }
                Shape::Segment {
                    from,
                    to,
                    width,
                    color,
                } => {
                    clipped.line_segment([at(rect.min, from), at(rect.min, to)], Stroke::new(width, color));
                }
            }
        }
    }
}

/// Full-height and full-width lines through every tick position.
pub(crate) fn grid_lines(rect: Rect, frame: &AxisFrame) -> Vec<[Pos2; 2]> {
    let vertical = frame.x_ticks.iter().map(|(px, _)| {
        let x = rect.min.x + *px as f32;
        [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)]
    });
    let horizontal = frame.y_ticks.iter().map(|(py, _)| {
        let y = rect.min.y + *py as f32;
        [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)]
    });
    vertical.chain(horizontal).collect()
}

/// Faint grid under the points.
pub(crate) fn paint_grid(painter: &egui::Painter, rect: Rect, frame: &AxisFrame, color: Color32) {
    let stroke = Stroke::new(1.0, color.gamma_multiply(GRID_OPACITY));
    let clipped = painter.with_clip_rect(rect);
    for segment in grid_lines(rect, frame) {
        clipped.line_segment(segment, stroke);
    }
}

/// Frame, ticks and axis labels around the plot rectangle.
pub(crate) fn paint_axes(painter: &egui::Painter, rect: Rect, frame: &AxisFrame, border: f32, color: Color32) {
    if border > 0.0 {
        painter.rect_stroke(rect, 0.0, Stroke::new(border, color), StrokeKind::Outside);
    }
    let tick_font = FontId::proportional(frame.tick_font as f32);
    let stroke = Stroke::new(1.0, color);
    for (px, v) in &frame.x_ticks {
        let x = rect.min.x + *px as f32;
        painter.line_segment(
            [egui::pos2(x, rect.max.y), egui::pos2(x, rect.max.y + TICK_LEN)],
            stroke,
        );
        painter.text(
            egui::pos2(x, rect.max.y + TICK_LEN + 1.0),
            Align2::CENTER_TOP,
            format_tick(*v),
            tick_font.clone(),
            color,
        );
    }
    for (py, v) in &frame.y_ticks {
        let y = rect.min.y + *py as f32;
        painter.line_segment(
            [egui::pos2(rect.min.x - TICK_LEN, y), egui::pos2(rect.min.x, y)],
            stroke,
        );
        painter.text(
            egui::pos2(rect.min.x - TICK_LEN - 2.0, y),
            Align2::RIGHT_CENTER,
            format_tick(*v),
            tick_font.clone(),
            color,
        );
    }
    let label_font = FontId::proportional(frame.label_font as f32);
    painter.text(
        egui::pos2(rect.center().x, rect.max.y + TICK_LEN + frame.tick_font as f32 + 4.0),
        Align2::CENTER_TOP,
        &frame.x_label,
        label_font.clone(),
        color,
    );
    // egui cannot rotate text; the y label sits above the axis instead.
    painter.text(
        egui::pos2(rect.min.x, rect.min.y - 2.0),
        Align2::CENTER_BOTTOM,
        &frame.y_label,
        label_font,
        color,
    );
}

fn format_tick(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else if v.abs() >= 1e5 || v.abs() < 1e-3 {
        format!("{:.1e}", v)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub(crate) fn paint_tooltip(painter: &egui::Painter, rect: Rect, tip: &Tooltip, color: Color32, background: Color32) {
    let pos = egui::pos2(rect.min.x + tip.anchor[0] as f32, rect.min.y + tip.anchor[1] as f32);
    let galley = painter.layout_no_wrap(tip.text.clone(), FontId::proportional(16.0), color);
    let bg = Rect::from_min_size(pos, galley.size()).expand(4.0);
    painter.rect_filled(bg, 3.0, background);
    painter.galley(pos, galley, color);
}

/// Legend rows: a colored dot and the batch name.
pub(crate) fn legend_ui(ui: &mut egui::Ui, legend: &Legend, row_space: f32) {
    ui.strong(&legend.title);
    for entry in &legend.entries {
        ui.horizontal(|ui| {
            ui.set_min_height(row_space.min(40.0));
            let (r, painter) = ui.allocate_painter(egui::vec2(12.0, 12.0), egui::Sense::hover());
            painter.circle_filled(r.rect.center(), 5.0, entry.color);
            ui.label(&entry.batch);
        });
    }
}
