//! PNG snapshots of a plot, rasterized from the layer display lists with
//! tiny-skia.

use std::path::Path;

use egui::Color32;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::config::PlotGeometry;
use crate::error::{PlotError, Result};
use crate::session::PlotSession;
use crate::surface::{Layer, Layers, Shape, ShapeLayer};

fn paint_for(c: Color32) -> Paint<'static> {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn draw_shape(pixmap: &mut Pixmap, shape: &Shape, ts: Transform) {
    match *shape {
        Shape::FilledCircle { center, radius, color } => {
            if let Some(path) = PathBuilder::from_circle(center[0], center[1], radius.max(0.1)) {
                pixmap.fill_path(&path, &paint_for(color), FillRule::Winding, ts, None);
            }
        }
        Shape::Ring {
            center,
            radius,
            width,
            color,
        } => {
            if let Some(path) = PathBuilder::from_circle(center[0], center[1], radius.max(0.1)) {
                let stroke = Stroke {
                    width,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint_for(color), &stroke, ts, None);
            }
        }
        Shape::Segment {
            from,
            to,
            width,
            color,
        } => {
            let mut pb = PathBuilder::new();
            pb.move_to(from[0], from[1]);
            pb.line_to(to[0], to[1]);
            if let Some(path) = pb.finish() {
                let stroke = Stroke {
                    width,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint_for(color), &stroke, ts, None);
            }
        }
    }
}

/// Rasterize all four layers, bottom to top, onto a pixmap covering the
/// plot area plus margins.
pub fn rasterize(
    layers: &Layers<ShapeLayer>,
    geometry: &PlotGeometry,
    background: Color32,
    frame: Color32,
) -> Result<Pixmap> {
    let w = geometry.outer_width().ceil().max(1.0) as u32;
    let h = geometry.outer_height().ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| PlotError::Export(format!("cannot allocate {}x{} pixmap", w, h)))?;
    let [r, g, b, a] = background.to_srgba_unmultiplied();
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

    let ts = Transform::from_translate(geometry.margin_left as f32, geometry.margin_top as f32);
    for layer in Layer::ALL {
        for shape in layers.get(layer).shapes() {
            draw_shape(&mut pixmap, shape, ts);
        }
    }

    if geometry.border_width > 0.0 {
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, geometry.width as f32, geometry.height as f32) {
            let path = PathBuilder::from_rect(rect);
            let stroke = Stroke {
                width: geometry.border_width as f32,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint_for(frame), &stroke, ts, None);
        }
    }
    Ok(pixmap)
}

/// Encode the session's current layers as PNG bytes.
pub fn render_png(session: &PlotSession) -> Result<Vec<u8>> {
    let opts = session.options();
    let pixmap = rasterize(
        session.layers(),
        session.geometry(),
        opts.background_color.color32(),
        opts.text_color.color32(),
    )?;
    pixmap
        .encode_png()
        .map_err(|e| PlotError::Export(e.to_string()))
}

pub fn save_png(session: &PlotSession, path: &Path) -> Result<()> {
    let bytes = render_png(session)?;
    std::fs::write(path, bytes)?;
    log::info!("saved snapshot to {}", path.display());
    Ok(())
}
