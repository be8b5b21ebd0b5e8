//! Drawable surfaces and the named plot layers.
//!
//! The renderer never talks to a window system. It draws onto four
//! independent [`Surface`]s handed to the session at construction. The
//! default surface, [`ShapeLayer`], records a display list that the egui app
//! paints every frame and that the PNG export rasterizes.

use egui::Color32;

/// One recorded drawing primitive, in plot-area pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    FilledCircle {
        center: [f32; 2],
        radius: f32,
        color: Color32,
    },
    Ring {
        center: [f32; 2],
        radius: f32,
        width: f32,
        color: Color32,
    },
    Segment {
        from: [f32; 2],
        to: [f32; 2],
        width: f32,
        color: Color32,
    },
}

/// Minimal immediate-mode drawing target.
pub trait Surface {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color32);
    fn stroke_circle(&mut self, center: [f32; 2], radius: f32, width: f32, color: Color32);
    fn stroke_segment(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Color32);
}

/// Display-list surface.
#[derive(Debug, Clone, Default)]
pub struct ShapeLayer {
    shapes: Vec<Shape>,
}

impl ShapeLayer {
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of filled circles, i.e. points drawn since the last clear.
    pub fn filled_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::FilledCircle { .. }))
            .count()
    }

    pub fn ring_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Ring { .. }))
            .count()
    }

    pub fn segment_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Segment { .. }))
            .count()
    }
}

impl Surface for ShapeLayer {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color32) {
        self.shapes.push(Shape::FilledCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: [f32; 2], radius: f32, width: f32, color: Color32) {
        self.shapes.push(Shape::Ring {
            center,
            radius,
            width,
            color,
        });
    }

    fn stroke_segment(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Color32) {
        self.shapes.push(Shape::Segment {
            from,
            to,
            width,
            color,
        });
    }
}

/// Logical plot layers, bottom to top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Base,
    Hover,
    Selection,
    Overlay,
}

impl Layer {
    /// Paint order.
    pub const ALL: [Layer; 4] = [Layer::Base, Layer::Hover, Layer::Selection, Layer::Overlay];
}

/// The four surfaces of a plot.
#[derive(Debug, Clone, Default)]
pub struct Layers<S: Surface = ShapeLayer> {
    pub base: S,
    pub hover: S,
    pub selection: S,
    pub overlay: S,
}

impl<S: Surface> Layers<S> {
    pub fn get(&self, layer: Layer) -> &S {
        match layer {
            Layer::Base => &self.base,
            Layer::Hover => &self.hover,
            Layer::Selection => &self.selection,
            Layer::Overlay => &self.overlay,
        }
    }

    pub fn get_mut(&mut self, layer: Layer) -> &mut S {
        match layer {
            Layer::Base => &mut self.base,
            Layer::Hover => &mut self.hover,
            Layer::Selection => &mut self.selection,
            Layer::Overlay => &mut self.overlay,
        }
    }

    pub fn clear_all(&mut self) {
        for layer in Layer::ALL {
            self.get_mut(layer).clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_layer_records_and_clears() {
        let mut layer = ShapeLayer::default();
        layer.fill_circle([1.0, 2.0], 4.0, Color32::RED);
        layer.stroke_circle([1.0, 2.0], 4.0, 2.0, Color32::BLUE);
        layer.stroke_segment([0.0, 0.0], [5.0, 5.0], 2.0, Color32::BLACK);
        assert_eq!(layer.filled_count(), 1);
        assert_eq!(layer.ring_count(), 1);
        assert_eq!(layer.segment_count(), 1);
        layer.clear();
        assert!(layer.is_empty());
    }

    #[test]
    fn layers_are_independent() {
        let mut layers: Layers = Layers::default();
        layers.get_mut(Layer::Hover).fill_circle([0.0, 0.0], 1.0, Color32::RED);
        layers.base.fill_circle([0.0, 0.0], 1.0, Color32::RED);
        layers.hover.clear();
        assert!(layers.get(Layer::Hover).is_empty());
        assert_eq!(layers.get(Layer::Base).filled_count(), 1);
        layers.clear_all();
        assert!(Layer::ALL.iter().all(|l| layers.get(*l).is_empty()));
    }
}
