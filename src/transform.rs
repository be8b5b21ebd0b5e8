//! Data to screen coordinate mapping with pan/zoom composition.
//!
//! Each axis has a *base* linear scale computed from the padded data extent.
//! The user's pan/zoom state is a [`ZoomTransform`] `{k, x, y}` applied in
//! screen space on top of it: `screen = k * base(data) + t`. The composed
//! scale is again a plain [`LinearScale`] whose domain is the visible data
//! window.

use crate::config::PlotGeometry;
use crate::data::point::{Axis, Dataset};

/// Upper bound of the zoom factor.
pub const MAX_ZOOM: f64 = 50.0;
/// Lower bound of the zoom factor.
pub const MIN_ZOOM: f64 = 0.0;
/// Fraction of the data extent added as padding on each side.
pub const EXTENT_PADDING: f64 = 0.05;

// A zoom factor of exactly zero has no inverse; composition uses this floor
// instead so the visible domain stays finite.
pub(crate) const MIN_COMPOSE_K: f64 = 1e-9;

/// Linear map from a data interval onto a pixel interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Data -> screen. A collapsed domain maps to the middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Screen -> data.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Whether `v` lies inside the (unordered) domain interval.
    pub fn contains(&self, v: f64) -> bool {
        let (lo, hi) = ordered(self.domain);
        v >= lo && v <= hi
    }

    /// Round tick values (1, 2 or 5 times a power of ten) inside the domain,
    /// roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }
        let step = tick_step(lo, hi, count);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Pan/zoom state: scale factor `k` and screen-space translation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Build a transform with `k` clamped into `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self {
            k: clamp_zoom(k),
            x,
            y,
        }
    }

    /// Screen point before the transform -> after.
    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        [p[0] * self.k + self.x, p[1] * self.k + self.y]
    }

    /// Screen point after the transform -> before.
    pub fn invert(&self, p: [f64; 2]) -> [f64; 2] {
        let k = self.k.max(MIN_COMPOSE_K);
        [(p[0] - self.x) / k, (p[1] - self.y) / k]
    }

    /// Pan by a screen-space delta.
    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Multiply the zoom factor by `factor`, keeping the screen point
    /// `anchor` fixed. The resulting factor is clamped.
    pub fn scale_about(self, factor: f64, anchor: [f64; 2]) -> Self {
        let k = clamp_zoom(self.k * factor);
        let p0 = self.invert(anchor);
        Self {
            k,
            x: anchor[0] - p0[0] * k,
            y: anchor[1] - p0[1] * k,
        }
    }
}

/// Clamp a zoom factor into `[MIN_ZOOM, MAX_ZOOM]`; NaN becomes the lower bound.
pub fn clamp_zoom(k: f64) -> f64 {
    if k.is_nan() {
        MIN_ZOOM
    } else {
        k.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

/// Base scale for one axis: padded data extent onto the plot's pixel range.
///
/// The flag is `false` when the axis holds no finite value; the scale then
/// falls back to a unit domain.
pub fn make_scale(dataset: &Dataset, axis: Axis, geometry: &PlotGeometry) -> (LinearScale, bool) {
    let range = match axis {
        Axis::X => (0.0, geometry.width),
        Axis::Y => (geometry.height, 0.0),
    };
    match dataset.extent(axis) {
        Some((lo, hi)) => {
            let pad = (hi - lo) * EXTENT_PADDING;
            (LinearScale::new((lo - pad, hi + pad), range), true)
        }
        None => (LinearScale::new((0.0, 1.0), range), false),
    }
}

/// Rescale `base` by the pan/zoom transform along `axis`.
pub fn compose_zoom(base: &LinearScale, transform: &ZoomTransform, axis: Axis) -> LinearScale {
    let t = match axis {
        Axis::X => transform.x,
        Axis::Y => transform.y,
    };
    let k = transform.k.max(MIN_COMPOSE_K);
    let (r0, r1) = base.range();
    let d0 = base.invert((r0 - t) / k);
    let d1 = base.invert((r1 - t) / k);
    LinearScale::new((d0, d1), base.range())
}

/// Screen coordinate back to data space.
pub fn invert_screen(scale: &LinearScale, px: f64) -> f64 {
    scale.invert(px)
}

/// Owns base scales, the cached pan/zoom transform and the composed scales.
#[derive(Debug, Clone, Default)]
pub struct TransformManager {
    base_x: LinearScale,
    base_y: LinearScale,
    cached: Option<ZoomTransform>,
    x: LinearScale,
    y: LinearScale,
}

impl TransformManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute base scales for a (re)draw. The cached transform, if any,
    /// is re-applied so pan/zoom survives option changes and resizes.
    ///
    /// Returns which axes had at least one finite value.
    pub fn rebuild(&mut self, dataset: &Dataset, geometry: &PlotGeometry) -> (bool, bool) {
        let (bx, x_ok) = make_scale(dataset, Axis::X, geometry);
        let (by, y_ok) = make_scale(dataset, Axis::Y, geometry);
        self.base_x = bx;
        self.base_y = by;
        self.recompose();
        (x_ok, y_ok)
    }

    fn recompose(&mut self) {
        match self.cached {
            Some(t) => {
                self.x = compose_zoom(&self.base_x, &t, Axis::X);
                self.y = compose_zoom(&self.base_y, &t, Axis::Y);
            }
            None => {
                self.x = self.base_x;
                self.y = self.base_y;
            }
        }
    }

    /// Apply and cache a new transform (clamped).
    pub fn apply(&mut self, t: ZoomTransform) {
        self.cached = Some(ZoomTransform::new(t.k, t.x, t.y));
        self.recompose();
    }

    /// Forget the cached transform and return to the base scales.
    pub fn reset(&mut self) {
        self.cached = None;
        self.recompose();
    }

    pub fn transform(&self) -> ZoomTransform {
        self.cached.unwrap_or(ZoomTransform::IDENTITY)
    }

    pub fn has_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn base_x(&self) -> &LinearScale {
        &self.base_x
    }

    pub fn base_y(&self) -> &LinearScale {
        &self.base_y
    }

    pub fn to_screen(&self, x: f64, y: f64) -> [f64; 2] {
        [self.x.apply(x), self.y.apply(y)]
    }

    pub fn to_data(&self, p: [f64; 2]) -> [f64; 2] {
        [invert_screen(&self.x, p[0]), invert_screen(&self.y, p[1])]
    }

    /// Whether a data position falls inside the visible window.
    pub fn in_view(&self, x: f64, y: f64) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }
}
