//! Zoom/lasso interaction state machine.
//!
//! Exactly one [`Mode`] is active. Switching runs the old mode's exit hook,
//! which drops its whole binding set, then the new mode's enter hook, which
//! installs the new set. Gesture bookkeeping lives here; the session owns the
//! data the gestures act on and drives the transitions.

use std::fmt;
use std::time::{Duration, Instant};

use crate::data::point::Point;
use crate::hotkeys::{Hotkey, KeyModifiers};
use crate::lasso::LassoPath;

/// A wheel burst ends after this long without further wheel input.
pub const WHEEL_IDLE: Duration = Duration::from_millis(150);

/// Zoom factor per wheel tick: `2^(-delta_y * WHEEL_SENSITIVITY)`.
pub const WHEEL_SENSITIVITY: f64 = 0.002;

pub fn wheel_factor(delta_y: f64) -> f64 {
    2f64.powf(-delta_y * WHEEL_SENSITIVITY)
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Zoom,
    Lasso,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Zoom => Mode::Lasso,
            Mode::Lasso => Mode::Zoom,
        }
    }

    /// Event handlers this mode installs on entry.
    pub fn bindings(self) -> &'static [Binding] {
        match self {
            Mode::Zoom => &[Binding::DragPan, Binding::WheelZoom],
            Mode::Lasso => &[Binding::LassoDrag],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Zoom => write!(f, "zoom/pan"),
            Mode::Lasso => write!(f, "lasso"),
        }
    }
}

/// A pointer handler owned by one mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    DragPan,
    WheelZoom,
    LassoDrag,
}

/// Raw input in plot-area pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: [f64; 2], modifiers: KeyModifiers },
    PointerMove { pos: [f64; 2] },
    PointerUp { pos: [f64; 2] },
    /// Pointer left the plot area.
    PointerLeave,
    Wheel { pos: [f64; 2], delta_y: f64, now: Instant },
    Key { key: char, modifiers: KeyModifiers },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoomSource {
    Drag,
    Wheel,
}

/// An in-flight zoom/pan gesture and its LOD snapshots.
#[derive(Debug, Clone)]
pub struct ZoomGesture {
    pub source: ZoomSource,
    pub last_pos: [f64; 2],
    pub last_wheel: Option<Instant>,
    /// Dataset indices drawn on each tick.
    pub base_subset: Vec<usize>,
    /// Selected points drawn on each tick.
    pub selection_subset: Vec<Point>,
    pub ticks: usize,
}

impl ZoomGesture {
    /// Whether a wheel burst has gone quiet at `now`.
    pub fn wheel_expired(&self, now: Instant) -> bool {
        match (self.source, self.last_wheel) {
            (ZoomSource::Wheel, Some(t)) => now.saturating_duration_since(t) >= WHEEL_IDLE,
            _ => false,
        }
    }
}

/// An in-flight lasso drag.
#[derive(Debug, Clone, Default)]
pub struct LassoGesture {
    pub path: LassoPath,
    /// Points inside the path as of the latest move.
    pub matches: Vec<Point>,
    pub moved: bool,
}

#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Zoom(ZoomGesture),
    Lasso(LassoGesture),
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }
}

/// Active mode, its installed bindings and the current gesture.
#[derive(Debug, Clone)]
pub struct InteractionState {
    mode: Mode,
    bindings: Vec<Binding>,
    gesture: Gesture,
    toggle: Hotkey,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(Hotkey::mode_toggle_default())
    }
}

impl InteractionState {
    /// Start in zoom mode with its bindings installed.
    pub fn new(toggle: Hotkey) -> Self {
        let mut s = Self {
            mode: Mode::Zoom,
            bindings: Vec::new(),
            gesture: Gesture::Idle,
            toggle,
        };
        s.enter(Mode::Zoom);
        s
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn is_bound(&self, b: Binding) -> bool {
        self.bindings.contains(&b)
    }

    pub fn toggle_key(&self) -> Hotkey {
        self.toggle
    }

    pub fn is_toggle(&self, key: char, modifiers: KeyModifiers) -> bool {
        self.toggle.matches(key, modifiers)
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn gesture_mut(&mut self) -> &mut Gesture {
        &mut self.gesture
    }

    pub fn begin(&mut self, g: Gesture) {
        self.gesture = g;
    }

    /// End the current gesture, handing it back for finalization.
    pub fn take_gesture(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }

    /// Exit hook: tear down the binding set and return any in-flight
    /// gesture so the caller can finish it.
    pub fn exit(&mut self) -> Gesture {
        log::debug!("leaving {} mode", self.mode);
        self.bindings.clear();
        self.take_gesture()
    }

    /// Enter hook: install the bindings of `mode`.
    pub fn enter(&mut self, mode: Mode) {
        log::debug!("entering {} mode", mode);
        self.mode = mode;
        self.bindings = mode.bindings().to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_zoom_with_zoom_bindings() {
        let s = InteractionState::default();
        assert_eq!(s.mode(), Mode::Zoom);
        assert!(s.is_bound(Binding::DragPan));
        assert!(s.is_bound(Binding::WheelZoom));
        assert!(!s.is_bound(Binding::LassoDrag));
        assert!(!s.gesture().is_active());
    }

    #[test]
    fn switching_never_leaves_both_binding_sets() {
        let mut s = InteractionState::default();
        for _ in 0..3 {
            let next = s.mode().toggled();
            s.exit();
            assert!(s.bindings().is_empty());
            s.enter(next);
            let zoom = s.is_bound(Binding::DragPan) || s.is_bound(Binding::WheelZoom);
            let lasso = s.is_bound(Binding::LassoDrag);
            assert!(zoom != lasso);
        }
    }

    #[test]
    fn exit_hands_back_in_flight_gesture() {
        let mut s = InteractionState::default();
        s.begin(Gesture::Lasso(LassoGesture::default()));
        assert!(matches!(s.exit(), Gesture::Lasso(_)));
        assert!(!s.gesture().is_active());
    }

    #[test]
    fn wheel_factor_direction() {
        assert!(wheel_factor(-100.0) > 1.0);
        assert!(wheel_factor(100.0) < 1.0);
        assert_eq!(wheel_factor(0.0), 1.0);
        assert!((wheel_factor(-500.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn wheel_burst_expires_after_idle() {
        let t0 = Instant::now();
        let g = ZoomGesture {
            source: ZoomSource::Wheel,
            last_pos: [0.0, 0.0],
            last_wheel: Some(t0),
            base_subset: vec![],
            selection_subset: vec![],
            ticks: 1,
        };
        assert!(!g.wheel_expired(t0 + Duration::from_millis(100)));
        assert!(g.wheel_expired(t0 + WHEEL_IDLE));
        let drag = ZoomGesture {
            source: ZoomSource::Drag,
            ..g
        };
        assert!(!drag.wheel_expired(t0 + Duration::from_secs(10)));
    }
}
