//! Leptos Pan Utilities
//!
//! Drag-to-pan for SVG canvases using mouse events.
//! The offset is clamped so content can't be dragged past its padded bounds.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Content extent in canvas coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { min_x: -500.0, max_x: 500.0, min_y: -500.0, max_y: 500.0 }
    }
}

/// Pan state signals
#[derive(Clone, Copy)]
pub struct PanSignals {
    /// Current translation (x, y)
    pub offset: RwSignal<(f64, f64)>,
    /// Translation the home button returns to
    pub home: RwSignal<(f64, f64)>,
    pub dragging: RwSignal<bool>,
    /// Pointer position minus offset at mousedown
    pub anchor: RwSignal<(f64, f64)>,
    pub bounds: RwSignal<Bounds>,
    /// Visible canvas size (width, height)
    pub viewport: RwSignal<(f64, f64)>,
}

pub fn create_pan_signals() -> PanSignals {
    PanSignals {
        offset: RwSignal::new((0.0, 0.0)),
        home: RwSignal::new((0.0, 0.0)),
        dragging: RwSignal::new(false),
        anchor: RwSignal::new((0.0, 0.0)),
        bounds: RwSignal::new(Bounds::default()),
        viewport: RwSignal::new((800.0, 200.0)),
    }
}

/// Clamp a proposed offset on both axes.
/// Upper limit wins when the viewport is larger than the content.
pub fn clamp_offset(proposed: (f64, f64), viewport: (f64, f64), bounds: &Bounds) -> (f64, f64) {
    let x = proposed.0.max(viewport.0 - bounds.max_x).min(-bounds.min_x);
    let y = proposed.1.max(viewport.1 - bounds.max_y).min(-bounds.min_y);
    (x, y)
}

/// SVG transform attribute for the current offset
pub fn transform(pan: &PanSignals) -> String {
    let (x, y) = pan.offset.get();
    format!("translate({}, {})", x, y)
}

/// True when the view sits at its home offset
pub fn is_home(pan: &PanSignals) -> bool {
    pan.offset.get() == pan.home.get()
}

/// Set a new home offset and jump to it
pub fn set_home(pan: &PanSignals, home: (f64, f64)) {
    pan.home.set(home);
    pan.offset.set(home);
}

pub fn reset(pan: &PanSignals) {
    pan.offset.set(pan.home.get_untracked());
}

/// Create mousedown handler for the canvas.
/// Presses that land inside `ignore_selector` (e.g. clickable nodes) don't start a pan.
pub fn make_on_mousedown(pan: PanSignals, ignore_selector: &'static str) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if let Some(target) = ev.target() {
            if let Some(el) = target.dyn_ref::<web_sys::Element>() {
                if matches!(el.closest(ignore_selector), Ok(Some(_))) {
                    return;
                }
            }
        }
        let (ox, oy) = pan.offset.get_untracked();
        pan.anchor.set((ev.client_x() as f64 - ox, ev.client_y() as f64 - oy));
        pan.dragging.set(true);
        ev.prevent_default();
    }
}

/// Create mousemove handler - moves the view while dragging
pub fn make_on_mousemove(pan: PanSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if !pan.dragging.get_untracked() {
            return;
        }
        let (ax, ay) = pan.anchor.get_untracked();
        let proposed = (ev.client_x() as f64 - ax, ev.client_y() as f64 - ay);
        let next = clamp_offset(proposed, pan.viewport.get_untracked(), &pan.bounds.get_untracked());
        pan.offset.set(next);
        ev.prevent_default();
    }
}

/// Create mouseup / mouseleave handler
pub fn make_on_mouseup(pan: PanSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if pan.dragging.get_untracked() {
            pan.dragging.set(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_range_is_unchanged() {
        let bounds = Bounds { min_x: -400.0, max_x: 1400.0, min_y: -450.0, max_y: 650.0 };
        assert_eq!(clamp_offset((-100.0, 20.0), (800.0, 200.0), &bounds), (-100.0, 20.0));
    }

    #[test]
    fn test_clamp_limits_both_directions() {
        let bounds = Bounds { min_x: -400.0, max_x: 1400.0, min_y: -450.0, max_y: 650.0 };
        // Too far right / down
        assert_eq!(clamp_offset((900.0, 900.0), (800.0, 200.0), &bounds), (400.0, 450.0));
        // Too far left / up
        assert_eq!(clamp_offset((-5000.0, -5000.0), (800.0, 200.0), &bounds), (-600.0, -450.0));
    }
}
