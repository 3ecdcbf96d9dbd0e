//! Platform abstraction layer
//!
//! The runtime only sees `Canvas2d`, `LayerHost`, `PanelHost` and
//! `FrameClock`. On the web these are backed by the DOM; native builds use
//! the headless recorders from `surface` and `runtime` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{DomLayers, DomPanels, Gallery, RafClock, WebCanvas};

use crate::runtime::{HeadlessPanels, Host, ManualClock};
use crate::surface::{DrawLog, HeadlessLayers, RecordingCanvas, RenderSurface};

/// A display-less host plus handles for inspecting and driving it
pub struct HeadlessHost {
    pub host: Host,
    pub clock: ManualClock,
    pub panels: HeadlessPanels,
    pub layers: HeadlessLayers,
    pub primary: DrawLog,
}

/// Build a headless host with a `width` x `height` drawing area
pub fn headless(width: f64, height: f64) -> HeadlessHost {
    let canvas = RecordingCanvas::new(width, height);
    let primary = canvas.log();
    let layers = HeadlessLayers::new(width, height);
    let panels = HeadlessPanels::new();
    let clock = ManualClock::new();
    let host = Host {
        surface: RenderSurface::new(Box::new(canvas), Box::new(layers.clone())),
        panels: Box::new(panels.clone()),
        clock: Box::new(clock.clone()),
    };
    HeadlessHost {
        host,
        clock,
        panels,
        layers,
        primary,
    }
}
