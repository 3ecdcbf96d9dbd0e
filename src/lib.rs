//! Sim Gallery - runtime for interactive teaching simulations
//!
//! Core modules:
//! - `runtime`: Registry, frame scheduling and the session manager
//! - `sim`: The contract every demonstration implements
//! - `surface`: Immediate-mode canvas, retained layer and 3D scene
//! - `controls` / `status`: Declarative control panel and status text
//! - `physics` / `challenge`: Helpers shared by demonstration content
//! - `demos`: Bundled demonstrations
//! - `platform`: Browser host and headless host

pub mod challenge;
pub mod controls;
pub mod demos;
pub mod error;
pub mod physics;
pub mod platform;
pub mod runtime;
pub mod settings;
pub mod sim;
pub mod status;
pub mod surface;

pub use error::{ControlError, RuntimeError, SettingsError, SimError, SurfaceError};
pub use runtime::{Runtime, RuntimeState};
pub use settings::Settings;
pub use sim::{SimContext, Simulation};

/// Canvas dimensions shared by hosts and demonstrations
pub mod consts {
    /// Default drawing area (matches the page's canvas)
    pub const CANVAS_WIDTH: f64 = 800.0;
    pub const CANVAS_HEIGHT: f64 = 600.0;
    /// Frames the headless driver runs when none are requested
    pub const HEADLESS_FRAMES: usize = 120;
    /// Simulated frame spacing for headless runs (60 Hz)
    pub const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;
}
