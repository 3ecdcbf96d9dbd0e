//! The contract every demonstration implements
//!
//! Lifecycle: constructed by a factory (controls registered, content built),
//! then driven with `update()` followed by `draw()` once per frame while the
//! runtime is running, and finally `destroy()` when the runtime switches away.
//! The runtime never calls `update`/`draw` concurrently or re-entrantly.

pub mod context;

pub use context::{ControlRegistrar, Panels, SharedPanels, SimContext, StatusReporter};

use crate::controls::{ControlId, ControlValue};
use crate::error::SimError;
use crate::surface::RenderSurface;

pub trait Simulation {
    /// Advance one frame
    fn update(&mut self);

    /// Paint the current state
    fn draw(&mut self, surface: &mut RenderSurface);

    /// A registered control changed (the `onChange` of that control)
    fn on_control(&mut self, _id: ControlId, _value: ControlValue) {}

    /// Return to the freshly constructed state without rebuilding
    fn reset(&mut self) {}

    /// Release retained render resources and anything else the instance
    /// acquired on its own
    fn destroy(&mut self, _surface: &mut RenderSurface) {}
}

/// Builds a demonstration instance
pub type SimFactory = Box<dyn Fn(&mut SimContext<'_>) -> Result<Box<dyn Simulation>, SimError>>;
