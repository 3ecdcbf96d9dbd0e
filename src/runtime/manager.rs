//! The runtime manager
//!
//! Owns the registry, the one active session, the render surface and the
//! panels. Every transition between demonstrations goes through `load_sim`,
//! which tears the previous instance down completely before the next one is
//! built.

use std::cell::RefCell;
use std::rc::Rc;

use super::host::PanelHost;
use super::registry::Registry;
use super::scheduler::{FrameClock, FrameHandle};
use super::stats::FrameStats;
use crate::controls::{ControlDescriptor, ControlId, ControlValue, WidgetInput};
use crate::error::{RuntimeError, SimError};
use crate::settings::Settings;
use crate::sim::{Panels, SharedPanels, SimContext, Simulation};
use crate::surface::RenderSurface;

/// Session state as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// Nothing loaded
    Idle,
    Stopped,
    Running,
}

/// Everything the host environment provides
pub struct Host {
    pub surface: RenderSurface,
    pub panels: Box<dyn PanelHost>,
    pub clock: Box<dyn FrameClock>,
}

struct ActiveSim {
    id: String,
    sim: Box<dyn Simulation>,
}

pub struct Runtime {
    registry: Registry,
    surface: RenderSurface,
    panels: SharedPanels,
    panel_host: Box<dyn PanelHost>,
    clock: Box<dyn FrameClock>,
    settings: Settings,
    stats: FrameStats,
    current: Option<ActiveSim>,
    running: bool,
    pending_frame: Option<FrameHandle>,
    /// Controls already mirrored into the panel host
    shown_controls: usize,
    seed: u64,
}

impl Runtime {
    /// `seed` is used for demonstration RNGs unless `settings.seed` is set
    pub fn new(host: Host, settings: Settings, seed: u64) -> Self {
        let stats = FrameStats::new(settings.fps_sample_frames);
        Self {
            registry: Registry::new(),
            surface: host.surface,
            panels: Rc::new(RefCell::new(Panels::default())),
            panel_host: host.panels,
            clock: host.clock,
            settings,
            stats,
            current: None,
            running: false,
            pending_frame: None,
            shown_controls: 0,
            seed,
        }
    }

    /// Add a demonstration factory. Only possible before the first load.
    pub fn register<F>(&mut self, id: &str, factory: F) -> bool
    where
        F: Fn(&mut SimContext<'_>) -> Result<Box<dyn Simulation>, SimError> + 'static,
    {
        self.registry.register(id, factory)
    }

    /// Switch to the demonstration registered under `id`
    ///
    /// The previous instance is destroyed, the scheduler stopped, the panels
    /// and primary canvas cleared and any retained layer released, all before
    /// the registry is consulted. An unknown id or a failing factory leaves
    /// the session idle with a diagnostic in the status panel.
    pub fn load_sim(&mut self, id: &str) -> Result<(), RuntimeError> {
        self.teardown();
        self.registry.seal();

        let Some(factory) = self.registry.get(id) else {
            log::warn!("Simulation '{}' not found in registry", id);
            self.panels
                .borrow_mut()
                .set_status(format!("Error: Simulation '{}' not implemented yet.", id));
            self.sync_panels();
            return Err(RuntimeError::UnknownSimulation(id.to_string()));
        };

        let seed = self.settings.seed.unwrap_or(self.seed);
        let built = {
            let mut ctx = SimContext::new(&mut self.surface, &self.panels, &self.settings, seed);
            factory(&mut ctx)
        };

        match built {
            Ok(sim) => {
                log::info!("Loaded simulation '{}'", id);
                self.current = Some(ActiveSim {
                    id: id.to_string(),
                    sim,
                });
                self.sync_panels();
                if self.settings.autoplay {
                    self.start_sim();
                } else {
                    self.draw_once();
                }
                Ok(())
            }
            Err(source) => {
                log::error!("Simulation '{}' failed to start: {}", id, source);
                self.clear_panels();
                self.surface.clear_primary();
                self.surface.release();
                self.panels
                    .borrow_mut()
                    .set_status(format!("Error: Simulation '{}' failed to start: {}", id, source));
                self.sync_panels();
                Err(RuntimeError::Construction {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Destroy the current demonstration and return to idle
    pub fn unload(&mut self) {
        self.teardown();
        self.sync_panels();
    }

    pub fn start_sim(&mut self) {
        if self.running {
            return;
        }
        if self.current.is_none() {
            log::debug!("Start ignored: no simulation loaded");
            return;
        }
        self.running = true;
        self.stats.reset();
        self.pending_frame = Some(self.clock.request_frame());
        self.panel_host.set_running(true);
        log::info!("Simulation started");
    }

    /// Stop the scheduler; the pending frame (if any) is cancelled
    pub fn stop_sim(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.clock.cancel_frame(handle);
        }
        if self.running {
            self.running = false;
            log::info!("Simulation stopped");
        }
        self.panel_host.set_running(false);
    }

    pub fn toggle_play(&mut self) {
        if self.running {
            self.stop_sim();
        } else {
            self.start_sim();
        }
    }

    /// Reset the current demonstration. When stopped, paint it once so the
    /// reset state is visible.
    pub fn reset(&mut self) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        log::info!("Resetting '{}'", active.id);
        active.sim.reset();
        if !self.running {
            self.surface.clear_primary();
            active.sim.draw(&mut self.surface);
        }
        self.sync_panels();
    }

    /// Host frame callback
    ///
    /// Runs one update followed by one draw, then requests the next frame.
    /// Frames other than the one currently pending are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: f64) {
        if !self.running || self.pending_frame != Some(handle) {
            log::trace!("Ignoring stale frame {:?}", handle);
            return;
        }
        self.pending_frame = None;
        self.stats.record(timestamp);

        if self.settings.clear_each_frame {
            self.surface.clear_primary();
        }
        if let Some(active) = self.current.as_mut() {
            active.sim.update();
            active.sim.draw(&mut self.surface);
        }
        self.sync_panels();

        if self.running {
            self.pending_frame = Some(self.clock.request_frame());
        }
    }

    /// Feed widget input for control `id` to the active demonstration
    ///
    /// Input that does not coerce to the control's value type is rejected
    /// and never reaches the demonstration.
    pub fn control_input(&mut self, id: ControlId, input: &WidgetInput) -> Result<ControlValue, RuntimeError> {
        let active = self.current.as_mut().ok_or(RuntimeError::NotLoaded)?;
        let value = self
            .panels
            .borrow_mut()
            .controls
            .apply(id, input)
            .inspect_err(|e| log::warn!("Rejected input for control {:?}: {}", id, e))?;
        active.sim.on_control(id, value.clone());
        self.sync_panels();
        Ok(value)
    }

    // === Queries ===

    pub fn state(&self) -> RuntimeState {
        match (&self.current, self.running) {
            (None, _) => RuntimeState::Idle,
            (Some(_), false) => RuntimeState::Stopped,
            (Some(_), true) => RuntimeState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|a| a.id.as_str())
    }

    pub fn status_text(&self) -> String {
        self.panels.borrow().status.text().to_string()
    }

    pub fn controls(&self) -> Vec<ControlDescriptor> {
        self.panels.borrow().controls.iter().cloned().collect()
    }

    pub fn registered_ids(&self) -> Vec<&str> {
        self.registry.ids()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn fps(&self) -> u32 {
        self.stats.fps()
    }

    /// Frames run since the scheduler was last started
    pub fn frames(&self) -> u64 {
        self.stats.frames()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    // === Internals ===

    /// Steps 1-4 of a switch: destroy, stop, clear panels and canvas,
    /// release the retained layer
    fn teardown(&mut self) {
        if let Some(mut active) = self.current.take() {
            log::info!("Destroying simulation '{}'", active.id);
            active.sim.destroy(&mut self.surface);
        }
        self.stop_sim();
        self.clear_panels();
        self.surface.clear_primary();
        if self.surface.release() {
            log::debug!("Released retained layer");
        }
    }

    fn clear_panels(&mut self) {
        self.panels.borrow_mut().reset();
        self.panel_host.clear_controls();
        self.shown_controls = 0;
    }

    fn draw_once(&mut self) {
        if let Some(active) = self.current.as_mut() {
            self.surface.clear_primary();
            active.sim.draw(&mut self.surface);
        }
        self.sync_panels();
    }

    /// Mirror newly registered controls and changed status into the host
    fn sync_panels(&mut self) {
        let mut panels = self.panels.borrow_mut();
        for control in panels.controls.iter().skip(self.shown_controls) {
            self.panel_host.add_control(control);
        }
        self.shown_controls = panels.controls.len();
        if panels.take_status_dirty() {
            self.panel_host.set_status(panels.status.text());
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(mut active) = self.current.take() {
            active.sim.destroy(&mut self.surface);
        }
        if let Some(handle) = self.pending_frame.take() {
            self.clock.cancel_frame(handle);
        }
        self.surface.release();
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("registry", &self.registry)
            .field("current", &self.current_id())
            .field("running", &self.running)
            .field("pending_frame", &self.pending_frame)
            .finish()
    }
}
