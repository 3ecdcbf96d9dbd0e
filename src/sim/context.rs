//! What a demonstration receives at construction
//!
//! The control registrar and status reporter are handles onto the runtime's
//! shared panels. Each handle is stamped with the session generation it was
//! issued for; once the runtime moves on to another demonstration, writes
//! through old handles are dropped.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::controls::{ControlConfig, ControlId, ControlKind, ControlPanel};
use crate::settings::Settings;
use crate::status::StatusPanel;
use crate::surface::RenderSurface;

/// Control and status panels plus the generation allowed to write them
#[derive(Debug, Default)]
pub struct Panels {
    pub controls: ControlPanel,
    pub status: StatusPanel,
    generation: u64,
    status_dirty: bool,
}

pub type SharedPanels = Rc<RefCell<Panels>>;

impl Panels {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Empty both panels and revoke every handle issued so far
    pub fn reset(&mut self) {
        self.controls.clear();
        self.status.clear();
        self.generation += 1;
        self.status_dirty = true;
    }

    /// Status text written by the runtime itself (diagnostics)
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status.set(text);
        self.status_dirty = true;
    }

    /// Returns true once per status change
    pub fn take_status_dirty(&mut self) -> bool {
        std::mem::take(&mut self.status_dirty)
    }
}

/// `registerControl` for one demonstration instance
#[derive(Debug, Clone)]
pub struct ControlRegistrar {
    panels: SharedPanels,
    generation: u64,
}

impl ControlRegistrar {
    pub(crate) fn new(panels: SharedPanels) -> Self {
        let generation = panels.borrow().generation;
        Self { panels, generation }
    }

    pub fn is_attached(&self) -> bool {
        self.panels.borrow().generation == self.generation
    }

    pub fn register(&self, kind: ControlKind, label: &str, config: ControlConfig) -> ControlId {
        let mut panels = self.panels.borrow_mut();
        if panels.generation != self.generation {
            log::warn!("Dropped control '{}' from a torn-down simulation", label);
            return ControlId::DETACHED;
        }
        panels.controls.register(kind, label, config)
    }

    pub fn slider(&self, label: &str, min: f64, max: f64, step: f64, value: f64) -> ControlId {
        self.register(ControlKind::Slider, label, ControlConfig::range(min, max, step, value))
    }

    pub fn checkbox(&self, label: &str, checked: bool) -> ControlId {
        self.register(ControlKind::Checkbox, label, ControlConfig::checked(checked))
    }

    pub fn button(&self, label: &str) -> ControlId {
        self.register(ControlKind::Button, label, ControlConfig::default())
    }

    pub fn select<I, S>(&self, label: &str, options: I) -> ControlId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(ControlKind::Select, label, ControlConfig::options(options))
    }
}

/// `reportStatus` for one demonstration instance
#[derive(Debug, Clone)]
pub struct StatusReporter {
    panels: SharedPanels,
    generation: u64,
}

impl StatusReporter {
    pub(crate) fn new(panels: SharedPanels) -> Self {
        let generation = panels.borrow().generation;
        Self { panels, generation }
    }

    pub fn is_attached(&self) -> bool {
        self.panels.borrow().generation == self.generation
    }

    /// Replace the status text; `\n` starts a new line
    pub fn report(&self, text: impl Into<String>) {
        let mut panels = self.panels.borrow_mut();
        if panels.generation != self.generation {
            log::debug!("Dropped status from a torn-down simulation");
            return;
        }
        let text = text.into();
        if panels.status.text() != text {
            panels.set_status(text);
        }
    }
}

/// Construction inputs for a demonstration
pub struct SimContext<'a> {
    pub surface: &'a mut RenderSurface,
    pub controls: ControlRegistrar,
    pub status: StatusReporter,
    settings: &'a Settings,
    seed: u64,
}

impl<'a> SimContext<'a> {
    pub(crate) fn new(
        surface: &'a mut RenderSurface,
        panels: &SharedPanels,
        settings: &'a Settings,
        seed: u64,
    ) -> Self {
        Self {
            surface,
            controls: ControlRegistrar::new(panels.clone()),
            status: StatusReporter::new(panels.clone()),
            settings,
            seed,
        }
    }

    pub fn width(&self) -> f64 {
        self.surface.width()
    }

    pub fn height(&self) -> f64 {
        self.surface.height()
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Deterministic RNG for this instance
    pub fn rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_revoked_on_reset() {
        let panels: SharedPanels = Rc::new(RefCell::new(Panels::default()));
        let controls = ControlRegistrar::new(panels.clone());
        let status = StatusReporter::new(panels.clone());

        let id = controls.slider("Gravity", 0.0, 2.0, 0.1, 0.5);
        status.report("before");
        assert_eq!(id, ControlId(0));
        assert_eq!(panels.borrow().status.text(), "before");

        panels.borrow_mut().reset();
        assert!(!controls.is_attached());
        assert_eq!(controls.button("Late"), ControlId::DETACHED);
        status.report("after");

        let p = panels.borrow();
        assert!(p.controls.is_empty());
        assert!(p.status.is_empty());
    }

    #[test]
    fn test_status_dirty_once_per_change() {
        let panels: SharedPanels = Rc::new(RefCell::new(Panels::default()));
        let status = StatusReporter::new(panels.clone());
        panels.borrow_mut().take_status_dirty();

        status.report("a");
        assert!(panels.borrow_mut().take_status_dirty());
        status.report("a");
        assert!(!panels.borrow_mut().take_status_dirty());
    }
}
