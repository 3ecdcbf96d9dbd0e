//! Host side of the control and status panels
//!
//! The runtime owns the panel model; a `PanelHost` mirrors it into whatever
//! the viewer sees (DOM elements on the web, a log on native runs).

use std::cell::RefCell;
use std::rc::Rc;

use crate::controls::{ControlDescriptor, ControlId};

pub trait PanelHost {
    /// Remove every control widget
    fn clear_controls(&mut self);

    /// Append a widget for a newly registered control
    fn add_control(&mut self, control: &ControlDescriptor);

    /// Replace the status text
    fn set_status(&mut self, text: &str);

    /// Play/pause indicator
    fn set_running(&mut self, _running: bool) {}
}

/// What a `HeadlessPanels` host has been told so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelSnapshot {
    pub controls: Vec<(ControlId, String)>,
    pub status: String,
    pub running: bool,
    pub clears: usize,
}

/// `PanelHost` that only records; clones share state
#[derive(Debug, Clone, Default)]
pub struct HeadlessPanels {
    state: Rc<RefCell<PanelSnapshot>>,
}

impl HeadlessPanels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        self.state.borrow().clone()
    }
}

impl PanelHost for HeadlessPanels {
    fn clear_controls(&mut self) {
        let mut state = self.state.borrow_mut();
        state.controls.clear();
        state.clears += 1;
    }

    fn add_control(&mut self, control: &ControlDescriptor) {
        log::debug!("Control {:?} '{}' ({})", control.id, control.label, control.kind.as_str());
        self.state
            .borrow_mut()
            .controls
            .push((control.id, control.label.clone()));
    }

    fn set_status(&mut self, text: &str) {
        self.state.borrow_mut().status = text.to_string();
    }

    fn set_running(&mut self, running: bool) {
        self.state.borrow_mut().running = running;
    }
}
