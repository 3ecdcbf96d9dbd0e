//! Simulation runtime: registry, frame scheduling and the session manager

pub mod host;
pub mod manager;
pub mod registry;
pub mod scheduler;
pub mod stats;

pub use host::{HeadlessPanels, PanelHost, PanelSnapshot};
pub use manager::{Host, Runtime, RuntimeState};
pub use registry::Registry;
pub use scheduler::{FrameClock, FrameHandle, ManualClock};
pub use stats::FrameStats;
