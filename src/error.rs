//! Error types for the simulation runtime
//!
//! Lookup and input failures are recoverable: the runtime reports them as
//! status text and keeps running. Callers get the typed error as well.

use thiserror::Error;

use crate::controls::{ControlId, ControlKind};

/// Errors raised by runtime manager operations
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No factory registered under this id
    #[error("simulation '{0}' is not registered")]
    UnknownSimulation(String),

    /// The factory for a registered id failed to build an instance
    #[error("simulation '{id}' failed to start: {source}")]
    Construction {
        id: String,
        #[source]
        source: SimError,
    },

    /// Operation needs a loaded simulation
    #[error("no simulation is loaded")]
    NotLoaded,

    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Failures inside a demonstration's own setup
#[derive(Debug, Error)]
pub enum SimError {
    #[error("setup failed: {0}")]
    Setup(String),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Render surface acquisition errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// A retained-mode layer is already held by someone
    #[error("a retained-mode surface is already acquired")]
    RetainedInUse,

    /// The host could not create a secondary layer
    #[error("retained layer unavailable: {0}")]
    LayerUnavailable(String),
}

/// Rejected widget input
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("no control with id {0:?}")]
    UnknownControl(ControlId),

    #[error("input does not match a {kind:?} control")]
    InputMismatch { kind: ControlKind },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("'{0}' is not one of the select options")]
    UnknownOption(String),
}

/// Settings (de)serialization errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
