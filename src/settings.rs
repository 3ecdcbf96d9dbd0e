//! Runtime preferences
//!
//! Persisted in LocalStorage on the web. These are viewer preferences only;
//! demonstration state is never saved.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::runtime::stats::{MAX_WINDOW, MIN_WINDOW};

/// Playback and rendering preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Start the frame loop as soon as a simulation is loaded
    pub autoplay: bool,
    /// Clear the primary canvas before each frame's update/draw
    pub clear_each_frame: bool,
    /// Number of frames averaged for the FPS estimate
    pub fps_sample_frames: usize,
    /// Fixed seed for simulation RNGs (host picks one when absent)
    pub seed: Option<u64>,

    // === Accessibility ===
    /// Reduced motion (simulations may slow or skip decorative animation)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autoplay: true,
            clear_each_frame: true,
            fps_sample_frames: 60,
            seed: None,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.fps_sample_frames = settings.fps_sample_frames.clamp(MIN_WINDOW, MAX_WINDOW);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sim_gallery_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
