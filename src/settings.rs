//! Runtime preferences
//!
//! Persisted as JSON next to the binary. Table geometry is fixed and not part
//! of this file; only the demo driver and audio levels are tunable.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Preferences for the headless demo and the audio mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Demo driver ===
    /// Seed for shot selection; a fixed seed replays the same game
    pub seed: u64,
    /// Give up after this many shots without a winner
    pub max_shots: u32,
    /// Frames a single shot may run before it is reported as stuck
    pub max_frames_per_shot: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 8,
            max_shots: 500,
            max_frames_per_shot: 20_000,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings to {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}
