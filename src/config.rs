//! Configuration persistence for screenloupe settings

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Milliseconds between preview re-captures
    pub capture_interval_ms: u64,
    /// Lower bound for the preview zoom factor
    pub zoom_min: f32,
    /// Upper bound for the preview zoom factor
    pub zoom_max: f32,
    /// Multiplier applied per zoom-in/zoom-out step
    pub zoom_step: f32,
    /// Drags narrower or shorter than this many pixels are discarded
    pub min_selection_px: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // ~30 fps keeps capture cost low while still reading as live
            capture_interval_ms: 33,
            zoom_min: 0.2,
            zoom_max: 6.0,
            // One step changes the zoom by 10%
            zoom_step: 1.1,
            min_selection_px: 5,
        }
    }
}

impl AppConfig {
    /// Directory name under the user config dir
    pub const ID: &'static str = "screenloupe";

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No user config directory, using defaults");
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Self>(&raw) {
                Ok(config) => config.sanitized(),
                Err(err) => {
                    log::warn!("Error loading config, using defaults: {err}");
                    Self::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                // First run: seed an editable file.
                let config = Self::default();
                config.save();
                config
            }
            Err(err) => {
                log::warn!("Could not read {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No user config directory, config not saved");
            return;
        };
        if let Err(err) = self.write_to(&path) {
            log::error!("Failed to save config: {err}");
        }
    }

    fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Repair values a hand-edited file may have broken.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.capture_interval_ms == 0 {
            log::warn!("capture_interval_ms must be positive, using default");
            self.capture_interval_ms = defaults.capture_interval_ms;
        }
        if !(self.zoom_min > 0.0) || !(self.zoom_max > self.zoom_min) {
            log::warn!("Invalid zoom bounds, using defaults");
            self.zoom_min = defaults.zoom_min;
            self.zoom_max = defaults.zoom_max;
        }
        // reset_zoom lands on exactly 1.0, which must stay in range.
        if self.zoom_min > 1.0 || self.zoom_max < 1.0 {
            log::warn!("Zoom bounds must bracket 1.0, widening");
            self.zoom_min = self.zoom_min.min(1.0);
            self.zoom_max = self.zoom_max.max(1.0);
        }
        if !(self.zoom_step > 1.0) {
            log::warn!("zoom_step must exceed 1.0, using default");
            self.zoom_step = defaults.zoom_step;
        }
        self
    }
}
