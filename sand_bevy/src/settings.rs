use std::path::Path;

use bevy::log::{error, info, warn};
use sand_engine::SimConfig;
use serde::{Deserialize, Serialize};

use crate::{DISPLAY_FACTOR, GRID_HEIGHT, GRID_WIDTH};

/// File read at startup, next to the working directory.
pub const SETTINGS_FILE: &str = "sand_settings.json";

/// Largest grid side accepted from the settings file.
pub const MAX_GRID_SIDE: u32 = 2048;

/// Startup settings for the host. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    pub grid_width: u32,
    pub grid_height: u32,
    /// Screen pixels per cell
    pub display_factor: u32,
    pub brush_radius: i32,
    pub simulation: SimConfig,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            display_factor: DISPLAY_FACTOR,
            brush_radius: 1,
            simulation: SimConfig::default(),
        }
    }
}

impl HostSettings {
    /// Read settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No {} found, using default settings", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Could not read {}: {}, using default settings", path.display(), e);
                return Self::default();
            }
        };
        match Self::parse(&text) {
            Ok(settings) => {
                info!("Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                error!("Failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. A zero display factor is bumped to 1 and grid
    /// sides are capped at [`MAX_GRID_SIDE`].
    ///
    /// # Errors
    /// Returns the JSON error for malformed input.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(text)?;
        settings.display_factor = settings.display_factor.max(1);
        settings.grid_width = settings.grid_width.min(MAX_GRID_SIDE);
        settings.grid_height = settings.grid_height.min(MAX_GRID_SIDE);
        Ok(settings)
    }
}
