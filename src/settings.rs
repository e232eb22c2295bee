//! World configuration
//!
//! Stored as JSON. Missing fields fall back to defaults so older files keep
//! loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::renderer::DrawOptions;
use crate::sim::{Rect, SweepConfig};

/// Error type for settings I/O.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Logical play-field size
    pub screen_width: f32,
    pub screen_height: f32,

    /// Period of the update/render tick
    pub tick_period_ms: u64,

    // === Collision tuning ===
    /// Arc length between samples of a circle sweep
    pub sweep_step: f32,
    /// Subtracted from r² in corner tests
    pub corner_epsilon: f32,

    // === Debug ===
    pub draw: DrawOptions,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            sweep_step: DEFAULT_SWEEP_STEP,
            corner_epsilon: DEFAULT_CORNER_EPSILON,
            draw: DrawOptions::default(),
        }
    }
}

impl WorldSettings {
    pub fn with_screen(width: f32, height: f32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Self::default()
        }
    }

    /// The play field as a rectangle at the origin
    pub fn screen_rect(&self) -> Rect {
        Rect::screen(self.screen_width, self.screen_height)
    }

    pub fn sweep(&self) -> SweepConfig {
        SweepConfig {
            step: self.sweep_step,
            corner_epsilon: self.corner_epsilon,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "screen_width": 800, "draw": { "show_group_bounds": true } }"#;
        let s = WorldSettings::from_json(json).unwrap();
        assert_eq!(s.screen_width, 800.0);
        assert_eq!(s.screen_height, DEFAULT_SCREEN_HEIGHT);
        assert_eq!(s.tick_period_ms, DEFAULT_TICK_PERIOD_MS);
        assert!(s.draw.show_group_bounds);
        assert!(!s.draw.show_bitmap_bounds);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = WorldSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = WorldSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("ss2d-settings-{}.json", std::process::id()));
        let mut s = WorldSettings::with_screen(640.0, 480.0);
        s.sweep_step = 0.5;
        s.save(&path).unwrap();
        let loaded = WorldSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, s);
        assert_eq!(loaded.screen_rect(), Rect::new(0.0, 0.0, 640.0, 480.0));
        assert_eq!(loaded.sweep().step, 0.5);
    }
}
