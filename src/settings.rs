//! Runtime settings
//!
//! Loaded from a JSON file; missing fields take their defaults and an
//! unreadable file falls back to defaults entirely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_HZ};

/// Runtime settings for the headless driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; the same seed and inputs replay the same game
    pub seed: u64,
    /// Fixed simulation rate (ticks per second)
    pub sim_hz: u32,
    /// Maximum ticks per frame
    pub max_substeps: u32,
    /// Stop after this many ticks (0 = until the game ends)
    pub max_ticks: u64,
    /// Let the paddle follow the ball
    pub autopilot: bool,
    pub start_level: u32,
    /// Rows of blocks in the generated practice layout
    pub rows: u32,
    /// Where to write a save when the run ends
    pub save_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 12345,
            sim_hz: SIM_HZ,
            max_substeps: MAX_SUBSTEPS,
            max_ticks: 200_000,
            autopilot: true,
            start_level: 1,
            rows: 3,
            save_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, using defaults if it cannot be read
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), err);
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
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 7, "autopilot": false }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert!(!settings.autopilot);
        assert_eq!(settings.sim_hz, SIM_HZ);
        assert_eq!(settings.rows, 3);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/definitely/not/here/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("brick-breaker-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        let settings = Settings {
            seed: 99,
            rows: 6,
            save_path: Some("game.json".into()),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
