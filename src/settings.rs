//! Shell settings and preferences
//!
//! Persisted as JSON next to the leaderboard. Missing fields take their
//! defaults, so old files keep loading as options are added.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "square-siege.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Shell settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Releasing any movement key stops the player on both axes
    pub release_stops_both_axes: bool,

    // === Leaderboard ===
    pub leaderboard_path: PathBuf,
    /// Name recorded for a qualifying score
    pub player_name: String,

    // === Headless session ===
    /// Let the demo controller play
    pub autopilot: bool,
    /// Give up after this many ticks even if the player is alive
    pub max_ticks: u64,
    /// Sleep between frames to run at wall-clock speed
    pub realtime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            release_stops_both_axes: true,

            leaderboard_path: PathBuf::from("leaderboard.txt"),
            player_name: "Player".to_string(),

            autopilot: true,
            max_ticks: 20_000,
            realtime: false,
        }
    }
}

impl Settings {
    /// Parse settings from a file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{} ({}), using defaults", e, path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// The seed to run with, drawing one from the clock if none is set
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("square-siege-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 42, "autopilot": false }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert!(!settings.autopilot);
        assert!(settings.release_stops_both_axes);
        assert_eq!(settings.max_ticks, 20_000);
        assert_eq!(settings.effective_seed(), 42);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(&temp_path("does-not-exist.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let path = temp_path("invalid.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::from_file(&path), Err(SettingsError::Parse(_))));
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.json");
        let settings = Settings {
            seed: Some(7),
            player_name: "Ada".to_string(),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }
}
