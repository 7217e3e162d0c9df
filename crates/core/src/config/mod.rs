use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::Result;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub input: InputConfig,
    pub timing: TimingConfig,
    /// Where templates and policy settings are kept between sessions.
    pub save_path: SavePath,
}

impl AppConfig {
    /// Reads the configuration at `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(?path, "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Window geometry the surfaces lay themselves out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
        }
    }
}

impl WindowConfig {
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Keyboard repeat timing, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub repeat_delay_ticks: u32,
    pub repeat_interval_ticks: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            repeat_delay_ticks: 20,
            repeat_interval_ticks: 5,
        }
    }
}

/// Initial metronome settings for a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub initial_tempo: u32,
    pub beats_per_bar: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_tempo: 100,
            beats_per_bar: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavePath(pub PathBuf);

impl Default for SavePath {
    fn default() -> Self {
        Self(PathBuf::from("savedata.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_stock_window() {
        let config = AppConfig::default();
        assert_eq!(config.window.bounds(), Rect::new(0, 0, 900, 600));
        assert_eq!(config.input.repeat_delay_ticks, 20);
        assert_eq!(config.input.repeat_interval_ticks, 5);
        assert_eq!(config.timing.initial_tempo, 100);
        assert_eq!(config.save_path.0, PathBuf::from("savedata.json"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "timing": { "initial_tempo": 72 } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.timing.initial_tempo, 72);
        assert_eq!(config.timing.beats_per_bar, 4);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn saves_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.window.width = 1280;
        config.save_path = SavePath(dir.path().join("state.json"));

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }
}
