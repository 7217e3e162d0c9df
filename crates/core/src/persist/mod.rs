//! Save data: auto-policy settings plus the template and rudiment libraries.
//!
//! Templates are stored as `{name, text}` and re-parsed on load. A stored
//! template that no longer parses is reported as
//! [`MetronomeError::CorruptTemplate`] instead of being dropped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;
use crate::template::SpeedTemplate;
use crate::timing::{AutoIncrease, AutoStop, Metronome};
use crate::{MetronomeError, Result};

/// A stored speed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub name: String,
    pub text: String,
}

/// Drum rudiment entry. Kept and saved; nothing plays it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rudiment {
    pub name: String,
    #[serde(default)]
    pub pattern: String,
}

/// Flat record written to disk at shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub stop_after: u32,
    pub increase_after: u32,
    pub increase_by: i32,
    pub increase_up_to: u32,
    #[serde(default)]
    pub speed_templates: Vec<TemplateRecord>,
    #[serde(default)]
    pub rudiments: Vec<Rudiment>,
}

impl SaveData {
    /// Takes a snapshot of everything that outlives a session.
    pub fn capture(metronome: &Metronome) -> Self {
        let auto_stop = metronome.auto_stop();
        let auto_increase = metronome.auto_increase();
        Self {
            stop_after: auto_stop.stop_after,
            increase_after: auto_increase.increase_after,
            increase_by: auto_increase.increase_by,
            increase_up_to: auto_increase.increase_up_to,
            speed_templates: metronome
                .templates()
                .iter()
                .map(|template| TemplateRecord {
                    name: template.name().to_string(),
                    text: template.source().to_string(),
                })
                .collect(),
            rudiments: metronome.rudiments().to_vec(),
        }
    }

    /// Builds a fresh metronome from the saved settings.
    pub fn restore(self, timing: &TimingConfig) -> Result<Metronome> {
        let templates = self
            .speed_templates
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                SpeedTemplate::parse(record.name.clone(), &record.text).map_err(|source| {
                    MetronomeError::CorruptTemplate {
                        index,
                        name: record.name,
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut metronome = Metronome::with_tempo(timing.initial_tempo, timing.beats_per_bar);
        metronome.restore(
            AutoStop {
                stop_after: self.stop_after,
                ..AutoStop::default()
            },
            AutoIncrease {
                increase_after: self.increase_after,
                increase_by: self.increase_by,
                increase_up_to: self.increase_up_to,
                ..AutoIncrease::default()
            },
            templates,
            self.rudiments,
        );
        Ok(metronome)
    }
}

/// File-backed load/save collaborator. One instance is built at startup and
/// handed to whoever saves at shutdown.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the save file; `Ok(None)` when there is none yet.
    pub fn load(&self) -> Result<Option<SaveData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, data: &SaveData) -> Result<()> {
        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, content)?;
        tracing::info!(path = ?self.path, templates = data.speed_templates.len(), "saved state");
        Ok(())
    }

    pub fn save_metronome(&self, metronome: &Metronome) -> Result<()> {
        self.save(&SaveData::capture(metronome))
    }

    /// Restores the previous session or starts a fresh one.
    ///
    /// A missing or unreadable file falls back to a default metronome. A
    /// readable file holding a template that no longer parses is an error.
    pub fn load_or_default(&self, timing: &TimingConfig) -> Result<Metronome> {
        match self.load() {
            Ok(Some(data)) => data.restore(timing),
            Ok(None) => Ok(Metronome::with_tempo(timing.initial_tempo, timing.beats_per_bar)),
            Err(err) => {
                tracing::warn!(path = ?self.path, %err, "ignoring unreadable save data");
                Ok(Metronome::with_tempo(timing.initial_tempo, timing.beats_per_bar))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_metronome() -> Metronome {
        let mut metronome = Metronome::new();
        metronome.set_stop_values(32);
        metronome.set_increase_values(5, 8, 180);
        metronome.add_template(SpeedTemplate::parse("warmup", "r4-100-2.8-140.").unwrap());
        metronome.add_template(SpeedTemplate::parse("steady", "16-90.").unwrap());
        metronome
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("save.json"));
        let original = sample_metronome();

        store.save_metronome(&original).unwrap();
        let restored = store.load_or_default(&TimingConfig::default()).unwrap();

        assert_eq!(restored.auto_stop().stop_after, 32);
        assert_eq!(restored.auto_increase().increase_by, 5);
        assert_eq!(restored.auto_increase().increase_after, 8);
        assert_eq!(restored.auto_increase().increase_up_to, 180);
        assert_eq!(restored.templates(), original.templates());
    }

    #[test]
    fn missing_file_is_no_prior_state() {
        let dir = tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("nothing.json"));
        assert!(store.load().unwrap().is_none());

        let metronome = store.load_or_default(&TimingConfig::default()).unwrap();
        assert!(metronome.templates().is_empty());
        assert_eq!(metronome.tempo(), 100);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "not json").unwrap();
        let store = SaveStore::new(&path);

        assert!(store.load().is_err());
        let metronome = store.load_or_default(&TimingConfig::default()).unwrap();
        assert_eq!(metronome.auto_stop().stop_after, AutoStop::default().stop_after);
    }

    #[test]
    fn corrupt_template_is_an_integrity_error() {
        let data = SaveData {
            stop_after: 1,
            increase_after: 1,
            increase_by: 1,
            increase_up_to: 1,
            speed_templates: vec![
                TemplateRecord {
                    name: "ok".into(),
                    text: "1-60.".into(),
                },
                TemplateRecord {
                    name: "bad".into(),
                    text: "1-60".into(),
                },
            ],
            rudiments: Vec::new(),
        };

        let err = data.restore(&TimingConfig::default()).unwrap_err();
        match err {
            MetronomeError::CorruptTemplate { index, name, .. } => {
                assert_eq!(index, 1);
                assert_eq!(name, "bad");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn keeps_rudiments_opaque() {
        let json = r#"{
            "stop_after": 100, "increase_after": 16, "increase_by": 10, "increase_up_to": 200,
            "speed_templates": [],
            "rudiments": [{ "name": "paradiddle", "pattern": "RLRR LRLL" }]
        }"#;
        let data: SaveData = serde_json::from_str(json).unwrap();
        let metronome = data.clone().restore(&TimingConfig::default()).unwrap();

        assert_eq!(metronome.rudiments().len(), 1);
        assert_eq!(SaveData::capture(&metronome), data);
    }
}
