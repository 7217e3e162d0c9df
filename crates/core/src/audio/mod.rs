use crate::assets::{AssetKind, AssetStore};
use crate::timing::SoundType;
use crate::Result;

/// Receiver for beat sounds. Triggers are fire-and-forget and may overlap.
pub trait SoundSink {
    fn play(&mut self, sound: SoundType);
}

/// Sample played for each sound type; `None` plays nothing.
pub fn sample_for(sound: SoundType) -> Option<&'static str> {
    match sound {
        SoundType::High => Some("Sounds/PingHigh"),
        SoundType::Low => Some("Sounds/PingLow"),
        SoundType::Attention => Some("Sounds/Attention"),
        SoundType::SpeedIncrease => Some("Sounds/SpeedIncrease"),
        SoundType::None => None,
    }
}

/// Sink used when no audio device is attached: every trigger is logged.
#[derive(Debug, Default)]
pub struct AudioEngine {
    triggered: u64,
}

impl AudioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the four beat samples.
    pub fn load_assets(&self, assets: &mut AssetStore) -> Result<()> {
        for sound in [
            SoundType::High,
            SoundType::Low,
            SoundType::Attention,
            SoundType::SpeedIncrease,
        ] {
            if let Some(sample) = sample_for(sound) {
                assets.require(AssetKind::Sound, sample)?;
            }
        }
        Ok(())
    }

    /// Number of samples triggered so far.
    pub fn triggered(&self) -> u64 {
        self.triggered
    }
}

impl SoundSink for AudioEngine {
    fn play(&mut self, sound: SoundType) {
        if let Some(sample) = sample_for(sound) {
            self.triggered += 1;
            tracing::debug!(sample, "play");
        }
    }
}

/// Collects every non-silent trigger, for tests and offline runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub played: Vec<SoundType>,
}

impl SoundSink for RecordingSink {
    fn play(&mut self, sound: SoundType) {
        if sound != SoundType::None {
            self.played.push(sound);
        }
    }
}
