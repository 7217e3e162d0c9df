//! Beat scheduling, auto-stop/auto-increase policies and template playback.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::persist::Rudiment;
use crate::template::{BarOutcome, SpeedTemplate, TemplatePlayback};
use crate::{MetronomeError, Result};

/// Highest tempo the metronome will play.
pub const MAX_TEMPO: u32 = 500;
/// Lowest tempo the metronome will play. Requests below it saturate here.
pub const MIN_TEMPO: u32 = 1;

const DEFAULT_TEMPO: u32 = 100;
const DEFAULT_BEATS_PER_BAR: u32 = 4;

/// Transport state of the metronome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Paused,
    Stopped,
}

/// Sound emitted by a tick; `None` when no beat fell on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundType {
    High,
    Low,
    Attention,
    SpeedIncrease,
    None,
}

/// Stops playback after a number of bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoStop {
    pub enabled: bool,
    pub stop_after: u32,
    pub counter: u32,
}

impl Default for AutoStop {
    fn default() -> Self {
        Self {
            enabled: false,
            stop_after: 100,
            counter: 0,
        }
    }
}

/// Raises the tempo every `increase_after` bars until `increase_up_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoIncrease {
    pub enabled: bool,
    pub increase_after: u32,
    pub increase_by: i32,
    pub increase_up_to: u32,
    pub counter: u32,
}

impl Default for AutoIncrease {
    fn default() -> Self {
        Self {
            enabled: false,
            increase_after: 16,
            increase_by: 10,
            increase_up_to: 200,
            counter: 0,
        }
    }
}

/// The timing engine.
///
/// Time is fed in through [`Metronome::tick`]; every beat yields the sound
/// to play. Bar boundaries either advance the active speed template or run
/// the auto-stop and auto-increase policies, in that order.
#[derive(Debug, Clone)]
pub struct Metronome {
    tempo: u32,
    beats_per_bar: u32,
    millis_per_beat: f64,
    elapsed_since_beat: Duration,
    tick_counter: u64,
    total_bar_counter: u64,
    play_state: PlayState,
    auto_stop: AutoStop,
    auto_increase: AutoIncrease,
    templates: Vec<SpeedTemplate>,
    rudiments: Vec<Rudiment>,
    playback: Option<TemplatePlayback>,
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new()
    }
}

impl Metronome {
    pub fn new() -> Self {
        Self::with_tempo(DEFAULT_TEMPO, DEFAULT_BEATS_PER_BAR)
    }

    pub fn with_tempo(tempo: u32, beats_per_bar: u32) -> Self {
        let mut metronome = Self {
            tempo: DEFAULT_TEMPO,
            beats_per_bar: beats_per_bar.max(1),
            millis_per_beat: 0.0,
            elapsed_since_beat: Duration::ZERO,
            tick_counter: 0,
            total_bar_counter: 0,
            play_state: PlayState::Stopped,
            auto_stop: AutoStop::default(),
            auto_increase: AutoIncrease::default(),
            templates: Vec::new(),
            rudiments: Vec::new(),
            playback: None,
        };
        metronome.set_tempo(tempo);
        metronome
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Beat length in milliseconds; always `60000 / tempo`.
    pub fn millis_per_beat(&self) -> f64 {
        self.millis_per_beat
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    /// Time accumulated towards the next beat.
    pub fn elapsed_since_beat(&self) -> Duration {
        self.elapsed_since_beat
    }

    /// Beats played since the last stop.
    pub fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    /// Bars started since the last stop.
    pub fn total_bar_counter(&self) -> u64 {
        self.total_bar_counter
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn auto_stop(&self) -> &AutoStop {
        &self.auto_stop
    }

    pub fn auto_increase(&self) -> &AutoIncrease {
        &self.auto_increase
    }

    pub fn set_tempo(&mut self, tempo: u32) {
        self.apply_tempo(i64::from(tempo));
    }

    pub fn change_tempo_by(&mut self, delta: i32) {
        self.apply_tempo(i64::from(self.tempo) + i64::from(delta));
    }

    fn apply_tempo(&mut self, requested: i64) {
        let clamped = requested.clamp(i64::from(MIN_TEMPO), i64::from(MAX_TEMPO));
        // Within MIN_TEMPO..=MAX_TEMPO, so the conversion cannot fail.
        self.tempo = u32::try_from(clamped).unwrap_or(MAX_TEMPO);
        self.millis_per_beat = 60_000.0 / f64::from(self.tempo);
    }

    pub fn set_beats_per_bar(&mut self, beats: u32) {
        self.beats_per_bar = beats.max(1);
    }

    pub fn set_stop_values(&mut self, stop_after: u32) {
        self.auto_stop.stop_after = stop_after;
    }

    pub fn set_increase_values(&mut self, increase_by: i32, increase_after: u32, increase_up_to: u32) {
        self.auto_increase.increase_by = increase_by;
        self.auto_increase.increase_after = increase_after;
        self.auto_increase.increase_up_to = increase_up_to;
    }

    pub fn toggle_auto_stop(&mut self) {
        self.auto_stop.enabled = !self.auto_stop.enabled;
        self.auto_stop.counter = 0;
    }

    pub fn toggle_auto_increase(&mut self) {
        self.auto_increase.enabled = !self.auto_increase.enabled;
        self.auto_increase.counter = 0;
    }

    pub fn resume(&mut self) {
        if self.play_state != PlayState::Playing {
            tracing::info!(tempo = self.tempo, "metronome playing");
        }
        self.play_state = PlayState::Playing;
    }

    pub fn pause(&mut self) {
        self.play_state = PlayState::Paused;
    }

    /// Stops playback, clears every counter and ends template playback.
    pub fn stop(&mut self) {
        if self.play_state != PlayState::Stopped {
            tracing::info!(bars = self.total_bar_counter, "metronome stopped");
        }
        self.elapsed_since_beat = Duration::ZERO;
        self.play_state = PlayState::Stopped;
        self.tick_counter = 0;
        self.auto_increase.counter = 0;
        self.auto_stop.counter = 0;
        self.total_bar_counter = 0;
        self.playback = None;
    }

    /// Advances the engine by `elapsed` and returns the sound for this tick.
    ///
    /// The beat accumulator is reset to zero on every beat instead of
    /// carrying the surplus into the next one.
    pub fn tick(&mut self, elapsed: Duration) -> SoundType {
        if self.play_state != PlayState::Playing {
            return SoundType::None;
        }

        self.elapsed_since_beat += elapsed;
        if self.elapsed_since_beat.as_secs_f64() * 1000.0 < self.millis_per_beat {
            return SoundType::None;
        }

        let mut sound = SoundType::Low;
        if self.tick_counter % u64::from(self.beats_per_bar) == 0 {
            sound = SoundType::High;
            self.total_bar_counter += 1;

            if self.playback.is_some() {
                sound = self.advance_template(sound);
            } else {
                sound = self.run_auto_stop(sound);
                if self.play_state == PlayState::Playing {
                    sound = self.run_auto_increase(sound);
                }
            }
        }

        if self.play_state != PlayState::Playing {
            return SoundType::None;
        }

        tracing::debug!(?sound, beat = self.tick_counter, "beat");
        self.tick_counter += 1;
        self.elapsed_since_beat = Duration::ZERO;
        sound
    }

    fn advance_template(&mut self, sound: SoundType) -> SoundType {
        let Some(playback) = self.playback.as_mut() else {
            return sound;
        };
        match playback.on_bar() {
            BarOutcome::Continue => sound,
            BarOutcome::Transition { tempo, sound } => {
                self.set_tempo(tempo);
                sound
            }
            BarOutcome::Finished => {
                tracing::info!(template = playback.template().name(), "speed template finished");
                self.stop();
                SoundType::None
            }
        }
    }

    fn run_auto_stop(&mut self, sound: SoundType) -> SoundType {
        if !self.auto_stop.enabled {
            return sound;
        }
        if self.auto_stop.counter >= self.auto_stop.stop_after {
            self.stop();
            return SoundType::None;
        }
        self.auto_stop.counter += 1;
        sound
    }

    fn run_auto_increase(&mut self, mut sound: SoundType) -> SoundType {
        let policy = &self.auto_increase;
        if !policy.enabled || self.tempo >= policy.increase_up_to {
            return sound;
        }
        if policy.counter >= policy.increase_after {
            let step = policy.increase_by;
            self.change_tempo_by(step);
            self.auto_increase.counter = 0;
            sound = SoundType::SpeedIncrease;
            tracing::debug!(tempo = self.tempo, "auto-increase");
        }
        self.auto_increase.counter += 1;
        sound
    }

    pub fn templates(&self) -> &[SpeedTemplate] {
        &self.templates
    }

    pub fn add_template(&mut self, template: SpeedTemplate) {
        self.templates.push(template);
    }

    pub fn replace_template(&mut self, index: usize, template: SpeedTemplate) -> Result<()> {
        let len = self.templates.len();
        let slot = self
            .templates
            .get_mut(index)
            .ok_or(MetronomeError::UnknownTemplate { index, len })?;
        *slot = template;
        Ok(())
    }

    pub fn remove_template(&mut self, index: usize) -> Result<SpeedTemplate> {
        if index >= self.templates.len() {
            return Err(MetronomeError::UnknownTemplate {
                index,
                len: self.templates.len(),
            });
        }
        Ok(self.templates.remove(index))
    }

    /// Restarts the metronome and plays the template stored at `index`.
    pub fn start_template(&mut self, index: usize) -> Result<()> {
        let template = self
            .templates
            .get(index)
            .cloned()
            .ok_or(MetronomeError::UnknownTemplate {
                index,
                len: self.templates.len(),
            })?;
        self.play_template(template);
        Ok(())
    }

    /// Restarts the metronome and plays `template` from its first segment.
    pub fn play_template(&mut self, template: SpeedTemplate) {
        self.stop();
        self.resume();
        let playback = TemplatePlayback::new(template);
        self.set_tempo(playback.initial_tempo());
        tracing::info!(template = playback.template().name(), "speed template started");
        self.playback = Some(playback);
    }

    pub fn is_playing_template(&self) -> bool {
        self.playback.is_some()
    }

    /// Active template playback, if any.
    pub fn playback(&self) -> Option<&TemplatePlayback> {
        self.playback.as_ref()
    }

    /// Rudiments are stored and saved but not played yet.
    pub fn rudiments(&self) -> &[Rudiment] {
        &self.rudiments
    }

    /// Replaces the auto policies and both libraries, e.g. from save data.
    pub(crate) fn restore(
        &mut self,
        auto_stop: AutoStop,
        auto_increase: AutoIncrease,
        templates: Vec<SpeedTemplate>,
        rudiments: Vec<Rudiment>,
    ) {
        self.auto_stop = auto_stop;
        self.auto_increase = auto_increase;
        self.templates = templates;
        self.rudiments = rudiments;
    }
}
