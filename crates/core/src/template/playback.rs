use crate::timing::SoundType;

use super::SpeedTemplate;

/// What the metronome has to do after a template saw a bar boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOutcome {
    /// Keep the current tempo.
    Continue,
    /// Switch to `tempo` and announce the change with `sound`.
    Transition { tempo: u32, sound: SoundType },
    /// The last segment ended and the template does not repeat.
    Finished,
}

/// Playback cursor over a [`SpeedTemplate`].
///
/// The metronome owns the cursor while a template is active and calls
/// [`TemplatePlayback::on_bar`] on every bar boundary.
#[derive(Debug, Clone)]
pub struct TemplatePlayback {
    template: SpeedTemplate,
    segment_index: usize,
    bar_counter: u32,
}

impl TemplatePlayback {
    pub fn new(template: SpeedTemplate) -> Self {
        Self {
            template,
            segment_index: 0,
            bar_counter: 0,
        }
    }

    pub fn template(&self) -> &SpeedTemplate {
        &self.template
    }

    /// Tempo of the first segment, applied when playback starts.
    pub fn initial_tempo(&self) -> u32 {
        self.template.segments()[0].tempo
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Bars counted towards the current segment.
    pub fn bar_counter(&self) -> u32 {
        self.bar_counter
    }

    /// Advances the cursor by one bar.
    ///
    /// The segment switch and the bar increment happen in the same call, so
    /// the boundary bar is the first bar of the next segment.
    pub fn on_bar(&mut self) -> BarOutcome {
        let segments = self.template.segments();
        let mut outcome = BarOutcome::Continue;

        if self.bar_counter >= segments[self.segment_index].bars {
            let previous_tempo = segments[self.segment_index].tempo;
            self.segment_index += 1;

            if self.segment_index >= segments.len() {
                if self.template.repeats() {
                    self.segment_index = 0;
                } else {
                    return BarOutcome::Finished;
                }
            }

            let tempo = segments[self.segment_index].tempo;
            let sound = if tempo != previous_tempo {
                SoundType::SpeedIncrease
            } else {
                SoundType::Attention
            };
            self.bar_counter = 0;
            outcome = BarOutcome::Transition { tempo, sound };
        }

        self.bar_counter += 1;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playback(text: &str) -> TemplatePlayback {
        TemplatePlayback::new(SpeedTemplate::parse("test", text).unwrap())
    }

    #[test]
    fn transitions_after_segment_bars() {
        let mut playback = playback("2-100.3-140.");
        assert_eq!(playback.initial_tempo(), 100);

        assert_eq!(playback.on_bar(), BarOutcome::Continue);
        assert_eq!(playback.on_bar(), BarOutcome::Continue);
        assert_eq!(
            playback.on_bar(),
            BarOutcome::Transition {
                tempo: 140,
                sound: SoundType::SpeedIncrease
            }
        );
        assert_eq!(playback.segment_index(), 1);
        assert_eq!(playback.bar_counter(), 1);

        assert_eq!(playback.on_bar(), BarOutcome::Continue);
        assert_eq!(playback.on_bar(), BarOutcome::Continue);
        assert_eq!(playback.on_bar(), BarOutcome::Finished);
    }

    #[test]
    fn same_tempo_transition_sounds_attention() {
        let mut playback = playback("1-90-2.");
        assert_eq!(playback.on_bar(), BarOutcome::Continue);
        assert_eq!(
            playback.on_bar(),
            BarOutcome::Transition {
                tempo: 90,
                sound: SoundType::Attention
            }
        );
    }

    #[test]
    fn repeating_template_wraps_to_first_segment() {
        let mut playback = playback("r1-100.1-120.");
        assert_eq!(playback.on_bar(), BarOutcome::Continue);
        assert_eq!(
            playback.on_bar(),
            BarOutcome::Transition {
                tempo: 120,
                sound: SoundType::SpeedIncrease
            }
        );
        assert_eq!(
            playback.on_bar(),
            BarOutcome::Transition {
                tempo: 100,
                sound: SoundType::SpeedIncrease
            }
        );
        assert_eq!(playback.segment_index(), 0);
        assert_eq!(playback.bar_counter(), 1);
    }

    #[test]
    fn repeating_single_tempo_wraps_with_attention() {
        let mut playback = playback("r1-100.");
        assert_eq!(playback.on_bar(), BarOutcome::Continue);
        assert_eq!(
            playback.on_bar(),
            BarOutcome::Transition {
                tempo: 100,
                sound: SoundType::Attention
            }
        );
    }
}
