//! Per-frame driver tying the metronome, the input classifier and the
//! surface stack together.

use std::time::Duration;

use crate::assets::AssetStore;
use crate::audio::SoundSink;
use crate::config::AppConfig;
use crate::geometry::Point;
use crate::input::{InputClassifier, KeyboardSnapshot, MouseSnapshot};
use crate::render::DrawList;
use crate::screen::ScreenManager;
use crate::surfaces::{AppState, MetronomeScreen, SideBar, TemplateProgressHud};
use crate::timing::{Metronome, SoundType};
use crate::Result;

/// One running interface session.
#[derive(Debug)]
pub struct Session {
    state: AppState,
    screens: ScreenManager<AppState>,
    input: InputClassifier,
}

impl Session {
    /// Builds the surface stack: the metronome screen with the side bar on
    /// top, plus the progress overlay when a template is already playing.
    pub fn new(metronome: Metronome, config: &AppConfig, assets: AssetStore) -> Result<Self> {
        let state = AppState::new(metronome, config.window.bounds());
        let mut screens = ScreenManager::new(Box::new(MetronomeScreen::new(&state)), assets)?;
        screens.stage_push(Box::new(SideBar::new(&state)));
        if let Some(playback) = state.metronome.playback() {
            screens.stage_push(Box::new(TemplateProgressHud::new(
                state.window,
                playback.template(),
            )));
        }
        screens.apply_staged()?;

        Ok(Self {
            state,
            screens,
            input: InputClassifier::new(&config.input),
        })
    }

    /// Runs one tick: the metronome first, then input classification, then
    /// the surface update pass. Returns the sound handed to `sink`.
    pub fn frame(
        &mut self,
        elapsed: Duration,
        mouse: MouseSnapshot,
        keyboard: KeyboardSnapshot,
        sink: &mut impl SoundSink,
    ) -> Result<SoundType> {
        let sound = self.state.metronome.tick(elapsed);
        sink.play(sound);

        let input = self.input.classify(mouse, keyboard);
        self.screens.update(&mut self.state, &input)?;
        Ok(sound)
    }

    /// Records the visible surfaces into `out`, replacing its contents.
    pub fn draw(&mut self, out: &mut DrawList) {
        out.clear();
        self.screens.draw(&self.state, out);
    }

    pub fn metronome(&self) -> &Metronome {
        &self.state.metronome
    }

    pub fn screens(&self) -> &ScreenManager<AppState> {
        &self.screens
    }

    /// Pointer position of the latest frame.
    pub fn pointer(&self) -> Point {
        self.input.pointer()
    }

    /// Ends the session and hands back the metronome for saving.
    pub fn into_metronome(self) -> Metronome {
        self.state.metronome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::template::SpeedTemplate;
    use crate::timing::PlayState;

    fn session(metronome: Metronome) -> Session {
        Session::new(metronome, &AppConfig::default(), AssetStore::new()).unwrap()
    }

    fn mouse(x: i32, y: i32, left: bool) -> MouseSnapshot {
        MouseSnapshot {
            position: Point::new(x, y),
            left,
            right: false,
        }
    }

    fn click(session: &mut Session, x: i32, y: i32, sink: &mut RecordingSink) {
        for left in [true, false] {
            session
                .frame(Duration::ZERO, mouse(x, y, left), KeyboardSnapshot::default(), sink)
                .unwrap();
        }
    }

    fn beat(session: &Session) -> Duration {
        Duration::from_secs_f64(session.metronome().millis_per_beat() / 1000.0)
            + Duration::from_micros(1)
    }

    #[test]
    fn starts_with_side_bar_over_metronome() {
        let session = session(Metronome::new());
        assert_eq!(session.screens().names(), vec!["metronome-screen", "side-bar"]);
        assert!(session.screens().assets().is_required("Textures/MetronomePointer"));
        assert!(session.screens().assets().is_required("Textures/Buttons/TextButtonBlueHot"));
    }

    #[test]
    fn play_button_starts_the_beat() {
        let mut session = session(Metronome::new());
        let mut sink = RecordingSink::default();
        click(&mut session, 400, 50, &mut sink);
        assert_eq!(session.metronome().play_state(), PlayState::Playing);
        assert_eq!(session.pointer(), Point::new(400, 50));

        for _ in 0..5 {
            let elapsed = beat(&session);
            session
                .frame(elapsed, mouse(400, 50, false), KeyboardSnapshot::default(), &mut sink)
                .unwrap();
        }
        assert_eq!(
            sink.played,
            vec![
                SoundType::High,
                SoundType::Low,
                SoundType::Low,
                SoundType::Low,
                SoundType::High
            ]
        );
    }

    #[test]
    fn template_overlay_comes_and_goes_with_playback() {
        let mut metronome = Metronome::new();
        metronome.add_template(SpeedTemplate::parse("short", "1-100.").unwrap());
        let mut session = session(metronome);
        let mut sink = RecordingSink::default();

        click(&mut session, 15, 45, &mut sink);
        assert!(session.metronome().is_playing_template());
        assert_eq!(
            session.screens().names(),
            vec!["metronome-screen", "side-bar", "template-progress-hud"]
        );

        for _ in 0..5 {
            let elapsed = beat(&session);
            session
                .frame(elapsed, mouse(15, 45, false), KeyboardSnapshot::default(), &mut sink)
                .unwrap();
        }
        assert_eq!(session.metronome().play_state(), PlayState::Stopped);
        assert_eq!(sink.played.len(), 4);
        assert_eq!(session.screens().names(), vec!["metronome-screen", "side-bar"]);
    }

    #[test]
    fn resumes_overlay_for_a_template_already_playing() {
        let mut metronome = Metronome::new();
        metronome.play_template(SpeedTemplate::parse("t", "4-90.").unwrap());
        let session = session(metronome);
        assert_eq!(session.screens().len(), 3);
    }

    #[test]
    fn draws_base_before_side_bar() {
        let mut session = session(Metronome::new());
        let mut out = DrawList::new();
        session.draw(&mut out);
        let texts: Vec<_> = out.texts().collect();

        let tempo = texts.iter().position(|text| *text == "100");
        let heading = texts.iter().position(|text| *text == "Speed Templates:");
        assert!(tempo.is_some() && heading.is_some());
        assert!(tempo < heading);
    }
}
