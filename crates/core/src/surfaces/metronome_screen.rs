use std::f64::consts::FRAC_PI_4;

use crate::assets::{AssetKind, AssetStore};
use crate::geometry::{Point, Rect};
use crate::input::TickInput;
use crate::render::{Color, DrawList, Font};
use crate::screen::{Surface, SurfaceContext};
use crate::timing::{Metronome, PlayState};
use crate::widgets::{Button, ButtonSet, ButtonState};
use crate::Result;

use super::{AppState, SpeedTrainerHud, StopHud};

const BODY_SIZE: (i32, i32) = (150, 300);
const BODY_TOP: i32 = 130;
/// Rotation origin of the pointer texture, in texture pixels.
const POINTER_PIVOT: Point = Point::new(16, 760);
const POINTER_SCALE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenAction {
    Play,
    Pause,
    Stop,
    ChangeTempo(i32),
    ToggleAutoStop,
    ToggleAutoIncrease,
    ShowStopHud,
    ShowSpeedTrainerHud,
}

/// Angle of the swinging pointer in radians; negative swings left.
///
/// The pointer is upright when stopped, leans out to a quarter of pi over
/// the first half of a beat and comes back over the second half, changing
/// side on every beat.
pub fn pointer_angle(metronome: &Metronome) -> f32 {
    if metronome.play_state() == PlayState::Stopped {
        return 0.0;
    }
    let elapsed = metronome.elapsed_since_beat().as_secs_f64() * 1000.0;
    let progress = (elapsed / metronome.millis_per_beat()).min(1.0);
    let swing = if progress < 0.5 {
        FRAC_PI_4 * progress
    } else {
        FRAC_PI_4 - FRAC_PI_4 * progress
    };
    let angle = if metronome.tick_counter() % 2 == 0 {
        -swing
    } else {
        swing
    };
    angle as f32
}

/// Base surface: the metronome itself and its transport controls.
///
/// Left-clicking the auto-stop and auto-increase buttons toggles the
/// policy; right-clicking opens its settings.
#[derive(Debug, Clone)]
pub struct MetronomeScreen {
    rect: Rect,
    body: Rect,
    buttons: ButtonSet<ScreenAction>,
    stop_mode: Rect,
    speed_mode: Rect,
}

impl MetronomeScreen {
    pub fn new(state: &AppState) -> Self {
        let rect = state.window;
        let center = rect.x + rect.width / 2;
        let stop_mode = Rect::new(center - 180, 490, 50, 50);
        let speed_mode = Rect::new(center + 130, 490, 50, 50);

        let mut buttons = ButtonSet::new();
        let transport = Rect::new(center - 74, 20, 64, 64);
        buttons.push(Button::new("Play", transport).on_left(ScreenAction::Play));
        buttons.push(Button::new("Pause", transport).on_left(ScreenAction::Pause));
        buttons.push(
            Button::new("Stop", Rect::new(center + 10, 20, 64, 64)).on_left(ScreenAction::Stop),
        );
        for (texture, x, y, delta) in [
            ("Increase", center - 82, 470, 1),
            ("Decrease", center + 50, 470, -1),
            ("Increase10", center - 82, 520, 10),
            ("Decrease10", center + 50, 520, -10),
        ] {
            buttons.push(
                Button::new(texture, Rect::new(x, y, 32, 32))
                    .on_left(ScreenAction::ChangeTempo(delta)),
            );
        }
        buttons.push(
            Button::new("StopMode", stop_mode)
                .on_left(ScreenAction::ToggleAutoStop)
                .on_right(ScreenAction::ShowStopHud),
        );
        buttons.push(
            Button::new("SpeedMode", speed_mode)
                .on_left(ScreenAction::ToggleAutoIncrease)
                .on_right(ScreenAction::ShowSpeedTrainerHud),
        );

        let mut screen = Self {
            rect,
            body: Rect::new(center - BODY_SIZE.0 / 2, BODY_TOP, BODY_SIZE.0, BODY_SIZE.1),
            buttons,
            stop_mode,
            speed_mode,
        };
        screen.sync(&state.metronome);
        screen
    }

    /// Shows play or pause and mirrors the auto policies on their buttons.
    fn sync(&mut self, metronome: &Metronome) {
        let playing = metronome.play_state() == PlayState::Playing;
        let toggles = [
            (ScreenAction::Play, None, !playing),
            (ScreenAction::Pause, None, playing),
            (ScreenAction::ToggleAutoStop, Some(metronome.auto_stop().enabled), true),
            (ScreenAction::ToggleAutoIncrease, Some(metronome.auto_increase().enabled), true),
        ];
        for (action, pressed, visible) in toggles {
            if let Some(button) = self.buttons.find_mut(|candidate| *candidate == action) {
                button.visible = visible;
                if let Some(pressed) = pressed {
                    button.state = if pressed {
                        ButtonState::Pressed
                    } else {
                        ButtonState::Normal
                    };
                }
            }
        }
    }

    fn apply(&self, ctx: &mut SurfaceContext<'_, AppState>, action: ScreenAction) {
        let metronome = &mut ctx.state.metronome;
        match action {
            ScreenAction::Play => metronome.resume(),
            ScreenAction::Pause => metronome.pause(),
            ScreenAction::Stop => metronome.stop(),
            ScreenAction::ChangeTempo(delta) => metronome.change_tempo_by(delta),
            ScreenAction::ToggleAutoStop => metronome.toggle_auto_stop(),
            ScreenAction::ToggleAutoIncrease => metronome.toggle_auto_increase(),
            ScreenAction::ShowStopHud => {
                let hud = StopHud::new(ctx.state);
                ctx.push(Box::new(hud));
            }
            ScreenAction::ShowSpeedTrainerHud => {
                let hud = SpeedTrainerHud::new(ctx.state);
                ctx.push(Box::new(hud));
            }
        }
    }
}

/// X position that centres `text` on `center` for a font `char_width` wide.
fn centered_x(center: i32, text: &str, char_width: i32) -> i32 {
    center - text.chars().count() as i32 * char_width / 2
}

impl Surface<AppState> for MetronomeScreen {
    fn name(&self) -> &'static str {
        "metronome-screen"
    }

    fn load_assets(&mut self, assets: &mut AssetStore) -> Result<()> {
        for texture in [
            "Textures/Background",
            "Textures/MetronomeBody",
            "Textures/MetronomePointer",
        ] {
            assets.require(AssetKind::Texture, texture)?;
        }
        for font in ["Fonts/BigFatFont", "Fonts/BigFont", "Fonts/MediumFont"] {
            assets.require(AssetKind::Font, font)?;
        }
        self.buttons.load_assets(assets)
    }

    fn update(&mut self, ctx: &mut SurfaceContext<'_, AppState>, input: &TickInput) -> bool {
        self.sync(&ctx.state.metronome);
        for action in self.buttons.handle_mouse(&input.mouse) {
            self.apply(ctx, action);
        }
        self.sync(&ctx.state.metronome);
        false
    }

    fn draws_lower(&self) -> bool {
        false
    }

    fn draw(&self, state: &AppState, out: &mut DrawList) {
        let metronome = &state.metronome;
        out.sprite("Textures/Background", self.rect, 1.0);
        out.sprite("Textures/MetronomeBody", self.body, 1.0);
        out.rotated_sprite(
            "Textures/MetronomePointer",
            Point::new(self.body.x + self.body.width / 2, self.body.y + 225),
            POINTER_PIVOT,
            pointer_angle(metronome),
            POINTER_SCALE,
        );

        let stop = metronome.auto_stop();
        let increase = metronome.auto_increase();
        let counters = [
            (stop.enabled, self.stop_mode, stop.counter, stop.stop_after),
            (
                increase.enabled,
                self.speed_mode,
                increase.counter,
                increase.increase_after,
            ),
        ];
        for (enabled, anchor, counter, limit) in counters {
            if enabled {
                let text = format!("{counter} /{limit}");
                let x = centered_x(anchor.x + anchor.width / 2, &text, 10);
                out.text(text, Point::new(x, anchor.bottom() + 5), Font::Medium, Color::White);
            }
        }

        let bars = metronome.total_bar_counter().to_string();
        let x = centered_x(self.body.x + self.body.width / 2, &bars, 28);
        out.text(bars, Point::new(x, self.body.bottom() - 60), Font::BigFat, Color::Black);

        self.buttons.draw(out);

        let tempo = metronome.tempo().to_string();
        let x = centered_x(self.rect.x + self.rect.width / 2, &tempo, 20);
        out.text(tempo, Point::new(x, 500), Font::Big, Color::White);
    }

    fn hit_test(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}
