use crate::assets::{AssetKind, AssetStore};
use crate::geometry::{Point, Rect};
use crate::input::TickInput;
use crate::render::{Color, DrawList, Font};
use crate::screen::{Surface, SurfaceContext};
use crate::timing::Metronome;
use crate::widgets::{Button, ButtonSet};
use crate::Result;

use super::{AppState, TemplateEditorHud, TemplateProgressHud};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SideBarAction {
    NewTemplate,
    NewRudiment,
    StartTemplate(usize),
    EditTemplate(usize),
}

/// Left-hand panel with the template and rudiment libraries.
///
/// Left-clicking a template starts it, right-clicking opens it in the
/// editor. The buttons are rebuilt whenever the library changes.
#[derive(Debug, Clone)]
pub struct SideBar {
    rect: Rect,
    buttons: ButtonSet<SideBarAction>,
    templates: Vec<String>,
    rudiments: Vec<String>,
    new_template_y: i32,
}

impl SideBar {
    pub fn new(state: &AppState) -> Self {
        let window = state.window;
        let mut side_bar = Self {
            rect: Rect::new(window.x, window.y, window.width / 5, window.height),
            buttons: ButtonSet::new(),
            templates: Vec::new(),
            rudiments: Vec::new(),
            new_template_y: 0,
        };
        side_bar.rebuild(&state.metronome);
        side_bar
    }

    fn rebuild(&mut self, metronome: &Metronome) {
        self.templates = metronome
            .templates()
            .iter()
            .map(|template| template.name().to_string())
            .collect();
        self.rudiments = metronome
            .rudiments()
            .iter()
            .map(|rudiment| rudiment.name.clone())
            .collect();

        let x = self.rect.x + 10;
        let mut buttons = ButtonSet::new();
        for (index, name) in self.templates.iter().enumerate() {
            let y = self.rect.y + 40 + index as i32 * 30;
            buttons.push(
                Button::new("TextButtonBlue", Rect::new(x, y, 100, 20))
                    .with_label(name.clone())
                    .on_left(SideBarAction::StartTemplate(index))
                    .on_right(SideBarAction::EditTemplate(index)),
            );
        }

        self.new_template_y = self.rect.y + 40 + self.templates.len() as i32 * 30;
        buttons.push(
            Button::new("TextButton", Rect::new(x, self.new_template_y, 100, 25))
                .with_label("New Template")
                .on_left(SideBarAction::NewTemplate),
        );
        let new_rudiment_y = self.new_template_y + 80 + self.rudiments.len() as i32 * 30;
        buttons.push(
            Button::new("TextButton", Rect::new(x, new_rudiment_y, 100, 25))
                .with_label("New Rudiment")
                .on_left(SideBarAction::NewRudiment),
        );
        self.buttons = buttons;
    }

    fn is_stale(&self, metronome: &Metronome) -> bool {
        let templates = metronome.templates();
        templates.len() != self.templates.len()
            || templates
                .iter()
                .zip(&self.templates)
                .any(|(template, name)| template.name() != name)
            || metronome.rudiments().len() != self.rudiments.len()
    }

    fn start_template(&self, ctx: &mut SurfaceContext<'_, AppState>, index: usize) {
        let was_playing = ctx.state.metronome.is_playing_template();
        if let Err(err) = ctx.state.metronome.start_template(index) {
            tracing::warn!(%err, "could not start speed template");
            return;
        }
        // The old progress overlay is the top surface while a template runs.
        if was_playing {
            ctx.pop(1);
        }
        if let Some(playback) = ctx.state.metronome.playback() {
            let overlay = TemplateProgressHud::new(ctx.state.window, playback.template());
            ctx.push(Box::new(overlay));
        }
    }
}

impl Surface<AppState> for SideBar {
    fn name(&self) -> &'static str {
        "side-bar"
    }

    fn load_assets(&mut self, assets: &mut AssetStore) -> Result<()> {
        assets.require(AssetKind::Texture, "Textures/BlackSquare")?;
        assets.require(AssetKind::Font, "Fonts/MediumFont")?;
        assets.require(AssetKind::Font, "Fonts/SmallFont")?;
        assets.require_button("TextButton")?;
        assets.require_button("TextButtonBlue")
    }

    fn update(&mut self, ctx: &mut SurfaceContext<'_, AppState>, input: &TickInput) -> bool {
        if self.is_stale(&ctx.state.metronome) {
            self.rebuild(&ctx.state.metronome);
        }

        for action in self.buttons.handle_mouse(&input.mouse) {
            match action {
                SideBarAction::NewTemplate => {
                    let editor = TemplateEditorHud::create(ctx.state);
                    ctx.push(Box::new(editor));
                }
                SideBarAction::NewRudiment => {
                    tracing::info!("rudiment editing is not available yet");
                }
                SideBarAction::StartTemplate(index) => self.start_template(ctx, index),
                SideBarAction::EditTemplate(index) => match TemplateEditorHud::edit(ctx.state, index) {
                    Ok(editor) => ctx.push(Box::new(editor)),
                    Err(err) => tracing::warn!(%err, "could not open speed template"),
                },
            }
        }
        true
    }

    fn draws_lower(&self) -> bool {
        true
    }

    fn draw(&self, _state: &AppState, out: &mut DrawList) {
        out.sprite("Textures/BlackSquare", self.rect, 0.8);
        self.buttons.draw(out);

        let x = self.rect.x + 10;
        out.text(
            "Speed Templates:",
            Point::new(x, self.rect.y + 10),
            Font::Medium,
            Color::White,
        );
        out.text(
            "Rudiments:",
            Point::new(x, self.new_template_y + 50),
            Font::Medium,
            Color::White,
        );
        for (index, name) in self.rudiments.iter().enumerate() {
            out.text(
                name.clone(),
                Point::new(x, self.new_template_y + 80 + index as i32 * 30),
                Font::Small,
                Color::White,
            );
        }
    }

    fn hit_test(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::testing::{click, right_click, state, with_context};
    use crate::template::SpeedTemplate;
    use crate::timing::PlayState;

    fn with_templates() -> AppState {
        let mut state = state();
        for (name, text) in [("slow", "2-60."), ("fast", "4-120.8-160.")] {
            state
                .metronome
                .add_template(SpeedTemplate::parse(name, text).unwrap());
        }
        state
    }

    fn template_button(index: i32) -> Point {
        Point::new(15, 45 + index * 30)
    }

    #[test]
    fn lays_out_one_button_per_template() {
        let state = with_templates();
        let side_bar = SideBar::new(&state);
        let labels: Vec<_> = side_bar
            .buttons
            .buttons()
            .iter()
            .filter_map(Button::label)
            .collect();
        assert_eq!(labels, vec!["slow", "fast", "New Template", "New Rudiment"]);
        assert_eq!(side_bar.rect, Rect::new(0, 0, 180, 600));
    }

    #[test]
    fn left_click_starts_template_with_overlay() {
        let mut state = with_templates();
        let mut side_bar = SideBar::new(&state);

        let (_, staged) = with_context(&mut state, |ctx| {
            for input in click(template_button(1)) {
                side_bar.update(ctx, &input);
            }
        });
        assert_eq!(staged.pops(), 0);
        assert_eq!(staged.pushed(), vec!["template-progress-hud"]);
        assert_eq!(state.metronome.play_state(), PlayState::Playing);
        assert_eq!(state.metronome.tempo(), 120);
    }

    #[test]
    fn starting_while_a_template_runs_replaces_the_overlay() {
        let mut state = with_templates();
        state.metronome.start_template(1).unwrap();
        let mut side_bar = SideBar::new(&state);

        let (_, staged) = with_context(&mut state, |ctx| {
            for input in click(template_button(0)) {
                side_bar.update(ctx, &input);
            }
        });
        assert_eq!(staged.pops(), 1);
        assert_eq!(staged.pushed(), vec!["template-progress-hud"]);
        assert_eq!(state.metronome.tempo(), 60);
    }

    #[test]
    fn right_click_opens_the_editor() {
        let mut state = with_templates();
        let mut side_bar = SideBar::new(&state);
        let (_, staged) = with_context(&mut state, |ctx| {
            for input in right_click(template_button(0)) {
                side_bar.update(ctx, &input);
            }
        });
        assert_eq!(staged.pushed(), vec!["edit-template-hud"]);
        assert_eq!(state.metronome.play_state(), PlayState::Stopped);
    }

    #[test]
    fn new_template_button_opens_the_creator() {
        let mut state = with_templates();
        let mut side_bar = SideBar::new(&state);
        let (_, staged) = with_context(&mut state, |ctx| {
            for input in click(Point::new(15, 45 + 2 * 30)) {
                side_bar.update(ctx, &input);
            }
        });
        assert_eq!(staged.pushed(), vec!["create-template-hud"]);
    }

    #[test]
    fn rebuilds_after_library_changes() {
        let mut state = with_templates();
        let mut side_bar = SideBar::new(&state);
        state.metronome.remove_template(0).unwrap();

        with_context(&mut state, |ctx| side_bar.update(ctx, &TickInput::idle()));
        let labels: Vec<_> = side_bar
            .buttons
            .buttons()
            .iter()
            .filter_map(Button::label)
            .collect();
        assert_eq!(labels, vec!["fast", "New Template", "New Rudiment"]);
    }
}
