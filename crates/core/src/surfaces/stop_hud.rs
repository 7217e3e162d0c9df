use crate::assets::AssetStore;
use crate::geometry::{Point, Rect};
use crate::input::TickInput;
use crate::render::DrawList;
use crate::screen::{Surface, SurfaceContext};
use crate::widgets::TextBox;
use crate::Result;

use super::{AppState, Hud, HudEvent};

/// Popup for the auto-stop bar count.
#[derive(Debug, Clone)]
pub struct StopHud {
    hud: Hud<()>,
}

impl StopHud {
    pub fn new(state: &AppState) -> Self {
        let rect = state.popup_rect();
        let field = TextBox::digits(Rect::new(rect.right() - 120, rect.y + 70, 60, 25), 3)
            .with_default_text("100");
        let mut hud = Hud::new(rect)
            .with_shade(state.window)
            .with_field("Stop After", "Bars", field);
        hud.form_mut()
            .set_text(0, state.metronome.auto_stop().stop_after.to_string());
        Self { hud }
    }
}

impl Surface<AppState> for StopHud {
    fn name(&self) -> &'static str {
        "stop-hud"
    }

    fn load_assets(&mut self, assets: &mut AssetStore) -> Result<()> {
        self.hud.load_assets(assets)
    }

    fn update(&mut self, ctx: &mut SurfaceContext<'_, AppState>, input: &TickInput) -> bool {
        for event in self.hud.handle(input) {
            match event {
                HudEvent::Ok => {
                    self.handle_ok(ctx);
                    break;
                }
                HudEvent::Close => {
                    self.handle_close(ctx);
                    break;
                }
                HudEvent::Action(()) => {}
            }
        }
        false
    }

    fn draws_lower(&self) -> bool {
        true
    }

    fn draw(&self, _state: &AppState, out: &mut DrawList) {
        self.hud.draw(out);
    }

    fn hit_test(&self, point: Point) -> bool {
        self.hud.contains(point)
    }

    fn handle_ok(&mut self, ctx: &mut SurfaceContext<'_, AppState>) {
        self.hud.form_mut().blur_all();
        match self.hud.form().text(0).parse::<u32>() {
            Ok(stop_after) => {
                ctx.state.metronome.set_stop_values(stop_after);
                ctx.pop(1);
            }
            Err(err) => {
                tracing::warn!(%err, "rejected stop value");
                self.hud.set_error("Stop After must be a number");
            }
        }
    }

    fn handle_close(&mut self, ctx: &mut SurfaceContext<'_, AppState>) {
        ctx.pop(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::geometry::Point;
    use crate::surfaces::testing::{click, keys, state, typing, with_context};

    #[test]
    fn ok_applies_the_typed_bar_count() {
        let mut state = state();
        let mut hud = StopHud::new(&state);
        assert_eq!(hud.hud.form().text(0), "100");

        let field = hud.hud.form().field(0).unwrap().rect();
        let mut inputs = click(Point::new(field.right() - 1, field.y + 5)).to_vec();
        inputs.extend([keys(&[Key::Backspace]), keys(&[Key::Backspace])]);
        inputs.extend(typing("2"));
        let (_, staged) = with_context(&mut state, |ctx| {
            for input in &inputs {
                hud.update(ctx, input);
            }
        });
        assert!(staged.is_empty());
        assert_eq!(hud.hud.form().text(0), "12");

        let (update_lower, staged) = with_context(&mut state, |ctx| hud.update(ctx, &keys(&[Key::Enter])));
        assert!(!update_lower);
        assert_eq!(staged.pops(), 1);
        assert_eq!(state.metronome.auto_stop().stop_after, 12);
    }

    #[test]
    fn close_discards_the_edit() {
        let mut state = state();
        let mut hud = StopHud::new(&state);
        let (_, staged) = with_context(&mut state, |ctx| {
            hud.update(ctx, &keys(&[Key::Tab]));
            hud.update(ctx, &keys(&[Key::Digit(5)]));
            hud.update(ctx, &keys(&[Key::Escape]));
        });
        assert_eq!(staged.pops(), 1);
        assert_eq!(state.metronome.auto_stop().stop_after, 100);
    }
}
