use crate::assets::AssetStore;
use crate::geometry::{Point, Rect};
use crate::input::TickInput;
use crate::render::DrawList;
use crate::screen::{Surface, SurfaceContext};
use crate::widgets::TextBox;
use crate::Result;

use super::{AppState, Hud, HudEvent};

/// Popup for the auto-increase step, interval and ceiling.
#[derive(Debug, Clone)]
pub struct SpeedTrainerHud {
    hud: Hud<()>,
}

impl SpeedTrainerHud {
    pub fn new(state: &AppState) -> Self {
        let rect = state.popup_rect();
        let field = |row: i32, default: &str| {
            TextBox::digits(Rect::new(rect.right() - 120, rect.y + 70 + row * 40, 60, 25), 3)
                .with_default_text(default)
        };
        let mut hud = Hud::new(rect)
            .with_shade(state.window)
            .with_field("Increase By", "BPM", field(0, "10"))
            .with_field("Increase After", "Bars", field(1, "8"))
            .with_field("Increase Up To", "BPM", field(2, "200"));

        let policy = state.metronome.auto_increase();
        let form = hud.form_mut();
        form.set_text(0, policy.increase_by.to_string());
        form.set_text(1, policy.increase_after.to_string());
        form.set_text(2, policy.increase_up_to.to_string());
        Self { hud }
    }

    fn values(&self) -> std::result::Result<(i32, u32, u32), std::num::ParseIntError> {
        let form = self.hud.form();
        Ok((
            form.text(0).parse()?,
            form.text(1).parse()?,
            form.text(2).parse()?,
        ))
    }
}

impl Surface<AppState> for SpeedTrainerHud {
    fn name(&self) -> &'static str {
        "speed-trainer-hud"
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
        match self.values() {
            Ok((increase_by, increase_after, increase_up_to)) => {
                ctx.state
                    .metronome
                    .set_increase_values(increase_by, increase_after, increase_up_to);
                ctx.pop(1);
            }
            Err(err) => {
                tracing::warn!(%err, "rejected speed trainer values");
                self.hud.set_error("Every value must be a number");
            }
        }
    }

    fn handle_close(&mut self, ctx: &mut SurfaceContext<'_, AppState>) {
        ctx.pop(1);
    }
}
