use crate::assets::{AssetKind, AssetStore};
use crate::geometry::{Point, Rect};
use crate::input::TickInput;
use crate::render::{Color, DrawList, Font};
use crate::screen::{Surface, SurfaceContext};
use crate::template::SpeedTemplate;
use crate::timing::PlayState;
use crate::Result;

use super::AppState;

/// Right-hand overlay listing the statements of the running template with
/// a marker on the one being played.
///
/// Takes no input and pops itself once the metronome stops.
#[derive(Debug, Clone)]
pub struct TemplateProgressHud {
    rect: Rect,
    name: String,
    statements: Vec<String>,
    running: usize,
}

impl TemplateProgressHud {
    pub fn new(window: Rect, template: &SpeedTemplate) -> Self {
        let width = window.width / 5;
        Self {
            rect: Rect::new(window.right() - width, window.y, width, window.height),
            name: template.name().to_string(),
            statements: template.statements().iter().map(ToString::to_string).collect(),
            running: 0,
        }
    }

    pub fn running_statement(&self) -> usize {
        self.running
    }

    fn statement_y(&self, index: usize) -> i32 {
        self.rect.y + 40 + index as i32 * 20
    }
}

impl Surface<AppState> for TemplateProgressHud {
    fn name(&self) -> &'static str {
        "template-progress-hud"
    }

    fn load_assets(&mut self, assets: &mut AssetStore) -> Result<()> {
        assets.require(AssetKind::Texture, "Textures/BlackSquare")?;
        assets.require(AssetKind::Texture, "Textures/RedDot")?;
        assets.require(AssetKind::Font, "Fonts/MediumFont")?;
        assets.require(AssetKind::Font, "Fonts/SmallFont")
    }

    fn update(&mut self, ctx: &mut SurfaceContext<'_, AppState>, _input: &TickInput) -> bool {
        let metronome = &ctx.state.metronome;
        if metronome.play_state() == PlayState::Stopped {
            ctx.pop(1);
            return true;
        }
        if let Some(playback) = metronome.playback() {
            self.running = playback
                .template()
                .statement_for_segment(playback.segment_index());
        }
        true
    }

    fn draws_lower(&self) -> bool {
        true
    }

    fn draw(&self, _state: &AppState, out: &mut DrawList) {
        out.sprite("Textures/BlackSquare", self.rect, 0.8);
        out.text(
            self.name.clone(),
            Point::new(self.rect.x + 10, self.rect.y + 10),
            Font::Medium,
            Color::White,
        );
        for (index, statement) in self.statements.iter().enumerate() {
            out.text(
                statement.clone(),
                Point::new(self.rect.x + 45, self.statement_y(index)),
                Font::Small,
                Color::White,
            );
        }
        out.sprite(
            "Textures/RedDot",
            Rect::new(self.rect.x + 10, self.statement_y(self.running) - 5, 25, 25),
            1.0,
        );
    }

    fn hit_test(&self, _point: Point) -> bool {
        false
    }
}
