use crate::assets::AssetStore;
use crate::geometry::{Point, Rect};
use crate::input::TickInput;
use crate::render::DrawList;
use crate::screen::{Surface, SurfaceContext};
use crate::template::SpeedTemplate;
use crate::widgets::{Button, TextBox};
use crate::{MetronomeError, Result};

use super::{AppState, Hud, HudEvent};

/// Whether the editor adds a new template or rewrites a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorAction {
    Delete,
}

/// Popup with a name and a template text field.
///
/// Ok parses the text. A template that does not parse leaves the library
/// untouched and keeps the popup open with the parse error shown.
#[derive(Debug, Clone)]
pub struct TemplateEditorHud {
    mode: EditorMode,
    hud: Hud<EditorAction>,
}

impl TemplateEditorHud {
    pub fn create(state: &AppState) -> Self {
        Self::build(state, EditorMode::Create)
    }

    /// Editor preloaded with the template stored at `index`.
    pub fn edit(state: &AppState, index: usize) -> Result<Self> {
        let templates = state.metronome.templates();
        let template = templates.get(index).ok_or(MetronomeError::UnknownTemplate {
            index,
            len: templates.len(),
        })?;
        let mut editor = Self::build(state, EditorMode::Edit { index });
        let form = editor.hud.form_mut();
        form.set_text(0, template.name());
        form.set_text(1, template.source());
        Ok(editor)
    }

    fn build(state: &AppState, mode: EditorMode) -> Self {
        let rect = state.popup_rect();
        let name = TextBox::new(Rect::new(rect.right() - 160, rect.y + 70, 150, 25))
            .with_max_len(20)
            .with_default_text("new template");
        let text = TextBox::new(Rect::new(rect.x + 10, rect.y + 140, rect.width - 20, 25))
            .with_max_len(150)
            .with_small_font();

        let mut hud = Hud::new(rect)
            .with_shade(state.window)
            .with_field("Name", "", name)
            .with_wide_field("Speed Template", text);
        if matches!(mode, EditorMode::Edit { .. }) {
            hud = hud.with_button(
                Button::new("Delete", Hud::<EditorAction>::corner_slot(rect, 3))
                    .on_left(HudEvent::Action(EditorAction::Delete)),
            );
        }
        Self { mode, hud }
    }

    fn delete(&mut self, ctx: &mut SurfaceContext<'_, AppState>) {
        if let EditorMode::Edit { index } = self.mode {
            match ctx.state.metronome.remove_template(index) {
                Ok(removed) => tracing::info!(template = removed.name(), "speed template deleted"),
                Err(err) => tracing::warn!(%err, "could not delete speed template"),
            }
        }
        ctx.pop(1);
    }
}

impl Surface<AppState> for TemplateEditorHud {
    fn name(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "create-template-hud",
            EditorMode::Edit { .. } => "edit-template-hud",
        }
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
                HudEvent::Action(EditorAction::Delete) => {
                    self.delete(ctx);
                    break;
                }
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
        let form = self.hud.form();
        let template = match SpeedTemplate::parse(form.text(0), form.text(1)) {
            Ok(template) => template,
            Err(err) => {
                tracing::warn!(%err, "rejected speed template");
                self.hud.set_error(err.to_string());
                return;
            }
        };

        let metronome = &mut ctx.state.metronome;
        match self.mode {
            EditorMode::Create => {
                tracing::info!(template = template.name(), "speed template added");
                metronome.add_template(template);
            }
            EditorMode::Edit { index } => {
                if let Err(err) = metronome.replace_template(index, template) {
                    tracing::warn!(%err, "could not replace speed template");
                }
            }
        }
        ctx.pop(1);
    }

    fn handle_close(&mut self, ctx: &mut SurfaceContext<'_, AppState>) {
        ctx.pop(1);
    }
}
