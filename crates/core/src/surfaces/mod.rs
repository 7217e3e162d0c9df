//! The concrete layers of the metronome interface.
//!
//! [`MetronomeScreen`] is the base of the stack and [`SideBar`] sits on it for
//! the whole session. The HUDs are pushed on demand and pop themselves.

mod hud;
mod metronome_screen;
mod side_bar;
mod speed_trainer_hud;
mod stop_hud;
mod template_editor;
mod template_progress;

pub use hud::{Hud, HudEvent};
pub use metronome_screen::{pointer_angle, MetronomeScreen};
pub use side_bar::SideBar;
pub use speed_trainer_hud::SpeedTrainerHud;
pub use stop_hud::StopHud;
pub use template_editor::{EditorMode, TemplateEditorHud};
pub use template_progress::TemplateProgressHud;

use crate::geometry::Rect;
use crate::timing::Metronome;

/// State shared by every surface.
#[derive(Debug)]
pub struct AppState {
    pub metronome: Metronome,
    /// Window bounds the surfaces lay themselves out in.
    pub window: Rect,
}

impl AppState {
    pub fn new(metronome: Metronome, window: Rect) -> Self {
        Self { metronome, window }
    }

    /// Where popup HUDs are placed: 300x200, centred in the window.
    pub fn popup_rect(&self) -> Rect {
        self.window.centered(300, 200)
    }
}
