use crate::assets::AssetStore;
use crate::input::{InputEvent, Key, TickInput};
use crate::render::DrawList;
use crate::Result;

use super::TextBox;

/// Form-level command raised by a key the focused box did not use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCommand {
    Ok,
    Close,
}

/// A group of text boxes with shared focus handling.
///
/// Keys go to the focused box first. Tab moves the focus to the next box,
/// Enter confirms and Escape closes.
#[derive(Debug, Clone, Default)]
pub struct Form {
    boxes: Vec<TextBox>,
}

impl Form {
    pub fn new(boxes: Vec<TextBox>) -> Self {
        Self { boxes }
    }

    pub fn push(&mut self, text_box: TextBox) {
        self.boxes.push(text_box);
    }

    pub fn field(&self, index: usize) -> Option<&TextBox> {
        self.boxes.get(index)
    }

    /// Text of the box at `index`, empty when there is none.
    pub fn text(&self, index: usize) -> &str {
        self.boxes.get(index).map_or("", TextBox::text)
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) {
        if let Some(text_box) = self.boxes.get_mut(index) {
            text_box.set_text(text);
        }
    }

    pub fn focused(&self) -> Option<usize> {
        self.boxes.iter().position(TextBox::is_focused)
    }

    pub fn blur_all(&mut self) {
        for text_box in &mut self.boxes {
            text_box.blur();
        }
    }

    /// Routes one tick of input and returns the command it raised, if any.
    pub fn handle(&mut self, input: &TickInput) -> Option<FormCommand> {
        if let InputEvent::LeftButtonUp(point) = input.mouse {
            for text_box in &mut self.boxes {
                if text_box.contains(point) {
                    text_box.on_click(point);
                } else {
                    text_box.blur();
                }
            }
        }

        let InputEvent::Keystroke { keys, shift } = &input.keyboard else {
            return None;
        };
        let unused: Vec<Key> = match self.boxes.iter_mut().find(|b| b.is_focused()) {
            Some(text_box) => keys
                .iter()
                .copied()
                .filter(|key| !text_box.on_key(*key, *shift))
                .collect(),
            None => keys.clone(),
        };

        let mut command = None;
        for key in unused {
            match key {
                Key::Tab => self.cycle_focus(),
                Key::Enter => command = Some(FormCommand::Ok),
                Key::Escape => command = Some(FormCommand::Close),
                _ => {}
            }
        }
        command
    }

    fn cycle_focus(&mut self) {
        if self.boxes.len() < 2 {
            return;
        }
        let next = match self.focused() {
            Some(current) => {
                self.boxes[current].blur();
                (current + 1) % self.boxes.len()
            }
            None => 0,
        };
        self.boxes[next].focus();
    }

    pub fn load_assets(&self, assets: &mut AssetStore) -> Result<()> {
        match self.boxes.first() {
            Some(text_box) => text_box.load_assets(assets),
            None => Ok(()),
        }
    }

    pub fn draw(&self, out: &mut DrawList) {
        for text_box in &self.boxes {
            text_box.draw(out);
        }
    }
}
