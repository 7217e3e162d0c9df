use crate::assets::{AssetKind, AssetStore};
use crate::geometry::{Point, Rect};
use crate::input::Key;
use crate::render::{Color, DrawList, Font};
use crate::Result;

/// Left padding between the box edge and its text.
const TEXT_INSET: i32 = 5;

/// Single-line text input.
///
/// The cursor sits in front of the character with index `cursor`. Click
/// positions are mapped to a cursor index with a fixed character width per
/// font, since glyph metrics belong to the renderer.
#[derive(Debug, Clone)]
pub struct TextBox {
    rect: Rect,
    text: String,
    default_text: String,
    cursor: usize,
    focused: bool,
    digits_only: bool,
    max_len: usize,
    small_font: bool,
}

impl TextBox {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            text: String::new(),
            default_text: String::new(),
            cursor: 0,
            focused: false,
            digits_only: false,
            max_len: 3,
            small_font: false,
        }
    }

    /// Box accepting at most `max_len` digits.
    pub fn digits(rect: Rect, max_len: usize) -> Self {
        Self {
            digits_only: true,
            max_len,
            ..Self::new(rect)
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn with_small_font(mut self) -> Self {
        self.small_font = true;
        self
    }

    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.cursor.min(self.len());
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }

    /// Focuses the box with the cursor at the end of the text.
    pub fn focus(&mut self) {
        self.focused = true;
        self.cursor = self.len();
    }

    /// Drops the focus; an empty box falls back to its default text.
    pub fn blur(&mut self) {
        self.focused = false;
        if self.text.is_empty() {
            self.text = self.default_text.clone();
            self.cursor = 0;
        }
    }

    /// Focuses the box and moves the cursor to the clicked character.
    pub fn on_click(&mut self, point: Point) {
        self.focused = true;
        let origin = self.rect.x + TEXT_INSET;
        let width = self.char_width();
        self.cursor = (0..self.len())
            .find(|&index| origin + index as i32 * width >= point.x)
            .unwrap_or_else(|| self.len());
    }

    /// Applies one key. Returns `false` when the box has no use for it.
    pub fn on_key(&mut self, key: Key, shift: bool) -> bool {
        match key {
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at(self.cursor);
                }
                true
            }
            Key::Delete => {
                if self.cursor < self.len() {
                    self.remove_at(self.cursor);
                }
                true
            }
            Key::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            Key::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                true
            }
            Key::End => {
                self.cursor = self.len();
                true
            }
            other => match other.to_char(shift) {
                Some(ch) => {
                    self.insert(ch);
                    true
                }
                None => false,
            },
        }
    }

    fn insert(&mut self, ch: char) {
        if self.len() >= self.max_len || (self.digits_only && !ch.is_ascii_digit()) {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    fn remove_at(&mut self, index: usize) {
        let at = self.byte_offset(index);
        self.text.remove(at);
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn char_width(&self) -> i32 {
        if self.small_font {
            7
        } else {
            10
        }
    }

    fn font(&self) -> Font {
        if self.small_font {
            Font::Small
        } else {
            Font::Medium
        }
    }

    pub fn load_assets(&self, assets: &mut AssetStore) -> Result<()> {
        assets.require(AssetKind::Texture, "Textures/TextBox")?;
        assets.require(AssetKind::Texture, "Textures/BlackSquare")
    }

    pub fn draw(&self, out: &mut DrawList) {
        out.sprite("Textures/TextBox", self.rect, 1.0);
        let origin = Point::new(self.rect.x + TEXT_INSET, self.rect.y + 3);
        out.text(self.text.clone(), origin, self.font(), Color::Black);
        if self.focused {
            let x = origin.x + self.cursor as i32 * self.char_width();
            out.sprite(
                "Textures/BlackSquare",
                Rect::new(x, origin.y + 1, 1, self.rect.height - 8),
                1.0,
            );
        }
    }
}
