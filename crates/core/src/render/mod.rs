use crate::geometry::{Point, Rect};

/// Font sizes the surfaces use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Small,
    Medium,
    Big,
    BigFat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

/// One primitive for the external renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Texture stretched over `rect`, multiplied by `opacity`.
    Sprite {
        texture: String,
        rect: Rect,
        opacity: f32,
    },
    /// Texture scaled and rotated by `angle` radians around its `pivot`.
    RotatedSprite {
        texture: String,
        position: Point,
        pivot: Point,
        angle: f32,
        scale: f32,
    },
    Text {
        text: String,
        position: Point,
        font: Font,
        color: Color,
    },
}

/// Paint commands recorded during a draw pass, in paint order.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn sprite(&mut self, texture: impl Into<String>, rect: Rect, opacity: f32) {
        self.commands.push(DrawCommand::Sprite {
            texture: texture.into(),
            rect,
            opacity,
        });
    }

    pub fn rotated_sprite(
        &mut self,
        texture: impl Into<String>,
        position: Point,
        pivot: Point,
        angle: f32,
        scale: f32,
    ) {
        self.commands.push(DrawCommand::RotatedSprite {
            texture: texture.into(),
            position,
            pivot,
            angle,
            scale,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Point, font: Font, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            font,
            color,
        });
    }

    /// Every text string in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
