use crate::assets::AssetStore;
use crate::geometry::{Point, Rect};
use crate::input::InputEvent;
use crate::render::{Color, DrawList, Font};
use crate::Result;

/// Pixel width of one small-font character, used to centre labels.
const LABEL_CHAR_WIDTH: i32 = 7;
const LABEL_HEIGHT: i32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Hot,
    Pressed,
}

impl ButtonState {
    fn suffix(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Hot => "Hot",
            Self::Pressed => "Pressed",
        }
    }
}

/// A clickable button that yields `A` when released over it.
#[derive(Debug, Clone)]
pub struct Button<A> {
    pub rect: Rect,
    texture: &'static str,
    label: Option<String>,
    left: Option<A>,
    right: Option<A>,
    pub state: ButtonState,
    pub visible: bool,
}

impl<A: Clone> Button<A> {
    pub fn new(texture: &'static str, rect: Rect) -> Self {
        Self {
            rect,
            texture,
            label: None,
            left: None,
            right: None,
            state: ButtonState::Normal,
            visible: true,
        }
    }

    /// Action fired by a left click.
    pub fn on_left(mut self, action: A) -> Self {
        self.left = Some(action);
        self
    }

    /// Action fired by a right click.
    pub fn on_right(mut self, action: A) -> Self {
        self.right = Some(action);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn texture(&self) -> &'static str {
        self.texture
    }

    fn hit(&self, point: Point) -> bool {
        self.visible && self.rect.contains(point)
    }

    pub fn draw(&self, out: &mut DrawList) {
        if !self.visible {
            return;
        }
        out.sprite(
            format!("Textures/Buttons/{}{}", self.texture, self.state.suffix()),
            self.rect,
            1.0,
        );
        if let Some(label) = &self.label {
            let width = LABEL_CHAR_WIDTH * label.chars().count() as i32;
            let position = Point::new(
                self.rect.x + (self.rect.width - width) / 2,
                self.rect.y + (self.rect.height - LABEL_HEIGHT) / 2,
            );
            out.text(label.clone(), position, Font::Small, Color::Black);
        }
    }
}

/// The buttons of one surface plus their shared click and hover handling.
#[derive(Debug, Clone)]
pub struct ButtonSet<A> {
    buttons: Vec<Button<A>>,
}

impl<A> Default for ButtonSet<A> {
    fn default() -> Self {
        Self {
            buttons: Vec::new(),
        }
    }
}

impl<A: Clone> ButtonSet<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, button: Button<A>) {
        self.buttons.push(button);
    }

    pub fn buttons(&self) -> &[Button<A>] {
        &self.buttons
    }

    /// First button whose left action satisfies `matches`.
    pub fn find_mut(&mut self, matches: impl Fn(&A) -> bool) -> Option<&mut Button<A>> {
        self.buttons
            .iter_mut()
            .find(|button| button.left.as_ref().is_some_and(&matches))
    }

    pub fn load_assets(&self, assets: &mut AssetStore) -> Result<()> {
        for button in &self.buttons {
            assets.require_button(button.texture)?;
        }
        Ok(())
    }

    /// Applies one mouse event and returns the actions it fired.
    ///
    /// A press marks the button under the pointer as pressed. A release over
    /// a button fires its left or right action and resets every button. A
    /// hover marks the button under the pointer as hot.
    pub fn handle_mouse(&mut self, event: &InputEvent) -> Vec<A> {
        let mut fired = Vec::new();
        match event {
            InputEvent::LeftButtonDown(point) | InputEvent::RightButtonDown(point) => {
                for button in self.buttons.iter_mut().filter(|b| b.hit(*point)) {
                    button.state = ButtonState::Pressed;
                }
            }
            InputEvent::LeftButtonUp(point) | InputEvent::RightButtonUp(point) => {
                let right = matches!(event, InputEvent::RightButtonUp(_));
                for button in &mut self.buttons {
                    if button.hit(*point) {
                        let action = if right { &button.right } else { &button.left };
                        fired.extend(action.clone());
                    }
                    button.state = ButtonState::Normal;
                }
            }
            InputEvent::Hover(point) => {
                for button in &mut self.buttons {
                    button.state = if button.hit(*point) {
                        ButtonState::Hot
                    } else {
                        ButtonState::Normal
                    };
                }
            }
            InputEvent::Keystroke { .. } | InputEvent::Idle => {}
        }
        fired
    }

    pub fn draw(&self, out: &mut DrawList) {
        for button in &self.buttons {
            button.draw(out);
        }
    }
}
