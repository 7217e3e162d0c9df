use crate::assets::{AssetKind, AssetStore};
use crate::geometry::{Point, Rect};
use crate::input::TickInput;
use crate::render::{Color, DrawList, Font};
use crate::widgets::{Button, ButtonSet, Form, FormCommand, TextBox};
use crate::Result;

const BUTTON_SIZE: i32 = 32;

/// What happened on a HUD during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudEvent<A> {
    Ok,
    Close,
    Action(A),
}

#[derive(Debug, Clone)]
struct Caption {
    label: &'static str,
    unit: &'static str,
    y: i32,
}

/// Shared body of the popup panels: background, Ok and Close buttons and an
/// optional form of labelled text boxes.
#[derive(Debug, Clone)]
pub struct Hud<A> {
    rect: Rect,
    shade: Option<Rect>,
    buttons: ButtonSet<HudEvent<A>>,
    form: Form,
    captions: Vec<Caption>,
    error: Option<String>,
}

impl<A: Clone> Hud<A> {
    pub fn new(rect: Rect) -> Self {
        let mut buttons = ButtonSet::new();
        buttons.push(Button::new("Ok", Self::corner_slot(rect, 2)).on_left(HudEvent::Ok));
        buttons.push(Button::new("Close", Self::corner_slot(rect, 1)).on_left(HudEvent::Close));
        Self {
            rect,
            shade: None,
            buttons,
            form: Form::default(),
            captions: Vec::new(),
            error: None,
        }
    }

    /// Square button slot `n` from the top-right corner, 1-based.
    pub fn corner_slot(rect: Rect, n: i32) -> Rect {
        Rect::new(
            rect.right() - n * (BUTTON_SIZE + 10),
            rect.y + 5,
            BUTTON_SIZE,
            BUTTON_SIZE,
        )
    }

    /// Darkens `area` (usually the whole window) under the panel.
    pub fn with_shade(mut self, area: Rect) -> Self {
        self.shade = Some(area);
        self
    }

    pub fn with_button(mut self, button: Button<HudEvent<A>>) -> Self {
        self.buttons.push(button);
        self
    }

    /// Adds a text box with a caption on its left and a unit on the right.
    pub fn with_field(mut self, label: &'static str, unit: &'static str, text_box: TextBox) -> Self {
        self.captions.push(Caption {
            label,
            unit,
            y: text_box.rect().y,
        });
        self.form.push(text_box);
        self
    }

    /// Adds a full-width text box captioned on the line above it.
    pub fn with_wide_field(mut self, label: &'static str, text_box: TextBox) -> Self {
        self.captions.push(Caption {
            label,
            unit: "",
            y: text_box.rect().y - 30,
        });
        self.form.push(text_box);
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }

    /// Message shown at the bottom of the panel until the next one.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Applies one tick of input to the buttons and the form.
    pub fn handle(&mut self, input: &TickInput) -> Vec<HudEvent<A>> {
        let mut events = self.buttons.handle_mouse(&input.mouse);
        match self.form.handle(input) {
            Some(FormCommand::Ok) => events.push(HudEvent::Ok),
            Some(FormCommand::Close) => events.push(HudEvent::Close),
            None => {}
        }
        events
    }

    pub fn load_assets(&self, assets: &mut AssetStore) -> Result<()> {
        assets.require(AssetKind::Texture, "Textures/BlackSquare")?;
        assets.require(AssetKind::Font, "Fonts/MediumFont")?;
        assets.require(AssetKind::Font, "Fonts/SmallFont")?;
        self.buttons.load_assets(assets)?;
        self.form.load_assets(assets)
    }

    pub fn draw(&self, out: &mut DrawList) {
        if let Some(area) = self.shade {
            out.sprite("Textures/BlackSquare", area, 0.25);
        }
        out.sprite("Textures/BlackSquare", self.rect, 0.8);
        self.buttons.draw(out);

        for caption in &self.captions {
            out.text(
                caption.label,
                Point::new(self.rect.x + 10, caption.y),
                Font::Medium,
                Color::White,
            );
            out.text(
                caption.unit,
                Point::new(self.rect.right() - 50, caption.y),
                Font::Small,
                Color::White,
            );
        }
        self.form.draw(out);

        if let Some(error) = &self.error {
            out.text(
                error.clone(),
                Point::new(self.rect.x + 10, self.rect.bottom() - 25),
                Font::Small,
                Color::White,
            );
        }
    }
}
