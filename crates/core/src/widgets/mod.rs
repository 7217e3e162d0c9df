//! Reusable interface pieces shared by the surfaces.

mod button;
mod form;
mod text_box;

pub use button::{Button, ButtonSet, ButtonState};
pub use form::{Form, FormCommand};
pub use text_box::TextBox;
