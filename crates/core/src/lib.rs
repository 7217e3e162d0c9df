//! Core library for the Metronome application.
//!
//! The timing engine ([`Metronome`]) produces one [`SoundType`] per tick and
//! runs speed templates written in a small text language ([`SpeedTemplate`]).
//! The interface is a stack of surfaces managed by [`ScreenManager`], fed by
//! the [`InputClassifier`] and driven frame by frame through [`Session`].
//! Rendering and audio output stay outside the crate: surfaces record
//! [`DrawCommand`]s and sounds go to a [`SoundSink`].

pub mod assets;
pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod persist;
pub mod render;
pub mod screen;
pub mod session;
pub mod surfaces;
pub mod template;
pub mod timing;
pub mod widgets;

pub use assets::{AssetKind, AssetStore};
pub use audio::{AudioEngine, RecordingSink, SoundSink};
pub use clock::{Clock, FixedStepClock, SystemClock};
pub use config::{AppConfig, InputConfig, TimingConfig, WindowConfig};
pub use error::{MetronomeError, Result};
pub use geometry::{Point, Rect};
pub use input::{InputClassifier, InputEvent, Key, KeyboardSnapshot, MouseSnapshot, TickInput};
pub use persist::{Rudiment, SaveData, SaveStore, TemplateRecord};
pub use render::{DrawCommand, DrawList};
pub use screen::{ScreenManager, Surface, SurfaceContext};
pub use session::Session;
pub use surfaces::AppState;
pub use template::{ParseError, SpeedTemplate, TemplateSegment};
pub use timing::{Metronome, PlayState, SoundType, MAX_TEMPO, MIN_TEMPO};
