//! Turns raw device snapshots into one discrete event per channel and tick.
//!
//! Polling the devices is left to the host. Each tick it hands the current
//! [`MouseSnapshot`] and [`KeyboardSnapshot`] to [`InputClassifier::classify`],
//! which compares them with the previous tick's snapshots.

use crate::config::InputConfig;
use crate::geometry::Point;

/// Keys the user interface reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A letter key, always lowercase.
    Letter(char),
    /// Top-row or keypad digit.
    Digit(u8),
    Period,
    Comma,
    Minus,
    Plus,
    Space,
    Backspace,
    Delete,
    Left,
    Right,
    End,
    Tab,
    Enter,
    Escape,
    Shift,
}

impl Key {
    /// Character typed by the key, if it types one.
    pub fn to_char(self, shift: bool) -> Option<char> {
        match self {
            Self::Letter(letter) if shift => Some(letter.to_ascii_uppercase()),
            Self::Letter(letter) => Some(letter),
            Self::Digit(digit) => char::from_digit(u32::from(digit), 10),
            Self::Period => Some('.'),
            Self::Comma => Some(','),
            Self::Minus => Some('-'),
            Self::Plus => Some('+'),
            Self::Space => Some(' '),
            _ => None,
        }
    }
}

/// Mouse state polled for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseSnapshot {
    pub position: Point,
    pub left: bool,
    pub right: bool,
}

/// Keys held down during one tick, in the order the host reports them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyboardSnapshot {
    pub pressed: Vec<Key>,
}

impl KeyboardSnapshot {
    pub fn new(pressed: impl Into<Vec<Key>>) -> Self {
        Self {
            pressed: pressed.into(),
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn shift(&self) -> bool {
        self.is_down(Key::Shift)
    }
}

/// A single semantic input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    LeftButtonDown(Point),
    LeftButtonUp(Point),
    RightButtonDown(Point),
    RightButtonUp(Point),
    /// No button is or was held; the pointer is at the given position.
    Hover(Point),
    Keystroke { keys: Vec<Key>, shift: bool },
    Idle,
}

impl InputEvent {
    /// Pointer position carried by mouse events.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::LeftButtonDown(point)
            | Self::LeftButtonUp(point)
            | Self::RightButtonDown(point)
            | Self::RightButtonUp(point)
            | Self::Hover(point) => Some(*point),
            Self::Keystroke { .. } | Self::Idle => None,
        }
    }

    pub fn is_keystroke(&self) -> bool {
        matches!(self, Self::Keystroke { .. })
    }
}

/// The pair of events produced for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInput {
    pub mouse: InputEvent,
    pub keyboard: InputEvent,
}

impl TickInput {
    pub fn idle() -> Self {
        Self {
            mouse: InputEvent::Idle,
            keyboard: InputEvent::Idle,
        }
    }
}

/// Classifies a mouse transition between two consecutive snapshots.
///
/// Checked in order: hover while both buttons stay up, left press, left
/// release, right press, right release. Anything else (a held button) is
/// idle.
pub fn classify_mouse(previous: &MouseSnapshot, current: &MouseSnapshot) -> InputEvent {
    let position = current.position;
    if !current.left && !previous.left && !current.right && !previous.right {
        return InputEvent::Hover(position);
    }
    match (previous.left, current.left, previous.right, current.right) {
        (false, true, _, _) => InputEvent::LeftButtonDown(position),
        (true, false, _, _) => InputEvent::LeftButtonUp(position),
        (_, _, false, true) => InputEvent::RightButtonDown(position),
        (_, _, true, false) => InputEvent::RightButtonUp(position),
        _ => InputEvent::Idle,
    }
}

/// Keystroke edge detection with repeat-after-delay for a single held key.
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    repeat_delay: u32,
    repeat_interval: u32,
    held_ticks: u32,
}

impl KeyRepeat {
    pub fn new(repeat_delay: u32, repeat_interval: u32) -> Self {
        Self {
            repeat_delay,
            repeat_interval: repeat_interval.max(1),
            held_ticks: 0,
        }
    }

    /// Classifies a keyboard transition.
    ///
    /// - one key down: a keystroke when it was just pressed, then again every
    ///   `repeat_interval` ticks once it has been held for `repeat_delay`;
    /// - no key down: resets the repeat counter;
    /// - several keys down: a keystroke for the keys that were not down before.
    pub fn classify(&mut self, previous: &KeyboardSnapshot, current: &KeyboardSnapshot) -> InputEvent {
        let shift = current.shift();
        match current.pressed.as_slice() {
            [] => {
                self.held_ticks = 0;
                InputEvent::Idle
            }
            [key] => {
                self.held_ticks = self.held_ticks.saturating_add(1);
                let fresh = !previous.is_down(*key);
                let repeating = self.held_ticks > self.repeat_delay
                    && self.held_ticks % self.repeat_interval == 0;
                if fresh || repeating {
                    InputEvent::Keystroke {
                        keys: vec![*key],
                        shift,
                    }
                } else {
                    InputEvent::Idle
                }
            }
            keys if keys.len() > previous.pressed.len() => InputEvent::Keystroke {
                keys: keys
                    .iter()
                    .copied()
                    .filter(|key| !previous.is_down(*key))
                    .collect(),
                shift,
            },
            _ => InputEvent::Idle,
        }
    }
}

/// Stateful front end that remembers the previous tick's snapshots.
#[derive(Debug, Clone)]
pub struct InputClassifier {
    last_mouse: MouseSnapshot,
    last_keyboard: KeyboardSnapshot,
    repeat: KeyRepeat,
}

impl InputClassifier {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            last_mouse: MouseSnapshot::default(),
            last_keyboard: KeyboardSnapshot::default(),
            repeat: KeyRepeat::new(config.repeat_delay_ticks, config.repeat_interval_ticks),
        }
    }

    /// Produces this tick's events and stores the snapshots for the next one.
    pub fn classify(&mut self, mouse: MouseSnapshot, keyboard: KeyboardSnapshot) -> TickInput {
        let input = TickInput {
            mouse: classify_mouse(&self.last_mouse, &mouse),
            keyboard: self.repeat.classify(&self.last_keyboard, &keyboard),
        };
        self.last_mouse = mouse;
        self.last_keyboard = keyboard;
        input
    }

    /// Pointer position from the most recent snapshot.
    pub fn pointer(&self) -> Point {
        self.last_mouse.position
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}
