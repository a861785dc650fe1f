//! Input event types delivered by the windowing layer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

    /// Index into per-button state arrays, in GLFW order (left, right, middle)
    pub fn index(&self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Press,
    Release,
}

/// A keyboard key, reduced to what the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

impl Key {
    /// Parse a key name such as `"u"` or `"escape"`
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if lower == "escape" || lower == "esc" {
            return Some(Key::Escape);
        }
        let mut chars = lower.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Key::Char(c)),
            _ => None,
        }
    }
}

/// Which mouse buttons are held
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    pressed: [bool; 3],
}

impl ButtonState {
    pub fn set(&mut self, button: MouseButton, action: ButtonAction) {
        self.pressed[button.index()] = action == ButtonAction::Press;
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed[button.index()]
    }
}
