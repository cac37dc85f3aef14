//! Event types delivered to subscribers.

use crate::keycode::Key;
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held when a keyboard event was captured.
    ///
    /// Each flag is set if either the left or the right physical key is down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Modifiers: u8 {
        const ALT = 1;
        const CONTROL = 1 << 1;
        const SHIFT = 1 << 2;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::empty()
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MouseButton {
    /// No button is involved (move and wheel events).
    #[default]
    None,
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
    /// Extra button 1 (typically back).
    XButton1,
    /// Extra button 2 (typically forward).
    XButton2,
}

/// A global keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyboardEvent {
    /// The key that changed state.
    pub key: Key,
    /// The raw virtual-key code.
    pub vk_code: u32,
    /// The hardware scan code.
    pub scan_code: u32,
    /// Modifier keys held at capture time.
    pub modifiers: Modifiers,
    /// `true` for key down (including system key down), `false` for key up.
    pub is_key_down: bool,
    /// Message time stamp in milliseconds, as reported by the OS.
    pub time: u32,
    /// May be set by subscribers.
    ///
    /// Events are dispatched after the OS callback has already returned, so
    /// setting this does not stop the input from reaching other applications.
    pub handled: bool,
}

impl KeyboardEvent {
    /// Check whether the given modifiers are all held.
    pub fn has_modifiers(&self, modifiers: Modifiers) -> bool {
        self.modifiers.contains(modifiers)
    }
}

/// A global mouse event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MouseEvent {
    /// The button that changed state, [`MouseButton::None`] otherwise.
    pub button: MouseButton,
    /// X coordinate (screen coordinates).
    pub x: i32,
    /// Y coordinate (screen coordinates).
    pub y: i32,
    /// Signed wheel rotation, a multiple of 120 per notch. Only set for wheel events.
    pub wheel_delta: i32,
    /// `true` if a button was pressed, `false` if released.
    pub is_mouse_down: bool,
    /// The pointer moved.
    pub is_move: bool,
    /// The vertical wheel was scrolled.
    pub is_wheel: bool,
    /// Message time stamp in milliseconds, as reported by the OS.
    pub time: u32,
    /// May be set by subscribers. See [`KeyboardEvent::handled`].
    pub handled: bool,
}

impl MouseEvent {
    /// Check if this event reports a button press or release.
    pub fn is_button(&self) -> bool {
        self.button != MouseButton::None
    }

    /// The cursor position as a tuple.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
