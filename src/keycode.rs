//! Virtual key code definitions.
//!
//! Every named [`Key`] maps to exactly one Windows virtual-key code and back.
//! Codes without a name are preserved as [`Key::Unknown`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! virtual_keys {
    ($( $(#[$meta:meta])* $name:ident = $vk:literal, )*) => {
        /// Virtual key codes for keyboard keys.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum Key {
            $( $(#[$meta])* $name, )*
            /// Virtual-key code without a named variant.
            Unknown(u32),
        }

        impl Key {
            /// Look up the key for a virtual-key code.
            pub fn from_vk(vk: u32) -> Self {
                match vk {
                    $( $vk => Key::$name, )*
                    other => Key::Unknown(other),
                }
            }

            /// The virtual-key code of this key.
            pub fn vk(&self) -> u32 {
                match self {
                    $( Key::$name => $vk, )*
                    Key::Unknown(vk) => *vk,
                }
            }
        }
    };
}

virtual_keys! {
    // Mouse buttons as reported through the keyboard state
    MouseLeft = 0x01,
    MouseRight = 0x02,
    Cancel = 0x03,
    MouseMiddle = 0x04,
    MouseX1 = 0x05,
    MouseX2 = 0x06,

    Backspace = 0x08,
    Tab = 0x09,
    Clear = 0x0C,
    Enter = 0x0D,

    // Side-agnostic modifiers
    Shift = 0x10,
    Control = 0x11,
    /// The Alt key (`VK_MENU`).
    Alt = 0x12,

    Pause = 0x13,
    CapsLock = 0x14,
    Escape = 0x1B,
    Space = 0x20,

    // Navigation
    PageUp = 0x21,
    PageDown = 0x22,
    End = 0x23,
    Home = 0x24,
    ArrowLeft = 0x25,
    ArrowUp = 0x26,
    ArrowRight = 0x27,
    ArrowDown = 0x28,
    PrintScreen = 0x2C,
    Insert = 0x2D,
    Delete = 0x2E,

    // Numbers (top row)
    Num0 = 0x30,
    Num1 = 0x31,
    Num2 = 0x32,
    Num3 = 0x33,
    Num4 = 0x34,
    Num5 = 0x35,
    Num6 = 0x36,
    Num7 = 0x37,
    Num8 = 0x38,
    Num9 = 0x39,

    // Letters
    KeyA = 0x41,
    KeyB = 0x42,
    KeyC = 0x43,
    KeyD = 0x44,
    KeyE = 0x45,
    KeyF = 0x46,
    KeyG = 0x47,
    KeyH = 0x48,
    KeyI = 0x49,
    KeyJ = 0x4A,
    KeyK = 0x4B,
    KeyL = 0x4C,
    KeyM = 0x4D,
    KeyN = 0x4E,
    KeyO = 0x4F,
    KeyP = 0x50,
    KeyQ = 0x51,
    KeyR = 0x52,
    KeyS = 0x53,
    KeyT = 0x54,
    KeyU = 0x55,
    KeyV = 0x56,
    KeyW = 0x57,
    KeyX = 0x58,
    KeyY = 0x59,
    KeyZ = 0x5A,

    MetaLeft = 0x5B, // Windows key
    MetaRight = 0x5C,
    ContextMenu = 0x5D,

    // Numpad
    Numpad0 = 0x60,
    Numpad1 = 0x61,
    Numpad2 = 0x62,
    Numpad3 = 0x63,
    Numpad4 = 0x64,
    Numpad5 = 0x65,
    Numpad6 = 0x66,
    Numpad7 = 0x67,
    Numpad8 = 0x68,
    Numpad9 = 0x69,
    NumpadMultiply = 0x6A,
    NumpadAdd = 0x6B,
    NumpadSeparator = 0x6C,
    NumpadSubtract = 0x6D,
    NumpadDecimal = 0x6E,
    NumpadDivide = 0x6F,

    // Function keys
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    F13 = 0x7C,
    F14 = 0x7D,
    F15 = 0x7E,
    F16 = 0x7F,
    F17 = 0x80,
    F18 = 0x81,
    F19 = 0x82,
    F20 = 0x83,
    F21 = 0x84,
    F22 = 0x85,
    F23 = 0x86,
    F24 = 0x87,

    NumLock = 0x90,
    ScrollLock = 0x91,

    // Sided modifiers
    ShiftLeft = 0xA0,
    ShiftRight = 0xA1,
    ControlLeft = 0xA2,
    ControlRight = 0xA3,
    AltLeft = 0xA4,
    AltRight = 0xA5,

    // Browser keys
    BrowserBack = 0xA6,
    BrowserForward = 0xA7,
    BrowserRefresh = 0xA8,
    BrowserStop = 0xA9,
    BrowserSearch = 0xAA,
    BrowserFavorites = 0xAB,
    BrowserHome = 0xAC,

    // Media keys
    VolumeMute = 0xAD,
    VolumeDown = 0xAE,
    VolumeUp = 0xAF,
    MediaNext = 0xB0,
    MediaPrevious = 0xB1,
    MediaStop = 0xB2,
    MediaPlayPause = 0xB3,

    // Application keys
    LaunchMail = 0xB4,
    LaunchMediaSelect = 0xB5,
    LaunchApp1 = 0xB6,
    LaunchApp2 = 0xB7,

    // Punctuation and symbols (US layout)
    Semicolon = 0xBA,    // ; :
    Equal = 0xBB,        // = +
    Comma = 0xBC,        // , <
    Minus = 0xBD,        // - _
    Period = 0xBE,       // . >
    Slash = 0xBF,        // / ?
    Grave = 0xC0,        // ` ~
    BracketLeft = 0xDB,  // [ {
    Backslash = 0xDC,    // \ |
    BracketRight = 0xDD, // ] }
    Quote = 0xDE,        // ' "
    IntlBackslash = 0xE2,
}

impl Key {
    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::Shift
                | Key::Control
                | Key::Alt
                | Key::ShiftLeft
                | Key::ShiftRight
                | Key::ControlLeft
                | Key::ControlRight
                | Key::AltLeft
                | Key::AltRight
                | Key::MetaLeft
                | Key::MetaRight
        )
    }

    /// Check if this is a letter key.
    pub fn is_letter(&self) -> bool {
        (0x41..=0x5A).contains(&self.vk()) && !matches!(self, Key::Unknown(_))
    }

    /// Check if this is a number key (top row).
    pub fn is_number(&self) -> bool {
        (0x30..=0x39).contains(&self.vk()) && !matches!(self, Key::Unknown(_))
    }

    /// Check if this is a function key.
    pub fn is_function_key(&self) -> bool {
        (0x70..=0x87).contains(&self.vk()) && !matches!(self, Key::Unknown(_))
    }

    /// Check if this is a numpad key.
    pub fn is_numpad(&self) -> bool {
        (0x60..=0x6F).contains(&self.vk()) && !matches!(self, Key::Unknown(_))
    }

    /// Check if this is a mouse button reported as a virtual key.
    pub fn is_mouse_button(&self) -> bool {
        matches!(
            self,
            Key::MouseLeft | Key::MouseRight | Key::MouseMiddle | Key::MouseX1 | Key::MouseX2
        )
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::Unknown(0)
    }
}

impl From<u32> for Key {
    fn from(vk: u32) -> Self {
        Key::from_vk(vk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vk_lookup_matches_windows_constants() {
        assert_eq!(Key::from_vk(0x41), Key::KeyA);
        assert_eq!(Key::from_vk(0x1B), Key::Escape);
        assert_eq!(Key::from_vk(0x7B), Key::F12);
        assert_eq!(Key::from_vk(0xA4), Key::AltLeft);
        assert_eq!(Key::from_vk(0x12), Key::Alt);
        assert_eq!(Key::ShiftRight.vk(), 0xA1);
        assert_eq!(Key::Num0.vk(), 0x30);
    }

    #[test]
    fn test_every_code_round_trips() {
        for vk in 0..=0xFFu32 {
            assert_eq!(Key::from_vk(vk).vk(), vk);
        }
    }

    #[test]
    fn test_unknown_codes_are_preserved() {
        assert_eq!(Key::from_vk(0x07), Key::Unknown(0x07));
        assert_eq!(Key::from_vk(0x1_0000), Key::Unknown(0x1_0000));
        assert_eq!(Key::default().vk(), 0);
    }

    #[test]
    fn test_classification() {
        assert!(Key::ControlRight.is_modifier());
        assert!(!Key::KeyA.is_modifier());
        assert!(Key::KeyZ.is_letter());
        assert!(!Key::Unknown(0x41).is_letter());
        assert!(Key::Num9.is_number());
        assert!(Key::F24.is_function_key());
        assert!(Key::NumpadDivide.is_numpad());
        assert!(Key::MouseX2.is_mouse_button());
        assert!(Key::PageDown.is_navigation());
    }
}
