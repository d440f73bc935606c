//! Portable key code definitions.
//!
//! The portable code space is derived from USB HID usage page 0x07
//! (Keyboard/Keypad): the numeric value of each variant is its HID usage ID.
//! HID codes identify physical key positions, not characters, so the same
//! code means the same key under any layout. Platform-native codes are
//! translated to and from this space at the capture and injection boundaries
//! (see [`crate::keymap`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Platform-independent key code (HID usage ID on page 0x07).
///
/// [`KeyCode::Invalid`] is the sentinel for any key with no portable mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyCode {
    // Letters (HID 0x04-0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digit row (HID 0x1E-0x27)
    Num1 = 0x1E,
    Num2 = 0x1F,
    Num3 = 0x20,
    Num4 = 0x21,
    Num5 = 0x22,
    Num6 = 0x23,
    Num7 = 0x24,
    Num8 = 0x25,
    Num9 = 0x26,
    Num0 = 0x27,

    // Editing and whitespace (HID 0x28-0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    CapsLock = 0x39,

    // Function keys (HID 0x3A-0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x46-0x52)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Keypad (HID 0x53-0x63)
    NumLock = 0x53,
    NumpadDivide = 0x54,
    NumpadMultiply = 0x55,
    NumpadSubtract = 0x56,
    NumpadAdd = 0x57,
    NumpadEnter = 0x58,
    Numpad1 = 0x59,
    Numpad2 = 0x5A,
    Numpad3 = 0x5B,
    Numpad4 = 0x5C,
    Numpad5 = 0x5D,
    Numpad6 = 0x5E,
    Numpad7 = 0x5F,
    Numpad8 = 0x60,
    Numpad9 = 0x61,
    Numpad0 = 0x62,
    NumpadDecimal = 0x63,

    /// The `\|` key next to left Shift on ISO keyboards.
    IntlBackslash = 0x64,
    NumpadEqual = 0x67,

    // Extended function keys (HID 0x68-0x73)
    F13 = 0x68,
    F14 = 0x69,
    F15 = 0x6A,
    F16 = 0x6B,
    F17 = 0x6C,
    F18 = 0x6D,
    F19 = 0x6E,
    F20 = 0x6F,
    F21 = 0x70,
    F22 = 0x71,
    F23 = 0x72,
    F24 = 0x73,

    Help = 0x75,
    Menu = 0x76,

    // Modifiers (HID 0xE0-0xE7)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3, // Windows/Command/Super
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,

    /// Sentinel for keys with no portable mapping.
    Invalid = 0xFF,
}

impl KeyCode {
    /// Convert a raw HID usage ID to a `KeyCode`.
    ///
    /// Returns [`KeyCode::Invalid`] for values outside the portable space.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x04 => KeyCode::KeyA,
            0x05 => KeyCode::KeyB,
            0x06 => KeyCode::KeyC,
            0x07 => KeyCode::KeyD,
            0x08 => KeyCode::KeyE,
            0x09 => KeyCode::KeyF,
            0x0A => KeyCode::KeyG,
            0x0B => KeyCode::KeyH,
            0x0C => KeyCode::KeyI,
            0x0D => KeyCode::KeyJ,
            0x0E => KeyCode::KeyK,
            0x0F => KeyCode::KeyL,
            0x10 => KeyCode::KeyM,
            0x11 => KeyCode::KeyN,
            0x12 => KeyCode::KeyO,
            0x13 => KeyCode::KeyP,
            0x14 => KeyCode::KeyQ,
            0x15 => KeyCode::KeyR,
            0x16 => KeyCode::KeyS,
            0x17 => KeyCode::KeyT,
            0x18 => KeyCode::KeyU,
            0x19 => KeyCode::KeyV,
            0x1A => KeyCode::KeyW,
            0x1B => KeyCode::KeyX,
            0x1C => KeyCode::KeyY,
            0x1D => KeyCode::KeyZ,
            0x1E => KeyCode::Num1,
            0x1F => KeyCode::Num2,
            0x20 => KeyCode::Num3,
            0x21 => KeyCode::Num4,
            0x22 => KeyCode::Num5,
            0x23 => KeyCode::Num6,
            0x24 => KeyCode::Num7,
            0x25 => KeyCode::Num8,
            0x26 => KeyCode::Num9,
            0x27 => KeyCode::Num0,
            0x28 => KeyCode::Enter,
            0x29 => KeyCode::Escape,
            0x2A => KeyCode::Backspace,
            0x2B => KeyCode::Tab,
            0x2C => KeyCode::Space,
            0x2D => KeyCode::Minus,
            0x2E => KeyCode::Equal,
            0x2F => KeyCode::BracketLeft,
            0x30 => KeyCode::BracketRight,
            0x31 => KeyCode::Backslash,
            0x33 => KeyCode::Semicolon,
            0x34 => KeyCode::Quote,
            0x35 => KeyCode::Grave,
            0x36 => KeyCode::Comma,
            0x37 => KeyCode::Period,
            0x38 => KeyCode::Slash,
            0x39 => KeyCode::CapsLock,
            0x3A => KeyCode::F1,
            0x3B => KeyCode::F2,
            0x3C => KeyCode::F3,
            0x3D => KeyCode::F4,
            0x3E => KeyCode::F5,
            0x3F => KeyCode::F6,
            0x40 => KeyCode::F7,
            0x41 => KeyCode::F8,
            0x42 => KeyCode::F9,
            0x43 => KeyCode::F10,
            0x44 => KeyCode::F11,
            0x45 => KeyCode::F12,
            0x46 => KeyCode::PrintScreen,
            0x47 => KeyCode::ScrollLock,
            0x48 => KeyCode::Pause,
            0x49 => KeyCode::Insert,
            0x4A => KeyCode::Home,
            0x4B => KeyCode::PageUp,
            0x4C => KeyCode::Delete,
            0x4D => KeyCode::End,
            0x4E => KeyCode::PageDown,
            0x4F => KeyCode::ArrowRight,
            0x50 => KeyCode::ArrowLeft,
            0x51 => KeyCode::ArrowDown,
            0x52 => KeyCode::ArrowUp,
            0x53 => KeyCode::NumLock,
            0x54 => KeyCode::NumpadDivide,
            0x55 => KeyCode::NumpadMultiply,
            0x56 => KeyCode::NumpadSubtract,
            0x57 => KeyCode::NumpadAdd,
            0x58 => KeyCode::NumpadEnter,
            0x59 => KeyCode::Numpad1,
            0x5A => KeyCode::Numpad2,
            0x5B => KeyCode::Numpad3,
            0x5C => KeyCode::Numpad4,
            0x5D => KeyCode::Numpad5,
            0x5E => KeyCode::Numpad6,
            0x5F => KeyCode::Numpad7,
            0x60 => KeyCode::Numpad8,
            0x61 => KeyCode::Numpad9,
            0x62 => KeyCode::Numpad0,
            0x63 => KeyCode::NumpadDecimal,
            0x64 => KeyCode::IntlBackslash,
            0x67 => KeyCode::NumpadEqual,
            0x68 => KeyCode::F13,
            0x69 => KeyCode::F14,
            0x6A => KeyCode::F15,
            0x6B => KeyCode::F16,
            0x6C => KeyCode::F17,
            0x6D => KeyCode::F18,
            0x6E => KeyCode::F19,
            0x6F => KeyCode::F20,
            0x70 => KeyCode::F21,
            0x71 => KeyCode::F22,
            0x72 => KeyCode::F23,
            0x73 => KeyCode::F24,
            0x75 => KeyCode::Help,
            0x76 => KeyCode::Menu,
            0xE0 => KeyCode::ControlLeft,
            0xE1 => KeyCode::ShiftLeft,
            0xE2 => KeyCode::AltLeft,
            0xE3 => KeyCode::MetaLeft,
            0xE4 => KeyCode::ControlRight,
            0xE5 => KeyCode::ShiftRight,
            0xE6 => KeyCode::AltRight,
            0xE7 => KeyCode::MetaRight,
            _ => KeyCode::Invalid,
        }
    }

    /// The raw HID usage ID for this key code.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this is a modifier key.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::ControlLeft
                | KeyCode::ControlRight
                | KeyCode::ShiftLeft
                | KeyCode::ShiftRight
                | KeyCode::AltLeft
                | KeyCode::AltRight
                | KeyCode::MetaLeft
                | KeyCode::MetaRight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_from_u8_and_as_u8() {
        for raw in 0u8..=0xFF {
            let key = KeyCode::from_u8(raw);
            if key != KeyCode::Invalid {
                assert_eq!(key.as_u8(), raw, "round-trip for 0x{raw:02X} failed");
            }
        }
    }

    #[test]
    fn test_unassigned_values_map_to_invalid() {
        // Gaps and out-of-range values in the HID keyboard page
        for raw in [0x00, 0x01, 0x02, 0x03, 0x32, 0x65, 0x66, 0x74, 0x77, 0xA0, 0xDF, 0xE8, 0xFE] {
            assert_eq!(
                KeyCode::from_u8(raw),
                KeyCode::Invalid,
                "0x{raw:02X} should map to Invalid"
            );
        }
    }

    #[test]
    fn test_letters_have_contiguous_hid_codes() {
        assert_eq!(KeyCode::KeyA.as_u8(), 0x04);
        assert_eq!(KeyCode::KeyZ.as_u8(), 0x1D);
        assert_eq!(KeyCode::KeyZ.as_u8() - KeyCode::KeyA.as_u8(), 25);
    }

    #[test]
    fn test_modifiers_are_identified() {
        for key in [
            KeyCode::ControlLeft,
            KeyCode::ShiftLeft,
            KeyCode::AltLeft,
            KeyCode::MetaLeft,
            KeyCode::ControlRight,
            KeyCode::ShiftRight,
            KeyCode::AltRight,
            KeyCode::MetaRight,
        ] {
            assert!(key.is_modifier(), "{key:?} should be a modifier");
        }
        for key in [KeyCode::KeyA, KeyCode::Enter, KeyCode::CapsLock, KeyCode::Invalid] {
            assert!(!key.is_modifier(), "{key:?} should not be a modifier");
        }
    }
}
