//! Portable key code to Windows virtual-key code mappings.
//!
//! Reference: Virtual-Key Codes (winuser.h),
//! <https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes>.
//!
//! The list is ordered, not sorted; a later pair for the same portable code
//! overwrites an earlier one, so alias pairs precede their canonical pair.

use crate::keycode::KeyCode;
use crate::keymap::NativeKeyCode;

/// Ordered (portable, native) pairs for the Windows virtual-key space.
pub(crate) const NATIVE_PAIRS: &[(KeyCode, NativeKeyCode)] = &[
    // Letters (VK_A..VK_Z)
    (KeyCode::KeyA, 0x41),
    (KeyCode::KeyB, 0x42),
    (KeyCode::KeyC, 0x43),
    (KeyCode::KeyD, 0x44),
    (KeyCode::KeyE, 0x45),
    (KeyCode::KeyF, 0x46),
    (KeyCode::KeyG, 0x47),
    (KeyCode::KeyH, 0x48),
    (KeyCode::KeyI, 0x49),
    (KeyCode::KeyJ, 0x4A),
    (KeyCode::KeyK, 0x4B),
    (KeyCode::KeyL, 0x4C),
    (KeyCode::KeyM, 0x4D),
    (KeyCode::KeyN, 0x4E),
    (KeyCode::KeyO, 0x4F),
    (KeyCode::KeyP, 0x50),
    (KeyCode::KeyQ, 0x51),
    (KeyCode::KeyR, 0x52),
    (KeyCode::KeyS, 0x53),
    (KeyCode::KeyT, 0x54),
    (KeyCode::KeyU, 0x55),
    (KeyCode::KeyV, 0x56),
    (KeyCode::KeyW, 0x57),
    (KeyCode::KeyX, 0x58),
    (KeyCode::KeyY, 0x59),
    (KeyCode::KeyZ, 0x5A),
    // Digit row (VK_0..VK_9)
    (KeyCode::Num1, 0x31),
    (KeyCode::Num2, 0x32),
    (KeyCode::Num3, 0x33),
    (KeyCode::Num4, 0x34),
    (KeyCode::Num5, 0x35),
    (KeyCode::Num6, 0x36),
    (KeyCode::Num7, 0x37),
    (KeyCode::Num8, 0x38),
    (KeyCode::Num9, 0x39),
    (KeyCode::Num0, 0x30),
    // Windows has no distinct virtual key for the keypad Enter; it shares
    // VK_RETURN. Listed before Enter so captured VK_RETURN reports Enter.
    (KeyCode::NumpadEnter, 0x0D),
    (KeyCode::Enter, 0x0D), // VK_RETURN
    (KeyCode::Escape, 0x1B),
    (KeyCode::Backspace, 0x08), // VK_BACK
    (KeyCode::Tab, 0x09),
    (KeyCode::Space, 0x20),
    (KeyCode::Minus, 0xBD),        // VK_OEM_MINUS
    (KeyCode::Equal, 0xBB),        // VK_OEM_PLUS
    (KeyCode::BracketLeft, 0xDB),  // VK_OEM_4
    (KeyCode::BracketRight, 0xDD), // VK_OEM_6
    (KeyCode::Backslash, 0xDC),    // VK_OEM_5
    (KeyCode::Semicolon, 0xBA),    // VK_OEM_1
    (KeyCode::Quote, 0xDE),        // VK_OEM_7
    (KeyCode::Grave, 0xC0),        // VK_OEM_3
    (KeyCode::Comma, 0xBC),        // VK_OEM_COMMA
    (KeyCode::Period, 0xBE),       // VK_OEM_PERIOD
    (KeyCode::Slash, 0xBF),        // VK_OEM_2
    (KeyCode::CapsLock, 0x14),     // VK_CAPITAL
    // Function keys (VK_F1..VK_F24)
    (KeyCode::F1, 0x70),
    (KeyCode::F2, 0x71),
    (KeyCode::F3, 0x72),
    (KeyCode::F4, 0x73),
    (KeyCode::F5, 0x74),
    (KeyCode::F6, 0x75),
    (KeyCode::F7, 0x76),
    (KeyCode::F8, 0x77),
    (KeyCode::F9, 0x78),
    (KeyCode::F10, 0x79),
    (KeyCode::F11, 0x7A),
    (KeyCode::F12, 0x7B),
    (KeyCode::F13, 0x7C),
    (KeyCode::F14, 0x7D),
    (KeyCode::F15, 0x7E),
    (KeyCode::F16, 0x7F),
    (KeyCode::F17, 0x80),
    (KeyCode::F18, 0x81),
    (KeyCode::F19, 0x82),
    (KeyCode::F20, 0x83),
    (KeyCode::F21, 0x84),
    (KeyCode::F22, 0x85),
    (KeyCode::F23, 0x86),
    (KeyCode::F24, 0x87),
    // Navigation cluster
    (KeyCode::PrintScreen, 0x2C), // VK_SNAPSHOT
    (KeyCode::ScrollLock, 0x91),  // VK_SCROLL
    (KeyCode::Pause, 0x13),
    (KeyCode::Insert, 0x2D),
    (KeyCode::Home, 0x24),
    (KeyCode::PageUp, 0x21), // VK_PRIOR
    (KeyCode::Delete, 0x2E),
    (KeyCode::End, 0x23),
    (KeyCode::PageDown, 0x22), // VK_NEXT
    (KeyCode::ArrowRight, 0x27),
    (KeyCode::ArrowLeft, 0x25),
    (KeyCode::ArrowDown, 0x28),
    (KeyCode::ArrowUp, 0x26),
    // Keypad
    (KeyCode::NumLock, 0x90),
    (KeyCode::NumpadDivide, 0x6F),
    (KeyCode::NumpadMultiply, 0x6A),
    (KeyCode::NumpadSubtract, 0x6D),
    (KeyCode::NumpadAdd, 0x6B),
    (KeyCode::Numpad1, 0x61),
    (KeyCode::Numpad2, 0x62),
    (KeyCode::Numpad3, 0x63),
    (KeyCode::Numpad4, 0x64),
    (KeyCode::Numpad5, 0x65),
    (KeyCode::Numpad6, 0x66),
    (KeyCode::Numpad7, 0x67),
    (KeyCode::Numpad8, 0x68),
    (KeyCode::Numpad9, 0x69),
    (KeyCode::Numpad0, 0x60),
    (KeyCode::NumpadDecimal, 0x6E),
    (KeyCode::NumpadEqual, 0x92), // VK_OEM_NEC_EQUAL
    (KeyCode::IntlBackslash, 0xE2), // VK_OEM_102
    (KeyCode::Help, 0x2F),
    (KeyCode::Menu, 0x5D), // VK_APPS
    // Modifiers
    (KeyCode::ControlLeft, 0xA2),
    (KeyCode::ShiftLeft, 0xA0),
    (KeyCode::AltLeft, 0xA4), // VK_LMENU
    (KeyCode::MetaLeft, 0x5B), // VK_LWIN
    (KeyCode::ControlRight, 0xA3),
    (KeyCode::ShiftRight, 0xA1),
    (KeyCode::AltRight, 0xA5), // VK_RMENU
    (KeyCode::MetaRight, 0x5C), // VK_RWIN
];

/// Collapsing pairs: injecting the first key round-trips to the second.
#[cfg(test)]
pub(crate) const COLLAPSED_ALIASES: &[(KeyCode, KeyCode)] =
    &[(KeyCode::NumpadEnter, KeyCode::Enter)];
