//! Portable key code to X11 keycode mappings.
//!
//! X11 keycodes under the evdev ruleset are the kernel input event codes
//! offset by 8; the values below assume that ruleset (the default on every
//! current distribution) with a pc105 layout.
//!
//! The list is ordered, not sorted; a later pair for the same portable code
//! overwrites an earlier one, so alias pairs precede their canonical pair.
//! The X11 table has no collapsing aliases.

use crate::keycode::KeyCode;
use crate::keymap::NativeKeyCode;

/// Ordered (portable, native) pairs for the X11 keycode space.
pub(crate) const NATIVE_PAIRS: &[(KeyCode, NativeKeyCode)] = &[
    // Letters (QWERTY positions)
    (KeyCode::KeyA, 38),
    (KeyCode::KeyB, 56),
    (KeyCode::KeyC, 54),
    (KeyCode::KeyD, 40),
    (KeyCode::KeyE, 26),
    (KeyCode::KeyF, 41),
    (KeyCode::KeyG, 42),
    (KeyCode::KeyH, 43),
    (KeyCode::KeyI, 31),
    (KeyCode::KeyJ, 44),
    (KeyCode::KeyK, 45),
    (KeyCode::KeyL, 46),
    (KeyCode::KeyM, 58),
    (KeyCode::KeyN, 57),
    (KeyCode::KeyO, 32),
    (KeyCode::KeyP, 33),
    (KeyCode::KeyQ, 24),
    (KeyCode::KeyR, 27),
    (KeyCode::KeyS, 39),
    (KeyCode::KeyT, 28),
    (KeyCode::KeyU, 30),
    (KeyCode::KeyV, 55),
    (KeyCode::KeyW, 25),
    (KeyCode::KeyX, 53),
    (KeyCode::KeyY, 29),
    (KeyCode::KeyZ, 52),
    // Digit row
    (KeyCode::Num1, 10),
    (KeyCode::Num2, 11),
    (KeyCode::Num3, 12),
    (KeyCode::Num4, 13),
    (KeyCode::Num5, 14),
    (KeyCode::Num6, 15),
    (KeyCode::Num7, 16),
    (KeyCode::Num8, 17),
    (KeyCode::Num9, 18),
    (KeyCode::Num0, 19),
    // Editing and whitespace
    (KeyCode::Enter, 36),
    (KeyCode::Escape, 9),
    (KeyCode::Backspace, 22),
    (KeyCode::Tab, 23),
    (KeyCode::Space, 65),
    (KeyCode::Minus, 20),
    (KeyCode::Equal, 21),
    (KeyCode::BracketLeft, 34),
    (KeyCode::BracketRight, 35),
    (KeyCode::Backslash, 51),
    (KeyCode::Semicolon, 47),
    (KeyCode::Quote, 48),
    (KeyCode::Grave, 49),
    (KeyCode::Comma, 59),
    (KeyCode::Period, 60),
    (KeyCode::Slash, 61),
    (KeyCode::CapsLock, 66),
    // Function keys
    (KeyCode::F1, 67),
    (KeyCode::F2, 68),
    (KeyCode::F3, 69),
    (KeyCode::F4, 70),
    (KeyCode::F5, 71),
    (KeyCode::F6, 72),
    (KeyCode::F7, 73),
    (KeyCode::F8, 74),
    (KeyCode::F9, 75),
    (KeyCode::F10, 76),
    (KeyCode::F11, 95),
    (KeyCode::F12, 96),
    (KeyCode::F13, 191),
    (KeyCode::F14, 192),
    (KeyCode::F15, 193),
    (KeyCode::F16, 194),
    (KeyCode::F17, 195),
    (KeyCode::F18, 196),
    (KeyCode::F19, 197),
    (KeyCode::F20, 198),
    (KeyCode::F21, 199),
    (KeyCode::F22, 200),
    (KeyCode::F23, 201),
    (KeyCode::F24, 202),
    // Navigation cluster
    (KeyCode::PrintScreen, 107),
    (KeyCode::ScrollLock, 78),
    (KeyCode::Pause, 127),
    (KeyCode::Insert, 118),
    (KeyCode::Home, 110),
    (KeyCode::PageUp, 112),
    (KeyCode::Delete, 119),
    (KeyCode::End, 115),
    (KeyCode::PageDown, 117),
    (KeyCode::ArrowRight, 114),
    (KeyCode::ArrowLeft, 113),
    (KeyCode::ArrowDown, 116),
    (KeyCode::ArrowUp, 111),
    // Keypad
    (KeyCode::NumLock, 77),
    (KeyCode::NumpadDivide, 106),
    (KeyCode::NumpadMultiply, 63),
    (KeyCode::NumpadSubtract, 82),
    (KeyCode::NumpadAdd, 86),
    (KeyCode::NumpadEnter, 104),
    (KeyCode::Numpad1, 87),
    (KeyCode::Numpad2, 88),
    (KeyCode::Numpad3, 89),
    (KeyCode::Numpad4, 83),
    (KeyCode::Numpad5, 84),
    (KeyCode::Numpad6, 85),
    (KeyCode::Numpad7, 79),
    (KeyCode::Numpad8, 80),
    (KeyCode::Numpad9, 81),
    (KeyCode::Numpad0, 90),
    (KeyCode::NumpadDecimal, 91),
    (KeyCode::NumpadEqual, 125),
    (KeyCode::IntlBackslash, 94),
    (KeyCode::Help, 146),
    (KeyCode::Menu, 135),
    // Modifiers
    (KeyCode::ControlLeft, 37),
    (KeyCode::ShiftLeft, 50),
    (KeyCode::AltLeft, 64),
    (KeyCode::MetaLeft, 133), // Super_L
    (KeyCode::ControlRight, 105),
    (KeyCode::ShiftRight, 62),
    (KeyCode::AltRight, 108),
    (KeyCode::MetaRight, 134), // Super_R
];

/// Collapsing pairs: injecting the first key round-trips to the second.
#[cfg(test)]
pub(crate) const COLLAPSED_ALIASES: &[(KeyCode, KeyCode)] = &[];
