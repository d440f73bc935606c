//! Portable key code to macOS virtual key code (`CGKeyCode`) mappings.
//!
//! Reference: the `kVK_*` constants in Carbon's Events.h. The ANSI layout
//! codes are position-based, which matches the portable HID space.
//!
//! The list is ordered, not sorted; a later pair for the same portable code
//! overwrites an earlier one, so alias pairs precede their canonical pair.
//! `PrintScreen`, `ScrollLock`, `Pause`, and `F21`-`F24` have no macOS
//! virtual key and resolve to the fallback sentinel.

use crate::keycode::KeyCode;
use crate::keymap::NativeKeyCode;

/// Ordered (portable, native) pairs for the macOS virtual key space.
pub(crate) const NATIVE_PAIRS: &[(KeyCode, NativeKeyCode)] = &[
    // Letters
    (KeyCode::KeyA, 0),
    (KeyCode::KeyB, 11),
    (KeyCode::KeyC, 8),
    (KeyCode::KeyD, 2),
    (KeyCode::KeyE, 14),
    (KeyCode::KeyF, 3),
    (KeyCode::KeyG, 5),
    (KeyCode::KeyH, 4),
    (KeyCode::KeyI, 34),
    (KeyCode::KeyJ, 38),
    (KeyCode::KeyK, 40),
    (KeyCode::KeyL, 37),
    (KeyCode::KeyM, 46),
    (KeyCode::KeyN, 45),
    (KeyCode::KeyO, 31),
    (KeyCode::KeyP, 35),
    (KeyCode::KeyQ, 12),
    (KeyCode::KeyR, 15),
    (KeyCode::KeyS, 1),
    (KeyCode::KeyT, 17),
    (KeyCode::KeyU, 32),
    (KeyCode::KeyV, 9),
    (KeyCode::KeyW, 13),
    (KeyCode::KeyX, 7),
    (KeyCode::KeyY, 16),
    (KeyCode::KeyZ, 6),
    // Digit row
    (KeyCode::Num1, 18),
    (KeyCode::Num2, 19),
    (KeyCode::Num3, 20),
    (KeyCode::Num4, 21),
    (KeyCode::Num5, 23),
    (KeyCode::Num6, 22),
    (KeyCode::Num7, 26),
    (KeyCode::Num8, 28),
    (KeyCode::Num9, 25),
    (KeyCode::Num0, 29),
    // Editing and whitespace
    (KeyCode::Enter, 36), // kVK_Return
    (KeyCode::Escape, 53),
    (KeyCode::Backspace, 51), // kVK_Delete
    (KeyCode::Tab, 48),
    (KeyCode::Space, 49),
    (KeyCode::Minus, 27),
    (KeyCode::Equal, 24),
    (KeyCode::BracketLeft, 33),
    (KeyCode::BracketRight, 30),
    (KeyCode::Backslash, 42),
    (KeyCode::Semicolon, 41),
    (KeyCode::Quote, 39),
    (KeyCode::Grave, 50),
    (KeyCode::Comma, 43),
    (KeyCode::Period, 47),
    (KeyCode::Slash, 44),
    (KeyCode::CapsLock, 57),
    // Function keys
    (KeyCode::F1, 122),
    (KeyCode::F2, 120),
    (KeyCode::F3, 99),
    (KeyCode::F4, 118),
    (KeyCode::F5, 96),
    (KeyCode::F6, 97),
    (KeyCode::F7, 98),
    (KeyCode::F8, 100),
    (KeyCode::F9, 101),
    (KeyCode::F10, 109),
    (KeyCode::F11, 103),
    (KeyCode::F12, 111),
    (KeyCode::F13, 105),
    (KeyCode::F14, 107),
    (KeyCode::F15, 113),
    (KeyCode::F16, 106),
    (KeyCode::F17, 64),
    (KeyCode::F18, 79),
    (KeyCode::F19, 80),
    (KeyCode::F20, 90),
    // PC keyboards report Insert where Mac keyboards have Help; both arrive
    // as kVK_Help. Listed before Help so captured code 114 reports Help.
    (KeyCode::Insert, 114),
    (KeyCode::Help, 114),
    // Navigation cluster
    (KeyCode::Home, 115),
    (KeyCode::PageUp, 116),
    (KeyCode::Delete, 117), // kVK_ForwardDelete
    (KeyCode::End, 119),
    (KeyCode::PageDown, 121),
    (KeyCode::ArrowRight, 124),
    (KeyCode::ArrowLeft, 123),
    (KeyCode::ArrowDown, 125),
    (KeyCode::ArrowUp, 126),
    // Keypad; NumLock maps onto kVK_ANSI_KeypadClear, the key in the
    // NumLock position on Apple keyboards.
    (KeyCode::NumLock, 71),
    (KeyCode::NumpadDivide, 75),
    (KeyCode::NumpadMultiply, 67),
    (KeyCode::NumpadSubtract, 78),
    (KeyCode::NumpadAdd, 69),
    (KeyCode::NumpadEnter, 76),
    (KeyCode::Numpad1, 83),
    (KeyCode::Numpad2, 84),
    (KeyCode::Numpad3, 85),
    (KeyCode::Numpad4, 86),
    (KeyCode::Numpad5, 87),
    (KeyCode::Numpad6, 88),
    (KeyCode::Numpad7, 89),
    (KeyCode::Numpad8, 91),
    (KeyCode::Numpad9, 92),
    (KeyCode::Numpad0, 82),
    (KeyCode::NumpadDecimal, 65),
    (KeyCode::NumpadEqual, 81),
    (KeyCode::IntlBackslash, 10), // kVK_ISO_Section
    (KeyCode::Menu, 110),
    // Modifiers
    (KeyCode::ControlLeft, 59),
    (KeyCode::ShiftLeft, 56),
    (KeyCode::AltLeft, 58), // kVK_Option
    (KeyCode::MetaLeft, 55), // kVK_Command
    (KeyCode::ControlRight, 62),
    (KeyCode::ShiftRight, 60),
    (KeyCode::AltRight, 61),
    (KeyCode::MetaRight, 54),
];

/// Collapsing pairs: injecting the first key round-trips to the second.
#[cfg(test)]
pub(crate) const COLLAPSED_ALIASES: &[(KeyCode, KeyCode)] =
    &[(KeyCode::Insert, KeyCode::Help)];
