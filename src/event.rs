//! Portable event types exchanged across the capture and injection pipeline.

use crate::keycode::KeyCode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Button {
    /// Left mouse button.
    Left,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Right,
}

/// A portable input event.
///
/// Every event observed by a capture backend and every event accepted by the
/// injection path is one of these five variants. Absolute mouse coordinates
/// are normalized to `[0, 65535]` across the full virtual-desktop bounding
/// box, independent of physical resolution, identically on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Event {
    /// A key went down (`pressed: true`) or up (`pressed: false`).
    Key { pressed: bool, key: KeyCode },
    /// A mouse button went down or up.
    MouseButton { pressed: bool, button: Button },
    /// The wheel moved by `offset` ticks; positive is away from the user.
    MouseScroll { offset: i32 },
    /// The cursor moved relative to its current position, in pixels.
    MousePositionOffset { dx: i32, dy: i32 },
    /// The cursor moved to a normalized absolute position.
    ///
    /// `{0, 0}` is the top-left corner of the virtual desktop,
    /// `{65535, 65535}` the bottom-right corner.
    MousePositionAbsolute { x: u16, y: u16 },
}

/// Discriminant of [`Event`], used to register callbacks per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    Key,
    MouseButton,
    MouseScroll,
    MousePositionOffset,
    MousePositionAbsolute,
}

impl Event {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Key { .. } => EventKind::Key,
            Event::MouseButton { .. } => EventKind::MouseButton,
            Event::MouseScroll { .. } => EventKind::MouseScroll,
            Event::MousePositionOffset { .. } => EventKind::MousePositionOffset,
            Event::MousePositionAbsolute { .. } => EventKind::MousePositionAbsolute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let cases = [
            (
                Event::Key {
                    pressed: true,
                    key: KeyCode::KeyA,
                },
                EventKind::Key,
            ),
            (
                Event::MouseButton {
                    pressed: false,
                    button: Button::Middle,
                },
                EventKind::MouseButton,
            ),
            (Event::MouseScroll { offset: -2 }, EventKind::MouseScroll),
            (
                Event::MousePositionOffset { dx: 4, dy: -7 },
                EventKind::MousePositionOffset,
            ),
            (
                Event::MousePositionAbsolute { x: 0, y: 65535 },
                EventKind::MousePositionAbsolute,
            ),
        ];
        for (event, kind) in cases {
            assert_eq!(event.kind(), kind);
        }
    }
}
