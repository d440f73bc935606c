//! macOS event injection using CGEvent.

#![allow(unused_unsafe)]

use crate::error::{Error, Result};
use crate::event::{Button, Event};
use crate::keycode::KeyCode;
use crate::keymap::{self, NATIVE_FALLBACK};
use objc2_core_foundation::CGPoint;
use objc2_core_graphics::{
    CGEvent, CGEventField, CGEventFlags, CGEventSource, CGEventSourceStateID,
    CGEventTapLocation, CGEventType, CGMouseButton, CGScrollEventUnit,
};
use std::sync::Mutex;

use super::virtual_desktop_bounds;

/// Modifier flags carried on synthesized events, tracked across calls so a
/// held modifier applies to the keys injected while it is down.
static SIM_FLAGS: Mutex<CGEventFlags> = Mutex::new(CGEventFlags(0));

fn event_source() -> Result<objc2_core_foundation::CFRetained<CGEventSource>> {
    unsafe {
        CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .ok_or_else(|| Error::InjectionFailed("failed to create event source".into()))
    }
}

/// Current cursor location in global display coordinates.
fn current_mouse_location() -> Result<CGPoint> {
    unsafe {
        let source = event_source()?;
        let event = CGEvent::new(Some(&source))
            .ok_or_else(|| Error::InjectionFailed("failed to create event".into()))?;
        Ok(CGEvent::location(Some(&event)))
    }
}

fn post_mouse_event(event_type: CGEventType, point: CGPoint, button: CGMouseButton) -> Result<()> {
    unsafe {
        let source = event_source()?;
        let event = CGEvent::new_mouse_event(Some(&source), event_type, point, button)
            .ok_or_else(|| Error::InjectionFailed("failed to create mouse event".into()))?;
        if button == CGMouseButton::Center {
            CGEvent::set_integer_value_field(
                Some(&event),
                CGEventField::MouseEventButtonNumber,
                2,
            );
        }
        CGEvent::post(CGEventTapLocation::HIDEventTap, Some(&event));
    }
    Ok(())
}

fn inject_key(key: KeyCode, pressed: bool) -> Result<()> {
    let keycode = keymap::convert_to_native(key);
    if keycode == NATIVE_FALLBACK {
        return Err(Error::UnsupportedKey(key));
    }

    unsafe {
        let source = event_source()?;

        if key.is_modifier() {
            // Modifier keys are synthesized as FlagsChanged events.
            let event = CGEvent::new(Some(&source))
                .ok_or_else(|| Error::InjectionFailed("failed to create event".into()))?;
            CGEvent::set_type(Some(&event), CGEventType::FlagsChanged);
            CGEvent::set_integer_value_field(
                Some(&event),
                CGEventField::KeyboardEventKeycode,
                keycode as i64,
            );

            let mut flags = SIM_FLAGS
                .lock()
                .map_err(|_| Error::InjectionFailed("flags mutex poisoned".into()))?;
            let mask = match key {
                KeyCode::ShiftLeft | KeyCode::ShiftRight => CGEventFlags::MaskShift,
                KeyCode::ControlLeft | KeyCode::ControlRight => CGEventFlags::MaskControl,
                KeyCode::AltLeft | KeyCode::AltRight => CGEventFlags::MaskAlternate,
                _ => CGEventFlags::MaskCommand,
            };
            if pressed {
                flags.insert(mask);
            } else {
                flags.remove(mask);
            }
            CGEvent::set_flags(Some(&event), *flags);
            CGEvent::post(CGEventTapLocation::HIDEventTap, Some(&event));
        } else {
            let event = CGEvent::new_keyboard_event(Some(&source), keycode, pressed)
                .ok_or_else(|| Error::InjectionFailed("failed to create keyboard event".into()))?;
            let flags = SIM_FLAGS
                .lock()
                .map_err(|_| Error::InjectionFailed("flags mutex poisoned".into()))?;
            CGEvent::set_flags(Some(&event), *flags);
            CGEvent::post(CGEventTapLocation::HIDEventTap, Some(&event));
        }
    }
    Ok(())
}

/// Ask the OS to synthesize the given event.
pub(crate) fn inject(event: &Event) -> Result<()> {
    match *event {
        Event::Key { pressed, key } => inject_key(key, pressed),

        Event::MouseButton { pressed, button } => {
            let point = current_mouse_location()?;
            let (event_type, cg_button) = match (button, pressed) {
                (Button::Left, true) => (CGEventType::LeftMouseDown, CGMouseButton::Left),
                (Button::Left, false) => (CGEventType::LeftMouseUp, CGMouseButton::Left),
                (Button::Right, true) => (CGEventType::RightMouseDown, CGMouseButton::Right),
                (Button::Right, false) => (CGEventType::RightMouseUp, CGMouseButton::Right),
                (Button::Middle, true) => (CGEventType::OtherMouseDown, CGMouseButton::Center),
                (Button::Middle, false) => (CGEventType::OtherMouseUp, CGMouseButton::Center),
            };
            post_mouse_event(event_type, point, cg_button)
        }

        Event::MouseScroll { offset } => {
            if offset == 0 {
                return Ok(());
            }
            unsafe {
                let source = event_source()?;
                let event = CGEvent::new_scroll_wheel_event2(
                    Some(&source),
                    CGScrollEventUnit::Line,
                    1,
                    offset,
                    0,
                    0,
                )
                .ok_or_else(|| Error::InjectionFailed("failed to create scroll event".into()))?;
                CGEvent::post(CGEventTapLocation::HIDEventTap, Some(&event));
            }
            Ok(())
        }

        Event::MousePositionOffset { dx, dy } => {
            let point = current_mouse_location()?;
            let target = CGPoint {
                x: point.x + dx as f64,
                y: point.y + dy as f64,
            };
            post_mouse_event(CGEventType::MouseMoved, target, CGMouseButton::Left)
        }

        Event::MousePositionAbsolute { x, y } => {
            let bounds = virtual_desktop_bounds().map_err(Error::InjectionFailed)?;
            let (px, py) = bounds.denormalize(x, y);
            post_mouse_event(
                CGEventType::MouseMoved,
                CGPoint { x: px, y: py },
                CGMouseButton::Left,
            )
        }
    }
}
