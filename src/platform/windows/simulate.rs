//! Windows event injection using SendInput.

use crate::error::{Error, Result};
use crate::event::{Button, Event};
use crate::keymap::{self, NATIVE_FALLBACK};
use std::mem::size_of;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBD_EVENT_FLAGS, KEYBDINPUT,
    KEYEVENTF_KEYUP, MOUSE_EVENT_FLAGS, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_VIRTUALDESK, MOUSEEVENTF_WHEEL,
    MOUSEINPUT, SendInput, VIRTUAL_KEY,
};

const WHEEL_DELTA: i32 = 120;

/// Send one mouse input through SendInput.
fn sim_mouse_event(flags: MOUSE_EVENT_FLAGS, data: u32, dx: i32, dy: i32) -> Result<()> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    let inputs = [input];
    let result = unsafe { SendInput(&inputs, size_of::<INPUT>() as i32) };

    if result != 1 {
        Err(Error::InjectionFailed(
            "SendInput failed for mouse event".into(),
        ))
    } else {
        Ok(())
    }
}

/// Send one keyboard input through SendInput.
fn sim_keyboard_event(vk: u16, pressed: bool) -> Result<()> {
    let dwflags = if pressed {
        KEYBD_EVENT_FLAGS(0)
    } else {
        KEYEVENTF_KEYUP
    };

    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk),
                wScan: 0,
                dwFlags: dwflags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    let inputs = [input];
    let result = unsafe { SendInput(&inputs, size_of::<INPUT>() as i32) };

    if result != 1 {
        Err(Error::InjectionFailed(
            "SendInput failed for keyboard event".into(),
        ))
    } else {
        Ok(())
    }
}

/// Ask the OS to synthesize the given event.
pub(crate) fn inject(event: &Event) -> Result<()> {
    match *event {
        Event::Key { pressed, key } => {
            let vk = keymap::convert_to_native(key);
            if vk == NATIVE_FALLBACK {
                return Err(Error::UnsupportedKey(key));
            }
            sim_keyboard_event(vk, pressed)
        }

        Event::MouseButton { pressed, button } => {
            let flags = match (button, pressed) {
                (Button::Left, true) => MOUSEEVENTF_LEFTDOWN,
                (Button::Left, false) => MOUSEEVENTF_LEFTUP,
                (Button::Middle, true) => MOUSEEVENTF_MIDDLEDOWN,
                (Button::Middle, false) => MOUSEEVENTF_MIDDLEUP,
                (Button::Right, true) => MOUSEEVENTF_RIGHTDOWN,
                (Button::Right, false) => MOUSEEVENTF_RIGHTUP,
            };
            sim_mouse_event(flags, 0, 0, 0)
        }

        Event::MouseScroll { offset } => {
            if offset == 0 {
                return Ok(());
            }
            sim_mouse_event(
                MOUSEEVENTF_WHEEL,
                offset.wrapping_mul(WHEEL_DELTA) as u32,
                0,
                0,
            )
        }

        Event::MousePositionOffset { dx, dy } => sim_mouse_event(MOUSEEVENTF_MOVE, 0, dx, dy),

        // SendInput's absolute virtual-desktop space is the same normalized
        // [0, 65535] box as the portable event, so coordinates pass through.
        Event::MousePositionAbsolute { x, y } => sim_mouse_event(
            MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_VIRTUALDESK,
            0,
            x as i32,
            y as i32,
        ),
    }
}
