//! X11 event injection using XTest.

use crate::error::{Error, Result};
use crate::event::{Button, Event};
use crate::keymap::{self, NATIVE_FALLBACK};
use std::os::raw::{c_int, c_uint};
use std::ptr::null;
use x11::xlib;
use x11::xtest;

use super::screen_size;

const TRUE: c_int = 1;
const FALSE: c_int = 0;

/// Open a display connection for one injection call.
fn open_display() -> Result<*mut xlib::Display> {
    let display = unsafe { xlib::XOpenDisplay(null()) };
    if display.is_null() {
        Err(Error::InjectionFailed("failed to open X display".into()))
    } else {
        Ok(display)
    }
}

/// Flush, sync, and close after a fake-event call; map zero to a failure.
fn finish(display: *mut xlib::Display, status: c_int, what: &str) -> Result<()> {
    unsafe {
        xlib::XFlush(display);
        xlib::XSync(display, FALSE);
        xlib::XCloseDisplay(display);
    }
    if status == 0 {
        Err(Error::InjectionFailed(format!("{what} failed")))
    } else {
        Ok(())
    }
}

fn button_code(button: Button) -> c_uint {
    match button {
        Button::Left => 1,
        Button::Middle => 2,
        Button::Right => 3,
    }
}

/// Map a `[0, 65535]` coordinate to a pixel on a `span`-pixel axis.
///
/// Rounds to nearest, the inverse of the capture-side normalization.
fn denormalize_coord(value: u16, span: i32) -> c_int {
    ((value as i64 * (span - 1) as i64 + 32767) / 65535) as c_int
}

/// Ask the OS to synthesize the given event.
pub(crate) fn inject(event: &Event) -> Result<()> {
    match *event {
        Event::Key { pressed, key } => {
            let keycode = keymap::convert_to_native(key);
            if keycode == NATIVE_FALLBACK {
                return Err(Error::UnsupportedKey(key));
            }
            let display = open_display()?;
            let is_press = if pressed { TRUE } else { FALSE };
            let status =
                unsafe { xtest::XTestFakeKeyEvent(display, keycode as c_uint, is_press, 0) };
            finish(display, status, "XTestFakeKeyEvent")
        }

        Event::MouseButton { pressed, button } => {
            let display = open_display()?;
            let is_press = if pressed { TRUE } else { FALSE };
            let status = unsafe {
                xtest::XTestFakeButtonEvent(display, button_code(button), is_press, 0)
            };
            finish(display, status, "XTestFakeButtonEvent")
        }

        // X11 expresses wheel motion as button 4 (up) / 5 (down) clicks.
        Event::MouseScroll { offset } => {
            if offset == 0 {
                return Ok(());
            }
            let button: c_uint = if offset > 0 { 4 } else { 5 };
            let display = open_display()?;
            let mut status = TRUE;
            unsafe {
                for _ in 0..offset.unsigned_abs() {
                    let pressed = xtest::XTestFakeButtonEvent(display, button, TRUE, 0);
                    let released = xtest::XTestFakeButtonEvent(display, button, FALSE, 0);
                    if pressed == 0 || released == 0 {
                        status = 0;
                    }
                }
            }
            finish(display, status, "XTestFakeButtonEvent")
        }

        Event::MousePositionOffset { dx, dy } => {
            let display = open_display()?;
            let status = unsafe { xtest::XTestFakeRelativeMotionEvent(display, dx, dy, 0, 0) };
            finish(display, status, "XTestFakeRelativeMotionEvent")
        }

        Event::MousePositionAbsolute { x, y } => {
            let (width, height) = screen_size().map_err(Error::InjectionFailed)?;
            let px = denormalize_coord(x, width);
            let py = denormalize_coord(y, height);
            let display = open_display()?;
            let status = unsafe { xtest::XTestFakeMotionEvent(display, 0, px, py, 0) };
            finish(display, status, "XTestFakeMotionEvent")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denormalize_maps_range_ends_to_screen_corners() {
        assert_eq!(denormalize_coord(0, 1920), 0);
        assert_eq!(denormalize_coord(65535, 1920), 1919);
        assert_eq!(denormalize_coord(0, 1080), 0);
        assert_eq!(denormalize_coord(65535, 1080), 1079);
    }

    #[test]
    fn test_denormalize_round_trips_with_capture_normalization() {
        // Injecting a captured absolute position must land on the same pixel.
        for span in [1366i32, 1920, 3840] {
            let axis = (span - 1) as i64;
            for pixel in [0, 1, span / 2, span - 2, span - 1] {
                let normalized = ((pixel as i64 * 65535 + axis / 2) / axis) as u16;
                assert_eq!(
                    denormalize_coord(normalized, span),
                    pixel,
                    "pixel {pixel} on a {span}-wide screen"
                );
            }
        }
    }
}
