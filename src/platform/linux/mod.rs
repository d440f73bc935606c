//! Linux backends: XRecord for capture, XTest for injection.

pub(crate) mod keycodes;
mod listen;
mod simulate;

use crate::capture::CaptureBackend;
use std::ptr::null;
use x11::xlib;

#[cfg(test)]
pub(crate) use keycodes::COLLAPSED_ALIASES;
pub(crate) use keycodes::NATIVE_PAIRS;
pub(crate) use simulate::inject;

pub(crate) fn capture_backend() -> Box<dyn CaptureBackend> {
    Box::new(listen::RecordBackend::new())
}

/// Default-screen dimensions in pixels. X11 merges multiple monitors into
/// one logical screen, so this is the virtual desktop bounding box.
pub(crate) fn screen_size() -> std::result::Result<(i32, i32), String> {
    unsafe {
        let display = xlib::XOpenDisplay(null());
        if display.is_null() {
            return Err("failed to open X display".into());
        }
        let screen = xlib::XDefaultScreen(display);
        let width = xlib::XDisplayWidth(display, screen);
        let height = xlib::XDisplayHeight(display, screen);
        xlib::XCloseDisplay(display);
        if width <= 1 || height <= 1 {
            return Err(format!("implausible screen size {width}x{height}"));
        }
        Ok((width, height))
    }
}
