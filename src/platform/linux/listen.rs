//! X11 input capture using XRecord.
//!
//! XRecord observes device events without grabbing them. The record loop
//! blocks inside `XRecordEnableContext` on a dedicated thread; its callback
//! only translates and enqueues.

use crate::capture::{CaptureBackend, CaptureSlot, EventSink};
use crate::error::{Error, Result};
use crate::event::{Button, Event};
use crate::keymap;
use std::os::raw::{c_char, c_int, c_uchar, c_ulong};
use std::ptr::null;
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use x11::xlib;
use x11::xrecord;

use super::screen_size;

const FALSE: c_int = 0;

/// Sink the record callback enqueues into.
static SINK: Mutex<Option<EventSink>> = Mutex::new(None);

/// XRecord context, kept so detach can disable it from a control connection.
static CONTEXT: Mutex<Option<xrecord::XRecordContext>> = Mutex::new(None);

/// Screen dimensions sampled at attach time for coordinate normalization.
static SCREEN_SIZE: Mutex<Option<(i32, i32)>> = Mutex::new(None);

/// XRecord wire layout for device events.
#[repr(C)]
struct XRecordDatum {
    type_: u8,
    code: u8,
    _rest: u64,
    _1: bool,
    _2: bool,
    _3: bool,
    root_x: i16,
    root_y: i16,
    _event_x: i16,
    _event_y: i16,
    _state: u16,
}

fn forward(event: Event) {
    if let Ok(guard) = SINK.lock()
        && let Some(ref sink) = *guard
    {
        sink.push(event);
    }
}

/// Map a pixel coordinate on a `span`-pixel axis to the `[0, 65535]` range.
///
/// Rounds to nearest so injection of a captured position lands back on the
/// same pixel.
fn normalize_coord(value: i16, span: i32) -> u16 {
    let axis = (span - 1) as i64;
    let clamped = (value as i64).clamp(0, axis);
    ((clamped * 65535 + axis / 2) / axis) as u16
}

fn normalized_position(x: i16, y: i16) -> Option<Event> {
    let (width, height) = (*SCREEN_SIZE.lock().ok()?)?;
    Some(Event::MousePositionAbsolute {
        x: normalize_coord(x, width),
        y: normalize_coord(y, height),
    })
}

/// Convert an XRecord device event to a portable event.
///
/// Buttons 4-7 are wheel ticks in X11; their release half carries no
/// information and is ignored, as are buttons past the portable three.
fn convert_event(type_: c_int, code: u8, x: i16, y: i16) -> Option<Event> {
    match type_ {
        t if t == xlib::KeyPress || t == xlib::KeyRelease => Some(Event::Key {
            pressed: t == xlib::KeyPress,
            key: keymap::convert_to_keycode(code as u16),
        }),

        t if t == xlib::ButtonPress => match code {
            1 => Some(Event::MouseButton {
                pressed: true,
                button: Button::Left,
            }),
            2 => Some(Event::MouseButton {
                pressed: true,
                button: Button::Middle,
            }),
            3 => Some(Event::MouseButton {
                pressed: true,
                button: Button::Right,
            }),
            4 => Some(Event::MouseScroll { offset: 1 }),
            5 => Some(Event::MouseScroll { offset: -1 }),
            _ => None,
        },

        t if t == xlib::ButtonRelease => match code {
            1 => Some(Event::MouseButton {
                pressed: false,
                button: Button::Left,
            }),
            2 => Some(Event::MouseButton {
                pressed: false,
                button: Button::Middle,
            }),
            3 => Some(Event::MouseButton {
                pressed: false,
                button: Button::Right,
            }),
            _ => None,
        },

        t if t == xlib::MotionNotify => normalized_position(x, y),

        _ => None,
    }
}

/// XRecord data callback: translate, enqueue, free.
unsafe extern "C" fn record_callback(
    _null: *mut c_char,
    raw_data: *mut xrecord::XRecordInterceptData,
) {
    unsafe {
        let data = match raw_data.as_ref() {
            Some(d) => d,
            None => return,
        };

        if data.category != xrecord::XRecordFromServer {
            xrecord::XRecordFreeData(raw_data);
            return;
        }

        #[allow(clippy::cast_ptr_alignment)]
        let datum = match (data.data as *const XRecordDatum).as_ref() {
            Some(d) => d,
            None => {
                xrecord::XRecordFreeData(raw_data);
                return;
            }
        };

        if let Some(event) = convert_event(
            datum.type_ as c_int,
            datum.code,
            datum.root_x,
            datum.root_y,
        ) {
            forward(event);
        }

        xrecord::XRecordFreeData(raw_data);
    }
}

/// Create the record context, report readiness, and run until disabled.
fn record_thread_main(ready: Sender<Result<()>>) {
    unsafe {
        let display = xlib::XOpenDisplay(null());
        if display.is_null() {
            let _ = ready.send(Err(Error::BackendStartFailed(
                "failed to open X display".into(),
            )));
            return;
        }

        let extension_name = c"RECORD";
        let extension = xlib::XInitExtension(display, extension_name.as_ptr());
        if extension.is_null() {
            xlib::XCloseDisplay(display);
            let _ = ready.send(Err(Error::BackendStartFailed(
                "XRecord extension not available".into(),
            )));
            return;
        }

        let mut record_range: xrecord::XRecordRange = *xrecord::XRecordAllocRange();
        record_range.device_events.first = xlib::KeyPress as c_uchar;
        record_range.device_events.last = xlib::MotionNotify as c_uchar;

        let mut record_all_clients: c_ulong = xrecord::XRecordAllClients;
        let context = xrecord::XRecordCreateContext(
            display,
            0,
            &mut record_all_clients,
            1,
            &mut &mut record_range as *mut &mut xrecord::XRecordRange
                as *mut *mut xrecord::XRecordRange,
            1,
        );

        if context == 0 {
            xlib::XCloseDisplay(display);
            let _ = ready.send(Err(Error::BackendStartFailed(
                "failed to create XRecord context".into(),
            )));
            return;
        }

        xlib::XSync(display, FALSE);
        if let Ok(mut guard) = CONTEXT.lock() {
            *guard = Some(context);
        }

        let _ = ready.send(Ok(()));
        log::debug!("XRecord context enabled, entering record loop");

        // Blocks until the context is disabled from the control connection.
        let result = xrecord::XRecordEnableContext(display, context, Some(record_callback), &mut 0);
        if result == 0 {
            log::warn!("XRecordEnableContext failed");
        }

        xrecord::XRecordFreeContext(display, context);
        xlib::XCloseDisplay(display);
    }

    if let Ok(mut guard) = CONTEXT.lock() {
        *guard = None;
    }
    log::debug!("XRecord thread exited");
}

/// XRecord capture backend.
pub(crate) struct RecordBackend {
    thread: Option<JoinHandle<()>>,
    slot: Option<CaptureSlot>,
}

impl RecordBackend {
    pub(crate) fn new() -> Self {
        Self {
            thread: None,
            slot: None,
        }
    }

    fn clear_statics(&self) {
        if let Ok(mut guard) = SINK.lock() {
            *guard = None;
        }
        if let Ok(mut guard) = SCREEN_SIZE.lock() {
            *guard = None;
        }
    }
}

impl CaptureBackend for RecordBackend {
    fn attach(&mut self, sink: EventSink) -> Result<()> {
        let slot = CaptureSlot::acquire()?;

        let size = screen_size().map_err(Error::BackendStartFailed)?;
        if let Ok(mut guard) = SCREEN_SIZE.lock() {
            *guard = Some(size);
        }
        if let Ok(mut guard) = SINK.lock() {
            *guard = Some(sink);
        }

        let (ready_tx, ready_rx) = mpsc::channel();
        let thread = match std::thread::Builder::new()
            .name("tapsim-record".into())
            .spawn(move || record_thread_main(ready_tx))
        {
            Ok(thread) => thread,
            Err(e) => {
                self.clear_statics();
                return Err(Error::ThreadError(format!(
                    "failed to spawn record thread: {e}"
                )));
            }
        };

        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.thread = Some(thread);
                self.slot = Some(slot);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                self.clear_statics();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                self.clear_statics();
                Err(Error::ThreadError(
                    "record thread exited before reporting readiness".into(),
                ))
            }
        }
    }

    fn detach(&mut self) {
        if let Some(thread) = self.thread.take() {
            // XRecordDisableContext must come from a separate control
            // connection to unblock XRecordEnableContext.
            let context = CONTEXT.lock().ok().and_then(|guard| *guard);
            if let Some(context) = context {
                unsafe {
                    let display = xlib::XOpenDisplay(null());
                    if !display.is_null() {
                        xrecord::XRecordDisableContext(display, context);
                        xlib::XSync(display, FALSE);
                        xlib::XCloseDisplay(display);
                    }
                }
            }
            let _ = thread.join();
        }
        self.clear_statics();
        self.slot = None;
    }
}

impl Drop for RecordBackend {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_maps_screen_corners_to_range_ends() {
        // 1920x1080 screen: pixel 0 is the left edge, 1919 the right edge.
        assert_eq!(normalize_coord(0, 1920), 0);
        assert_eq!(normalize_coord(1919, 1920), 65535);
        assert_eq!(normalize_coord(0, 1080), 0);
        assert_eq!(normalize_coord(1079, 1080), 65535);
    }

    #[test]
    fn test_normalize_clamps_out_of_bounds_coordinates() {
        assert_eq!(normalize_coord(-5, 1920), 0);
        assert_eq!(normalize_coord(i16::MAX, 1920), 65535);
    }

    #[test]
    fn test_normalize_midpoint_is_near_range_center() {
        let mid = normalize_coord(960, 1920);
        assert!((32000..=33500).contains(&mid), "midpoint was {mid}");
    }
}
