//! macOS input capture using CGEventTap.
//!
//! A listen-only tap on a dedicated CFRunLoop thread. The tap callback only
//! translates and enqueues; macOS disables taps whose callbacks stall.

#![allow(improper_ctypes_definitions)]
#![allow(unsafe_op_in_unsafe_fn)]

use crate::capture::{CaptureBackend, CaptureSlot, EventSink};
use crate::error::{Error, Result};
use crate::event::{Button, Event};
use crate::keycode::KeyCode;
use crate::keymap;
use core::ptr::NonNull;
use objc2_core_foundation::{CFMachPort, CFRunLoop, kCFRunLoopCommonModes};
use objc2_core_graphics::{
    CGEvent, CGEventField, CGEventFlags, CGEventTapCallBack, CGEventTapLocation,
    CGEventTapOptions, CGEventTapPlacement, CGEventTapProxy, CGEventType,
    kCGEventMaskForAllEvents,
};
use objc2_foundation::NSAutoreleasePool;
use std::ffi::c_void;
use std::ptr::null_mut;
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use super::{DesktopBounds, virtual_desktop_bounds};

/// Sink the tap callback enqueues into.
static SINK: Mutex<Option<EventSink>> = Mutex::new(None);

/// Desktop bounds sampled at attach time for coordinate normalization.
static DESKTOP: Mutex<Option<DesktopBounds>> = Mutex::new(None);

/// Wrapper for a raw CFMachPort pointer that implements Send + Sync.
/// Safety: only dereferenced while the tap thread is alive.
struct TapPointer(*const CFMachPort);
unsafe impl Send for TapPointer {}
unsafe impl Sync for TapPointer {}

/// Stored event tap for timeout recovery.
static EVENT_TAP: Mutex<Option<TapPointer>> = Mutex::new(None);

/// Wrapper for a raw CFRunLoop pointer that implements Send + Sync.
/// Safety: CFRunLoopStop is documented as thread-safe; the pointer is only
/// used while the tap thread is alive.
struct LoopPointer(*const CFRunLoop);
unsafe impl Send for LoopPointer {}
unsafe impl Sync for LoopPointer {}

/// Run loop of the tap thread, stored so detach can stop it.
static RUN_LOOP: Mutex<Option<LoopPointer>> = Mutex::new(None);

#[link(name = "Cocoa", kind = "framework")]
unsafe extern "C" {}

fn forward(event: Event) {
    if let Ok(guard) = SINK.lock()
        && let Some(ref sink) = *guard
    {
        sink.push(event);
    }
}

fn normalized_position(x: f64, y: f64) -> Option<Event> {
    let bounds = (*DESKTOP.lock().ok()?)?;
    let (nx, ny) = bounds.normalize(x, y);
    Some(Event::MousePositionAbsolute { x: nx, y: ny })
}

/// The CGEventFlags bit that reflects a modifier key's state.
fn modifier_flag(key: KeyCode) -> Option<CGEventFlags> {
    match key {
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(CGEventFlags::MaskShift),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(CGEventFlags::MaskControl),
        KeyCode::AltLeft | KeyCode::AltRight => Some(CGEventFlags::MaskAlternate),
        KeyCode::MetaLeft | KeyCode::MetaRight => Some(CGEventFlags::MaskCommand),
        _ => None,
    }
}

/// Convert a CGEvent to a portable event.
unsafe fn convert_event(event_type: CGEventType, cg_event: NonNull<CGEvent>) -> Option<Event> {
    match event_type {
        CGEventType::KeyDown | CGEventType::KeyUp => {
            let code = CGEvent::integer_value_field(
                Some(cg_event.as_ref()),
                CGEventField::KeyboardEventKeycode,
            );
            Some(Event::Key {
                pressed: event_type == CGEventType::KeyDown,
                key: keymap::convert_to_keycode(code as u16),
            })
        }

        // Modifier keys never arrive as KeyDown/KeyUp; the tap reports a
        // FlagsChanged carrying the keycode, and the flag bit tells the
        // direction.
        CGEventType::FlagsChanged => {
            let code = CGEvent::integer_value_field(
                Some(cg_event.as_ref()),
                CGEventField::KeyboardEventKeycode,
            );
            let key = keymap::convert_to_keycode(code as u16);
            let flag = modifier_flag(key)?;
            let flags = CGEvent::flags(Some(cg_event.as_ref()));
            Some(Event::Key {
                pressed: flags.contains(flag),
                key,
            })
        }

        CGEventType::LeftMouseDown => Some(Event::MouseButton {
            pressed: true,
            button: Button::Left,
        }),
        CGEventType::LeftMouseUp => Some(Event::MouseButton {
            pressed: false,
            button: Button::Left,
        }),
        CGEventType::RightMouseDown => Some(Event::MouseButton {
            pressed: true,
            button: Button::Right,
        }),
        CGEventType::RightMouseUp => Some(Event::MouseButton {
            pressed: false,
            button: Button::Right,
        }),

        // Only the middle button exists in the portable model; further
        // "other" buttons pass through untranslated.
        CGEventType::OtherMouseDown | CGEventType::OtherMouseUp => {
            let number = CGEvent::integer_value_field(
                Some(cg_event.as_ref()),
                CGEventField::MouseEventButtonNumber,
            );
            if number != 2 {
                return None;
            }
            Some(Event::MouseButton {
                pressed: event_type == CGEventType::OtherMouseDown,
                button: Button::Middle,
            })
        }

        CGEventType::MouseMoved
        | CGEventType::LeftMouseDragged
        | CGEventType::RightMouseDragged
        | CGEventType::OtherMouseDragged => {
            let point = CGEvent::location(Some(cg_event.as_ref()));
            normalized_position(point.x, point.y)
        }

        CGEventType::ScrollWheel => {
            let delta = CGEvent::integer_value_field(
                Some(cg_event.as_ref()),
                CGEventField::ScrollWheelEventDeltaAxis1,
            );
            if delta == 0 {
                return None;
            }
            Some(Event::MouseScroll {
                offset: delta as i32,
            })
        }

        _ => None,
    }
}

/// The CGEventTap callback: translate, enqueue, pass through.
unsafe extern "C-unwind" fn event_callback(
    _proxy: CGEventTapProxy,
    event_type: CGEventType,
    cg_event: NonNull<CGEvent>,
    _user_info: *mut c_void,
) -> *mut CGEvent {
    // macOS disables the tap if the callback takes too long; re-enable it
    // to keep listening.
    if event_type == CGEventType::TapDisabledByTimeout
        || event_type == CGEventType::TapDisabledByUserInput
    {
        if let Ok(guard) = EVENT_TAP.lock()
            && let Some(ref tap_ptr) = *guard
            && !tap_ptr.0.is_null()
        {
            log::warn!("event tap was disabled, re-enabling");
            CGEvent::tap_enable(&*tap_ptr.0, true);
        }
        return cg_event.as_ptr();
    }

    if let Some(event) = convert_event(event_type, cg_event) {
        forward(event);
    }

    cg_event.as_ptr()
}

/// Create the tap, report readiness, and run the loop until stopped.
fn tap_thread_main(ready: Sender<Result<()>>) {
    unsafe {
        let _pool = NSAutoreleasePool::new();

        let callback: CGEventTapCallBack = Some(event_callback);
        let tap = match CGEvent::tap_create(
            CGEventTapLocation::HIDEventTap,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            kCGEventMaskForAllEvents.into(),
            callback,
            null_mut(),
        ) {
            Some(tap) => tap,
            None => {
                let _ = ready.send(Err(Error::PermissionDenied(
                    "failed to create event tap; check Accessibility permissions".into(),
                )));
                return;
            }
        };

        // Store the tap reference for timeout recovery
        if let Ok(mut guard) = EVENT_TAP.lock() {
            *guard = Some(TapPointer(&*tap as *const CFMachPort));
        }

        let source = match CFMachPort::new_run_loop_source(None, Some(&tap), 0) {
            Some(source) => source,
            None => {
                let _ = ready.send(Err(Error::BackendStartFailed(
                    "failed to create run loop source".into(),
                )));
                return;
            }
        };

        let current_loop = match CFRunLoop::current() {
            Some(run_loop) => run_loop,
            None => {
                let _ = ready.send(Err(Error::BackendStartFailed(
                    "failed to get current run loop".into(),
                )));
                return;
            }
        };
        current_loop.add_source(Some(&source), kCFRunLoopCommonModes);
        if let Ok(mut guard) = RUN_LOOP.lock() {
            *guard = Some(LoopPointer(&*current_loop as *const CFRunLoop));
        }

        CGEvent::tap_enable(&tap, true);
        let _ = ready.send(Ok(()));
        log::debug!("event tap installed, entering run loop");

        CFRunLoop::run();
    }

    if let Ok(mut guard) = EVENT_TAP.lock() {
        *guard = None;
    }
    if let Ok(mut guard) = RUN_LOOP.lock() {
        *guard = None;
    }
    log::debug!("event tap thread exited");
}

/// CGEventTap capture backend.
pub(crate) struct EventTapBackend {
    thread: Option<JoinHandle<()>>,
    slot: Option<CaptureSlot>,
}

impl EventTapBackend {
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
        if let Ok(mut guard) = DESKTOP.lock() {
            *guard = None;
        }
    }
}

impl CaptureBackend for EventTapBackend {
    fn attach(&mut self, sink: EventSink) -> Result<()> {
        let slot = CaptureSlot::acquire()?;

        let bounds = virtual_desktop_bounds().map_err(Error::BackendStartFailed)?;
        if let Ok(mut guard) = DESKTOP.lock() {
            *guard = Some(bounds);
        }
        if let Ok(mut guard) = SINK.lock() {
            *guard = Some(sink);
        }

        let (ready_tx, ready_rx) = mpsc::channel();
        let thread = match std::thread::Builder::new()
            .name("tapsim-tap".into())
            .spawn(move || tap_thread_main(ready_tx))
        {
            Ok(thread) => thread,
            Err(e) => {
                self.clear_statics();
                return Err(Error::ThreadError(format!(
                    "failed to spawn tap thread: {e}"
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
                    "tap thread exited before reporting readiness".into(),
                ))
            }
        }
    }

    fn detach(&mut self) {
        if let Some(thread) = self.thread.take() {
            if let Ok(guard) = RUN_LOOP.lock()
                && let Some(ref run_loop) = *guard
                && !run_loop.0.is_null()
            {
                unsafe {
                    (*run_loop.0).stop();
                }
            }
            let _ = thread.join();
        }
        self.clear_statics();
        self.slot = None;
    }
}

impl Drop for EventTapBackend {
    fn drop(&mut self) {
        self.detach();
    }
}
