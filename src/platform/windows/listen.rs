//! Windows input capture using SetWindowsHookEx.
//!
//! Both low-level hooks share one dedicated message-loop thread. Hook
//! callbacks must finish within the system hook timeout or Windows removes
//! the hook, so they only translate the native event and enqueue it.

use crate::capture::{CaptureBackend, CaptureSlot, EventSink};
use crate::error::{Error, Result};
use crate::event::{Button, Event};
use crate::keymap;
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetMessageW, GetSystemMetrics, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG,
    MSLLHOOKSTRUCT, PostThreadMessageW, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN,
    SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN, SetWindowsHookExW, UnhookWindowsHookEx,
    WH_KEYBOARD_LL, WH_MOUSE_LL, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_LBUTTONUP,
    WM_MBUTTONDOWN, WM_MBUTTONUP, WM_MOUSEMOVE, WM_MOUSEWHEEL, WM_QUIT, WM_RBUTTONDOWN,
    WM_RBUTTONUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

// Wrapper for HHOOK to make it Send + Sync
#[derive(Clone, Copy)]
struct SendableHHOOK(HHOOK);

// SAFETY: HHOOK is just a handle/pointer that the Windows API owns.
// It's safe to send between threads because Windows handles are thread-safe.
unsafe impl Send for SendableHHOOK {}
unsafe impl Sync for SendableHHOOK {}

const WHEEL_DELTA: i16 = 120;

/// Sink the hook callbacks enqueue into.
static SINK: Mutex<Option<EventSink>> = Mutex::new(None);

/// Hook handles, kept for CallNextHookEx and teardown.
static KEYBOARD_HOOK: Mutex<Option<SendableHHOOK>> = Mutex::new(None);
static MOUSE_HOOK: Mutex<Option<SendableHHOOK>> = Mutex::new(None);

/// Message-loop thread ID, used to post WM_QUIT on detach.
static HOOK_THREAD_ID: Mutex<u32> = Mutex::new(0);

fn set_sink(sink: Option<EventSink>) {
    if let Ok(mut guard) = SINK.lock() {
        *guard = sink;
    }
}

fn forward(event: Event) {
    if let Ok(guard) = SINK.lock()
        && let Some(ref sink) = *guard
    {
        sink.push(event);
    }
}

/// Normalize virtual-screen pixel coordinates to the `[0, 65535]` box.
fn normalized_position(x: i32, y: i32) -> Option<Event> {
    let (left, top, width, height) = unsafe {
        (
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN),
            GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    };
    if width <= 1 || height <= 1 {
        return None;
    }
    let axis_x = (width - 1) as i64;
    let axis_y = (height - 1) as i64;
    let nx = (((x - left) as i64).clamp(0, axis_x) * 65535 + axis_x / 2) / axis_x;
    let ny = (((y - top) as i64).clamp(0, axis_y) * 65535 + axis_y / 2) / axis_y;
    Some(Event::MousePositionAbsolute {
        x: nx as u16,
        y: ny as u16,
    })
}

/// Get VK code from KBDLLHOOKSTRUCT
unsafe fn get_vk_code(lpdata: LPARAM) -> u32 {
    let kb = unsafe { *(lpdata.0 as *const KBDLLHOOKSTRUCT) };
    kb.vkCode
}

/// Get point from MSLLHOOKSTRUCT
unsafe fn get_mouse_point(lpdata: LPARAM) -> (i32, i32) {
    let mouse = unsafe { *(lpdata.0 as *const MSLLHOOKSTRUCT) };
    (mouse.pt.x, mouse.pt.y)
}

/// Get wheel delta from MSLLHOOKSTRUCT
unsafe fn get_wheel_delta(lpdata: LPARAM) -> i16 {
    let mouse = unsafe { *(lpdata.0 as *const MSLLHOOKSTRUCT) };
    ((mouse.mouseData >> 16) & 0xFFFF) as i16
}

/// Convert a hook message to a portable event.
///
/// X-buttons and the horizontal wheel have no counterpart in the portable
/// model and are passed through untranslated.
unsafe fn convert_event(wparam: WPARAM, lparam: LPARAM) -> Option<Event> {
    let msg = wparam.0 as u32;

    match msg {
        WM_KEYDOWN | WM_SYSKEYDOWN => {
            let code = unsafe { get_vk_code(lparam) };
            Some(Event::Key {
                pressed: true,
                key: keymap::convert_to_keycode(code as u16),
            })
        }

        WM_KEYUP | WM_SYSKEYUP => {
            let code = unsafe { get_vk_code(lparam) };
            Some(Event::Key {
                pressed: false,
                key: keymap::convert_to_keycode(code as u16),
            })
        }

        WM_LBUTTONDOWN => Some(Event::MouseButton {
            pressed: true,
            button: Button::Left,
        }),
        WM_LBUTTONUP => Some(Event::MouseButton {
            pressed: false,
            button: Button::Left,
        }),
        WM_RBUTTONDOWN => Some(Event::MouseButton {
            pressed: true,
            button: Button::Right,
        }),
        WM_RBUTTONUP => Some(Event::MouseButton {
            pressed: false,
            button: Button::Right,
        }),
        WM_MBUTTONDOWN => Some(Event::MouseButton {
            pressed: true,
            button: Button::Middle,
        }),
        WM_MBUTTONUP => Some(Event::MouseButton {
            pressed: false,
            button: Button::Middle,
        }),

        WM_MOUSEMOVE => {
            let (x, y) = unsafe { get_mouse_point(lparam) };
            normalized_position(x, y)
        }

        WM_MOUSEWHEEL => {
            let delta = unsafe { get_wheel_delta(lparam) };
            Some(Event::MouseScroll {
                offset: (delta / WHEEL_DELTA) as i32,
            })
        }

        _ => None,
    }
}

/// Keyboard hook callback: translate, enqueue, pass through.
unsafe extern "system" fn keyboard_callback(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32
        && let Some(event) = unsafe { convert_event(wparam, lparam) }
    {
        forward(event);
    }

    let hook = KEYBOARD_HOOK.lock().ok().and_then(|g| g.map(|h| h.0));
    unsafe { CallNextHookEx(hook, code, wparam, lparam) }
}

/// Mouse hook callback: translate, enqueue, pass through.
unsafe extern "system" fn mouse_callback(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32
        && let Some(event) = unsafe { convert_event(wparam, lparam) }
    {
        forward(event);
    }

    let hook = MOUSE_HOOK.lock().ok().and_then(|g| g.map(|h| h.0));
    unsafe { CallNextHookEx(hook, code, wparam, lparam) }
}

/// Install both hooks, report readiness, and pump messages until WM_QUIT.
fn hook_thread_main(ready: Sender<Result<()>>) {
    if let Ok(mut tid) = HOOK_THREAD_ID.lock() {
        *tid = unsafe { GetCurrentThreadId() };
    }

    let keyboard_hook = match unsafe {
        SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_callback), None, 0)
    } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(Error::BackendStartFailed(format!(
                "failed to set keyboard hook: {e}"
            ))));
            return;
        }
    };
    if let Ok(mut guard) = KEYBOARD_HOOK.lock() {
        *guard = Some(SendableHHOOK(keyboard_hook));
    }

    let mouse_hook = match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_callback), None, 0) }
    {
        Ok(hook) => hook,
        Err(e) => {
            unsafe {
                let _ = UnhookWindowsHookEx(keyboard_hook);
            }
            if let Ok(mut guard) = KEYBOARD_HOOK.lock() {
                *guard = None;
            }
            let _ = ready.send(Err(Error::BackendStartFailed(format!(
                "failed to set mouse hook: {e}"
            ))));
            return;
        }
    };
    if let Ok(mut guard) = MOUSE_HOOK.lock() {
        *guard = Some(SendableHHOOK(mouse_hook));
    }

    let _ = ready.send(Ok(()));
    log::debug!("windows hooks installed, entering message loop");

    let mut msg = MSG::default();
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {}
    }

    unsafe {
        if let Ok(mut guard) = KEYBOARD_HOOK.lock()
            && let Some(hook) = guard.take()
        {
            let _ = UnhookWindowsHookEx(hook.0);
        }
        if let Ok(mut guard) = MOUSE_HOOK.lock()
            && let Some(hook) = guard.take()
        {
            let _ = UnhookWindowsHookEx(hook.0);
        }
    }
    if let Ok(mut tid) = HOOK_THREAD_ID.lock() {
        *tid = 0;
    }
    log::debug!("windows hook thread exited");
}

/// Low-level hook capture backend.
pub(crate) struct HookBackend {
    thread: Option<JoinHandle<()>>,
    slot: Option<CaptureSlot>,
}

impl HookBackend {
    pub(crate) fn new() -> Self {
        Self {
            thread: None,
            slot: None,
        }
    }
}

impl CaptureBackend for HookBackend {
    fn attach(&mut self, sink: EventSink) -> Result<()> {
        let slot = CaptureSlot::acquire()?;
        set_sink(Some(sink));

        let (ready_tx, ready_rx) = mpsc::channel();
        let thread = match std::thread::Builder::new()
            .name("tapsim-hook".into())
            .spawn(move || hook_thread_main(ready_tx))
        {
            Ok(thread) => thread,
            Err(e) => {
                set_sink(None);
                return Err(Error::ThreadError(format!(
                    "failed to spawn hook thread: {e}"
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
                set_sink(None);
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                set_sink(None);
                Err(Error::ThreadError(
                    "hook thread exited before reporting readiness".into(),
                ))
            }
        }
    }

    fn detach(&mut self) {
        if let Some(thread) = self.thread.take() {
            let thread_id = HOOK_THREAD_ID.lock().map(|tid| *tid).unwrap_or(0);
            if thread_id != 0 {
                unsafe {
                    let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
                }
            }
            let _ = thread.join();
        }
        set_sink(None);
        self.slot = None;
    }
}

impl Drop for HookBackend {
    fn drop(&mut self) {
        self.detach();
    }
}
