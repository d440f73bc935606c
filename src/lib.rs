//! # tapsim
//!
//! Cross-platform keyboard/mouse capture and synthetic input injection with
//! a portable, HID-derived key-code model.
//!
//! Three incompatible native input stacks (Win32 virtual keys + `SendInput`,
//! macOS `CGEvent`/event tap, X11 `KeyCode`/XTest) sit behind one event
//! model and one configuration API.
//!
//! ## Capturing events
//!
//! ```no_run
//! use tapsim::{create_input_configuration, Event, EventKind};
//!
//! let manager = create_input_configuration()
//!     .on_event(EventKind::Key, |event: &Event| {
//!         if let Event::Key { pressed, key } = event {
//!             println!("key {key:?} pressed={pressed}");
//!         }
//!     })
//!     .on_event(EventKind::MousePositionAbsolute, |event: &Event| {
//!         println!("cursor at {event:?}");
//!     })
//!     .build()
//!     .expect("failed to attach capture backend");
//!
//! // ... the pipeline runs until the manager is shut down or dropped.
//! manager.shutdown().unwrap();
//! ```
//!
//! ## Injecting events
//!
//! ```no_run
//! use tapsim::{send_input, Event, KeyCode};
//!
//! send_input(&Event::Key { pressed: true, key: KeyCode::KeyA }).unwrap();
//! send_input(&Event::Key { pressed: false, key: KeyCode::KeyA }).unwrap();
//! // Center of the virtual desktop, same coordinates on every platform.
//! send_input(&Event::MousePositionAbsolute { x: 32767, y: 32767 }).unwrap();
//! ```
//!
//! ## Architecture
//!
//! The OS capture context (hook thread, run loop, record loop) only
//! translates native events and enqueues them; registered callbacks run on
//! a dedicated dispatch thread, in registration order, decoupled through a
//! bounded queue that drops its oldest entry on overflow. Running client
//! code directly on an OS hook risks the OS throttling or removing the
//! hook, so the capture context never does.

pub mod config;
pub mod error;
pub mod event;
pub mod keycode;
pub mod keymap;
pub mod manager;

mod capture;
mod platform;

// Re-exports
pub use config::{InputConfiguration, create_input_configuration};
pub use error::{Error, Result};
pub use event::{Button, Event, EventKind};
pub use keycode::KeyCode;
pub use keymap::{NATIVE_FALLBACK, NativeKeyCode, convert_to_keycode, convert_to_native};
pub use manager::InputManager;

/// Ask the OS to synthesize `event`.
///
/// Synchronous request/response with no queuing: the call returns once the
/// native call has been issued. Safe to call from multiple threads
/// concurrently. A key with no native mapping yields
/// [`Error::UnsupportedKey`] and injects nothing.
pub fn send_input(event: &Event) -> Result<()> {
    platform::inject(event)
}
