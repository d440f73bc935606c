//! Windows backends: low-level hooks for capture, `SendInput` for injection.

pub(crate) mod keycodes;
mod listen;
mod simulate;

use crate::capture::CaptureBackend;

#[cfg(test)]
pub(crate) use keycodes::COLLAPSED_ALIASES;
pub(crate) use keycodes::NATIVE_PAIRS;
pub(crate) use simulate::inject;

pub(crate) fn capture_backend() -> Box<dyn CaptureBackend> {
    Box::new(listen::HookBackend::new())
}
