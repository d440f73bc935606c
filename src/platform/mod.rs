//! Platform-specific capture and injection backends.
//!
//! Exactly one backend set is compiled in, selected by the target platform;
//! every set exposes the same surface: `capture_backend()`, `inject()`, and
//! the key-code pair table consumed by [`crate::keymap`].

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub(crate) use macos::*;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub(crate) use windows::*;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub(crate) use linux::*;

// Ensure at least one platform is supported
#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
compile_error!("tapsim only supports macOS, Windows, and Linux");
