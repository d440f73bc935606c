//! Error types for the capture and injection pipeline.

use crate::keycode::KeyCode;
use thiserror::Error;

/// Result type alias for tapsim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, running, or injecting input.
#[derive(Debug, Error)]
pub enum Error {
    /// `build()` was called a second time on the same configuration.
    #[error("configuration has already been built")]
    AlreadyBuilt,

    /// `shutdown()` was called a second time on the same manager.
    #[error("input manager has already been shut down")]
    AlreadyShutdown,

    /// The capture backend failed to attach to the OS input stream.
    #[error("failed to attach capture backend: {0}")]
    BackendStartFailed(String),

    /// The OS refused to synthesize an event.
    #[error("failed to inject event: {0}")]
    InjectionFailed(String),

    /// The key has no native mapping on this platform; nothing was injected.
    #[error("key {0:?} has no native mapping on this platform")]
    UnsupportedKey(KeyCode),

    /// The operation requires elevated permissions.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Thread-related error.
    #[error("thread error: {0}")]
    ThreadError(String),
}
