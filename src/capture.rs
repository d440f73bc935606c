//! Capture backend contract shared by the platform listeners.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::manager::DispatchQueue;

/// Handle a backend uses to forward captured events into its manager's
/// dispatch queue. Cheap to clone; pushing never blocks.
#[derive(Clone)]
pub(crate) struct EventSink {
    queue: Arc<DispatchQueue>,
}

impl EventSink {
    pub(crate) fn new(queue: Arc<DispatchQueue>) -> Self {
        Self { queue }
    }

    /// Enqueue a captured event. Returns `false` once the owning manager has
    /// shut down.
    pub(crate) fn push(&self, event: Event) -> bool {
        self.queue.push(event)
    }
}

/// A platform listener that observes OS input and forwards portable events.
///
/// Lifecycle: detached → (attach) listening → (detach) detached. While
/// listening, the OS callback must only translate and enqueue; client
/// callbacks run on the manager's dispatch thread, never here.
pub(crate) trait CaptureBackend: Send {
    /// Attach to the OS input stream and start forwarding events to `sink`.
    ///
    /// Install failures (permission denied, conflicting exclusive capture)
    /// are reported synchronously; nothing is retried.
    fn attach(&mut self, sink: EventSink) -> Result<()>;

    /// Stop listening and release the OS resources. Must be safe to call on
    /// a backend that never attached.
    fn detach(&mut self);
}

/// The platform listeners route events through process-global state, so only
/// one of them may be attached at a time.
static CAPTURE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// RAII claim on the process-wide capture slot.
pub(crate) struct CaptureSlot(());

impl CaptureSlot {
    pub(crate) fn acquire() -> Result<Self> {
        if CAPTURE_ACTIVE.swap(true, Ordering::SeqCst) {
            return Err(Error::BackendStartFailed(
                "another capture backend is already attached in this process".into(),
            ));
        }
        Ok(CaptureSlot(()))
    }
}

impl Drop for CaptureSlot {
    fn drop(&mut self) {
        CAPTURE_ACTIVE.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Mock capture backend so dispatch tests need no OS hooks.

    use std::sync::{Arc, Mutex};

    use super::{CaptureBackend, EventSink};
    use crate::error::Result;
    use crate::event::Event;

    #[derive(Default)]
    pub(crate) struct MockShared {
        sink: Mutex<Option<EventSink>>,
    }

    impl MockShared {
        /// Emit a synthetic event as if captured from hardware. Returns
        /// `false` if the backend is detached or the queue rejected it.
        pub(crate) fn emit(&self, event: Event) -> bool {
            match self.sink.lock() {
                Ok(guard) => guard.as_ref().map(|sink| sink.push(event)).unwrap_or(false),
                Err(_) => false,
            }
        }

        pub(crate) fn is_attached(&self) -> bool {
            self.sink.lock().map(|g| g.is_some()).unwrap_or(false)
        }
    }

    pub(crate) struct MockCaptureBackend {
        shared: Arc<MockShared>,
    }

    impl MockCaptureBackend {
        pub(crate) fn new() -> (Self, Arc<MockShared>) {
            let shared = Arc::new(MockShared::default());
            (
                Self {
                    shared: shared.clone(),
                },
                shared,
            )
        }
    }

    impl CaptureBackend for MockCaptureBackend {
        fn attach(&mut self, sink: EventSink) -> Result<()> {
            *self.shared.sink.lock().expect("mock sink poisoned") = Some(sink);
            Ok(())
        }

        fn detach(&mut self) {
            *self.shared.sink.lock().expect("mock sink poisoned") = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_slot_is_exclusive_until_released() {
        let slot = CaptureSlot::acquire().expect("first acquire should succeed");
        assert!(matches!(
            CaptureSlot::acquire(),
            Err(Error::BackendStartFailed(_))
        ));
        drop(slot);
        let again = CaptureSlot::acquire().expect("slot should be free after release");
        drop(again);
    }
}
