//! Callback registration and pipeline construction.

use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::manager::InputManager;
use crate::platform;

#[cfg(test)]
use crate::capture::CaptureBackend;

type Handler = Box<dyn Fn(&Event) + Send + Sync>;

/// Ordered callback lists, one per event kind. Insertion order is dispatch
/// order.
#[derive(Default)]
pub(crate) struct Registrations {
    key: Vec<Handler>,
    mouse_button: Vec<Handler>,
    mouse_scroll: Vec<Handler>,
    mouse_position_offset: Vec<Handler>,
    mouse_position_absolute: Vec<Handler>,
}

impl Registrations {
    pub(crate) fn push(&mut self, kind: EventKind, handler: Handler) {
        self.list_mut(kind).push(handler);
    }

    fn list_mut(&mut self, kind: EventKind) -> &mut Vec<Handler> {
        match kind {
            EventKind::Key => &mut self.key,
            EventKind::MouseButton => &mut self.mouse_button,
            EventKind::MouseScroll => &mut self.mouse_scroll,
            EventKind::MousePositionOffset => &mut self.mouse_position_offset,
            EventKind::MousePositionAbsolute => &mut self.mouse_position_absolute,
        }
    }

    fn list(&self, kind: EventKind) -> &[Handler] {
        match kind {
            EventKind::Key => &self.key,
            EventKind::MouseButton => &self.mouse_button,
            EventKind::MouseScroll => &self.mouse_scroll,
            EventKind::MousePositionOffset => &self.mouse_position_offset,
            EventKind::MousePositionAbsolute => &self.mouse_position_absolute,
        }
    }

    /// Invoke every handler registered for the event's kind, in order.
    pub(crate) fn dispatch(&self, event: &Event) {
        for handler in self.list(event.kind()) {
            handler(event);
        }
    }
}

/// Accumulates callback registrations until [`build`](Self::build) turns
/// them into a running [`InputManager`].
///
/// # Example
///
/// ```no_run
/// use tapsim::{create_input_configuration, Event, EventKind};
///
/// let manager = create_input_configuration()
///     .on_event(EventKind::Key, |event: &Event| {
///         if let Event::Key { pressed, key } = event {
///             println!("key {key:?} pressed={pressed}");
///         }
///     })
///     .build()
///     .expect("failed to attach capture backend");
/// ```
pub struct InputConfiguration {
    registrations: Option<Registrations>,
}

impl Default for InputConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new, empty input configuration.
///
/// This is the only construction entry point for the pipeline.
pub fn create_input_configuration() -> InputConfiguration {
    InputConfiguration::new()
}

impl InputConfiguration {
    /// Create a new, empty configuration.
    pub fn new() -> Self {
        Self {
            registrations: Some(Registrations::default()),
        }
    }

    /// Append `handler` to the callback list for `kind`, chainable.
    ///
    /// Handlers run on the manager's dispatch thread in registration order.
    /// Calling this after `build()` is a no-op (the snapshot has already
    /// been taken).
    pub fn on_event<F>(&mut self, kind: EventKind, handler: F) -> &mut Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        match self.registrations.as_mut() {
            Some(registrations) => registrations.push(kind, Box::new(handler)),
            None => log::warn!("on_event called after build, handler ignored"),
        }
        self
    }

    /// Snapshot the registrations, attach the platform capture backend, and
    /// return the running manager.
    ///
    /// One-shot: a second call returns [`Error::AlreadyBuilt`], including
    /// after a failed first attempt. Attach failures (permission denied,
    /// conflicting capture) surface here and are never retried internally.
    pub fn build(&mut self) -> Result<InputManager> {
        let registrations = self.registrations.take().ok_or(Error::AlreadyBuilt)?;
        InputManager::start(platform::capture_backend(), registrations)
    }

    /// `build` against an explicit backend, for tests.
    #[cfg(test)]
    pub(crate) fn build_with(
        &mut self,
        backend: Box<dyn CaptureBackend>,
    ) -> Result<InputManager> {
        let registrations = self.registrations.take().ok_or(Error::AlreadyBuilt)?;
        InputManager::start(backend, registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::mock::MockCaptureBackend;
    use crate::event::Button;
    use crate::keycode::KeyCode;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_build_is_one_shot() {
        let mut config = create_input_configuration();
        let (backend, _shared) = MockCaptureBackend::new();
        let manager = config.build_with(Box::new(backend)).unwrap();
        assert!(matches!(
            config.build_with(Box::new(MockCaptureBackend::new().0)),
            Err(Error::AlreadyBuilt)
        ));
        manager.shutdown().unwrap();
    }

    #[test]
    fn test_on_event_after_build_is_ignored() {
        let mut config = create_input_configuration();
        let (backend, shared) = MockCaptureBackend::new();
        let manager = config.build_with(Box::new(backend)).unwrap();

        let (tx, rx) = mpsc::channel();
        config.on_event(EventKind::Key, move |event: &Event| {
            tx.send(*event).unwrap();
        });
        shared.emit(Event::Key {
            pressed: true,
            key: KeyCode::KeyQ,
        });
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        manager.shutdown().unwrap();
    }

    #[test]
    fn test_chained_registration_dispatches_through_build() {
        let (key_tx, key_rx) = mpsc::channel();
        let (btn_tx, btn_rx) = mpsc::channel();

        let mut config = create_input_configuration();
        config
            .on_event(EventKind::Key, move |event: &Event| {
                key_tx.send(*event).unwrap();
            })
            .on_event(EventKind::MouseButton, move |event: &Event| {
                btn_tx.send(*event).unwrap();
            });

        let (backend, shared) = MockCaptureBackend::new();
        let manager = config.build_with(Box::new(backend)).unwrap();

        shared.emit(Event::Key {
            pressed: true,
            key: KeyCode::Space,
        });
        shared.emit(Event::MouseButton {
            pressed: false,
            button: Button::Left,
        });

        assert_eq!(
            key_rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Event::Key {
                pressed: true,
                key: KeyCode::Space
            }
        );
        assert_eq!(
            btn_rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Event::MouseButton {
                pressed: false,
                button: Button::Left
            }
        );
        manager.shutdown().unwrap();
    }
}
