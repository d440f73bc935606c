//! The running capture → dispatch pipeline.
//!
//! An [`InputManager`] owns one capture backend, one registration snapshot,
//! and one bounded dispatch queue consumed by a dedicated dispatch thread.
//! The OS capture context only translates and enqueues; client callbacks
//! always run on the dispatch thread. Stalling an OS hook by running client
//! code inside it gets the hook throttled or removed, so the two contexts
//! are never allowed to meet.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::capture::{CaptureBackend, EventSink};
use crate::config::Registrations;
use crate::error::{Error, Result};
use crate::event::Event;

/// Upper bound on queued-but-undispatched events per manager.
pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// How long shutdown keeps draining queued events before discarding the rest.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

struct QueueState {
    events: VecDeque<Event>,
    dropped: u64,
    closed: bool,
    discard_at: Option<Instant>,
}

/// Bounded queue between the capture context and the dispatch thread.
///
/// Overflow policy is drop-oldest-with-counter: a full queue discards its
/// oldest event and counts the drop rather than blocking the producer, since
/// the producer may be an OS hook that must never stall.
pub(crate) struct DispatchQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
    capacity: usize,
}

impl DispatchQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                events: VecDeque::with_capacity(capacity),
                dropped: 0,
                closed: false,
                discard_at: None,
            }),
            ready: Condvar::new(),
            capacity,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        // A panic in a client callback must not wedge the queue.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Enqueue an event. Returns `false` once the queue is closed.
    pub(crate) fn push(&self, event: Event) -> bool {
        let mut state = self.lock_state();
        if state.closed {
            return false;
        }
        if state.events.len() == self.capacity {
            state.events.pop_front();
            state.dropped += 1;
            log::trace!("dispatch queue full, dropped oldest event");
        }
        state.events.push_back(event);
        drop(state);
        self.ready.notify_one();
        true
    }

    /// Dequeue the next event, blocking while the queue is open and empty.
    ///
    /// Returns `None` once the queue is closed and either drained or past its
    /// discard deadline.
    fn pop(&self) -> Option<Event> {
        let mut state = self.lock_state();
        loop {
            if state.closed
                && state
                    .discard_at
                    .is_some_and(|deadline| Instant::now() >= deadline)
            {
                let discarded = state.events.len();
                if discarded > 0 {
                    state.events.clear();
                    log::warn!("shutdown grace period expired, discarded {discarded} events");
                }
                return None;
            }
            if let Some(event) = state.events.pop_front() {
                return Some(event);
            }
            if state.closed {
                return None;
            }
            state = match self.ready.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Close the queue: rejects further pushes and gives the dispatch thread
    /// a bounded grace period to drain what is already queued.
    fn close(&self) {
        let mut state = self.lock_state();
        if !state.closed {
            state.closed = true;
            state.discard_at = Some(Instant::now() + SHUTDOWN_GRACE);
        }
        drop(state);
        self.ready.notify_all();
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.lock_state().dropped
    }
}

/// The externally visible object embodying a running pipeline.
///
/// Created by [`crate::InputConfiguration::build`]. Dropping the manager
/// performs the full shutdown sequence; no callback runs after `drop`
/// returns.
pub struct InputManager {
    queue: Arc<DispatchQueue>,
    backend: Mutex<Option<Box<dyn CaptureBackend>>>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl InputManager {
    /// Spawn the dispatch thread and attach the capture backend.
    pub(crate) fn start(
        mut backend: Box<dyn CaptureBackend>,
        registrations: Registrations,
    ) -> Result<InputManager> {
        let queue = Arc::new(DispatchQueue::new(DEFAULT_QUEUE_CAPACITY));

        let dispatch_queue = queue.clone();
        let dispatcher = std::thread::Builder::new()
            .name("tapsim-dispatch".into())
            .spawn(move || dispatch_loop(dispatch_queue, registrations))
            .map_err(|e| Error::ThreadError(format!("failed to spawn dispatch thread: {e}")))?;

        if let Err(e) = backend.attach(EventSink::new(queue.clone())) {
            queue.close();
            let _ = dispatcher.join();
            return Err(e);
        }
        log::debug!("capture backend attached, pipeline running");

        Ok(InputManager {
            queue,
            backend: Mutex::new(Some(backend)),
            dispatcher: Mutex::new(Some(dispatcher)),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Push an event into the dispatch path.
    ///
    /// This is the single entry point by which captured or synthesized
    /// events reach the registered callbacks: each callback registered for
    /// the event's kind runs exactly once, in registration order, on the
    /// dispatch thread.
    ///
    /// Returns `false` (dispatching nothing) once the manager has shut down.
    /// A full queue is not a failure: the oldest queued event is dropped,
    /// counted in [`dropped_events`](Self::dropped_events), and the new
    /// event is accepted.
    pub fn push_event(&self, event: Event) -> bool {
        if self.shut_down.load(Ordering::SeqCst) {
            return false;
        }
        self.queue.push(event)
    }

    /// Number of events dropped by the overflow policy so far.
    pub fn dropped_events(&self) -> u64 {
        self.queue.dropped()
    }

    /// Whether the manager is still accepting and dispatching events.
    pub fn is_running(&self) -> bool {
        !self.shut_down.load(Ordering::SeqCst)
    }

    /// Stop the pipeline: refuse new events, detach the capture backend,
    /// drain the queue (bounded grace period, then discard), and join the
    /// dispatch thread. No callback runs after this returns.
    ///
    /// A second explicit call returns [`Error::AlreadyShutdown`].
    pub fn shutdown(&self) -> Result<()> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyShutdown);
        }
        self.shutdown_inner();
        Ok(())
    }

    fn shutdown_inner(&self) {
        self.queue.close();

        let backend = match self.backend.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(mut backend) = backend {
            backend.detach();
        }

        let dispatcher = match self.dispatcher.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = dispatcher {
            let _ = handle.join();
        }
        log::debug!(
            "pipeline stopped ({} events dropped in total)",
            self.queue.dropped()
        );
    }
}

impl Drop for InputManager {
    fn drop(&mut self) {
        if !self.shut_down.swap(true, Ordering::SeqCst) {
            self.shutdown_inner();
        }
    }
}

fn dispatch_loop(queue: Arc<DispatchQueue>, registrations: Registrations) {
    while let Some(event) = queue.pop() {
        registrations.dispatch(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::mock::MockCaptureBackend;
    use crate::config::Registrations;
    use crate::event::{Button, EventKind};
    use crate::keycode::KeyCode;
    use std::sync::mpsc;

    fn key_event(pressed: bool) -> Event {
        Event::Key {
            pressed,
            key: KeyCode::KeyA,
        }
    }

    /// Spin until `predicate` holds or a generous deadline passes.
    fn wait_until(predicate: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !predicate() {
            assert!(Instant::now() < deadline, "timed out waiting for condition");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn manager_with(registrations: Registrations) -> InputManager {
        let (backend, _shared) = MockCaptureBackend::new();
        InputManager::start(Box::new(backend), registrations).expect("start should succeed")
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registrations = Registrations::default();
        for tag in 1..=3 {
            let order = order.clone();
            registrations.push(
                EventKind::Key,
                Box::new(move |event: &Event| {
                    assert_eq!(
                        *event,
                        Event::Key {
                            pressed: true,
                            key: KeyCode::KeyA
                        }
                    );
                    order.lock().unwrap().push(tag);
                }),
            );
        }

        let manager = manager_with(registrations);
        assert!(manager.push_event(key_event(true)));

        wait_until(|| order.lock().unwrap().len() == 3);
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
        manager.shutdown().unwrap();
    }

    #[test]
    fn test_only_matching_kind_is_dispatched() {
        let (key_tx, key_rx) = mpsc::channel();
        let (btn_tx, btn_rx) = mpsc::channel();
        let mut registrations = Registrations::default();
        registrations.push(
            EventKind::Key,
            Box::new(move |event: &Event| {
                key_tx.send(*event).unwrap();
            }),
        );
        registrations.push(
            EventKind::MouseButton,
            Box::new(move |event: &Event| {
                btn_tx.send(*event).unwrap();
            }),
        );

        let manager = manager_with(registrations);
        manager.push_event(Event::MouseButton {
            pressed: true,
            button: Button::Right,
        });

        let received = btn_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            received,
            Event::MouseButton {
                pressed: true,
                button: Button::Right
            }
        );
        assert!(key_rx.try_recv().is_err(), "key handler must not fire");
        manager.shutdown().unwrap();
    }

    #[test]
    fn test_push_event_after_shutdown_returns_false() {
        let invoked = Arc::new(AtomicBool::new(false));
        let invoked_in_handler = invoked.clone();
        let mut registrations = Registrations::default();
        registrations.push(
            EventKind::Key,
            Box::new(move |_: &Event| {
                invoked_in_handler.store(true, Ordering::SeqCst);
            }),
        );

        let manager = manager_with(registrations);
        manager.shutdown().unwrap();

        assert!(!manager.push_event(key_event(true)));
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn test_shutdown_twice_is_a_misuse_error() {
        let manager = manager_with(Registrations::default());
        manager.shutdown().unwrap();
        assert!(matches!(manager.shutdown(), Err(Error::AlreadyShutdown)));
        assert!(!manager.is_running());
    }

    #[test]
    fn test_overflow_drops_oldest_and_counts_exactly() {
        let capacity = DEFAULT_QUEUE_CAPACITY;
        let overflow = 50usize;

        // Gate the dispatch thread inside the first callback so the queue
        // fills deterministically behind it.
        let gate = Arc::new((Mutex::new(true), Condvar::new()));
        let entered = Arc::new(AtomicBool::new(false));
        let received = Arc::new(Mutex::new(Vec::new()));

        let gate_in_handler = gate.clone();
        let entered_in_handler = entered.clone();
        let received_in_handler = received.clone();
        let mut registrations = Registrations::default();
        registrations.push(
            EventKind::MouseScroll,
            Box::new(move |event: &Event| {
                entered_in_handler.store(true, Ordering::SeqCst);
                let (lock, condvar) = &*gate_in_handler;
                let mut blocked = lock.lock().unwrap();
                while *blocked {
                    blocked = condvar.wait(blocked).unwrap();
                }
                drop(blocked);
                received_in_handler.lock().unwrap().push(*event);
            }),
        );

        let manager = manager_with(registrations);

        // The first event is popped immediately and parks in the callback.
        assert!(manager.push_event(Event::MouseScroll { offset: 0 }));
        wait_until(|| entered.load(Ordering::SeqCst));

        // Fill the queue past capacity; every push succeeds, the oldest
        // queued events fall out.
        for i in 0..capacity + overflow {
            assert!(manager.push_event(Event::MouseScroll {
                offset: (i + 1) as i32
            }));
        }
        assert_eq!(manager.dropped_events(), overflow as u64);

        // Release the dispatch thread and let everything drain.
        {
            let (lock, condvar) = &*gate;
            *lock.lock().unwrap() = false;
            condvar.notify_all();
        }
        wait_until(|| received.lock().unwrap().len() == 1 + capacity);

        let received = received.lock().unwrap();
        assert_eq!(received[0], Event::MouseScroll { offset: 0 });
        // The survivors are exactly the newest `capacity` events, in order.
        for (slot, event) in received[1..].iter().enumerate() {
            let expected = (overflow + slot + 1) as i32;
            assert_eq!(*event, Event::MouseScroll { offset: expected });
        }
        assert_eq!(manager.dropped_events(), overflow as u64);
    }

    #[test]
    fn test_concurrent_pushes_never_double_deliver() {
        let threads = 4usize;
        let per_thread = 200usize;

        let received = Arc::new(Mutex::new(Vec::new()));
        let received_in_handler = received.clone();
        let mut registrations = Registrations::default();
        registrations.push(
            EventKind::MouseScroll,
            Box::new(move |event: &Event| {
                received_in_handler.lock().unwrap().push(*event);
            }),
        );

        let manager = Arc::new(manager_with(registrations));
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let manager = manager.clone();
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        // A unique offset per pushed event.
                        manager.push_event(Event::MouseScroll {
                            offset: (t * per_thread + i) as i32,
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let pushed = (threads * per_thread) as u64;
        wait_until(|| {
            received.lock().unwrap().len() as u64 + manager.dropped_events() == pushed
        });

        let received = received.lock().unwrap();
        let mut seen: Vec<i32> = received
            .iter()
            .map(|event| match event {
                Event::MouseScroll { offset } => *offset,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        let delivered = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), delivered, "an event was delivered twice");
    }

    #[test]
    fn test_drop_stops_the_pipeline() {
        let (backend, shared) = MockCaptureBackend::new();
        let manager =
            InputManager::start(Box::new(backend), Registrations::default()).unwrap();
        assert!(shared.is_attached());
        drop(manager);
        assert!(!shared.is_attached(), "drop must detach the backend");
    }

    #[test]
    fn test_events_flow_from_backend_to_callbacks() {
        let (tx, rx) = mpsc::channel();
        let mut registrations = Registrations::default();
        registrations.push(
            EventKind::Key,
            Box::new(move |event: &Event| {
                tx.send(*event).unwrap();
            }),
        );

        let (backend, shared) = MockCaptureBackend::new();
        let manager = InputManager::start(Box::new(backend), registrations).unwrap();

        assert!(shared.emit(key_event(false)));
        let received = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(received, key_event(false));

        manager.shutdown().unwrap();
        assert!(!shared.emit(key_event(true)), "sink must reject after shutdown");
    }
}
