//! # Non-blocking event fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] distributes events to multiple subscribers concurrently
//! without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker thread 1 ──► subscriber1.on_event()
//!     │    (bounded)          └────────────► panic → SubscriberPanicked
//!     ├──► [queue 2] ──► worker thread 2 ──► subscriber2.on_event()
//!     └──► [queue N] ──► worker thread N ──► subscriberN.on_event()
//!
//! attach(set, bus): listener thread pumping Bus ──► emit()
//! ```
//!
//! ## Rules
//! - **No cross-subscriber ordering**: subscriber A may process event N
//!   while B processes N+5.
//! - **Per-subscriber FIFO**: each subscriber sees events in order.
//! - **Overflow**: the event is dropped for that subscriber only and a
//!   `SubscriberOverflow` event is published (subscriber fault events are
//!   never re-reported, keeping the fan-out loop-free).
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`).
//! - **Isolation**: a panicking subscriber is caught, reported, and keeps
//!   its worker alive.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::events::{Bus, Event};
use crate::subscribers::subscriber::Subscribe;

/// Per-subscriber delivery queue.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event subscribers.
///
/// One worker thread per subscriber drains a bounded queue; faults (overflow,
/// panics) are published back to the bus the set was created with.
pub struct SubscriberSet {
    channels: Mutex<Vec<SubscriberChannel>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker thread per subscriber.
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>, bus: Bus) -> io::Result<Self> {
        let mut channels = Vec::with_capacity(subscribers.len());
        let mut workers = Vec::with_capacity(subscribers.len());

        for subscriber in subscribers {
            let name = subscriber.name();
            let (sender, mut receiver) = mpsc::channel::<Arc<Event>>(subscriber.queue_capacity().max(1));
            let worker_bus = bus.clone();

            let handle = thread::Builder::new()
                .name(format!("subscriber-{name}"))
                .spawn(move || {
                    while let Some(event) = receiver.blocking_recv() {
                        let call = AssertUnwindSafe(|| subscriber.on_event(event.as_ref()));
                        if let Err(info) = panic::catch_unwind(call) {
                            let message = panic_message(&info);
                            worker_bus.publish(Event::subscriber_panicked(name, message));
                        }
                    }
                })?;

            channels.push(SubscriberChannel { name, sender });
            workers.push(handle);
        }

        Ok(Self {
            channels: Mutex::new(channels),
            workers: Mutex::new(workers),
            bus,
        })
    }

    /// Queues the event for every subscriber without blocking.
    pub fn emit(&self, event: &Event) {
        let shared = Arc::new(event.clone());
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        for channel in channels.iter() {
            // A fault event is never redelivered to the subscriber that
            // caused it; a subscriber panicking on its own panic reports
            // would otherwise loop forever.
            if event.is_subscriber_fault() && event.team.as_deref() == Some(channel.name) {
                continue;
            }
            match channel.sender.try_send(Arc::clone(&shared)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    if !event.is_subscriber_fault() {
                        self.bus.publish(Event::subscriber_overflow(channel.name));
                    }
                }
                Err(TrySendError::Closed(_)) => {}
            }
        }
    }

    /// Spawns a listener thread pumping a bus subscription into this set.
    ///
    /// The listener exits once every handle to the bus has been dropped.
    pub fn attach(set: Arc<Self>, bus: &Bus) -> io::Result<JoinHandle<()>> {
        let mut receiver = bus.subscribe();
        thread::Builder::new()
            .name("subscriber-listener".to_string())
            .spawn(move || {
                loop {
                    match receiver.blocking_recv() {
                        Ok(event) => set.emit(&event),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    }
                }
            })
    }

    /// Closes every queue and joins the worker threads.
    ///
    /// Queued events are still delivered before the workers exit.
    pub fn close(&self) {
        self.channels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        let workers = std::mem::take(&mut *self.workers.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in workers {
            let _ = handle.join();
        }
    }
}

impl Drop for SubscriberSet {
    fn drop(&mut self) {
        self.close();
    }
}

fn panic_message(info: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = info.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.downcast_ref::<String>() {
        message.clone()
    } else {
        "subscriber panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counter {
        seen: Arc<AtomicUsize>,
    }

    impl Subscribe for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn on_event(&self, _event: &Event) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn events_reach_every_subscriber() {
        let bus = Bus::new(16);
        let seen_a = Arc::new(AtomicUsize::new(0));
        let seen_b = Arc::new(AtomicUsize::new(0));

        let set = SubscriberSet::new(
            vec![
                Arc::new(Counter {
                    seen: Arc::clone(&seen_a),
                }),
                Arc::new(Counter {
                    seen: Arc::clone(&seen_b),
                }),
            ],
            bus,
        )
        .expect("subscriber set");

        for _ in 0..3 {
            set.emit(&Event::now(EventKind::TeamStarted));
        }
        set.close();

        assert_eq!(seen_a.load(Ordering::SeqCst), 3);
        assert_eq!(seen_b.load(Ordering::SeqCst), 3);
    }

    struct Grumpy;

    impl Subscribe for Grumpy {
        fn name(&self) -> &'static str {
            "grumpy"
        }

        fn on_event(&self, _event: &Event) {
            panic!("handler blew up");
        }
    }

    #[test]
    fn panicking_subscribers_are_isolated_and_reported() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let seen = Arc::new(AtomicUsize::new(0));

        let set = SubscriberSet::new(
            vec![
                Arc::new(Grumpy),
                Arc::new(Counter {
                    seen: Arc::clone(&seen),
                }),
            ],
            bus,
        )
        .expect("subscriber set");

        set.emit(&Event::now(EventKind::TeamStarted));
        set.emit(&Event::now(EventKind::TeamStopped));
        set.close();

        // The healthy subscriber saw both events.
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        let mut panics = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::SubscriberPanicked {
                assert_eq!(ev.team.as_deref(), Some("grumpy"));
                panics += 1;
            }
        }
        assert_eq!(panics, 2);
    }

    #[test]
    fn attach_pumps_bus_events_into_the_set() {
        let bus = Bus::new(16);
        let seen = Arc::new(AtomicUsize::new(0));

        let set = Arc::new(
            SubscriberSet::new(
                vec![Arc::new(Counter {
                    seen: Arc::clone(&seen),
                })],
                bus.clone(),
            )
            .expect("subscriber set"),
        );
        let listener = SubscriberSet::attach(Arc::clone(&set), &bus).expect("listener");

        bus.publish(Event::now(EventKind::TeamStarted));
        bus.publish(Event::now(EventKind::TeamStopped));

        // Delivery is asynchronous; give the listener and worker a moment.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while seen.load(Ordering::SeqCst) < 2 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        set.close();
        // The listener thread exits once every bus sender is gone; the test
        // does not wait on it.
        drop(listener);
    }
}
