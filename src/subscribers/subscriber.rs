//! # Subscriber trait for runtime events.
//!
//! A [`Subscribe`] implementation receives [`Event`]s fanned out by a
//! [`SubscriberSet`](crate::SubscriberSet). Handlers run on a dedicated
//! worker thread per subscriber, so a slow subscriber never blocks the
//! publisher or its peers.
//!
//! ## Implementing custom subscribers
//! ```
//! use teamvisor::{Event, EventKind, Subscribe};
//!
//! struct Metrics;
//!
//! impl Subscribe for Metrics {
//!     fn name(&self) -> &'static str {
//!         "metrics"
//!     }
//!
//!     fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::WorkerPanicked {
//!             // increment a failure counter
//!         }
//!     }
//! }
//! ```

use crate::events::Event;

/// # Handles runtime events on a dedicated worker thread.
pub trait Subscribe: Send + Sync + 'static {
    /// Returns a stable subscriber name (used in fault events and the worker
    /// thread name).
    fn name(&self) -> &'static str;

    /// Capacity of this subscriber's delivery queue.
    ///
    /// When the queue is full, further events are dropped for this
    /// subscriber only and reported as
    /// [`EventKind::SubscriberOverflow`](crate::EventKind).
    fn queue_capacity(&self) -> usize {
        64
    }

    /// Processes one event.
    fn on_event(&self, event: &Event);
}
