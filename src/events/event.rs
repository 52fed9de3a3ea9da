//! # Runtime events emitted by executives, teams, and the background timer.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Team lifecycle**: worker pools starting, stopping, rejecting work
//! - **Process lifecycle**: managed executions starting, completing, failing
//! - **Scheduler activity**: background jobs being queued
//! - **Subscriber faults**: fan-out overflow and panics
//!
//! The [`Event`] struct carries additional metadata such as timestamps, team
//! name, process identity, and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use teamvisor::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::BackgroundScheduled)
//!     .with_team("expiry")
//!     .with_delay(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::BackgroundScheduled);
//! assert_eq!(ev.team.as_deref(), Some("expiry"));
//! assert_eq!(ev.delay_ms, Some(5000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `team`: subscriber name
    /// - `error`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full).
    ///
    /// Sets:
    /// - `team`: subscriber name
    /// - `error`: reason string
    SubscriberOverflow,

    // === Team lifecycle events ===
    /// A team's workers have been spawned and the team accepts jobs.
    ///
    /// Sets:
    /// - `team`: team name
    TeamStarted,

    /// A team has drained its queue and joined all workers.
    ///
    /// Sets:
    /// - `team`: team name
    TeamStopped,

    /// A worker caught a panicking job and continues with the next one.
    ///
    /// Sets:
    /// - `team`: team name
    /// - `worker`: worker index within the team
    WorkerPanicked,

    /// A job was assigned to a team that is not running.
    ///
    /// Sets:
    /// - `team`: team name
    JobRejected,

    // === Process lifecycle events ===
    /// A managed execution is about to run on the calling thread.
    ProcessStarting,

    /// A managed execution handed back its process manager.
    ///
    /// Sets:
    /// - `process`: process identifier
    ProcessManaged,

    /// A managed execution failed.
    ///
    /// Sets:
    /// - `error`: failure message
    ProcessFailed,

    // === Scheduler events ===
    /// A job was queued on the background timer.
    ///
    /// Sets:
    /// - `delay_ms`: delay before the job runs (ms)
    BackgroundScheduled,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the team (or subscriber, for subscriber faults), if applicable.
    pub team: Option<Arc<str>>,
    /// Rendered process identifier, if applicable.
    pub process: Option<Arc<str>>,
    /// Worker index within a team, if applicable.
    pub worker: Option<u32>,
    /// Scheduling delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable failure details, if applicable.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            team: None,
            process: None,
            worker: None,
            delay_ms: None,
            error: None,
        }
    }

    /// Attaches a team (or subscriber) name.
    #[inline]
    pub fn with_team(mut self, team: impl Into<Arc<str>>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Attaches a rendered process identifier.
    #[inline]
    pub fn with_process(mut self, process: impl Into<Arc<str>>) -> Self {
        self.process = Some(process.into());
        self
    }

    /// Attaches a worker index.
    #[inline]
    pub fn with_worker(mut self, worker: u32) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Attaches a scheduling delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        let ms = delay.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches human-readable failure details.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_team(subscriber)
            .with_error("queue full")
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_team(subscriber)
            .with_error(info)
    }

    /// Returns true for subscriber fault events (overflow/panic).
    ///
    /// Fault events are not re-reported when they themselves overflow a
    /// subscriber queue, which keeps the fan-out loop-free.
    #[inline]
    pub fn is_subscriber_fault(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_monotonic() {
        let a = Event::now(EventKind::TeamStarted);
        let b = Event::now(EventKind::TeamStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_set_fields() {
        let ev = Event::now(EventKind::WorkerPanicked)
            .with_team("web")
            .with_worker(3)
            .with_error("boom");
        assert_eq!(ev.team.as_deref(), Some("web"));
        assert_eq!(ev.worker, Some(3));
        assert_eq!(ev.error.as_deref(), Some("boom"));
    }

    #[test]
    fn delay_is_stored_compact() {
        let ev = Event::now(EventKind::BackgroundScheduled).with_delay(Duration::from_millis(1500));
        assert_eq!(ev.delay_ms, Some(1500));
    }

    #[test]
    fn subscriber_faults_are_flagged() {
        assert!(Event::subscriber_overflow("metrics").is_subscriber_fault());
        assert!(Event::subscriber_panicked("metrics", "boom".into()).is_subscriber_fault());
        assert!(!Event::now(EventKind::TeamStarted).is_subscriber_fault());
    }
}
