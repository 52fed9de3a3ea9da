//! # Background scheduling: delayed jobs outside process-scoped threads.
//!
//! [`BackgroundScheduler`] is the optional capability an
//! [`Executive`](crate::Executive) may expose to run delayed jobs on a
//! long-lived thread that is not tied to any process lifetime (request
//! processing threads may be constrained to process-lifetime-only in some
//! executive implementations).
//!
//! [`TimerThread`] is the provided implementation: one dedicated thread
//! draining a command channel with a deadline-bounded `recv_timeout`, keeping
//! not-yet-due jobs in a min-heap.
//!
//! ```text
//! schedule(delay, job) ──► [command channel] ──► timer thread
//!                                                  ├── heap of (due, seq, job)
//!                                                  ├── recv_timeout(next due)
//!                                                  └── run due jobs (panic isolated)
//! ```
//!
//! Recurring work re-schedules itself from inside the job body. Dropping the
//! [`TimerThread`] handle shuts the thread down; jobs that are not yet due at
//! that point are discarded.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::events::{Bus, Event, EventKind};

/// A delayed unit of work.
pub type BackgroundJob = Box<dyn FnOnce() + Send + 'static>;

/// # Runs delayed jobs outside process-scoped threads.
pub trait BackgroundScheduler: Send + Sync {
    /// Queues `job` to run after `delay`.
    ///
    /// Jobs with equal deadlines run in scheduling order. A job scheduled
    /// after the scheduler shut down is silently dropped.
    fn schedule(&self, delay: Duration, job: BackgroundJob);
}

/// How long the timer thread parks when nothing is queued.
const IDLE_WAIT: Duration = Duration::from_secs(60);

struct TimerEntry {
    due: Instant,
    seq: u64,
    job: BackgroundJob,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

enum TimerCommand {
    Schedule(TimerEntry),
}

/// Dedicated-thread [`BackgroundScheduler`] implementation.
pub struct TimerThread {
    sender: Mutex<Option<Sender<TimerCommand>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    seq: std::sync::atomic::AtomicU64,
    bus: Option<Bus>,
}

impl TimerThread {
    /// Spawns the timer thread, optionally publishing
    /// [`EventKind::BackgroundScheduled`] events to `bus`.
    pub fn spawn(bus: Option<Bus>) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let loop_bus = bus.clone();
        let handle = thread::Builder::new()
            .name("background-timer".to_string())
            .spawn(move || timer_loop(receiver, loop_bus))?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            seq: std::sync::atomic::AtomicU64::new(0),
            bus,
        })
    }
}

impl BackgroundScheduler for TimerThread {
    fn schedule(&self, delay: Duration, job: BackgroundJob) {
        let entry = TimerEntry {
            due: Instant::now() + delay,
            seq: self.seq.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
            job,
        };

        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        let queued = sender
            .as_ref()
            .is_some_and(|tx| tx.send(TimerCommand::Schedule(entry)).is_ok());
        drop(sender);

        if queued {
            if let Some(bus) = &self.bus {
                bus.publish(Event::now(EventKind::BackgroundScheduled).with_delay(delay));
            }
        }
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        // Disconnecting the channel is the shutdown signal.
        if let Some(sender) = self
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            drop(sender);
        }
        if let Some(handle) = self
            .handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            let _ = handle.join();
        }
    }
}

fn timer_loop(receiver: Receiver<TimerCommand>, bus: Option<Bus>) {
    let mut pending: BinaryHeap<Reverse<TimerEntry>> = BinaryHeap::new();

    loop {
        let wait = pending
            .peek()
            .map(|Reverse(entry)| entry.due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);

        match receiver.recv_timeout(wait) {
            Ok(TimerCommand::Schedule(entry)) => pending.push(Reverse(entry)),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        run_due(&mut pending, bus.as_ref());
    }

    // Final sweep: anything already due still runs; the rest is discarded.
    run_due(&mut pending, bus.as_ref());
}

fn run_due(pending: &mut BinaryHeap<Reverse<TimerEntry>>, bus: Option<&Bus>) {
    loop {
        match pending.peek() {
            Some(Reverse(entry)) if entry.due <= Instant::now() => {}
            _ => break,
        }
        if let Some(Reverse(entry)) = pending.pop() {
            if panic::catch_unwind(AssertUnwindSafe(entry.job)).is_err() {
                if let Some(bus) = bus {
                    bus.publish(
                        Event::now(EventKind::WorkerPanicked).with_team("background-timer"),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn jobs_run_after_their_delay() {
        let timer = TimerThread::spawn(None).expect("spawn timer");
        let (tx, rx) = mpsc::channel();

        let started = Instant::now();
        timer.schedule(
            Duration::from_millis(30),
            Box::new(move || {
                tx.send(Instant::now()).unwrap();
            }),
        );

        let ran_at = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("job executed");
        assert!(ran_at.duration_since(started) >= Duration::from_millis(30));
    }

    #[test]
    fn jobs_run_in_deadline_order() {
        let timer = TimerThread::spawn(None).expect("spawn timer");
        let (tx, rx) = mpsc::channel();

        let late = tx.clone();
        timer.schedule(
            Duration::from_millis(80),
            Box::new(move || late.send("late").unwrap()),
        );
        timer.schedule(
            Duration::from_millis(20),
            Box::new(move || tx.send("early").unwrap()),
        );

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "early");
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "late");
    }

    #[test]
    fn dropping_the_handle_discards_undue_jobs() {
        let timer = TimerThread::spawn(None).expect("spawn timer");
        let ran = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&ran);
        timer.schedule(
            Duration::from_secs(30),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );
        drop(timer);

        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn panicking_jobs_do_not_kill_the_timer() {
        let timer = TimerThread::spawn(None).expect("spawn timer");
        timer.schedule(Duration::from_millis(5), Box::new(|| panic!("timer job")));

        let (tx, rx) = mpsc::channel();
        timer.schedule(
            Duration::from_millis(25),
            Box::new(move || tx.send(()).unwrap()),
        );
        rx.recv_timeout(Duration::from_secs(5))
            .expect("timer survived the panic");
    }

    #[test]
    fn schedule_publishes_an_event() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let timer = TimerThread::spawn(Some(bus)).expect("spawn timer");

        timer.schedule(Duration::from_millis(1), Box::new(|| {}));

        let ev = rx.try_recv().expect("event published");
        assert_eq!(ev.kind, EventKind::BackgroundScheduled);
        assert_eq!(ev.delay_ms, Some(1));
    }
}
