//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [team-started] team=web
//! [worker-panicked] team=web worker=1
//! [job-rejected] team=web
//! [team-stopped] team=web
//! [process-starting]
//! [process-managed] process=process-7
//! [process-failed] err="execution failed: boom"
//! [background-scheduled] delay_ms=5000
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::subscriber::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use; implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

impl Subscribe for LogWriter {
    fn name(&self) -> &'static str {
        "log-writer"
    }

    fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TeamStarted => {
                println!("[team-started] team={:?}", e.team);
            }
            EventKind::TeamStopped => {
                println!("[team-stopped] team={:?}", e.team);
            }
            EventKind::WorkerPanicked => {
                println!("[worker-panicked] team={:?} worker={:?}", e.team, e.worker);
            }
            EventKind::JobRejected => {
                println!("[job-rejected] team={:?}", e.team);
            }
            EventKind::ProcessStarting => {
                println!("[process-starting]");
            }
            EventKind::ProcessManaged => {
                println!("[process-managed] process={:?}", e.process);
            }
            EventKind::ProcessFailed => {
                println!("[process-failed] err={:?}", e.error);
            }
            EventKind::BackgroundScheduled => {
                println!("[background-scheduled] delay_ms={:?}", e.delay_ms);
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] subscriber={:?}", e.team);
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] subscriber={:?} err={:?}", e.team, e.error);
            }
        }
    }
}
