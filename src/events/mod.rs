//! Runtime events: classification, metadata, and the broadcast bus.
//!
//! Teams, workers, executives, and the background timer publish [`Event`]s to
//! a shared [`Bus`]; the subscriber fan-out layer consumes them for logging,
//! metrics, or supervision.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
