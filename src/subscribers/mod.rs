//! Event subscribers for the teamvisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out that delivers [`Event`](crate::Event)s from the
//! [`Bus`](crate::Bus) to user subscribers, one dedicated worker thread per
//! subscriber.
//!
//! ```text
//! Event flow:
//!   teams/executive ── publish(Event) ──► Bus ──► SubscriberSet listener
//!                                                     │
//!                                                ┌────┴────┬─────────┐
//!                                                ▼         ▼         ▼
//!                                            LogWriter  Metrics   Custom
//! ```

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
