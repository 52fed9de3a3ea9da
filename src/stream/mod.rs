//! Buffered server input streaming.
//!
//! [`ServerInputStream`] buffers inbound bytes pushed by a network layer and
//! serves them to a destructive primary cursor plus any number of
//! non-destructive [`BrowseInputStream`] cursors, signalling "no data yet"
//! distinctly from end-of-stream so callers never block an OS thread.
//! [`StreamMomento`] snapshots a completed stream for persistence/transfer.

mod browse;
mod chunk;
pub(crate) mod input;
mod momento;

pub use browse::BrowseInputStream;
pub use input::{Availability, ReadResult, ServerInputStream};
pub use momento::StreamMomento;
