//! # Browse streams: non-destructive secondary read cursors.
//!
//! A [`BrowseInputStream`] traverses the same immutable chunk chain as its
//! parent [`ServerInputStream`](crate::ServerInputStream) with its own
//! independent cursor. Multiple browse streams coexist without interfering
//! with each other or with the primary stream's consumption: chunks are only
//! ever appended, never mutated, and each cursor tracks its own position.
//!
//! A browse stream's only interactions with the primary stream are its
//! initial cursor seed (the primary's head position at creation time) and
//! resumption: a browse reader parked past the current tail is woken when the
//! producer next calls `input_data`.
//!
//! This lets a single inbound request body be consumed destructively by the
//! application handler while a logging or signature-validation interceptor
//! independently inspects the same bytes, without buffering the body twice.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use crate::stream::input::{Availability, ReadResult, StreamState};

/// Independent non-destructive cursor over a stream's chunk chain.
///
/// Created by
/// [`ServerInputStream::create_browse_stream`](crate::ServerInputStream::create_browse_stream);
/// starts at the primary cursor's position at creation time ("don't destroy,
/// but don't rewind either").
pub struct BrowseInputStream {
    shared: Arc<Mutex<StreamState>>,
    id: u64,
}

impl BrowseInputStream {
    pub(crate) fn attach(shared: Arc<Mutex<StreamState>>, id: u64) -> Self {
        Self { shared, id }
    }

    fn lock(&self) -> MutexGuard<'_, StreamState> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Observes and advances past the next byte, without ever blocking and
    /// without consuming it from the primary stream.
    pub fn read(&self) -> ReadResult {
        let mut state = self.lock();
        let Some(pos) = state.browse_cursor(self.id) else {
            return ReadResult::EndOfStream;
        };

        let (pos, result) = state.read_at(pos);
        state.set_browse_cursor(self.id, pos);
        if matches!(result, ReadResult::Byte(_)) {
            state.reclaim();
        }
        result
    }

    /// Returns the byte count ahead of this cursor.
    ///
    /// Recounted from the cursor on each call (the chain walk), unlike the
    /// primary stream's eagerly maintained count.
    pub fn available(&self) -> Availability {
        let state = self.lock();
        let Some(pos) = state.browse_cursor(self.id) else {
            return Availability::EndOfStream;
        };

        let remaining = state.remaining_from(pos);
        if remaining == 0 && !state.further_data() {
            Availability::EndOfStream
        } else {
            Availability::Bytes(remaining)
        }
    }
}

impl Drop for BrowseInputStream {
    fn drop(&mut self) {
        // A departing cursor may unblock chunk reclamation.
        self.lock().remove_browse_cursor(self.id);
    }
}

impl AsyncRead for BrowseInputStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let mut state = self.lock();
        let Some(pos) = state.browse_cursor(self.id) else {
            return Poll::Ready(Ok(()));
        };

        let (pos, copied) = state.copy_at(pos, buf);
        if copied > 0 {
            state.set_browse_cursor(self.id, pos);
            state.reclaim();
            Poll::Ready(Ok(()))
        } else if !state.further_data() {
            Poll::Ready(Ok(()))
        } else {
            state.register_waker(cx.waker());
            Poll::Pending
        }
    }
}
