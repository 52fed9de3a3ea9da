//! # Buffered, backpressure-aware server input stream.
//!
//! [`ServerInputStream`] feeds inbound bytes (pushed by a network layer via
//! [`ServerInputStream::input_data`]) to a consuming pipeline without ever
//! blocking the I/O thread. Reads never block: when no data is queued the
//! caller gets a distinguishable [`ReadResult::Pending`] signal and is
//! expected to park the logical task (not the OS thread) until more bytes
//! arrive.
//!
//! ## Architecture
//! ```text
//! network thread:
//!   input_data(bytes, further) ──► [chunk] ─► [chunk] ─► [chunk]   (append-only)
//!                                      ▲           ▲
//!                                      │           └── browse cursor (non-destructive)
//!                                      └── primary cursor (consuming)
//!
//!   wake: every registered waker (parked AsyncRead callers) on each input
//!   reclaim: chunks behind the slowest cursor are dropped (watermark)
//! ```
//!
//! ## Rules
//! - One-way state machine: receiving → complete; `input_data` after the
//!   terminal call fails with [`StreamError::InputAfterEnd`].
//! - Chunk append order equals read order (FIFO byte stream semantics);
//!   every cursor observes the same chunks in the same order.
//! - All mutable state (primary and every browse cursor) lives behind one
//!   shared lock, acquired for the duration of each operation.
//! - The primary unread count is maintained eagerly (O(1) `available`);
//!   browse streams recount from their cursor on each call.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};

use tokio::io::{AsyncRead, ReadBuf};

use crate::error::StreamError;
use crate::stream::browse::BrowseInputStream;
use crate::stream::chunk::StreamChunk;
use crate::stream::momento::StreamMomento;

/// Outcome of a non-blocking single-byte read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadResult {
    /// The next byte, consumed from (or observed by) the cursor.
    Byte(u8),
    /// No data is queued yet but the producer is still active: retry later.
    Pending,
    /// No data is queued and the producer signalled end-of-stream.
    EndOfStream,
}

/// Outcome of an availability query.
///
/// A trinary signal: a positive count, a transient zero (more data may still
/// arrive), or the permanent end of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Unread bytes ahead of the cursor (`Bytes(0)` = nothing yet, stream
    /// still receiving).
    Bytes(usize),
    /// Nothing ahead of the cursor and the stream is complete.
    EndOfStream,
}

/// Position of a cursor: absolute chunk index plus offset within the chunk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CursorPos {
    chunk: u64,
    offset: usize,
}

/// Shared mutable state of a stream and all of its cursors.
pub(crate) struct StreamState {
    chunks: VecDeque<StreamChunk>,
    /// Absolute index of `chunks[0]`; grows as chunks are reclaimed.
    base: u64,
    head: CursorPos,
    available: usize,
    further_data: bool,
    browsers: HashMap<u64, CursorPos>,
    next_browser: u64,
    wakers: Vec<Waker>,
}

impl StreamState {
    fn new() -> Self {
        Self {
            chunks: VecDeque::new(),
            base: 0,
            head: CursorPos {
                chunk: 0,
                offset: 0,
            },
            available: 0,
            further_data: true,
            browsers: HashMap::new(),
            next_browser: 0,
            wakers: Vec::new(),
        }
    }

    fn chunk_at(&self, index: u64) -> Option<&StreamChunk> {
        index
            .checked_sub(self.base)
            .and_then(|offset| self.chunks.get(offset as usize))
    }

    pub(crate) fn further_data(&self) -> bool {
        self.further_data
    }

    /// Reads one byte at `pos`, returning the advanced position.
    pub(crate) fn read_at(&self, mut pos: CursorPos) -> (CursorPos, ReadResult) {
        loop {
            match self.chunk_at(pos.chunk) {
                Some(chunk) if pos.offset < chunk.len() => {
                    let byte = chunk.as_slice()[pos.offset];
                    pos.offset += 1;
                    return (pos, ReadResult::Byte(byte));
                }
                Some(_) => {
                    pos = CursorPos {
                        chunk: pos.chunk + 1,
                        offset: 0,
                    };
                }
                None => {
                    let result = if self.further_data {
                        ReadResult::Pending
                    } else {
                        ReadResult::EndOfStream
                    };
                    return (pos, result);
                }
            }
        }
    }

    /// Copies as many queued bytes as fit into `buf`, starting at `pos`.
    pub(crate) fn copy_at(&self, mut pos: CursorPos, buf: &mut ReadBuf<'_>) -> (CursorPos, usize) {
        let mut copied = 0;
        while buf.remaining() > 0 {
            match self.chunk_at(pos.chunk) {
                Some(chunk) if pos.offset < chunk.len() => {
                    let bytes = chunk.as_slice();
                    let take = (bytes.len() - pos.offset).min(buf.remaining());
                    buf.put_slice(&bytes[pos.offset..pos.offset + take]);
                    pos.offset += take;
                    copied += take;
                }
                Some(_) => {
                    pos = CursorPos {
                        chunk: pos.chunk + 1,
                        offset: 0,
                    };
                }
                None => break,
            }
        }
        (pos, copied)
    }

    /// Counts the queued bytes ahead of `pos` by walking the chain.
    pub(crate) fn remaining_from(&self, pos: CursorPos) -> usize {
        let mut remaining = 0;
        let mut index = pos.chunk;
        let mut offset = pos.offset;
        while let Some(chunk) = self.chunk_at(index) {
            remaining += chunk.len().saturating_sub(offset);
            offset = 0;
            index += 1;
        }
        remaining
    }

    /// Drops chunks every cursor has fully passed.
    pub(crate) fn reclaim(&mut self) {
        let mut watermark = self.head.chunk;
        for pos in self.browsers.values() {
            watermark = watermark.min(pos.chunk);
        }
        while self.base < watermark && self.chunks.pop_front().is_some() {
            self.base += 1;
        }
    }

    pub(crate) fn register_waker(&mut self, waker: &Waker) {
        self.wakers.push(waker.clone());
    }

    fn wake_all(&mut self) {
        for waker in self.wakers.drain(..) {
            waker.wake();
        }
    }

    pub(crate) fn browse_cursor(&self, id: u64) -> Option<CursorPos> {
        self.browsers.get(&id).copied()
    }

    pub(crate) fn set_browse_cursor(&mut self, id: u64, pos: CursorPos) {
        self.browsers.insert(id, pos);
    }

    pub(crate) fn remove_browse_cursor(&mut self, id: u64) {
        self.browsers.remove(&id);
        self.reclaim();
    }
}

/// Buffered input stream with one consuming cursor and any number of
/// non-destructive browse cursors.
///
/// Cloning yields another handle to the same stream (the producer typically
/// keeps one clone, consumers another); the primary read cursor is shared by
/// all clones.
///
/// ## Example
/// ```
/// use teamvisor::{Availability, ReadResult, ServerInputStream};
///
/// let stream = ServerInputStream::new();
/// stream.input_data(Some(&[10, 20, 30]), true).unwrap();
///
/// assert_eq!(stream.available(), Availability::Bytes(3));
/// assert_eq!(stream.read(), ReadResult::Byte(10));
/// assert_eq!(stream.read(), ReadResult::Byte(20));
/// assert_eq!(stream.read(), ReadResult::Byte(30));
///
/// // Nothing queued, producer still active: retry later, not end-of-stream.
/// assert_eq!(stream.read(), ReadResult::Pending);
///
/// stream.input_data(None, false).unwrap();
/// assert_eq!(stream.read(), ReadResult::EndOfStream);
/// ```
#[derive(Clone)]
pub struct ServerInputStream {
    shared: Arc<Mutex<StreamState>>,
}

impl ServerInputStream {
    /// Creates an empty, receiving stream.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(StreamState::new())),
        }
    }

    /// Reconstructs a complete stream from an exported momento.
    pub fn from_momento(momento: &StreamMomento) -> Self {
        let stream = Self::new();
        {
            let mut state = stream.lock();
            for chunk in momento.chunks() {
                if !chunk.is_empty() {
                    state.available += chunk.len();
                    state.chunks.push_back(StreamChunk::copy_from(chunk));
                }
            }
            state.further_data = false;
        }
        stream
    }

    fn lock(&self) -> MutexGuard<'_, StreamState> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends arrived bytes and/or updates the terminal flag.
    ///
    /// This is the sole write path, called by the producer (e.g. the socket
    /// reader) as bytes arrive; the final call passes
    /// `is_further_data = false`. `None` (or an empty slice) appends no
    /// chunk, which is how a bare end-of-stream signal is delivered.
    ///
    /// All currently parked readers are woken.
    ///
    /// # Errors
    /// [`StreamError::InputAfterEnd`] when a previous call already marked
    /// the stream complete.
    pub fn input_data(
        &self,
        data: Option<&[u8]>,
        is_further_data: bool,
    ) -> Result<(), StreamError> {
        let mut state = self.lock();
        if !state.further_data {
            return Err(StreamError::InputAfterEnd);
        }

        if let Some(bytes) = data {
            if !bytes.is_empty() {
                state.available += bytes.len();
                state.chunks.push_back(StreamChunk::copy_from(bytes));
            }
        }
        state.further_data = is_further_data;
        state.wake_all();
        Ok(())
    }

    /// Consumes and returns the next byte, without ever blocking.
    pub fn read(&self) -> ReadResult {
        let mut state = self.lock();
        let (pos, result) = state.read_at(state.head);
        state.head = pos;
        if matches!(result, ReadResult::Byte(_)) {
            state.available -= 1;
            state.reclaim();
        }
        result
    }

    /// Returns the unread byte count ahead of the primary cursor.
    ///
    /// Maintained eagerly, so this is O(1).
    pub fn available(&self) -> Availability {
        let state = self.lock();
        if state.available == 0 && !state.further_data {
            Availability::EndOfStream
        } else {
            Availability::Bytes(state.available)
        }
    }

    /// Exports the remaining unread bytes of a complete stream.
    ///
    /// # Errors
    /// [`StreamError::StateIncomplete`] while the stream is still receiving.
    pub fn export_state(&self) -> Result<StreamMomento, StreamError> {
        let state = self.lock();
        if state.further_data {
            return Err(StreamError::StateIncomplete);
        }

        let mut chunks = Vec::new();
        let mut pos = state.head;
        while let Some(chunk) = state.chunk_at(pos.chunk) {
            let slice = &chunk.as_slice()[pos.offset.min(chunk.len())..];
            if !slice.is_empty() {
                chunks.push(slice.to_vec());
            }
            pos = CursorPos {
                chunk: pos.chunk + 1,
                offset: 0,
            };
        }
        Ok(StreamMomento::new(chunks))
    }

    /// Creates an independent non-destructive cursor starting at the
    /// stream's **current** head position.
    ///
    /// Browsing neither consumes data nor rewinds: the new cursor observes
    /// exactly what a fresh primary read from this point would, while leaving
    /// the primary stream (and every other browse stream) untouched.
    pub fn create_browse_stream(&self) -> BrowseInputStream {
        let mut state = self.lock();
        let id = state.next_browser;
        state.next_browser += 1;
        let pos = state.head;
        state.set_browse_cursor(id, pos);
        BrowseInputStream::attach(Arc::clone(&self.shared), id)
    }

    /// Observes `(base, queued_chunks)` for reclamation assertions.
    #[cfg(test)]
    pub(crate) fn chunk_window(&self) -> (u64, usize) {
        let state = self.lock();
        (state.base, state.chunks.len())
    }
}

impl Default for ServerInputStream {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncRead for ServerInputStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let mut state = self.lock();
        let (pos, copied) = state.copy_at(state.head, buf);
        if copied > 0 {
            state.head = pos;
            state.available -= copied;
            state.reclaim();
            Poll::Ready(Ok(()))
        } else if !state.further_data {
            // Filling nothing at end-of-stream is the AsyncRead EOF signal.
            Poll::Ready(Ok(()))
        } else {
            state.register_waker(cx.waker());
            Poll::Pending
        }
    }
}
