//! Immutable byte chunks forming a stream's append-only chain.

use std::sync::Arc;

/// One arrived byte range.
///
/// Chunks are only ever appended to a stream and never mutated afterwards,
/// which is what lets any number of cursors traverse the chain without
/// copying or interfering.
#[derive(Clone, Debug)]
pub(crate) struct StreamChunk {
    bytes: Arc<[u8]>,
}

impl StreamChunk {
    /// Copies the given range into a new immutable chunk.
    pub(crate) fn copy_from(data: &[u8]) -> Self {
        Self {
            bytes: Arc::from(data),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
