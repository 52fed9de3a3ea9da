//! # Momento: exportable snapshot of a completed stream.
//!
//! A [`StreamMomento`] captures the remaining unread bytes of a
//! [`ServerInputStream`](crate::ServerInputStream) once the producer has
//! signalled end-of-stream. It is serializable, so a fully received request
//! body can be persisted or transferred and rehydrated later with
//! [`ServerInputStream::from_momento`](crate::ServerInputStream::from_momento).
//!
//! A momento is only obtainable from a complete stream; exporting while data
//! is still arriving fails with
//! [`StreamError::StateIncomplete`](crate::StreamError).

use serde::{Deserialize, Serialize};

/// Snapshot of the remaining unread bytes of a completed stream.
///
/// Reconstructing a stream from a momento reproduces identical
/// remaining-byte read behavior: reading the reconstruction to end-of-stream
/// yields the same bytes as reading the original from the export point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMomento {
    chunks: Vec<Vec<u8>>,
}

impl StreamMomento {
    pub(crate) fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self { chunks }
    }

    pub(crate) fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Returns the total number of bytes the momento carries.
    pub fn remaining_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::input::{Availability, ReadResult, ServerInputStream};

    fn drain(stream: &ServerInputStream) -> Vec<u8> {
        let mut bytes = Vec::new();
        loop {
            match stream.read() {
                ReadResult::Byte(b) => bytes.push(b),
                ReadResult::EndOfStream => break,
                ReadResult::Pending => panic!("stream unexpectedly incomplete"),
            }
        }
        bytes
    }

    #[test]
    fn export_while_receiving_fails() {
        let stream = ServerInputStream::new();
        stream.input_data(Some(&[1, 2, 3]), true).unwrap();

        let err = stream.export_state().expect_err("still receiving");
        assert_eq!(err.as_label(), "stream_state_incomplete");
    }

    #[test]
    fn round_trip_preserves_remaining_bytes() {
        let stream = ServerInputStream::new();
        stream.input_data(Some(&[1, 2, 3]), true).unwrap();
        stream.input_data(Some(&[4, 5]), false).unwrap();

        // Consume two bytes before exporting.
        assert_eq!(stream.read(), ReadResult::Byte(1));
        assert_eq!(stream.read(), ReadResult::Byte(2));

        let momento = stream.export_state().expect("complete stream");
        assert_eq!(momento.remaining_bytes(), 3);

        let rebuilt = ServerInputStream::from_momento(&momento);
        assert_eq!(rebuilt.available(), Availability::Bytes(3));
        assert_eq!(drain(&rebuilt), vec![3, 4, 5]);

        // Exporting does not consume: the original still reads the same tail.
        assert_eq!(drain(&stream), vec![3, 4, 5]);
    }

    #[test]
    fn reconstructed_streams_are_complete() {
        let stream = ServerInputStream::new();
        stream.input_data(Some(&[9]), false).unwrap();

        let rebuilt = ServerInputStream::from_momento(&stream.export_state().unwrap());
        let err = rebuilt
            .input_data(Some(&[1]), false)
            .expect_err("reconstruction is terminal");
        assert_eq!(err.as_label(), "stream_input_after_end");
    }

    #[test]
    fn fully_consumed_stream_exports_an_empty_momento() {
        let stream = ServerInputStream::new();
        stream.input_data(Some(&[7, 8]), false).unwrap();
        assert_eq!(drain(&stream), vec![7, 8]);

        let momento = stream.export_state().expect("complete stream");
        assert_eq!(momento.remaining_bytes(), 0);

        let rebuilt = ServerInputStream::from_momento(&momento);
        assert_eq!(rebuilt.available(), Availability::EndOfStream);
        assert_eq!(rebuilt.read(), ReadResult::EndOfStream);
    }

    #[test]
    fn momento_survives_serialization() {
        let stream = ServerInputStream::new();
        stream.input_data(Some(&[10, 20]), true).unwrap();
        stream.input_data(Some(&[30]), false).unwrap();

        let momento = stream.export_state().expect("complete stream");
        let json = serde_json::to_string(&momento).expect("serialize");
        let restored: StreamMomento = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, momento);

        let rebuilt = ServerInputStream::from_momento(&restored);
        assert_eq!(drain(&rebuilt), vec![10, 20, 30]);
    }
}
