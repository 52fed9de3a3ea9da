//! Consume a buffered input stream while an audit cursor browses the same
//! bytes non-destructively.
//!
//! Run with: `cargo run --example stream_browse`

use teamvisor::{Availability, ReadResult, ServerInputStream};

fn main() {
    let stream = ServerInputStream::new();

    // The network layer pushes bytes as they arrive.
    stream.input_data(Some(b"GET /index"), true).expect("receiving");

    // An interceptor attaches a browse cursor before the handler runs.
    let audit = stream.create_browse_stream();

    // The handler consumes destructively...
    let mut consumed = Vec::new();
    while let ReadResult::Byte(byte) = stream.read() {
        consumed.push(byte);
    }

    // ...while the audit cursor observes the same bytes independently.
    let mut audited = Vec::new();
    while let ReadResult::Byte(byte) = audit.read() {
        audited.push(byte);
    }
    assert_eq!(consumed, audited);
    println!("audited {} bytes: {:?}", audited.len(), String::from_utf8_lossy(&audited));

    // More data trickles in, then the terminal signal.
    stream.input_data(Some(b" HTTP/1.1"), false).expect("terminal");
    assert_eq!(stream.available(), Availability::Bytes(9));

    let mut tail = Vec::new();
    while let ReadResult::Byte(byte) = stream.read() {
        tail.push(byte);
    }
    assert_eq!(stream.available(), Availability::EndOfStream);
    println!("tail: {:?}", String::from_utf8_lossy(&tail));
}
