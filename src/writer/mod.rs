#![doc = r#"
Serializing messages back into the chunked binary layout.

A track chunk's four-byte length prefix precedes content whose size is only
known after every event has been encoded, so [`TrackEncoder`] buffers the
fully encoded body and emits the prefix at [`finish`](TrackEncoder::finish).
Running-status compression is applied while encoding unless disabled.
"#]

use alloc::vec::Vec;

use crate::{
    Header, Message, MessageKind, MetaKind, RunningStatus, file::Track, vlq,
};

/// Options recognized by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    pub(crate) running_status: bool,
}

impl WriterOptions {
    /// The defaults: running-status compression enabled.
    pub const fn new() -> Self {
        Self {
            running_status: true,
        }
    }

    /// Always emit full status bytes.
    ///
    /// Costs bytes but keeps every event self-contained, which matters for
    /// byte-for-byte verbosity or lossy transports.
    pub const fn disable_running_status(mut self) -> Self {
        self.running_status = false;
        self
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize the fixed 14-byte `MThd` chunk.
pub fn write_header(header: &Header) -> [u8; 14] {
    let format = header.format().raw().to_be_bytes();
    let num_tracks = header.num_tracks().to_be_bytes();
    let division = header.timing().to_division();
    [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, format[0], format[1], num_tracks[0], num_tracks[1],
        division[0], division[1],
    ]
}

/// Serialize one track into a complete length-prefixed `MTrk` chunk.
///
/// An end-of-track event is appended when the track does not already end
/// with one.
pub fn write_track(track: &Track<'_>, options: WriterOptions) -> Vec<u8> {
    let mut encoder = TrackEncoder::new(options);
    for event in track.events() {
        encoder.push(event.delta(), event.message());
    }
    encoder.finish()
}

/// Streaming encoder for one track body.
pub struct TrackEncoder {
    body: Vec<u8>,
    running_status: RunningStatus,
    options: WriterOptions,
    ends_with_end_of_track: bool,
}

impl TrackEncoder {
    /// Start an empty track body.
    pub const fn new(options: WriterOptions) -> Self {
        Self {
            body: Vec::new(),
            running_status: RunningStatus::new(),
            options,
            ends_with_end_of_track: false,
        }
    }

    /// Append one delta-timed message to the body.
    pub fn push(&mut self, delta: u32, message: &Message<'_>) {
        vlq::encode(delta, &mut self.body);
        let bytes = message.bytes();
        self.ends_with_end_of_track =
            message.kind() == MessageKind::Meta(MetaKind::EndOfTrack);

        match bytes[0] {
            0xFF if bytes.len() >= 2 => {
                // meta: type byte, then a length-prefixed payload
                self.running_status.clear();
                self.body.push(0xFF);
                self.body.push(bytes[1]);
                vlq::encode(bytes.len() as u32 - 2, &mut self.body);
                self.body.extend_from_slice(&bytes[2..]);
            }
            0xF0 | 0xF7 => {
                // sysex and escape spans are length-prefixed in files
                self.running_status.clear();
                self.body.push(bytes[0]);
                vlq::encode(bytes.len() as u32 - 1, &mut self.body);
                self.body.extend_from_slice(&bytes[1..]);
            }
            status => {
                let emit_status =
                    !self.options.running_status || self.running_status.should_emit(status);
                if emit_status {
                    self.body.push(status);
                }
                self.body.extend_from_slice(&bytes[1..]);
            }
        }
    }

    /// Close the body and emit the complete `MTrk` chunk.
    pub fn finish(mut self) -> Vec<u8> {
        if !self.ends_with_end_of_track {
            self.push(0, &Message::end_of_track());
        }
        let mut chunk = Vec::with_capacity(self.body.len() + 8);
        chunk.extend_from_slice(b"MTrk");
        chunk.extend_from_slice(&(self.body.len() as u32).to_be_bytes());
        chunk.extend_from_slice(&self.body);
        chunk
    }
}
