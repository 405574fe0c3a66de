#![doc = r#"
Pull reading of standard MIDI files.

A [`Reader`] walks the chunked layout one event at a time:

```text
ExpectHeader -> ExpectChunk -> (ExpectTrackEvent)* -> Done
```

Every call to [`Reader::read_event`] returns the next [`FileEvent`]: the
header, the start of a track chunk, one delta-timed track event with its
[`Position`], a skipped unknown chunk, or the [`FileEvent::Finished`]
sentinel once the declared track count has been consumed. The sequence is
lazy and consumed once; all mutable state (cursor, per-track running status,
tick accumulator) lives in the reader itself.

Failures are terminal for the parse — everything already yielded remains
valid, which is how partial results survive a truncated file.
"#]

mod error;
pub use error::*;

mod options;
pub use options::*;

use alloc::vec::Vec;

use crate::{
    ChunkError, Header, Message, MessageKind, ParseError, RunningStatus, TrackError, vlq,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    ExpectHeader,
    ExpectChunk,
    ExpectTrackEvent,
    Done,
}

/// An event pulled out of an SMF byte stream.
#[derive(Debug, Clone, PartialEq)]
pub enum FileEvent<'a> {
    /// The `MThd` chunk
    Header(Header),
    /// An `MTrk` chunk opened
    Track(TrackHeader),
    /// One delta-timed event of the current track
    TrackEvent(PositionedEvent<'a>),
    /// A chunk of unrecognized type, skipped by its declared length
    Unknown(UnknownChunk<'a>),
    /// Clean end: every declared track has been consumed
    Finished,
}

impl FileEvent<'_> {
    /// True for the [`Finished`](FileEvent::Finished) sentinel.
    pub const fn is_finished(&self) -> bool {
        matches!(self, FileEvent::Finished)
    }
}

/// The boundary data of an `MTrk` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackHeader {
    index: u16,
    len: u32,
}

impl TrackHeader {
    /// The zero-based index of this track in file order
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// The declared byte length of the track body
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// True if the track body is empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A chunk the reader does not recognize, preserved raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownChunk<'a> {
    chunk_type: [u8; 4],
    data: &'a [u8],
}

impl<'a> UnknownChunk<'a> {
    /// The four-byte chunk type
    pub const fn chunk_type(&self) -> [u8; 4] {
        self.chunk_type
    }

    /// The chunk body
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Read-only position metadata attached to every decoded track event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Zero-based track index in file order
    pub track: u16,
    /// Absolute tick offset since the start of the track
    pub tick: u32,
    /// The original delta of the event
    pub delta: u32,
}

/// A decoded track event together with its [`Position`].
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEvent<'a> {
    position: Position,
    message: Message<'a>,
}

impl<'a> PositionedEvent<'a> {
    /// The position metadata
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Ticks since the previous event in this track
    pub const fn delta(&self) -> u32 {
        self.position.delta
    }

    /// Absolute ticks since the start of this track
    pub const fn tick(&self) -> u32 {
        self.position.tick
    }

    /// Zero-based track index
    pub const fn track(&self) -> u16 {
        self.position.track
    }

    /// The decoded message
    pub const fn message(&self) -> &Message<'a> {
        &self.message
    }

    /// Split into position and message
    pub fn into_parts(self) -> (Position, Message<'a>) {
        (self.position, self.message)
    }
}

/// A non-fatal condition noticed during a parse, reported once the stream
/// ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Warning {
    /// A track's byte length ran out before an end-of-track meta event
    #[error("track {track} ended without an end-of-track event")]
    MissingEndOfTrack {
        /// The track missing its terminator
        track: u16,
    },
    /// The input ended with declared tracks still unread
    #[error("input ended with {expected} declared track(s) unread")]
    MissingTracks {
        /// How many tracks were still expected
        expected: u16,
    },
}

/// A pull reader over the bytes of a standard MIDI file.
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    options: ReaderOptions,
    state: ReaderState,
    remaining_tracks: u16,
    next_track_index: u16,
    track_index: u16,
    /// End of the current track chunk; `None` for a resumed track of
    /// unknown length, which runs to its end-of-track event.
    chunk_end: Option<usize>,
    tick: u32,
    running_status: RunningStatus,
    saw_end_of_track: bool,
    warnings: Vec<Warning>,
    fused: bool,
}

impl<'a> Reader<'a> {
    /// Read from the start of an SMF byte stream.
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self::with_options(bytes, ReaderOptions::new())
    }

    /// Read with explicit [`ReaderOptions`], including resume seeding.
    pub const fn with_options(bytes: &'a [u8], options: ReaderOptions) -> Self {
        let (state, remaining_tracks, next_track_index) = match options.resume {
            None => (ReaderState::ExpectHeader, 0, 0),
            Some(Resume::PostHeader(tracks)) => (ReaderState::ExpectChunk, tracks.get(), 0),
            Some(Resume::InsideTrack(tracks)) => {
                (ReaderState::ExpectTrackEvent, tracks.get() - 1, 1)
            }
        };
        Self {
            bytes,
            pos: 0,
            options,
            state,
            remaining_tracks,
            next_track_index,
            track_index: 0,
            chunk_end: None,
            tick: 0,
            running_status: RunningStatus::new(),
            saw_end_of_track: false,
            warnings: Vec::new(),
            fused: false,
        }
    }

    /// How many source bytes have been consumed.
    pub const fn buffer_position(&self) -> usize {
        self.pos
    }

    /// The non-fatal conditions noticed so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Pull the next event.
    ///
    /// Once every declared track has been read this returns
    /// [`FileEvent::Finished`] — a success sentinel, not an error — on this
    /// and every subsequent call.
    pub fn read_event(&mut self) -> ReadResult<FileEvent<'a>> {
        loop {
            match self.state {
                ReaderState::ExpectHeader => return self.read_header_chunk(),
                ReaderState::ExpectChunk => {
                    if self.remaining_tracks == 0 {
                        self.state = ReaderState::Done;
                        return Ok(FileEvent::Finished);
                    }
                    if self.pos >= self.bytes.len() {
                        self.warnings.push(Warning::MissingTracks {
                            expected: self.remaining_tracks,
                        });
                        self.state = ReaderState::Done;
                        return Ok(FileEvent::Finished);
                    }
                    return self.read_chunk_header();
                }
                ReaderState::ExpectTrackEvent => {
                    if self.pos >= self.track_limit() {
                        self.close_track()?;
                        continue;
                    }
                    return self.read_track_event();
                }
                ReaderState::Done => return Ok(FileEvent::Finished),
            }
        }
    }

    fn take(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(ReaderError::oob(self.bytes.len()));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_header_chunk(&mut self) -> ReadResult<FileEvent<'a>> {
        let start = self.pos;
        let magic = self.take(4)?;
        if magic != b"MThd" {
            let magic = [magic[0], magic[1], magic[2], magic[3]];
            return Err(ReaderError::parse_error(
                start,
                crate::HeaderError::InvalidMagic(magic).into(),
            ));
        }
        let len = be_u32(self.take(4)?);
        if len < 6 {
            return Err(ReaderError::parse_error(
                start,
                crate::HeaderError::UnexpectedLength(len).into(),
            ));
        }
        let fields = self.take(6)?;
        let format = u16::from_be_bytes([fields[0], fields[1]]);
        let num_tracks = u16::from_be_bytes([fields[2], fields[3]]);
        let division = [fields[4], fields[5]];
        // longer headers are legal; skip what we do not know
        self.take(len as usize - 6)?;

        let header = Header::from_fields(format, num_tracks, division)
            .map_err(|e| ReaderError::parse_error(start, e.into()))?;
        self.remaining_tracks = num_tracks;
        self.state = ReaderState::ExpectChunk;
        Ok(FileEvent::Header(header))
    }

    fn read_chunk_header(&mut self) -> ReadResult<FileEvent<'a>> {
        let start = self.pos;
        let magic = self.take(4)?;
        let len = be_u32(self.take(4)?);
        match magic {
            b"MTrk" => {
                self.chunk_end = Some(self.pos + len as usize);
                self.track_index = self.next_track_index;
                self.next_track_index += 1;
                self.remaining_tracks -= 1;
                self.tick = 0;
                self.running_status.clear();
                self.saw_end_of_track = false;
                self.state = ReaderState::ExpectTrackEvent;
                Ok(FileEvent::Track(TrackHeader {
                    index: self.track_index,
                    len,
                }))
            }
            b"MThd" => Err(ReaderError::parse_error(
                start,
                ChunkError::DuplicateHeader.into(),
            )),
            other => {
                let chunk_type = [other[0], other[1], other[2], other[3]];
                if self.options.fail_on_unknown_chunks {
                    return Err(ReaderError::parse_error(
                        start,
                        ChunkError::UnknownType(chunk_type).into(),
                    ));
                }
                let remaining = self.bytes.len() - self.pos;
                if len as usize > remaining {
                    return Err(ReaderError::parse_error(
                        start,
                        ChunkError::Truncated {
                            wanted: len as usize,
                            remaining,
                        }
                        .into(),
                    ));
                }
                let data = &self.bytes[self.pos..self.pos + len as usize];
                self.pos += len as usize;
                Ok(FileEvent::Unknown(UnknownChunk { chunk_type, data }))
            }
        }
    }

    const fn track_limit(&self) -> usize {
        match self.chunk_end {
            Some(end) => {
                if end < self.bytes.len() {
                    end
                } else {
                    self.bytes.len()
                }
            }
            None => self.bytes.len(),
        }
    }

    fn close_track(&mut self) -> ReadResult<()> {
        if let Some(end) = self.chunk_end
            && end > self.bytes.len()
        {
            // the declared length ran past the input
            return Err(self.track_err(
                ChunkError::Truncated {
                    wanted: end - self.pos,
                    remaining: 0,
                }
                .into(),
            ));
        }
        if !self.saw_end_of_track {
            self.warnings.push(Warning::MissingEndOfTrack {
                track: self.track_index,
            });
        }
        self.chunk_end = None;
        self.state = ReaderState::ExpectChunk;
        Ok(())
    }

    fn track_err(&self, error: ParseError) -> ReaderError {
        ReaderError::in_track(self.pos, self.track_index, error.into())
    }

    fn read_track_vlq(&mut self) -> ReadResult<u32> {
        let limit = self.track_limit();
        let (value, consumed) = vlq::decode(&self.bytes[self.pos..limit])
            .map_err(|e| self.track_err(e.into()))?;
        self.pos += consumed;
        Ok(value)
    }

    fn take_in_track(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        let remaining = self.track_limit() - self.pos;
        if n > remaining {
            return Err(self.track_err(
                ChunkError::Truncated {
                    wanted: n,
                    remaining,
                }
                .into(),
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_track_event(&mut self) -> ReadResult<FileEvent<'a>> {
        let delta = self.read_track_vlq()?;

        let limit = self.track_limit();
        if self.pos >= limit {
            return Err(self.track_err(TrackError::TruncatedMessage.into()));
        }
        let first = self.bytes[self.pos];

        let message = match first {
            0xFF => {
                self.pos += 1;
                let meta_type = self.take_in_track(1)?[0];
                let len = self.read_track_vlq()? as usize;
                let payload = self.take_in_track(len)?;
                self.running_status.clear();
                if meta_type == 0x2F {
                    self.saw_end_of_track = true;
                    if self.chunk_end.is_none() {
                        // resumed track of unknown length ends here
                        self.state = ReaderState::ExpectChunk;
                    }
                }
                let mut bytes = Vec::with_capacity(len + 2);
                bytes.push(0xFF);
                bytes.push(meta_type);
                bytes.extend_from_slice(payload);
                Message::from_bytes(bytes)
            }
            0xF0 | 0xF7 => {
                self.pos += 1;
                let len = self.read_track_vlq()? as usize;
                let payload = self.take_in_track(len)?;
                self.running_status.clear();
                let mut bytes = Vec::with_capacity(len + 1);
                bytes.push(first);
                bytes.extend_from_slice(payload);
                Message::from_bytes(bytes)
            }
            _ => {
                let (status, consumed_status) = self
                    .running_status
                    .resolve(first)
                    .map_err(|e| self.track_err(e.into()))?;
                let kind = MessageKind::from_status(status);
                let Some(need) = kind.fixed_data_len() else {
                    return Err(self.track_err(TrackError::UndefinedStatus(status).into()));
                };
                if consumed_status {
                    let start = self.pos;
                    self.pos += 1;
                    let data = self.take_in_track(need)?;
                    match normalized_note_off(&self.options, kind, status, data) {
                        Some(rewritten) => rewritten,
                        None => Message::from_bytes(&self.bytes[start..self.pos]),
                    }
                } else {
                    let data = self.take_in_track(need)?;
                    match normalized_note_off(&self.options, kind, status, data) {
                        Some(rewritten) => rewritten,
                        None => {
                            let mut bytes = Vec::with_capacity(need + 1);
                            bytes.push(status);
                            bytes.extend_from_slice(data);
                            Message::from_bytes(bytes)
                        }
                    }
                }
            }
        };

        self.tick = self.tick.saturating_add(delta);
        Ok(FileEvent::TrackEvent(PositionedEvent {
            position: Position {
                track: self.track_index,
                tick: self.tick,
                delta,
            },
            message,
        }))
    }
}

/// The default reader rewrites a zero-velocity note-on into the note-off it
/// stands for; pedantic reading preserves the original bytes. The retained
/// running status is not touched either way — on the wire the event still
/// carried a note-on status.
fn normalized_note_off(
    options: &ReaderOptions,
    kind: MessageKind,
    status: u8,
    data: &[u8],
) -> Option<Message<'static>> {
    if options.pedantic_note_off || kind != MessageKind::NoteOn || data[1] != 0 {
        return None;
    }
    Some(Message::from_bytes(alloc::vec![
        0x80 | (status & 0x0F),
        data[0],
        0x00,
    ]))
}

const fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

impl<'a> Iterator for Reader<'a> {
    type Item = ReadResult<FileEvent<'a>>;

    /// Yields events until [`FileEvent::Finished`] or the first error,
    /// after which the iterator is fused.
    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        match self.read_event() {
            Ok(FileEvent::Finished) => {
                self.fused = true;
                None
            }
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                self.fused = true;
                Some(Err(e))
            }
        }
    }
}
