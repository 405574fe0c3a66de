#![doc = r#"
In-memory representation of a standard MIDI file.
"#]

mod builder;
pub use builder::*;

mod header;
pub use header::*;

mod track;
pub use track::*;

use alloc::vec::Vec;

use crate::{
    FileError,
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind, ReaderOptions, Warning},
    writer::{self, WriterOptions},
};

/// A parsed (or to-be-written) standard MIDI file: a [`Header`] and its
/// [`Track`]s, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SmfFile<'a> {
    header: Header,
    tracks: Vec<Track<'a>>,
    warnings: Vec<Warning>,
}

impl<'a> SmfFile<'a> {
    /// Parse a complete byte stream into a file struct.
    pub fn parse(bytes: &'a [u8]) -> ReadResult<Self> {
        Self::parse_with_options(bytes, ReaderOptions::new())
    }

    /// Parse with explicit [`ReaderOptions`].
    pub fn parse_with_options(bytes: &'a [u8], options: ReaderOptions) -> ReadResult<Self> {
        let mut reader = Reader::with_options(bytes, options);
        let mut builder = SmfFileBuilder::new();

        loop {
            let event = reader.read_event()?;
            if event.is_finished() {
                break;
            }
            builder.handle_event(event).map_err(|e| {
                ReaderError::new(
                    reader.buffer_position(),
                    ReaderErrorKind::ParseError(e.into()),
                )
            })?;
        }

        let warnings = reader.warnings().to_vec();
        let mut file = builder.build().map_err(|e| {
            ReaderError::new(
                reader.buffer_position(),
                ReaderErrorKind::ParseError(e.into()),
            )
        })?;
        file.warnings = warnings;
        Ok(file)
    }

    /// Start an empty file for incremental building.
    pub const fn new(header: Header) -> Self {
        Self {
            header,
            tracks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) const fn from_parts(header: Header, tracks: Vec<Track<'a>>) -> Self {
        Self {
            header,
            tracks,
            warnings: Vec::new(),
        }
    }

    /// The file header.
    ///
    /// Its declared track count is what the source stream declared; the
    /// authoritative count for a built file is [`tracks`](Self::tracks).
    pub const fn header(&self) -> Header {
        self.header
    }

    /// The tracks in file order
    pub fn tracks(&self) -> &[Track<'a>] {
        &self.tracks
    }

    /// Append a track.
    pub fn add_track(&mut self, track: Track<'a>) {
        self.tracks.push(track);
    }

    /// Non-fatal conditions noticed while parsing (missing end-of-track
    /// events, fewer tracks than declared).
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Detach from the source buffer
    pub fn into_owned(self) -> SmfFile<'static> {
        SmfFile {
            header: self.header,
            tracks: self.tracks.into_iter().map(Track::into_owned).collect(),
            warnings: self.warnings,
        }
    }

    /// Serialize back to the chunked binary layout with running-status
    /// compression enabled.
    ///
    /// Feeding the output back into [`parse`](Self::parse) reconstructs an
    /// equivalent event sequence.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_with_options(WriterOptions::new())
    }

    /// Serialize with explicit [`WriterOptions`].
    pub fn to_bytes_with_options(&self, options: WriterOptions) -> Vec<u8> {
        let header = Header::new(
            self.header.format(),
            self.tracks.len() as u16,
            self.header.timing(),
        );
        let mut out = Vec::new();
        out.extend_from_slice(&writer::write_header(&header));
        for track in &self.tracks {
            out.extend_from_slice(&writer::write_track(track, options));
        }
        out
    }
}
