use core::fmt;

use crate::ParseError;
use thiserror::Error;

#[doc = r#"
An error produced while reading a standard MIDI file, tagged with the byte
offset (and, inside a track, the track index) where it occurred.
"#]
#[derive(Debug)]
pub struct ReaderError {
    position: usize,
    track: Option<u16>,
    pub(crate) kind: ReaderErrorKind,
}

impl core::error::Error for ReaderError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.track {
            Some(track) => write!(
                f,
                "Reading at position {} in track {}, {}",
                self.position, track, self.kind
            ),
            None => write!(f, "Reading at position {}, {}", self.position, self.kind),
        }
    }
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// Reading out of bounds.
    #[error("Read out of bounds!")]
    OutOfBounds,
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self {
            position,
            track: None,
            kind,
        }
    }

    /// Create a reader error that occurred inside a track
    pub const fn in_track(position: usize, track: u16, kind: ReaderErrorKind) -> Self {
        Self {
            position,
            track: Some(track),
            kind,
        }
    }

    /// True if out of bounds or unexpected end of file
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the track the reader was inside, if any.
    pub const fn track(&self) -> Option<u16> {
        self.track
    }

    /// Create a new invalid data error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            track: None,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            track: None,
            kind: ReaderErrorKind::OutOfBounds,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
