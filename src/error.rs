#![doc = r#"
Parse errors shared by the live and file codecs.

Low-level failures bubble up unchanged; the SMF [`Reader`](crate::reader::Reader)
wraps them with the byte position where they occurred.
"#]

use thiserror::Error;

/// Any error produced while decoding MIDI bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The file header chunk is malformed
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// A chunk boundary is malformed
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// An event inside a track is malformed
    #[error("Track: {0}")]
    Track(#[from] TrackError),
    /// The chunks do not assemble into a file
    #[error("File: {0}")]
    File(#[from] FileError),
    /// A data byte had its high bit set
    #[error("Invalid data byte {0:#04X}")]
    InvalidDataByte(u8),
}

/// The `MThd` chunk could not be read. Fatal: the input is not SMF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The first four bytes were not `MThd`
    #[error("invalid magic {0:02X?}, expected MThd")]
    InvalidMagic([u8; 4]),
    /// The declared header length is below the fixed six bytes
    #[error("declared header length {0} is shorter than 6")]
    UnexpectedLength(u32),
    /// The format field was not 0, 1 or 2
    #[error("unknown format {0}")]
    InvalidFormat(u16),
    /// The division field declared an SMPTE rate other than -24/-25/-29/-30
    #[error("invalid smpte division {0}")]
    InvalidSmpteFps(i8),
}

/// A chunk boundary could not be honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// A chunk type other than `MThd`/`MTrk` under the strict option
    #[error("unknown chunk type {0:02X?}")]
    UnknownType([u8; 4]),
    /// The input ended before the chunk's declared length
    #[error("chunk truncated: {wanted} byte(s) declared, {remaining} available")]
    Truncated {
        /// Bytes still owed by the declared length
        wanted: usize,
        /// Bytes actually left in the input
        remaining: usize,
    },
    /// A second `MThd` appeared
    #[error("duplicate header chunk")]
    DuplicateHeader,
}

/// An event inside a track chunk could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrackError {
    /// A variable-length quantity ran past the end of input
    #[error("variable-length quantity truncated")]
    TruncatedVarLen,
    /// A variable-length quantity exceeded the four-byte SMF maximum
    #[error("variable-length quantity longer than four bytes")]
    OverlongVarLen,
    /// A data byte appeared with no running status to resolve it
    #[error("data byte {0:#04X} with no running status")]
    UnexpectedDataByte(u8),
    /// An undefined status byte (0xF4/0xF5) appeared
    #[error("undefined status byte {0:#04X}")]
    UndefinedStatus(u8),
    /// A status byte appeared where a data byte was expected
    #[error("status byte {0:#04X} interrupted an unfinished message")]
    UnexpectedStatusByte(u8),
    /// The input ended inside a message body
    #[error("message truncated")]
    TruncatedMessage,
}

/// The chunk sequence does not form a usable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FileError {
    /// No `MThd` chunk was seen
    #[error("no header chunk")]
    NoHeader,
    /// A second header arrived while assembling a file
    #[error("duplicate header")]
    DuplicateHeader,
    /// A track event arrived before any `MTrk` chunk
    #[error("track event outside a track chunk")]
    EventOutsideTrack,
}
