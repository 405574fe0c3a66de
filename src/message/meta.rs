#![doc = r#"
Typed views over meta-event payloads.

Meta events only exist inside files; on the wire `0xFF` is a system reset.
A malformed payload never fails extraction — it degrades to
[`MetaView::Unknown`] so the raw bytes stay reachable.
"#]

use core::fmt;

use thiserror::Error;

use crate::file::SmpteFps;

use super::MetaKind;

/// A decoded meta-event payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetaView<'a> {
    /// Sequence number of this track/pattern
    SequenceNumber(u16),
    /// One of the text-carrying kinds, with its raw (usually ASCII) bytes
    Text(MetaKind, &'a [u8]),
    /// Channel prefix for the following events
    ChannelPrefix(u8),
    /// Output port hint
    Port(u8),
    /// Last event of a track
    EndOfTrack,
    /// Tempo change
    Tempo(Tempo),
    /// Absolute SMPTE start time of the track
    SmpteOffset(SmpteOffset),
    /// Time signature change
    TimeSignature(TimeSignature),
    /// Key signature change
    KeySignature(KeySignature),
    /// Sequencer-specific payload
    SequencerSpecific(&'a [u8]),
    /// Unrecognized kind or malformed payload, passed through raw
    Unknown(MetaKind, &'a [u8]),
}

impl<'a> MetaView<'a> {
    /// Decode the payload for `kind`. Infallible: anything that does not fit
    /// its kind's shape comes back as [`MetaView::Unknown`].
    pub fn decode(kind: MetaKind, data: &'a [u8]) -> Self {
        use MetaKind::*;
        match kind {
            SequenceNumber if data.len() == 2 => {
                MetaView::SequenceNumber(u16::from_be_bytes([data[0], data[1]]))
            }
            ChannelPrefix if data.len() == 1 => MetaView::ChannelPrefix(data[0]),
            Port if data.len() == 1 => MetaView::Port(data[0]),
            EndOfTrack if data.is_empty() => MetaView::EndOfTrack,
            Tempo if data.len() == 3 => {
                MetaView::Tempo(self::Tempo::from_bytes([data[0], data[1], data[2]]))
            }
            SmpteOffset => match self::SmpteOffset::parse(data) {
                Ok(offset) => MetaView::SmpteOffset(offset),
                Err(_) => MetaView::Unknown(kind, data),
            },
            TimeSignature if data.len() == 4 => MetaView::TimeSignature(self::TimeSignature {
                numerator: data[0],
                denominator_log2: data[1],
                clocks_per_click: data[2],
                thirty_seconds_per_quarter: data[3],
            }),
            KeySignature if data.len() == 2 && data[1] <= 1 => {
                MetaView::KeySignature(self::KeySignature {
                    sharps: data[0] as i8,
                    minor: data[1] == 1,
                })
            }
            SequencerSpecific => MetaView::SequencerSpecific(data),
            kind if kind.is_text() => MetaView::Text(kind, data),
            _ => MetaView::Unknown(kind, data),
        }
    }
}

/// A tempo as microseconds per quarter note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo {
    micros_per_quarter: u32,
}

impl Tempo {
    /// 120 beats per minute, the value assumed when a file carries no tempo
    pub const DEFAULT: Self = Self {
        micros_per_quarter: 500_000,
    };

    /// Create a tempo from microseconds per quarter note (24-bit on the wire)
    pub const fn from_micros_per_quarter(micros: u32) -> Self {
        let micros = if micros > 0xFF_FFFF { 0xFF_FFFF } else { micros };
        Self {
            micros_per_quarter: micros,
        }
    }

    /// Create a tempo from beats per minute
    pub fn from_bpm(bpm: f64) -> Self {
        Self::from_micros_per_quarter((60_000_000.0 / bpm) as u32)
    }

    pub(crate) const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            micros_per_quarter: ((bytes[0] as u32) << 16)
                | ((bytes[1] as u32) << 8)
                | bytes[2] as u32,
        }
    }

    pub(crate) const fn to_bytes(self) -> [u8; 3] {
        [
            (self.micros_per_quarter >> 16) as u8,
            (self.micros_per_quarter >> 8) as u8,
            self.micros_per_quarter as u8,
        ]
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter(&self) -> u32 {
        self.micros_per_quarter
    }

    /// Beats per minute
    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.micros_per_quarter as f64
    }
}

/// A time signature with its two MIDI clock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// The denominator as a power of two (2 means a quarter note)
    pub denominator_log2: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per quarter note
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// A `numerator/denominator` signature with the conventional clock
    /// fields (24 clocks per click, 8 thirty-seconds per quarter).
    pub const fn meter(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator_log2: denominator.trailing_zeros() as u8,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        }
    }

    /// The notated denominator, `1 << denominator_log2`
    pub const fn denominator(&self) -> u16 {
        1 << self.denominator_log2
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator())
    }
}

/// A key signature: accidental count and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Sharps when positive, flats when negative, in `-7..=7`
    pub sharps: i8,
    /// True for a minor key
    pub minor: bool,
}

/// A malformed SMPTE offset payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// The payload was not five bytes
    #[error("smpte offset payload of {0} byte(s), expected 5")]
    Length(usize),
    /// The frame-rate bits were out of range
    #[error("invalid smpte frame rate code {0}")]
    FrameRate(u8),
    /// Hours above 23
    #[error("smpte hour {0} out of range")]
    Hour(u8),
    /// Minutes above 59
    #[error("smpte minute {0} out of range")]
    Minute(u8),
    /// Seconds above 59
    #[error("smpte second {0} out of range")]
    Second(u8),
    /// Fractional frames above 99
    #[error("smpte subframe {0} out of range")]
    Subframe(u8),
}

/// The absolute SMPTE start time a track may declare.
///
/// Payload layout is `0rrhhhhh mm ss fr ff`: frame-rate code and hours packed
/// into the first byte, then minutes, seconds, frames and fractional frames
/// in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// Frame rate the time code counts in
    pub fps: SmpteFps,
    /// Hours (0-23)
    pub hour: u8,
    /// Minutes (0-59)
    pub minute: u8,
    /// Seconds (0-59)
    pub second: u8,
    /// Frame within the second; the valid range depends on `fps`
    pub frame: u8,
    /// Fractional frame in hundredths (0-99)
    pub subframe: u8,
}

impl SmpteOffset {
    /// Parse the five-byte payload, validating each field's range.
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }

        let fps = match data[0] >> 5 {
            0 => SmpteFps::TwentyFour,
            1 => SmpteFps::TwentyFive,
            2 => SmpteFps::TwentyNine,
            3 => SmpteFps::Thirty,
            code => return Err(SmpteError::FrameRate(code)),
        };
        let hour = data[0] & 0x1F;
        if hour > 23 {
            return Err(SmpteError::Hour(hour));
        }
        if data[1] > 59 {
            return Err(SmpteError::Minute(data[1]));
        }
        if data[2] > 59 {
            return Err(SmpteError::Second(data[2]));
        }
        if data[4] > 99 {
            return Err(SmpteError::Subframe(data[4]));
        }

        Ok(Self {
            fps,
            hour,
            minute: data[1],
            second: data[2],
            frame: data[3],
            subframe: data[4],
        })
    }

    pub(crate) const fn to_bytes(self) -> [u8; 5] {
        let code = match self.fps {
            SmpteFps::TwentyFour => 0,
            SmpteFps::TwentyFive => 1,
            SmpteFps::TwentyNine => 2,
            SmpteFps::Thirty => 3,
        };
        [
            (code << 5) | (self.hour & 0x1F),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}
