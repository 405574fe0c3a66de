use core::fmt;

use crate::error::HeaderError;

/// How the tracks of a file relate to one another, from the header's format
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatType {
    /// Format 0: one track carrying every channel
    SingleMultiChannel,
    /// Format 1: tracks play simultaneously
    Simultaneous,
    /// Format 2: tracks are independent sequences
    SequentiallyIndependent,
}

impl FormatType {
    pub(crate) const fn from_raw(raw: u16) -> Result<Self, HeaderError> {
        match raw {
            0 => Ok(Self::SingleMultiChannel),
            1 => Ok(Self::Simultaneous),
            2 => Ok(Self::SequentiallyIndependent),
            other => Err(HeaderError::InvalidFormat(other)),
        }
    }

    /// The raw format field value
    pub const fn raw(&self) -> u16 {
        match self {
            Self::SingleMultiChannel => 0,
            Self::Simultaneous => 1,
            Self::SequentiallyIndependent => 2,
        }
    }
}

/// The header timing type.
///
/// Either the number of ticks per quarter note or the SMPTE
/// frames/sub-frames alternative, selected by the top bit of the division
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta times count metric ticks per quarter note
    Metric(MetricTicks),
    /// Delta times count SMPTE frame subdivisions
    Smpte(SmpteTiming),
}

impl Timing {
    /// Metric timing. The leading bit is disregarded, so 1-32767.
    pub const fn metric(ticks_per_quarter_note: u16) -> Self {
        Self::Metric(MetricTicks(ticks_per_quarter_note & 0x7FFF))
    }

    /// SMPTE timing in terms of fps and ticks per frame.
    pub const fn smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteTiming {
            fps,
            ticks_per_frame: ticks_per_frame & 0x7F,
        })
    }

    /// Returns Some if the timing is defined as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::Metric(metric) => Some(metric.ticks_per_quarter_note()),
            _ => None,
        }
    }

    pub(crate) const fn from_division(bytes: [u8; 2]) -> Result<Self, HeaderError> {
        if bytes[0] >> 7 == 0 {
            Ok(Self::Metric(MetricTicks(u16::from_be_bytes(bytes))))
        } else {
            let fps = match bytes[0] as i8 {
                -24 => SmpteFps::TwentyFour,
                -25 => SmpteFps::TwentyFive,
                -29 => SmpteFps::TwentyNine,
                -30 => SmpteFps::Thirty,
                other => return Err(HeaderError::InvalidSmpteFps(other)),
            };
            Ok(Self::Smpte(SmpteTiming {
                fps,
                ticks_per_frame: bytes[1],
            }))
        }
    }

    pub(crate) const fn to_division(self) -> [u8; 2] {
        match self {
            Self::Metric(metric) => metric.0.to_be_bytes(),
            Self::Smpte(smpte) => [
                (-(smpte.fps.as_division() as i8)) as u8,
                smpte.ticks_per_frame,
            ],
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric(metric) => {
                write!(
                    f,
                    "{} ticks per quarter note",
                    metric.ticks_per_quarter_note()
                )
            }
            Self::Smpte(smpte) => write!(
                f,
                "{} SMPTE fps, {} ticks per frame",
                smpte.fps.as_division(),
                smpte.ticks_per_frame
            ),
        }
    }
}

/// The `tpqn` timing of a metric file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricTicks(u16);

impl MetricTicks {
    /// Ticks per quarter note, 1-32767
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.0 & 0x7FFF
    }
}

/// The SMPTE timing of a frame-based file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteTiming {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteTiming {
    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

/// The four SMPTE frame rates MIDI can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second (film)
    TwentyFour,
    /// 25 frames per second (PAL/SECAM)
    TwentyFive,
    /// 29.97 frames per second (NTSC drop-frame)
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// The nominal integer rate used in division fields.
    ///
    /// Drop-frame 29.97 reports 30 here, as the header encodes it.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 30,
            Self::Thirty => 30,
        }
    }

    /// The precise rate, including the fractional drop-frame value.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// NTSC drop-frame rate, 30000/1001 fps
const DROP_FRAME: f64 = 30_000. / 1001.;

/// File-level data from the `MThd` chunk: format, declared track count and
/// time division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    num_tracks: u16,
    timing: Timing,
}

impl Header {
    /// Create a header.
    pub const fn new(format: FormatType, num_tracks: u16, timing: Timing) -> Self {
        Self {
            format,
            num_tracks,
            timing,
        }
    }

    /// The format type
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// The declared number of track chunks
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// The time division
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    pub(crate) const fn from_fields(
        format: u16,
        num_tracks: u16,
        division: [u8; 2],
    ) -> Result<Self, HeaderError> {
        let format = match FormatType::from_raw(format) {
            Ok(format) => format,
            Err(e) => return Err(e),
        };
        let timing = match Timing::from_division(division) {
            Ok(timing) => timing,
            Err(e) => return Err(e),
        };
        Ok(Self {
            format,
            num_tracks,
            timing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_division_round_trips() {
        let timing = Timing::metric(96);
        assert_eq!(timing.to_division(), [0x00, 0x60]);
        assert_eq!(Timing::from_division([0x00, 0x60]), Ok(timing));
        assert_eq!(timing.ticks_per_quarter_note(), Some(96));
    }

    #[test]
    fn smpte_division_round_trips() {
        let timing = Timing::smpte(SmpteFps::TwentyFive, 40);
        assert_eq!(timing.to_division(), [0xE7, 40]);
        assert_eq!(Timing::from_division([0xE7, 40]), Ok(timing));
        assert_eq!(timing.ticks_per_quarter_note(), None);
    }

    #[test]
    fn bad_smpte_fps_is_rejected() {
        assert_eq!(
            Timing::from_division([0x9C, 40]),
            Err(HeaderError::InvalidSmpteFps(-100))
        );
    }

    #[test]
    fn formats() {
        assert_eq!(FormatType::from_raw(0), Ok(FormatType::SingleMultiChannel));
        assert_eq!(FormatType::from_raw(1), Ok(FormatType::Simultaneous));
        assert_eq!(
            FormatType::from_raw(2),
            Ok(FormatType::SequentiallyIndependent)
        );
        assert_eq!(FormatType::from_raw(3), Err(HeaderError::InvalidFormat(3)));
    }
}
