#![doc = r#"
Message classification.

A status byte maps to exactly one [`MessageKind`]; meta events are classified
a step further from the byte following `0xFF`. Each kind knows how many data
bytes its body carries, which is what both the live decoder and the SMF
reader use to know how much input to consume.
"#]

use core::fmt;

use num_enum::{FromPrimitive, IntoPrimitive};

/// The closed set of message kinds over the four wire families (channel,
/// system common, system real-time, sysex) plus the file-only meta family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// `0x8n`: note released
    NoteOff,
    /// `0x9n`: note pressed (velocity 0 conventionally ends a note)
    NoteOn,
    /// `0xAn`: per-key pressure
    PolyAfterTouch,
    /// `0xBn`: controller moved
    ControlChange,
    /// `0xCn`: program selected
    ProgramChange,
    /// `0xDn`: channel-wide pressure
    AfterTouch,
    /// `0xEn`: 14-bit pitch wheel
    PitchBend,
    /// `0xF0`: system exclusive, terminated by `0xF7`
    SysEx,
    /// `0xF7` event in a file: continuation or escape payload
    SysExEscape,
    /// `0xF1`: MIDI time code quarter frame
    MtcQuarterFrame,
    /// `0xF2`: song position pointer
    SongPositionPointer,
    /// `0xF3`: song select
    SongSelect,
    /// `0xF6`: tune request
    TuneRequest,
    /// `0xF8`: timing clock
    TimingClock,
    /// `0xFA`: start
    Start,
    /// `0xFB`: continue
    Continue,
    /// `0xFC`: stop
    Stop,
    /// `0xFE`: active sensing
    ActiveSensing,
    /// `0xFF` on the wire: system reset
    Reset,
    /// `0xFF` in a file: meta event, sub-classified by its type byte
    Meta(MetaKind),
    /// A status byte outside the defined table
    Unknown(u8),
}

impl MessageKind {
    /// Classify a live status byte.
    ///
    /// `0xFF` classifies as [`Reset`](Self::Reset); file readers classify it
    /// as [`Meta`](Self::Meta) from the following type byte instead.
    pub const fn from_status(status: u8) -> Self {
        use MessageKind::*;
        match status & 0xF0 {
            0x80 => NoteOff,
            0x90 => NoteOn,
            0xA0 => PolyAfterTouch,
            0xB0 => ControlChange,
            0xC0 => ProgramChange,
            0xD0 => AfterTouch,
            0xE0 => PitchBend,
            0xF0 => match status {
                0xF0 => SysEx,
                0xF1 => MtcQuarterFrame,
                0xF2 => SongPositionPointer,
                0xF3 => SongSelect,
                0xF6 => TuneRequest,
                0xF7 => SysExEscape,
                0xF8 => TimingClock,
                0xFA => Start,
                0xFB => Continue,
                0xFC => Stop,
                0xFE => ActiveSensing,
                0xFF => Reset,
                other => Unknown(other),
            },
            _ => Unknown(status),
        }
    }

    /// The number of data bytes following the status byte, or `None` for the
    /// variable-length kinds (sysex, meta, unknown).
    pub const fn fixed_data_len(&self) -> Option<usize> {
        use MessageKind::*;
        match self {
            ProgramChange | AfterTouch | MtcQuarterFrame | SongSelect => Some(1),
            NoteOff | NoteOn | PolyAfterTouch | ControlChange | PitchBend
            | SongPositionPointer => Some(2),
            TuneRequest | TimingClock | Start | Continue | Stop | ActiveSensing | Reset => Some(0),
            SysEx | SysExEscape | Meta(_) | Unknown(_) => None,
        }
    }

    /// True for the seven channel-voice kinds.
    pub const fn is_channel(&self) -> bool {
        use MessageKind::*;
        matches!(
            self,
            NoteOff | NoteOn | PolyAfterTouch | ControlChange | ProgramChange | AfterTouch
                | PitchBend
        )
    }

    /// True for system common kinds (including sysex boundaries).
    pub const fn is_system_common(&self) -> bool {
        use MessageKind::*;
        matches!(
            self,
            SysEx | SysExEscape | MtcQuarterFrame | SongPositionPointer | SongSelect | TuneRequest
        )
    }

    /// True for system real-time kinds.
    pub const fn is_system_realtime(&self) -> bool {
        use MessageKind::*;
        matches!(
            self,
            TimingClock | Start | Continue | Stop | ActiveSensing | Reset
        )
    }

    /// True for file-only meta kinds.
    pub const fn is_meta(&self) -> bool {
        matches!(self, MessageKind::Meta(_))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MessageKind::*;
        match self {
            NoteOff => f.write_str("NoteOff"),
            NoteOn => f.write_str("NoteOn"),
            PolyAfterTouch => f.write_str("PolyAfterTouch"),
            ControlChange => f.write_str("ControlChange"),
            ProgramChange => f.write_str("ProgramChange"),
            AfterTouch => f.write_str("AfterTouch"),
            PitchBend => f.write_str("PitchBend"),
            SysEx => f.write_str("SysEx"),
            SysExEscape => f.write_str("SysExEscape"),
            MtcQuarterFrame => f.write_str("MtcQuarterFrame"),
            SongPositionPointer => f.write_str("SongPositionPointer"),
            SongSelect => f.write_str("SongSelect"),
            TuneRequest => f.write_str("TuneRequest"),
            TimingClock => f.write_str("TimingClock"),
            Start => f.write_str("Start"),
            Continue => f.write_str("Continue"),
            Stop => f.write_str("Stop"),
            ActiveSensing => f.write_str("ActiveSensing"),
            Reset => f.write_str("Reset"),
            Meta(meta) => meta.fmt(f),
            Unknown(status) => write!(f, "Unknown({status:#04X})"),
        }
    }
}

/// The type byte following `0xFF` in a file meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// `00`: sequence number
    SequenceNumber = 0x00,
    /// `01`: free text
    Text = 0x01,
    /// `02`: copyright notice
    Copyright = 0x02,
    /// `03`: sequence/track name
    TrackName = 0x03,
    /// `04`: instrument name
    Instrument = 0x04,
    /// `05`: lyric
    Lyric = 0x05,
    /// `06`: marker
    Marker = 0x06,
    /// `07`: cue point
    CuePoint = 0x07,
    /// `08`: program name
    ProgramName = 0x08,
    /// `09`: device name
    DeviceName = 0x09,
    /// `20`: channel prefix
    ChannelPrefix = 0x20,
    /// `21`: port
    Port = 0x21,
    /// `2F`: end of track
    EndOfTrack = 0x2F,
    /// `51`: tempo in microseconds per quarter note
    Tempo = 0x51,
    /// `54`: SMPTE offset
    SmpteOffset = 0x54,
    /// `58`: time signature
    TimeSignature = 0x58,
    /// `59`: key signature
    KeySignature = 0x59,
    /// `7F`: sequencer-specific payload
    SequencerSpecific = 0x7F,
    /// Any other type byte, preserved for passthrough
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl MetaKind {
    /// True for the text-carrying kinds.
    pub const fn is_text(&self) -> bool {
        use MetaKind::*;
        matches!(
            self,
            Text | Copyright | TrackName | Instrument | Lyric | Marker | CuePoint | ProgramName
                | DeviceName
        )
    }
}

impl fmt::Display for MetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MetaKind::*;
        match self {
            SequenceNumber => f.write_str("SequenceNumber"),
            Text => f.write_str("Text"),
            Copyright => f.write_str("Copyright"),
            TrackName => f.write_str("TrackName"),
            Instrument => f.write_str("Instrument"),
            Lyric => f.write_str("Lyric"),
            Marker => f.write_str("Marker"),
            CuePoint => f.write_str("CuePoint"),
            ProgramName => f.write_str("ProgramName"),
            DeviceName => f.write_str("DeviceName"),
            ChannelPrefix => f.write_str("ChannelPrefix"),
            Port => f.write_str("Port"),
            EndOfTrack => f.write_str("EndOfTrack"),
            Tempo => f.write_str("Tempo"),
            SmpteOffset => f.write_str("SmpteOffset"),
            TimeSignature => f.write_str("TimeSignature"),
            KeySignature => f.write_str("KeySignature"),
            SequencerSpecific => f.write_str("SequencerSpecific"),
            Unknown(byte) => write!(f, "UnknownMeta({byte:#04X})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_statuses_classify_for_every_channel() {
        for channel in 0..16 {
            assert_eq!(
                MessageKind::from_status(0x90 | channel),
                MessageKind::NoteOn
            );
            assert_eq!(
                MessageKind::from_status(0xC0 | channel),
                MessageKind::ProgramChange
            );
        }
    }

    #[test]
    fn arity_table() {
        assert_eq!(MessageKind::NoteOn.fixed_data_len(), Some(2));
        assert_eq!(MessageKind::ProgramChange.fixed_data_len(), Some(1));
        assert_eq!(MessageKind::AfterTouch.fixed_data_len(), Some(1));
        assert_eq!(MessageKind::TuneRequest.fixed_data_len(), Some(0));
        assert_eq!(MessageKind::TimingClock.fixed_data_len(), Some(0));
        assert_eq!(MessageKind::SysEx.fixed_data_len(), None);
    }

    #[test]
    fn undefined_statuses_are_unknown() {
        assert_eq!(MessageKind::from_status(0xF4), MessageKind::Unknown(0xF4));
        assert_eq!(MessageKind::from_status(0xF5), MessageKind::Unknown(0xF5));
        assert_eq!(MessageKind::from_status(0xF9), MessageKind::Unknown(0xF9));
        assert_eq!(MessageKind::from_status(0xFD), MessageKind::Unknown(0xFD));
        assert_eq!(MessageKind::from_status(0x42), MessageKind::Unknown(0x42));
    }

    #[test]
    fn meta_kind_catch_all() {
        assert_eq!(MetaKind::from(0x51), MetaKind::Tempo);
        assert_eq!(MetaKind::from(0x2F), MetaKind::EndOfTrack);
        assert_eq!(MetaKind::from(0x60), MetaKind::Unknown(0x60));
        assert_eq!(u8::from(MetaKind::TimeSignature), 0x58);
    }
}
