#![doc = r#"
The byte-backed MIDI message and its typed views.

A [`Message`] owns or borrows exactly the bytes of one complete event: a
status byte plus its data bytes, a full sysex span, or (in file context) a
meta span. Running status is always resolved *before* a message is built, so
the first byte of a message always has its high bit set.

Extraction never consumes the message and never allocates: [`Message::view`]
pattern-matches the bytes into a [`MessageView`], and the `get_*` helpers
answer the common "is it this kind, and what are its fields" questions the
same way the constructors built them.
"#]

mod kind;
pub use kind::*;

mod meta;
pub use meta::*;

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

use crate::bytes::{Channel, DataByte, PitchBend, split_status};

/// One complete MIDI event, self-describing from its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> Message<'a> {
    /// Wrap raw event bytes.
    ///
    /// The bytes must already be a complete event with running status
    /// resolved; the decoders uphold this before constructing messages.
    pub fn from_bytes<B>(bytes: B) -> Self
    where
        B: Into<Cow<'a, [u8]>>,
    {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The underlying bytes of the message
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The status byte
    pub fn status(&self) -> u8 {
        self.bytes[0]
    }

    /// Detach the message from its source buffer
    pub fn into_owned(self) -> Message<'static> {
        Message {
            bytes: Cow::Owned(self.bytes.into_owned()),
        }
    }

    /// Classify the message from its bytes alone.
    ///
    /// A lone `0xFF` byte is a live system reset; `0xFF` followed by a type
    /// byte is a file meta event.
    pub fn kind(&self) -> MessageKind {
        if self.bytes[0] == 0xFF && self.bytes.len() >= 2 {
            MessageKind::Meta(MetaKind::from(self.bytes[1]))
        } else {
            MessageKind::from_status(self.bytes[0])
        }
    }

    /// True if the message classifies as `kind`
    pub fn is(&self, kind: MessageKind) -> bool {
        self.kind() == kind
    }

    /// True if the message can be sent to an instrument (anything but meta
    /// and unknown kinds).
    pub fn is_playable(&self) -> bool {
        !matches!(self.kind(), MessageKind::Meta(_) | MessageKind::Unknown(_))
    }

    // ------------------------------------------------------------------
    // construction
    // ------------------------------------------------------------------

    fn two_data(status: u8, channel: Channel, a: u8, b: u8) -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![
                status | channel.value(),
                DataByte::clamped(a).value(),
                DataByte::clamped(b).value(),
            ]),
        }
    }

    fn one_data(status: u8, channel: Channel, a: u8) -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![
                status | channel.value(),
                DataByte::clamped(a).value(),
            ]),
        }
    }

    /// Note pressed. Out-of-range key/velocity saturate to 127.
    pub fn note_on(channel: impl Into<Channel>, key: u8, velocity: u8) -> Message<'static> {
        Self::two_data(0x90, channel.into(), key, velocity)
    }

    /// Note released, with release velocity 0.
    pub fn note_off(channel: impl Into<Channel>, key: u8) -> Message<'static> {
        Self::two_data(0x80, channel.into(), key, 0)
    }

    /// Note released with an explicit release velocity.
    pub fn note_off_with_velocity(
        channel: impl Into<Channel>,
        key: u8,
        velocity: u8,
    ) -> Message<'static> {
        Self::two_data(0x80, channel.into(), key, velocity)
    }

    /// Per-key pressure.
    pub fn poly_after_touch(
        channel: impl Into<Channel>,
        key: u8,
        pressure: u8,
    ) -> Message<'static> {
        Self::two_data(0xA0, channel.into(), key, pressure)
    }

    /// Controller movement.
    pub fn control_change(
        channel: impl Into<Channel>,
        controller: u8,
        value: u8,
    ) -> Message<'static> {
        Self::two_data(0xB0, channel.into(), controller, value)
    }

    /// Program selection.
    pub fn program_change(channel: impl Into<Channel>, program: u8) -> Message<'static> {
        Self::one_data(0xC0, channel.into(), program)
    }

    /// Channel-wide pressure.
    pub fn after_touch(channel: impl Into<Channel>, pressure: u8) -> Message<'static> {
        Self::one_data(0xD0, channel.into(), pressure)
    }

    /// Pitch wheel movement. Accepts a relative value via `PitchBend::from`.
    pub fn pitch_bend(channel: impl Into<Channel>, bend: impl Into<PitchBend>) -> Message<'static> {
        let (lsb, msb) = bend.into().to_data_bytes();
        Message {
            bytes: Cow::Owned(alloc::vec![0xE0 | channel.into().value(), lsb, msb]),
        }
    }

    /// MIDI time code quarter frame.
    pub fn mtc_quarter_frame(quarter_frame: u8) -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xF1, DataByte::clamped(quarter_frame).value()]),
        }
    }

    /// Song position pointer in MIDI beats, saturated to 14 bits.
    pub fn song_position_pointer(position: u16) -> Message<'static> {
        let position = if position > 0x3FFF { 0x3FFF } else { position };
        Message {
            bytes: Cow::Owned(alloc::vec![
                0xF2,
                (position & 0x7F) as u8,
                (position >> 7) as u8,
            ]),
        }
    }

    /// Song selection.
    pub fn song_select(song: u8) -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xF3, DataByte::clamped(song).value()]),
        }
    }

    /// Tune request.
    pub fn tune_request() -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xF6]),
        }
    }

    /// Timing clock tick.
    pub fn timing_clock() -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xF8]),
        }
    }

    /// Start playback.
    pub fn start() -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xFA]),
        }
    }

    /// Continue playback.
    pub fn continue_() -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xFB]),
        }
    }

    /// Stop playback.
    pub fn stop() -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xFC]),
        }
    }

    /// Active sensing heartbeat.
    pub fn active_sensing() -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xFE]),
        }
    }

    /// System reset (live only; `0xFF` opens a meta event in files).
    pub fn reset() -> Message<'static> {
        Message {
            bytes: Cow::Owned(alloc::vec![0xFF]),
        }
    }

    /// A single-shot sysex carrying `payload`, framed by `F0`/`F7`.
    pub fn sys_ex(payload: &[u8]) -> Message<'static> {
        let mut bytes = Vec::with_capacity(payload.len() + 2);
        bytes.push(0xF0);
        bytes.extend_from_slice(payload);
        bytes.push(0xF7);
        Message {
            bytes: Cow::Owned(bytes),
        }
    }

    /// An escape event: raw bytes stored behind an `F7` marker in a file.
    pub fn sys_ex_escape(payload: &[u8]) -> Message<'static> {
        let mut bytes = Vec::with_capacity(payload.len() + 1);
        bytes.push(0xF7);
        bytes.extend_from_slice(payload);
        Message {
            bytes: Cow::Owned(bytes),
        }
    }

    /// A meta event of the given kind with a raw payload.
    pub fn meta(kind: MetaKind, payload: &[u8]) -> Message<'static> {
        let mut bytes = Vec::with_capacity(payload.len() + 2);
        bytes.push(0xFF);
        bytes.push(kind.into());
        bytes.extend_from_slice(payload);
        Message {
            bytes: Cow::Owned(bytes),
        }
    }

    /// Tempo change.
    pub fn tempo(tempo: Tempo) -> Message<'static> {
        Self::meta(MetaKind::Tempo, &tempo.to_bytes())
    }

    /// Time signature change.
    pub fn time_signature(signature: TimeSignature) -> Message<'static> {
        Self::meta(
            MetaKind::TimeSignature,
            &[
                signature.numerator,
                signature.denominator_log2,
                signature.clocks_per_click,
                signature.thirty_seconds_per_quarter,
            ],
        )
    }

    /// Key signature change.
    pub fn key_signature(signature: KeySignature) -> Message<'static> {
        Self::meta(
            MetaKind::KeySignature,
            &[signature.sharps as u8, signature.minor as u8],
        )
    }

    /// End-of-track marker.
    pub fn end_of_track() -> Message<'static> {
        Self::meta(MetaKind::EndOfTrack, &[])
    }

    /// Track name.
    pub fn track_name(name: &str) -> Message<'static> {
        Self::meta(MetaKind::TrackName, name.as_bytes())
    }

    /// Any of the text-carrying meta kinds.
    pub fn meta_text(kind: MetaKind, text: &str) -> Message<'static> {
        Self::meta(kind, text.as_bytes())
    }

    /// Sequence number.
    pub fn sequence_number(number: u16) -> Message<'static> {
        Self::meta(MetaKind::SequenceNumber, &number.to_be_bytes())
    }

    /// SMPTE offset.
    pub fn smpte_offset(offset: SmpteOffset) -> Message<'static> {
        Self::meta(MetaKind::SmpteOffset, &offset.to_bytes())
    }

    // ------------------------------------------------------------------
    // extraction
    // ------------------------------------------------------------------

    /// Decode the message into a typed view. Idempotent and allocation-free.
    pub fn view(&self) -> MessageView<'_> {
        use MessageKind::*;
        let bytes = self.bytes();
        let channel = Channel::from_status(bytes[0]);
        let d = |i: usize| bytes.get(i).map_or(0, |b| b & 0x7F);
        match self.kind() {
            NoteOff => MessageView::NoteOff {
                channel,
                key: d(1),
                velocity: d(2),
            },
            NoteOn => MessageView::NoteOn {
                channel,
                key: d(1),
                velocity: d(2),
            },
            PolyAfterTouch => MessageView::PolyAfterTouch {
                channel,
                key: d(1),
                pressure: d(2),
            },
            ControlChange => MessageView::ControlChange {
                channel,
                controller: d(1),
                value: d(2),
            },
            ProgramChange => MessageView::ProgramChange {
                channel,
                program: d(1),
            },
            AfterTouch => MessageView::AfterTouch {
                channel,
                pressure: d(1),
            },
            PitchBend => MessageView::PitchBend {
                channel,
                bend: crate::bytes::PitchBend::from_data_bytes(d(1), d(2)),
            },
            SysEx => MessageView::SysEx(&bytes[1..]),
            SysExEscape => MessageView::SysExEscape(&bytes[1..]),
            MtcQuarterFrame => MessageView::MtcQuarterFrame(d(1)),
            SongPositionPointer => {
                MessageView::SongPositionPointer(((d(2) as u16) << 7) | d(1) as u16)
            }
            SongSelect => MessageView::SongSelect(d(1)),
            TuneRequest => MessageView::TuneRequest,
            TimingClock => MessageView::TimingClock,
            Start => MessageView::Start,
            Continue => MessageView::Continue,
            Stop => MessageView::Stop,
            ActiveSensing => MessageView::ActiveSensing,
            Reset => MessageView::Reset,
            Meta(kind) => MessageView::Meta(MetaView::decode(kind, &bytes[2..])),
            Unknown(_) => MessageView::Unknown(bytes),
        }
    }

    /// The channel, for any channel-voice message.
    pub fn get_channel(&self) -> Option<Channel> {
        if self.kind().is_channel() {
            let (_, channel) = split_status(self.bytes[0]);
            Some(Channel::new(channel))
        } else {
            None
        }
    }

    /// `(channel, key, velocity)` if this is a note-on.
    pub fn get_note_on(&self) -> Option<(Channel, u8, u8)> {
        match self.view() {
            MessageView::NoteOn {
                channel,
                key,
                velocity,
            } => Some((channel, key, velocity)),
            _ => None,
        }
    }

    /// `(channel, key, velocity)` if this is a note-on with velocity above
    /// zero — an actual note start.
    pub fn get_note_start(&self) -> Option<(Channel, u8, u8)> {
        self.get_note_on().filter(|(_, _, velocity)| *velocity > 0)
    }

    /// `(channel, key, velocity)` if this is a note-off.
    pub fn get_note_off(&self) -> Option<(Channel, u8, u8)> {
        match self.view() {
            MessageView::NoteOff {
                channel,
                key,
                velocity,
            } => Some((channel, key, velocity)),
            _ => None,
        }
    }

    /// `(channel, key)` if this ends a note: a note-off, or the
    /// conventional "fake" note-off of a note-on with velocity zero.
    pub fn get_note_end(&self) -> Option<(Channel, u8)> {
        match self.view() {
            MessageView::NoteOff { channel, key, .. } => Some((channel, key)),
            MessageView::NoteOn {
                channel,
                key,
                velocity: 0,
            } => Some((channel, key)),
            _ => None,
        }
    }

    /// `(channel, key, pressure)` if this is per-key aftertouch.
    pub fn get_poly_after_touch(&self) -> Option<(Channel, u8, u8)> {
        match self.view() {
            MessageView::PolyAfterTouch {
                channel,
                key,
                pressure,
            } => Some((channel, key, pressure)),
            _ => None,
        }
    }

    /// `(channel, pressure)` if this is channel aftertouch.
    pub fn get_after_touch(&self) -> Option<(Channel, u8)> {
        match self.view() {
            MessageView::AfterTouch { channel, pressure } => Some((channel, pressure)),
            _ => None,
        }
    }

    /// `(channel, controller, value)` if this is a control change.
    pub fn get_control_change(&self) -> Option<(Channel, u8, u8)> {
        match self.view() {
            MessageView::ControlChange {
                channel,
                controller,
                value,
            } => Some((channel, controller, value)),
            _ => None,
        }
    }

    /// `(channel, program)` if this is a program change.
    pub fn get_program_change(&self) -> Option<(Channel, u8)> {
        match self.view() {
            MessageView::ProgramChange { channel, program } => Some((channel, program)),
            _ => None,
        }
    }

    /// `(channel, bend)` if this is a pitch bend.
    pub fn get_pitch_bend(&self) -> Option<(Channel, PitchBend)> {
        match self.view() {
            MessageView::PitchBend { channel, bend } => Some((channel, bend)),
            _ => None,
        }
    }

    /// The inner payload if this is a complete `F0 .. F7` sysex.
    pub fn get_sys_ex(&self) -> Option<&[u8]> {
        let bytes = self.bytes();
        if bytes.len() >= 2 && bytes[0] == 0xF0 && bytes[bytes.len() - 1] == 0xF7 {
            Some(&bytes[1..bytes.len() - 1])
        } else {
            None
        }
    }

    /// `(kind, payload)` if this is a meta event.
    pub fn get_meta(&self) -> Option<(MetaKind, &[u8])> {
        match self.kind() {
            MessageKind::Meta(kind) => Some((kind, &self.bytes()[2..])),
            _ => None,
        }
    }
}

impl From<Message<'_>> for Vec<u8> {
    fn from(message: Message<'_>) -> Self {
        message.bytes.into_owned()
    }
}

/// The typed view of a [`Message`], produced by [`Message::view`].
///
/// One tagged variant per kind, carrying only the fields that kind has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageView<'a> {
    /// Note released
    NoteOff {
        /// Channel `0..=15`
        channel: Channel,
        /// Key `0..=127`
        key: u8,
        /// Release velocity `0..=127`
        velocity: u8,
    },
    /// Note pressed
    NoteOn {
        /// Channel `0..=15`
        channel: Channel,
        /// Key `0..=127`
        key: u8,
        /// Velocity `0..=127`; zero conventionally ends the note
        velocity: u8,
    },
    /// Per-key pressure
    PolyAfterTouch {
        /// Channel `0..=15`
        channel: Channel,
        /// Key `0..=127`
        key: u8,
        /// Pressure `0..=127`
        pressure: u8,
    },
    /// Controller movement
    ControlChange {
        /// Channel `0..=15`
        channel: Channel,
        /// Controller number `0..=127`
        controller: u8,
        /// Controller value `0..=127`
        value: u8,
    },
    /// Program selection
    ProgramChange {
        /// Channel `0..=15`
        channel: Channel,
        /// Program number `0..=127`
        program: u8,
    },
    /// Channel-wide pressure
    AfterTouch {
        /// Channel `0..=15`
        channel: Channel,
        /// Pressure `0..=127`
        pressure: u8,
    },
    /// Pitch wheel movement
    PitchBend {
        /// Channel `0..=15`
        channel: Channel,
        /// The 14-bit bend
        bend: PitchBend,
    },
    /// Sysex body after the leading `F0` (usually up to and including `F7`)
    SysEx(&'a [u8]),
    /// Escape payload after the leading `F7`
    SysExEscape(&'a [u8]),
    /// Time code quarter frame
    MtcQuarterFrame(u8),
    /// Song position in MIDI beats
    SongPositionPointer(u16),
    /// Song number
    SongSelect(u8),
    /// Tune request
    TuneRequest,
    /// Timing clock tick
    TimingClock,
    /// Start
    Start,
    /// Continue
    Continue,
    /// Stop
    Stop,
    /// Active sensing
    ActiveSensing,
    /// System reset
    Reset,
    /// File meta event
    Meta(MetaView<'a>),
    /// Unclassifiable bytes
    Unknown(&'a [u8]),
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{byte:02X}")?;
    }
    Ok(())
}

fn write_text(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    match core::str::from_utf8(bytes) {
        Ok(text) => write!(f, " text: {text:?}"),
        Err(_) => {
            f.write_str(" data: ")?;
            write_hex(f, bytes)
        }
    }
}

impl fmt::Display for Message<'_> {
    /// The canonical one-line rendering: the kind name followed by its
    /// fields. Channel kinds render first in extraction priority, then
    /// system, then meta, then sysex; a kind with no extractable fields
    /// renders its name alone.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        match self.view() {
            MessageView::NoteOn {
                channel,
                key,
                velocity,
            } => write!(f, " channel: {channel} key: {key} velocity: {velocity}"),
            MessageView::NoteOff {
                channel,
                key,
                velocity,
            } => {
                if velocity > 0 {
                    write!(f, " channel: {channel} key: {key} velocity: {velocity}")
                } else {
                    write!(f, " channel: {channel} key: {key}")
                }
            }
            MessageView::PolyAfterTouch {
                channel,
                key,
                pressure,
            } => write!(f, " channel: {channel} key: {key} pressure: {pressure}"),
            MessageView::AfterTouch { channel, pressure } => {
                write!(f, " channel: {channel} pressure: {pressure}")
            }
            MessageView::ControlChange {
                channel,
                controller,
                value,
            } => write!(
                f,
                " channel: {channel} controller: {controller} value: {value}"
            ),
            MessageView::ProgramChange { channel, program } => {
                write!(f, " channel: {channel} program: {program}")
            }
            MessageView::PitchBend { channel, bend } => {
                write!(
                    f,
                    " channel: {channel} pitch: {} ({})",
                    bend.relative(),
                    bend.absolute()
                )
            }
            MessageView::MtcQuarterFrame(quarter_frame) => write!(f, " mtc: {quarter_frame}"),
            MessageView::SongPositionPointer(position) => write!(f, " position: {position}"),
            MessageView::SongSelect(song) => write!(f, " song: {song}"),
            MessageView::Meta(meta) => match meta {
                MetaView::Tempo(tempo) => write!(f, " bpm: {}", tempo.bpm()),
                MetaView::TimeSignature(signature) => write!(f, " meter: {signature}"),
                MetaView::Text(_, text) => write_text(f, text),
                MetaView::SequenceNumber(number) => write!(f, " number: {number}"),
                MetaView::ChannelPrefix(channel) => write!(f, " channel: {channel}"),
                MetaView::Port(port) => write!(f, " port: {port}"),
                MetaView::KeySignature(signature) => {
                    write!(f, " sharps: {} minor: {}", signature.sharps, signature.minor)
                }
                MetaView::SmpteOffset(offset) => write!(
                    f,
                    " time: {:02}:{:02}:{:02} frame: {} subframe: {}",
                    offset.hour, offset.minute, offset.second, offset.frame, offset.subframe
                ),
                MetaView::SequencerSpecific(data) => {
                    f.write_str(" data: ")?;
                    write_hex(f, data)
                }
                MetaView::EndOfTrack | MetaView::Unknown(..) => Ok(()),
            },
            MessageView::SysEx(data) => {
                let inner = match self.get_sys_ex() {
                    Some(inner) => inner,
                    None => data,
                };
                f.write_str(" data: ")?;
                write_hex(f, inner)
            }
            MessageView::SysExEscape(data) => {
                f.write_str(" data: ")?;
                write_hex(f, data)
            }
            MessageView::TuneRequest
            | MessageView::TimingClock
            | MessageView::Start
            | MessageView::Continue
            | MessageView::Stop
            | MessageView::ActiveSensing
            | MessageView::Reset
            | MessageView::Unknown(_) => Ok(()),
        }
    }
}
