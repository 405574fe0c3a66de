#![doc = r#"
Pull decoding for live MIDI byte streams.

A [`LiveReader`] walks a buffer of wire bytes and yields one complete
[`Message`] per call, resolving running status as it goes. System real-time
bytes are legal *anywhere*, including between the data bytes of another
message; when one interrupts a message in progress it is yielded immediately
and the partially collected message is retained for the next call, exactly
as the wire semantics demand.

The reader never performs I/O. Feed it whatever bytes are available; when a
message is incomplete it returns `Ok(None)` and picks up where it left off
once more bytes arrive in a later buffer (see [`LiveReader::reset_buffer`]).
"#]

use alloc::vec::Vec;

use crate::{Message, MessageKind, RunningStatus, TrackError};

struct Pending {
    status: u8,
    data: Vec<u8>,
    /// `None` while collecting sysex up to its `0xF7` terminator
    need: Option<usize>,
}

/// A pull decoder over a live stream's bytes.
pub struct LiveReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    running_status: RunningStatus,
    pending: Option<Pending>,
}

impl<'a> LiveReader<'a> {
    /// Decode from the start of `bytes` with no running status retained.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            running_status: RunningStatus::new(),
            pending: None,
        }
    }

    /// How many bytes of the source have been consumed so far.
    pub const fn buffer_position(&self) -> usize {
        self.pos
    }

    /// Swap in the next buffer of the same stream.
    ///
    /// Running status and any partially collected message carry over; the
    /// byte position restarts at zero for the new buffer.
    pub fn reset_buffer(&mut self, bytes: &'a [u8]) {
        self.bytes = bytes;
        self.pos = 0;
    }

    /// Decode the next complete message.
    ///
    /// `Ok(None)` means the buffer is exhausted (possibly mid-message; the
    /// partial state is retained). A status byte interrupting an unfinished
    /// non-sysex message fails with [`TrackError::UnexpectedStatusByte`] and
    /// drops the unfinished message; the offending byte is left in the
    /// buffer for the next call.
    pub fn read(&mut self) -> Result<Option<Message<'a>>, TrackError> {
        loop {
            if self.pending.is_some() {
                if let Some(message) = self.continue_pending()? {
                    return Ok(Some(message));
                }
                if self.pending.is_some() {
                    // out of bytes mid-message
                    return Ok(None);
                }
                continue;
            }

            let Some(&first) = self.bytes.get(self.pos) else {
                return Ok(None);
            };

            if first >= 0xF8 {
                self.pos += 1;
                return Ok(Some(Message::from_bytes(
                    &self.bytes[self.pos - 1..self.pos],
                )));
            }

            if first & 0x80 != 0 {
                self.pos += 1;
                self.running_status.observe(first);
                match MessageKind::from_status(first) {
                    MessageKind::SysEx => {
                        if let Some(message) = self.try_borrow_sysex() {
                            return Ok(Some(message));
                        }
                        self.pending = Some(Pending {
                            status: first,
                            data: alloc::vec![],
                            need: None,
                        });
                    }
                    MessageKind::Unknown(status) => {
                        return Err(TrackError::UndefinedStatus(status));
                    }
                    kind => match kind.fixed_data_len() {
                        Some(0) | None => {
                            // None is a dangling 0xF7; pass the byte through
                            return Ok(Some(Message::from_bytes(
                                &self.bytes[self.pos - 1..self.pos],
                            )));
                        }
                        Some(need) => {
                            if let Some(message) = self.try_borrow_fixed(need) {
                                return Ok(Some(message));
                            }
                            self.pending = Some(Pending {
                                status: first,
                                data: Vec::with_capacity(need),
                                need: Some(need),
                            });
                        }
                    },
                }
            } else {
                // data byte under running status; the retained status is by
                // construction a channel status with a fixed arity
                let (status, _) = self.running_status.resolve(first)?;
                let need = MessageKind::from_status(status)
                    .fixed_data_len()
                    .unwrap_or(0);
                self.pending = Some(Pending {
                    status,
                    data: Vec::with_capacity(need),
                    need: Some(need),
                });
            }
        }
    }

    /// Fast path: the whole body is contiguous with no real-time bytes in
    /// between, so the message can borrow straight from the source.
    fn try_borrow_fixed(&mut self, need: usize) -> Option<Message<'a>> {
        let start = self.pos - 1;
        let end = self.pos + need;
        let body = self.bytes.get(self.pos..end)?;
        if body.iter().any(|byte| byte & 0x80 != 0) {
            return None;
        }
        self.pos = end;
        Some(Message::from_bytes(&self.bytes[start..end]))
    }

    fn try_borrow_sysex(&mut self) -> Option<Message<'a>> {
        let start = self.pos - 1;
        let mut end = self.pos;
        loop {
            let &byte = self.bytes.get(end)?;
            if byte == 0xF7 {
                self.pos = end + 1;
                return Some(Message::from_bytes(&self.bytes[start..=end]));
            }
            if byte & 0x80 != 0 {
                // interrupted by real-time (or corrupt); take the slow path
                return None;
            }
            end += 1;
        }
    }

    fn continue_pending(&mut self) -> Result<Option<Message<'a>>, TrackError> {
        while let Some(&byte) = self.bytes.get(self.pos) {
            if byte >= 0xF8 {
                // real-time interrupts without disturbing the collection
                self.pos += 1;
                return Ok(Some(Message::from_bytes(
                    &self.bytes[self.pos - 1..self.pos],
                )));
            }

            let Some(pending) = self.pending.as_mut() else {
                return Ok(None);
            };
            match pending.need {
                None => {
                    // sysex runs until its terminator
                    self.pos += 1;
                    if byte == 0xF7 {
                        let Some(pending) = self.pending.take() else {
                            return Ok(None);
                        };
                        let mut bytes = Vec::with_capacity(pending.data.len() + 2);
                        bytes.push(pending.status);
                        bytes.extend_from_slice(&pending.data);
                        bytes.push(0xF7);
                        return Ok(Some(Message::from_bytes(bytes)));
                    }
                    if byte & 0x80 != 0 {
                        self.pending = None;
                        self.pos -= 1;
                        return Err(TrackError::UnexpectedStatusByte(byte));
                    }
                    pending.data.push(byte);
                }
                Some(need) => {
                    if byte & 0x80 != 0 {
                        self.pending = None;
                        return Err(TrackError::UnexpectedStatusByte(byte));
                    }
                    self.pos += 1;
                    pending.data.push(byte);
                    if pending.data.len() == need {
                        let Some(pending) = self.pending.take() else {
                            return Ok(None);
                        };
                        let mut bytes = Vec::with_capacity(need + 1);
                        bytes.push(pending.status);
                        bytes.extend_from_slice(&pending.data);
                        return Ok(Some(Message::from_bytes(bytes)));
                    }
                }
            }
        }
        Ok(None)
    }
}

/// Serializes messages for a live stream, compressing repeated channel
/// statuses unless running status is disabled.
///
/// The writer owns only the retained-status state; bytes go into whatever
/// sink buffer the caller supplies, since transports are not this crate's
/// concern.
#[derive(Debug)]
pub struct LiveWriter {
    running_status: RunningStatus,
    use_running_status: bool,
}

impl Default for LiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveWriter {
    /// A writer with running-status compression enabled.
    pub const fn new() -> Self {
        Self {
            running_status: RunningStatus::new(),
            use_running_status: true,
        }
    }

    /// A writer that always emits full messages. Byte-for-byte verbosity
    /// for transports that may drop bytes.
    pub const fn without_running_status() -> Self {
        Self {
            running_status: RunningStatus::new(),
            use_running_status: false,
        }
    }

    /// Append the wire bytes of `message` to `out`.
    pub fn write(&mut self, message: &Message<'_>, out: &mut Vec<u8>) {
        let bytes = message.bytes();
        let emit_status = !self.use_running_status || self.running_status.should_emit(bytes[0]);
        if emit_status {
            out.push(bytes[0]);
        }
        out.extend_from_slice(&bytes[1..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::Channel;

    #[test]
    fn decodes_plain_messages_and_reports_consumption() {
        let bytes = [0x92, 0x41, 0x5A, 0x82, 0x41, 0x00];
        let mut reader = LiveReader::new(&bytes);

        let first = reader.read().unwrap().unwrap();
        assert_eq!(first.get_note_on(), Some((Channel::new(2), 0x41, 0x5A)));
        assert_eq!(reader.buffer_position(), 3);

        let second = reader.read().unwrap().unwrap();
        assert_eq!(second.get_note_off(), Some((Channel::new(2), 0x41, 0)));
        assert_eq!(reader.buffer_position(), 6);
        assert_eq!(reader.read().unwrap(), None);
    }

    #[test]
    fn running_status_reconstructs_the_full_message() {
        // 92 41 5A then 41 00 under running status
        let bytes = [0x92, 0x41, 0x5A, 0x41, 0x00];
        let mut reader = LiveReader::new(&bytes);

        reader.read().unwrap().unwrap();
        let second = reader.read().unwrap().unwrap();
        assert_eq!(second.bytes(), &[0x92, 0x41, 0x00]);
        assert_eq!(second.get_note_on(), Some((Channel::new(2), 0x41, 0)));
    }

    #[test]
    fn orphan_data_byte_fails() {
        let mut reader = LiveReader::new(&[0x41, 0x00]);
        assert_eq!(reader.read(), Err(TrackError::UnexpectedDataByte(0x41)));
    }

    #[test]
    fn realtime_interrupts_are_yielded_first() {
        // clock byte lands between the data bytes of a note-on
        let bytes = [0x92, 0x41, 0xF8, 0x5A];
        let mut reader = LiveReader::new(&bytes);

        let clock = reader.read().unwrap().unwrap();
        assert_eq!(clock.kind(), MessageKind::TimingClock);

        let note = reader.read().unwrap().unwrap();
        assert_eq!(note.get_note_on(), Some((Channel::new(2), 0x41, 0x5A)));
    }

    #[test]
    fn realtime_does_not_clear_running_status() {
        let bytes = [0x92, 0x41, 0x5A, 0xF8, 0x41, 0x00];
        let mut reader = LiveReader::new(&bytes);

        reader.read().unwrap().unwrap();
        assert_eq!(reader.read().unwrap().unwrap().kind(), MessageKind::TimingClock);
        let resumed = reader.read().unwrap().unwrap();
        assert_eq!(resumed.get_note_on(), Some((Channel::new(2), 0x41, 0)));
    }

    #[test]
    fn sysex_collects_to_terminator_across_interrupts() {
        let bytes = [0xF0, 0x43, 0xF8, 0x12, 0xF7, 0x92, 0x41, 0x5A];
        let mut reader = LiveReader::new(&bytes);

        assert_eq!(reader.read().unwrap().unwrap().kind(), MessageKind::TimingClock);
        let sysex = reader.read().unwrap().unwrap();
        assert_eq!(sysex.get_sys_ex(), Some(&[0x43, 0x12][..]));
        assert!(reader.read().unwrap().unwrap().get_note_on().is_some());
    }

    #[test]
    fn sysex_clears_running_status() {
        let bytes = [0x92, 0x41, 0x5A, 0xF0, 0x01, 0xF7, 0x41, 0x00];
        let mut reader = LiveReader::new(&bytes);
        reader.read().unwrap().unwrap();
        reader.read().unwrap().unwrap();
        assert_eq!(reader.read(), Err(TrackError::UnexpectedDataByte(0x41)));
    }

    #[test]
    fn partial_message_survives_a_buffer_swap() {
        let mut reader = LiveReader::new(&[0x92, 0x41]);
        assert_eq!(reader.read().unwrap(), None);

        reader.reset_buffer(&[0x5A]);
        let note = reader.read().unwrap().unwrap();
        assert_eq!(note.get_note_on(), Some((Channel::new(2), 0x41, 0x5A)));
    }

    #[test]
    fn interrupting_status_byte_is_an_error_and_recoverable() {
        let bytes = [0x92, 0x41, 0x83, 0x41, 0x00];
        let mut reader = LiveReader::new(&bytes);
        assert_eq!(reader.read(), Err(TrackError::UnexpectedStatusByte(0x83)));
        // the offending status opens the next message
        let next = reader.read().unwrap().unwrap();
        assert_eq!(next.get_note_off(), Some((Channel::new(3), 0x41, 0)));
    }
}
