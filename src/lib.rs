#![doc = r#"
Encode and decode MIDI: the wire-level byte protocol and the Standard MIDI
File (SMF) container that stores sequences of timed events.

Two engines make up the crate. The *message codec* parses raw stream bytes
into typed [`Message`]s and serializes them back, including the
running-status compression MIDI mandates. The *file codec* reads and writes
the chunked SMF layout (`MThd` header plus `MTrk` tracks) with
variable-length delta times, per-track running status and absolute tick
positions.

# Reading a file

```rust
use midiwire::prelude::*;

let mut track = Track::new();
track.push(0, Message::program_change(0, 5));
track.push(0, Message::note_on(0, 60, 96));
track.push(96, Message::note_off(0, 60));
let mut file = SmfFile::new(Header::new(
    FormatType::SingleMultiChannel,
    1,
    Timing::metric(96),
));
file.add_track(track);
let bytes = file.to_bytes();

let parsed = SmfFile::parse(&bytes).unwrap();
assert_eq!(parsed.tracks().len(), 1);
assert_eq!(parsed.tracks()[0].events()[1].delta(), 0);
```

Event-by-event access without building the whole file goes through
[`reader::Reader`], which pulls one [`reader::FileEvent`] per call and tags
every track event with its [`reader::Position`].

# Decoding a live stream

```rust
use midiwire::prelude::*;

let mut reader = LiveReader::new(&[0x92, 0x41, 0x5A, 0x41, 0x00]);
let first = reader.read().unwrap().unwrap();
assert_eq!(first.to_string(), "NoteOn channel: 2 key: 65 velocity: 90");

// `41 00` reuses the note-on status under running status
let second = reader.read().unwrap().unwrap();
assert_eq!(second.bytes(), &[0x92, 0x41, 0x00]);
```

The crate performs no I/O and keeps no global state: every reader, writer
and encoder owns the state of exactly one pass, so independent parses can
run in parallel without synchronization. Port handling, scheduling and
dispatch layers are deliberately out of scope — this is the codec those
layers are built on.
"#]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bytes;
pub use bytes::*;

mod error;
pub use error::*;

pub mod message;
pub use message::*;

pub mod vlq;

mod running_status;
pub use running_status::*;

pub mod live;
pub use live::*;

pub mod file;
pub use file::*;

pub mod reader;

pub mod writer;

pub mod prelude;
