//! The format 0 and format 1 fixtures from the SMF specification's example:
//! the same two bars once as a single multi-channel track and once spread
//! over four tracks.
#![allow(dead_code)]

/// Format 0, one track, metric division 96.
pub const SPEC_SMF0: &[u8] = &[
    0x4D, 0x54, 0x68, 0x64, // MThd
    0x00, 0x00, 0x00, 0x06, // chunk length 6
    0x00, 0x00, // format 0
    0x00, 0x01, // one track
    0x00, 0x60, // 96 ticks per quarter note
    0x4D, 0x54, 0x72, 0x6B, // MTrk
    0x00, 0x00, 0x00, 0x3B, // chunk length 59
    0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, // time signature 4/4
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo 500000 us/quarter
    0x00, 0xC0, 0x05, //
    0x00, 0xC1, 0x2E, //
    0x00, 0xC2, 0x46, //
    0x00, 0x92, 0x30, 0x60, //
    0x00, 0x3C, 0x60, // running status
    0x60, 0x91, 0x43, 0x40, //
    0x60, 0x90, 0x4C, 0x20, //
    0x81, 0x40, 0x82, 0x30, 0x40, // two-byte delta 192
    0x00, 0x3C, 0x40, // running status
    0x00, 0x81, 0x43, 0x40, //
    0x00, 0x80, 0x4C, 0x40, //
    0x00, 0xFF, 0x2F, 0x00, // end of track
];

/// Format 1, four tracks, same musical content as [`SPEC_SMF0`].
pub const SPEC_SMF1: &[u8] = &[
    0x4D, 0x54, 0x68, 0x64, // MThd
    0x00, 0x00, 0x00, 0x06, //
    0x00, 0x01, // format 1
    0x00, 0x04, // four tracks
    0x00, 0x60, //
    // track 0: tempo map
    0x4D, 0x54, 0x72, 0x6B, //
    0x00, 0x00, 0x00, 0x14, //
    0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, //
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
    0x83, 0x00, 0xFF, 0x2F, 0x00, // end of track at delta 384
    // track 1: channel 0
    0x4D, 0x54, 0x72, 0x6B, //
    0x00, 0x00, 0x00, 0x10, //
    0x00, 0xC0, 0x05, //
    0x81, 0x40, 0x90, 0x4C, 0x20, //
    0x81, 0x40, 0x4C, 0x00, // zero-velocity note-on under running status
    0x00, 0xFF, 0x2F, 0x00, //
    // track 2: channel 1
    0x4D, 0x54, 0x72, 0x6B, //
    0x00, 0x00, 0x00, 0x0F, //
    0x00, 0xC1, 0x2E, //
    0x60, 0x91, 0x43, 0x40, //
    0x82, 0x20, 0x43, 0x00, //
    0x00, 0xFF, 0x2F, 0x00, //
    // track 3: channel 2
    0x4D, 0x54, 0x72, 0x6B, //
    0x00, 0x00, 0x00, 0x15, //
    0x00, 0xC2, 0x46, //
    0x00, 0x92, 0x30, 0x60, //
    0x00, 0x3C, 0x60, //
    0x83, 0x00, 0x30, 0x00, //
    0x00, 0x3C, 0x00, //
    0x00, 0xFF, 0x2F, 0x00, //
];

use midiwire::prelude::*;

/// Render a stream the way the transcript tests compare it: one line per
/// track event, `Track <index>@<delta> <message>`.
pub fn transcript(bytes: &[u8], options: ReaderOptions) -> String {
    let mut reader = Reader::with_options(bytes, options);
    let mut out = String::from("\n");
    loop {
        match reader.read_event().expect("fixture parses") {
            FileEvent::Header(header) => {
                out.push_str(&format!("{}\n", header.timing()));
            }
            FileEvent::TrackEvent(event) => {
                out.push_str(&format!(
                    "Track {}@{} {}\n",
                    event.track(),
                    event.delta(),
                    event.message()
                ));
            }
            FileEvent::Finished => return out,
            FileEvent::Track(_) | FileEvent::Unknown(_) => {}
        }
    }
}
