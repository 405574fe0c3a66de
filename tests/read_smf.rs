mod common;

use common::{SPEC_SMF0, SPEC_SMF1, transcript};
use midiwire::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn read_smf0() {
    let expected = "
96 ticks per quarter note
Track 0@0 TimeSignature meter: 4/4
Track 0@0 Tempo bpm: 120
Track 0@0 ProgramChange channel: 0 program: 5
Track 0@0 ProgramChange channel: 1 program: 46
Track 0@0 ProgramChange channel: 2 program: 70
Track 0@0 NoteOn channel: 2 key: 48 velocity: 96
Track 0@0 NoteOn channel: 2 key: 60 velocity: 96
Track 0@96 NoteOn channel: 1 key: 67 velocity: 64
Track 0@96 NoteOn channel: 0 key: 76 velocity: 32
Track 0@192 NoteOff channel: 2 key: 48 velocity: 64
Track 0@0 NoteOff channel: 2 key: 60 velocity: 64
Track 0@0 NoteOff channel: 1 key: 67 velocity: 64
Track 0@0 NoteOff channel: 0 key: 76 velocity: 64
Track 0@0 EndOfTrack
";
    assert_eq!(transcript(SPEC_SMF0, ReaderOptions::new()), expected);
}

#[test]
fn read_smf0_absolute_ticks() {
    let mut reader = Reader::from_byte_slice(SPEC_SMF0);
    let mut ticks = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            FileEvent::TrackEvent(event) => ticks.push(event.tick()),
            FileEvent::Finished => break,
            _ => {}
        }
    }
    assert_eq!(
        ticks,
        [0, 0, 0, 0, 0, 0, 0, 96, 192, 384, 384, 384, 384, 384]
    );
}

#[test]
fn read_smf1() {
    // zero-velocity note-ons arrive normalized to note-offs by default
    let expected = "
96 ticks per quarter note
Track 0@0 TimeSignature meter: 4/4
Track 0@0 Tempo bpm: 120
Track 0@384 EndOfTrack
Track 1@0 ProgramChange channel: 0 program: 5
Track 1@192 NoteOn channel: 0 key: 76 velocity: 32
Track 1@192 NoteOff channel: 0 key: 76
Track 1@0 EndOfTrack
Track 2@0 ProgramChange channel: 1 program: 46
Track 2@96 NoteOn channel: 1 key: 67 velocity: 64
Track 2@288 NoteOff channel: 1 key: 67
Track 2@0 EndOfTrack
Track 3@0 ProgramChange channel: 2 program: 70
Track 3@0 NoteOn channel: 2 key: 48 velocity: 96
Track 3@0 NoteOn channel: 2 key: 60 velocity: 96
Track 3@384 NoteOff channel: 2 key: 48
Track 3@0 NoteOff channel: 2 key: 60
Track 3@0 EndOfTrack
";
    assert_eq!(transcript(SPEC_SMF1, ReaderOptions::new()), expected);
}

#[test]
fn read_smf1_pedantic_note_off() {
    let expected = "
96 ticks per quarter note
Track 0@0 TimeSignature meter: 4/4
Track 0@0 Tempo bpm: 120
Track 0@384 EndOfTrack
Track 1@0 ProgramChange channel: 0 program: 5
Track 1@192 NoteOn channel: 0 key: 76 velocity: 32
Track 1@192 NoteOn channel: 0 key: 76 velocity: 0
Track 1@0 EndOfTrack
Track 2@0 ProgramChange channel: 1 program: 46
Track 2@96 NoteOn channel: 1 key: 67 velocity: 64
Track 2@288 NoteOn channel: 1 key: 67 velocity: 0
Track 2@0 EndOfTrack
Track 3@0 ProgramChange channel: 2 program: 70
Track 3@0 NoteOn channel: 2 key: 48 velocity: 96
Track 3@0 NoteOn channel: 2 key: 60 velocity: 96
Track 3@384 NoteOn channel: 2 key: 48 velocity: 0
Track 3@0 NoteOn channel: 2 key: 60 velocity: 0
Track 3@0 EndOfTrack
";
    assert_eq!(
        transcript(SPEC_SMF1, ReaderOptions::new().pedantic_note_off()),
        expected
    );
}

#[test]
fn smf1_tick_accumulators_reset_per_track() {
    let mut reader = Reader::from_byte_slice(SPEC_SMF1);
    let mut per_track: Vec<Vec<u32>> = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            FileEvent::Track(_) => per_track.push(Vec::new()),
            FileEvent::TrackEvent(event) => {
                assert_eq!(event.track() as usize, per_track.len() - 1);
                per_track.last_mut().unwrap().push(event.tick());
            }
            FileEvent::Finished => break,
            _ => {}
        }
    }
    assert_eq!(per_track.len(), 4);
    assert_eq!(per_track[0], [0, 0, 384]);
    assert_eq!(per_track[1], [0, 192, 384, 384]);
    assert_eq!(per_track[2], [0, 96, 384, 384]);
    assert_eq!(per_track[3], [0, 0, 0, 384, 384, 384]);
}

#[test]
fn parsed_file_structure() {
    let file = SmfFile::parse(SPEC_SMF1).unwrap();
    assert_eq!(file.header().format(), FormatType::Simultaneous);
    assert_eq!(file.header().num_tracks(), 4);
    assert_eq!(
        file.header().timing().ticks_per_quarter_note(),
        Some(96)
    );
    assert_eq!(file.tracks().len(), 4);
    assert_eq!(file.tracks()[3].len(), 6);
    assert!(file.warnings().is_empty());

    // delta times survive into the track representation
    let deltas: Vec<u32> = file.tracks()[2]
        .events()
        .iter()
        .map(|event| event.delta())
        .collect();
    assert_eq!(deltas, [0, 96, 288, 0]);
}

#[test]
fn positions_carry_track_tick_and_delta() {
    let mut reader = Reader::from_byte_slice(SPEC_SMF1);
    loop {
        match reader.read_event().unwrap() {
            FileEvent::TrackEvent(event) => {
                let position = event.position();
                assert_eq!(position.track, event.track());
                assert_eq!(position.tick, event.tick());
                assert_eq!(position.delta, event.delta());
            }
            FileEvent::Finished => break,
            _ => {}
        }
    }
}

#[test]
fn finished_is_sticky() {
    let mut reader = Reader::from_byte_slice(SPEC_SMF0);
    while !reader.read_event().unwrap().is_finished() {}
    assert!(reader.read_event().unwrap().is_finished());
    assert!(reader.read_event().unwrap().is_finished());
}

#[test]
fn reader_iterates_lazily() {
    let events: Vec<_> = Reader::from_byte_slice(SPEC_SMF0)
        .map(Result::unwrap)
        .collect();
    // header + track header + 14 events, no Finished item
    assert_eq!(events.len(), 16);
    assert!(matches!(events[0], FileEvent::Header(_)));
    assert!(matches!(events[1], FileEvent::Track(_)));
}
