mod common;

use common::{SPEC_SMF0, SPEC_SMF1};
use midiwire::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn smf0_reencodes_byte_identically() {
    // every status in the fixture is real and the writer's running-status
    // policy matches the encoder that produced it
    let file = SmfFile::parse(SPEC_SMF0).unwrap();
    assert_eq!(file.to_bytes(), SPEC_SMF0);
}

#[test]
fn smf1_reencodes_byte_identically_under_pedantic_reading() {
    // the fixture ends notes with zero-velocity note-ons; pedantic reading
    // preserves them, so compression reproduces the source exactly
    let file =
        SmfFile::parse_with_options(SPEC_SMF1, ReaderOptions::new().pedantic_note_off()).unwrap();
    assert_eq!(file.to_bytes(), SPEC_SMF1);
}

fn demo_track() -> Track<'static> {
    let mut track = Track::new();
    track.push(0, Message::track_name("demo"));
    track.push(0, Message::tempo(Tempo::from_micros_per_quarter(500_000)));
    track.push(0, Message::time_signature(TimeSignature::meter(3, 4)));
    track.push(0, Message::program_change(4, 20));
    track.push(0, Message::note_on(4, 60, 100));
    track.push(48, Message::note_on(4, 64, 90));
    track.push(48, Message::note_off(4, 60));
    track.push(0, Message::note_off(4, 64));
    track.push(12, Message::control_change(4, 64, 127));
    track.push(0, Message::pitch_bend(4, PitchBend::new(300)));
    track.push(24, Message::sys_ex(&[0x7E, 0x7F, 0x09, 0x01]));
    track.push(0, Message::end_of_track());
    track
}

fn written_file(options: WriterOptions) -> Vec<u8> {
    let mut file = SmfFile::new(Header::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::metric(96),
    ));
    file.add_track(demo_track());
    file.to_bytes_with_options(options)
}

fn assert_reads_back_equivalent(bytes: &[u8]) {
    let parsed = SmfFile::parse(bytes).unwrap();
    assert_eq!(parsed.tracks().len(), 1);
    let original = demo_track();
    let events = parsed.tracks()[0].events();
    assert_eq!(events.len(), original.len());
    for (read, written) in events.iter().zip(original.events()) {
        assert_eq!(read.delta(), written.delta());
        assert_eq!(read.message(), written.message());
    }
}

#[test]
fn write_then_read_preserves_deltas_and_fields() {
    assert_reads_back_equivalent(&written_file(WriterOptions::new()));
}

#[test]
fn round_trip_is_independent_of_running_status() {
    let compressed = written_file(WriterOptions::new());
    let verbose = written_file(WriterOptions::new().disable_running_status());
    assert!(verbose.len() > compressed.len());
    assert_reads_back_equivalent(&compressed);
    assert_reads_back_equivalent(&verbose);
}

#[test]
fn missing_end_of_track_is_appended_on_write() {
    let mut track = Track::new();
    track.push(0, Message::note_on(0, 60, 100));
    track.push(96, Message::note_off(0, 60));

    let mut file = SmfFile::new(Header::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::metric(96),
    ));
    file.add_track(track);

    let bytes = file.to_bytes();
    let parsed = SmfFile::parse(&bytes).unwrap();
    let events = parsed.tracks()[0].events();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[2].message().kind(),
        MessageKind::Meta(MetaKind::EndOfTrack)
    );
    assert!(parsed.warnings().is_empty());
}

#[test]
fn zero_velocity_note_on_compresses_under_running_status() {
    // a pedantic zero-velocity note-on keeps its note-on status, so it
    // rides the same running-status run as any other note-on
    let mut track = Track::new();
    track.push(0, Message::note_on(1, 20, 100));
    track.push(0, Message::note_on(1, 23, 70));
    track.push(0, Message::note_on(1, 20, 0));
    track.push(0, Message::note_on(1, 23, 0));
    let chunk = write_track(&track, WriterOptions::new());

    // one status byte for the whole run
    assert_eq!(
        chunk,
        [
            b'M', b'T', b'r', b'k', 0, 0, 0, 17, //
            0x00, 0x91, 0x14, 0x64, //
            0x00, 0x17, 0x46, //
            0x00, 0x14, 0x00, //
            0x00, 0x17, 0x00, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );

    // and pedantic reading recovers all four note-ons verbatim
    let mut bytes = Vec::from(write_header(&Header::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::metric(96),
    )));
    bytes.extend_from_slice(&chunk);
    let parsed =
        SmfFile::parse_with_options(&bytes, ReaderOptions::new().pedantic_note_off()).unwrap();
    let events = parsed.tracks()[0].events();
    assert_eq!(events[0].message(), &Message::note_on(1, 20, 100));
    assert_eq!(events[1].message(), &Message::note_on(1, 23, 70));
    assert_eq!(events[2].message(), &Message::note_on(1, 20, 0));
    assert_eq!(events[3].message(), &Message::note_on(1, 23, 0));
}

#[test]
fn sys_ex_escape_round_trips() {
    let mut track = Track::new();
    track.push(0, Message::sys_ex_escape(&[0xFA]));
    track.push(0, Message::note_on(2, 65, 90));
    track.push(10, Message::sys_ex(&[0x10, 0x51]));
    track.push(0, Message::end_of_track());

    let mut file = SmfFile::new(Header::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::metric(96),
    ));
    file.add_track(track.clone());

    let bytes = file.to_bytes();
    let parsed = SmfFile::parse(&bytes).unwrap();
    let events = parsed.tracks()[0].events();
    assert_eq!(events[0].message(), &Message::sys_ex_escape(&[0xFA]));
    assert_eq!(events[0].message().kind(), MessageKind::SysExEscape);
    assert_eq!(events[2].message().get_sys_ex(), Some(&[0x10, 0x51][..]));
}

#[test]
fn smpte_header_round_trips() {
    let mut file = SmfFile::new(Header::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::smpte(SmpteFps::TwentyFive, 40),
    ));
    file.add_track(Track::new());

    let bytes = file.to_bytes();
    let parsed = SmfFile::parse(&bytes).unwrap();
    let Timing::Smpte(smpte) = parsed.header().timing() else {
        panic!("expected smpte timing");
    };
    assert_eq!(smpte.fps(), SmpteFps::TwentyFive);
    assert_eq!(smpte.ticks_per_frame(), 40);
}

#[test]
fn meta_payloads_round_trip() {
    let offset = SmpteOffset {
        fps: SmpteFps::Thirty,
        hour: 1,
        minute: 2,
        second: 3,
        frame: 4,
        subframe: 5,
    };
    let mut track = Track::new();
    track.push(0, Message::sequence_number(7));
    track.push(0, Message::smpte_offset(offset));
    track.push(
        0,
        Message::key_signature(KeySignature {
            sharps: -3,
            minor: true,
        }),
    );
    track.push(0, Message::meta_text(MetaKind::Marker, "verse"));
    track.push(0, Message::end_of_track());

    let mut file = SmfFile::new(Header::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::metric(480),
    ));
    file.add_track(track);

    let bytes = file.to_bytes();
    let parsed = SmfFile::parse(&bytes).unwrap();
    let views: Vec<MessageView<'_>> = parsed.tracks()[0]
        .events()
        .iter()
        .map(|event| event.message().view())
        .collect();
    assert_eq!(views[0], MessageView::Meta(MetaView::SequenceNumber(7)));
    assert_eq!(views[1], MessageView::Meta(MetaView::SmpteOffset(offset)));
    assert_eq!(
        views[2],
        MessageView::Meta(MetaView::KeySignature(KeySignature {
            sharps: -3,
            minor: true,
        }))
    );
    assert_eq!(
        views[3],
        MessageView::Meta(MetaView::Text(MetaKind::Marker, b"verse"))
    );
}
