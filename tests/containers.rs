use notematrix::{
    ChunkError, HeaderError, ParseError, Warning,
    cursor::ReaderErrorKind,
    prelude::*,
};

/// Header chunk with the given format, track count and division
fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd"); // Header chunk type
    bytes.extend_from_slice(&6u32.to_be_bytes()); // Header length
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

/// Any chunk: tag, big-endian length, body
fn chunk(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(tag);
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

/// A drum track: kick and closed hi-hat together, then a snare
fn drum_body() -> Vec<u8> {
    vec![
        0x00, 0x99, 36, 100, // kick on
        0x00, 42, 90, // hi-hat on, running status
        0x83, 0x60, 0x89, 36, 0, // kick off after 480 ticks
        0x00, 0x89, 42, 0, // hi-hat off
        0x00, 0x99, 38, 100, // snare on
        0x83, 0x60, 38, 0, // snare release as zero velocity, running status
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ]
}

#[test]
fn drum_track() {
    let mut bytes = header(0, 1, 480);
    bytes.extend(chunk(b"MTrk", &drum_body()));

    let matrix = export(bytes).unwrap();
    assert_eq!(matrix.instrument(), InstrumentClass::Percussive);

    let notes = matrix.to_notes().unwrap();
    let shape: Vec<_> = notes
        .iter()
        .map(|n| (n.pitch().key().map(|k| k.byte()), n.delta_time(), n.duration()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (Some(36), 0., 48.),
            (Some(42), 0., 48.),
            (Some(38), 48., 48.),
        ]
    );
}

#[test]
fn only_unrecognized_chunk() {
    let mut bytes = header(1, 1, 960);
    bytes.extend(chunk(b"XFIH", &[0x01, 0x02, 0x03]));

    let file = MidiFile::parse(bytes.clone()).unwrap();
    assert!(file.events().is_empty());
    assert_eq!(
        file.warnings(),
        [Warning::UnrecognizedChunk {
            tag: *b"XFIH",
            length: 3
        }]
    );

    let matrix = notematrix::transcode::file_to_matrix(&file, &ConversionConfig::default()).unwrap();
    assert!(matrix.is_empty());

    assert!(matches!(export(bytes), Err(Error::UnsupportedContainer)));
}

#[test]
fn empty_track_chunk_is_skipped() {
    let mut bytes = header(1, 2, 480);
    bytes.extend(chunk(b"MTrk", &[]));
    bytes.extend(chunk(b"MTrk", &drum_body()));

    let file = MidiFile::parse(bytes).unwrap();
    assert_eq!(file.warnings().len(), 1);
    assert!(file.has_notes());
}

#[test]
fn truncated_track() {
    let mut bytes = header(0, 1, 480);
    bytes.extend(chunk(b"MTrk", &drum_body()));
    bytes.truncate(bytes.len() - 6);

    match export(bytes) {
        Err(Error::Read(e)) => assert!(e.is_truncated()),
        other => panic!("expected a truncated read, got {other:?}"),
    }
}

#[test]
fn track_without_end() {
    let mut body = drum_body();
    body.truncate(body.len() - 4);
    let mut bytes = header(0, 1, 480);
    bytes.extend(chunk(b"MTrk", &body));

    let err = MidiFile::parse(bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Parse(ParseError::Chunk(ChunkError::MissingEndOfTrack))
    );
}

#[test]
fn smpte_division_is_rejected() {
    let mut bytes = header(0, 1, 0xE728);
    bytes.extend(chunk(b"MTrk", &drum_body()));

    let err = MidiFile::parse(bytes).unwrap_err();
    assert_eq!(err.position(), 12);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Parse(ParseError::Header(HeaderError::SmpteTiming(0xE728)))
    );
}

#[test]
fn unmatched_and_dangling_notes() {
    let body = [
        0x00, 0x80, 50, 0, // release with no onset
        0x00, 0x90, 52, 64, // onset never released
        0x60, 0xFF, 0x2F, 0x00, // end of track
    ];
    let mut bytes = header(0, 1, 96);
    bytes.extend(chunk(b"MTrk", &body));

    let file = MidiFile::parse(bytes).unwrap();
    let conversion = events_to_notes(file.events(), file.timing(), &ConversionConfig::default());
    assert_eq!(
        conversion.warnings,
        vec![
            Warning::UnmatchedRelease { key: 50, tick: 0 },
            Warning::DanglingOnset { key: 52, tick: 96 },
        ]
    );
    assert_eq!(conversion.track.notes().len(), 1);
    assert_eq!(conversion.track.notes()[0].duration(), 48.);
}

#[test]
fn padding_after_announced_tracks() {
    let conductor = [
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ];
    let mut bytes = header(1, 1, 480);
    bytes.extend(chunk(b"MTrk", &conductor));
    bytes.extend([0x00, 0x00]);

    let file = MidiFile::parse(bytes.clone()).unwrap();
    assert!(file.events().is_empty());
    assert!(matches!(export(bytes), Err(Error::UnsupportedContainer)));

    let mut bytes = header(0, 1, 480);
    bytes.extend(chunk(b"MTrk", &drum_body()));
    bytes.extend([0x00; 7]);
    assert_eq!(export(bytes).unwrap().len(), 3);
}
