use notematrix::prelude::*;
use pretty_assertions::assert_eq;

const LEAD: &[u8] = include_bytes!("assets/lead.mid");

fn key(byte: u8) -> Pitch {
    Pitch::Key(Key::new(byte).unwrap())
}

#[test]
fn skips_conductor_track() {
    let file = MidiFile::parse(LEAD).unwrap();
    assert_eq!(file.header().format(), FormatType::Simultaneous);
    assert_eq!(file.header().num_tracks(), 2);
    assert_eq!(file.timing().ticks(), 96);
    assert!(file.warnings().is_empty());

    // track name, program change, 8 note events, end of track
    assert_eq!(file.events().len(), 11);
    assert_eq!(
        file.events()[1].channel_message().unwrap().kind(),
        VoiceKind::ProgramChange
    );
}

#[test]
fn running_status_notes() {
    let file = MidiFile::parse(LEAD).unwrap();
    let conversion = events_to_notes(file.events(), file.timing(), &ConversionConfig::default());
    assert!(conversion.warnings.is_empty());

    let notes: Vec<_> = conversion
        .track
        .notes()
        .iter()
        .map(|n| (n.pitch(), n.delta_time(), n.duration()))
        .collect();
    assert_eq!(
        notes,
        vec![
            (key(60), 0., 48.),
            (key(64), 0., 48.),
            (key(67), 48., 24.),
            (key(72), 48., 96.),
        ]
    );
}

#[test]
fn reimported_events() {
    let matrix = export(LEAD).unwrap();
    let bytes = import(matrix.rows(), TicksPerQuarterNote::new(96).unwrap(), matrix.instrument()).unwrap();
    let file = MidiFile::parse(bytes).unwrap();

    let events: Vec<_> = file
        .events()
        .iter()
        .map(|e| (e.delta_time(), e.status(), e.is_note_on()))
        .collect();
    assert_eq!(
        events,
        vec![
            (0, 0x90, true),
            (0, 0x90, true),
            (96, 0x80, false),
            (0, 0x80, false),
            (0, 0x90, true),
            (48, 0x80, false),
            (48, 0x90, true),
            (192, 0x80, false),
            (0, 0xFF, false),
        ]
    );

    assert_eq!(export(file.to_bytes()).unwrap(), matrix);
}

#[test]
fn notes_file_from_asset() {
    let config = ConversionConfig::default().with_frame(FrameGeometry::new(2, 3).unwrap());
    let notes_file = notematrix::transcode::export_notes_file(LEAD, &config).unwrap();
    assert_eq!(notes_file.frame(), FrameGeometry::new(2, 3).unwrap());

    let frames = notes_file.matrix().wrap(&notes_file.frame());
    // (4 - (3 - 2)) / 2
    assert_eq!(frames.dim(), (1, 3, 41));

    let parsed = NotesFile::from_bytes(notes_file.to_bytes()).unwrap();
    assert_eq!(parsed, notes_file);
}
