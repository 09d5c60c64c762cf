#![doc = r#"
Container bytes to note matrices and back

These are the two conversions a training pipeline needs: [`export`] turns a
file into the matrix of its effective track's notes, [`import`] turns a matrix
(for example a model's output) into a playable single-track file.

Every call is a pure function of its inputs. Batch callers are expected to
run one call per file and to skip files that fail.
"#]

use ndarray::ArrayView2;

use crate::{
    Error, Result,
    config::ConversionConfig,
    convert::{events_to_notes, notes_to_events},
    events::TrackEvent,
    file::{MidiFile, TicksPerQuarterNote},
    matrix::NoteMatrix,
    note::InstrumentClass,
    notes_file::NotesFile,
};

#[doc = r#"
Convert container bytes into a note matrix with the default settings.

Fails with [`Error::UnsupportedContainer`] when no track carries note events,
and with [`Error::UnknownPitch`] when a drum key has no slot.

# Example
```rust
# use notematrix::prelude::*;
let timing = TicksPerQuarterNote::new(96).unwrap();
let key = Key::new(60).unwrap();
let bytes = MidiFile::new(
    timing,
    vec![
        TrackEvent::new(0, ChannelMessage::note_on(Channel::DEFAULT, key, 90)),
        TrackEvent::new(96, ChannelMessage::note_off(Channel::DEFAULT, key, 0)),
        TrackEvent::end_of_track(0),
    ],
)
.to_bytes();

let matrix = export(bytes).unwrap();
assert_eq!(matrix.instrument(), InstrumentClass::Melodic);
assert_eq!(matrix.len(), 1);
```
"#]
pub fn export<B>(bytes: B) -> Result<NoteMatrix>
where
    B: Into<Vec<u8>>,
{
    export_with(bytes, &ConversionConfig::default())
}

/// Convert container bytes into a note matrix
pub fn export_with<B>(bytes: B, config: &ConversionConfig) -> Result<NoteMatrix>
where
    B: Into<Vec<u8>>,
{
    let file = MidiFile::parse(bytes)?;
    if !file.has_notes() {
        return Err(Error::UnsupportedContainer);
    }
    file_to_matrix(&file, config)
}

/// Vectorize the effective track of a parsed file.
///
/// Unlike [`export`], a file without note events gives an empty melodic matrix.
pub fn file_to_matrix(file: &MidiFile, config: &ConversionConfig) -> Result<NoteMatrix> {
    let conversion = events_to_notes(file.events(), file.timing(), config);
    let matrix = NoteMatrix::from_track(&conversion.track)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Exported {} {} note(s) at {} ticks per quarter note",
        matrix.len(),
        matrix.instrument(),
        file.timing().ticks()
    );
    Ok(matrix)
}

#[doc = r#"
Convert note vectors into container bytes with the default settings.

`rows` must hold one note vector of `instrument` per row. The file is format 1
with a single track on the instrument's channel, ending with an end-of-track
event.

# Example
```rust
# use notematrix::prelude::*;
let drums = InstrumentClass::Percussive;
let kick = Note::new(drums, Key::new(36).unwrap(), 0., 48.);
let matrix = NoteMatrix::from_notes(drums, &[kick]).unwrap();

let timing = TicksPerQuarterNote::new(480).unwrap();
let bytes = import(matrix.rows(), timing, drums).unwrap();

let file = MidiFile::parse(bytes).unwrap();
assert_eq!(file.events().len(), 3);
assert!(file.events()[0].is_percussion());
assert_eq!(file.events()[1].delta_time(), 480);
assert!(file.events()[2].is_end_of_track());
```
"#]
pub fn import(
    rows: ArrayView2<f64>,
    timing: TicksPerQuarterNote,
    instrument: InstrumentClass,
) -> Result<Vec<u8>> {
    import_with(rows, timing, instrument, &ConversionConfig::default())
}

/// Convert note vectors into container bytes
pub fn import_with(
    rows: ArrayView2<f64>,
    timing: TicksPerQuarterNote,
    instrument: InstrumentClass,
    config: &ConversionConfig,
) -> Result<Vec<u8>> {
    let matrix = NoteMatrix::new(instrument, rows.to_owned())?;
    matrix_to_file(&matrix, timing, config).map(|file| file.to_bytes())
}

/// Turn a note matrix into a single-track file
pub fn matrix_to_file(
    matrix: &NoteMatrix,
    timing: TicksPerQuarterNote,
    config: &ConversionConfig,
) -> Result<MidiFile> {
    let track = matrix.to_track(timing)?;
    let mut events = notes_to_events(&track, config)?;
    events.push(TrackEvent::end_of_track(0));

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Imported {} {} note(s) as {} event(s)",
        matrix.len(),
        matrix.instrument(),
        events.len()
    );
    Ok(MidiFile::new(timing, events))
}

/// Convert container bytes into a notes file framed by `config.frame`
pub fn export_notes_file<B>(bytes: B, config: &ConversionConfig) -> Result<NotesFile>
where
    B: Into<Vec<u8>>,
{
    Ok(NotesFile::new(export_with(bytes, config)?, config.frame))
}

/// Convert a notes file into container bytes at `config.output_ticks_per_quarter_note`
pub fn import_notes_file(file: &NotesFile, config: &ConversionConfig) -> Result<Vec<u8>> {
    let timing = TicksPerQuarterNote::new(config.output_ticks_per_quarter_note)?;
    matrix_to_file(file.matrix(), timing, config).map(|file| file.to_bytes())
}

#[cfg(test)]
use crate::{
    events::{Channel, ChannelMessage},
    pitch::Key,
};

#[test]
fn unsupported_without_notes() {
    let timing = TicksPerQuarterNote::new(96).unwrap();
    let bytes = MidiFile::new(timing, vec![TrackEvent::end_of_track(0)]).to_bytes();
    assert!(matches!(export(bytes.clone()), Err(Error::UnsupportedContainer)));

    let file = MidiFile::parse(bytes).unwrap();
    let matrix = file_to_matrix(&file, &ConversionConfig::default()).unwrap();
    assert!(matrix.is_empty());
    assert_eq!(matrix.rows().ncols(), 41);
}

#[test]
fn unknown_drum_is_fatal() {
    let timing = TicksPerQuarterNote::new(96).unwrap();
    let cowbell = Key::new(56).unwrap();
    let bytes = MidiFile::new(
        timing,
        vec![
            TrackEvent::new(0, ChannelMessage::note_on(Channel::PERCUSSION, cowbell, 90)),
            TrackEvent::new(24, ChannelMessage::note_off(Channel::PERCUSSION, cowbell, 0)),
            TrackEvent::end_of_track(0),
        ],
    )
    .to_bytes();
    assert!(matches!(export(bytes), Err(Error::UnknownPitch { .. })));
}

#[test]
fn notes_file_uses_output_rate() {
    let melodic = InstrumentClass::Melodic;
    let note = crate::note::Note::new(melodic, Key::new(50).unwrap(), 0., 48.);
    let file = NotesFile::new(
        NoteMatrix::from_notes(melodic, &[note]).unwrap(),
        crate::frame::FrameGeometry::DEFAULT,
    );

    let bytes = import_notes_file(&file, &ConversionConfig::default()).unwrap();
    let parsed = MidiFile::parse(bytes).unwrap();
    assert_eq!(parsed.timing().ticks(), 960);
    assert_eq!(parsed.events()[1].delta_time(), 960);

    let config = ConversionConfig::default().with_output_ticks_per_quarter_note(0);
    assert!(matches!(import_notes_file(&file, &config), Err(Error::Parse(_))));
}
