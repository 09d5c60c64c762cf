#![doc = r#"
Conversion between track events and notes

# Events to notes

1. Every note-on is paired with the release of its key. Times are absolute
   ticks; each pair also records the ticks since the previous onset.
2. Onset gaps longer than `max_quarter_notes_interval` quarter notes are cut
   down, and the cut-off time becomes pauses in front of the note.
3. Optionally, onsets a hair after the previous one are snapped onto it.
4. No note of a chord outlives the shortest chord member or the next onset.
5. Optionally, silences between a note's end and the next onset become pauses.
6. The instrument class is read from the first note event's channel, and all
   times are rescaled from ticks to note-time units.

# Notes to events

Each sounding note yields a start and a stop token at its absolute tick. The
tokens are drained from a min-heap ordered by tick, then stop before start,
then creation order, and each becomes a note-on or note-off whose delta-time
is the distance to the previous token.
"#]

mod chords;
mod pairing;
mod pauses;
mod tokens;

use crate::{
    Result, Warning,
    config::ConversionConfig,
    events::TrackEvent,
    file::TicksPerQuarterNote,
    note::{InstrumentClass, Note, NoteTrack},
    pitch::Pitch,
};

use tokens::{TokenOutput, TokenQueue};

/// A note measured in ticks, before rescaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TickNote {
    pub pitch: Pitch,
    pub delta: u64,
    pub duration: u64,
}

impl TickNote {
    pub const fn new(pitch: Pitch, delta: u64, duration: u64) -> Self {
        Self {
            pitch,
            delta,
            duration,
        }
    }

    pub const fn pause(delta: u64, duration: u64) -> Self {
        Self::new(Pitch::Pause, delta, duration)
    }
}

/// The notes extracted from a track, and the anomalies repaired on the way
#[derive(Debug, Clone, PartialEq)]
pub struct NoteConversion {
    /// The extracted notes
    pub track: NoteTrack,
    /// Unmatched releases and dangling onsets
    pub warnings: Vec<Warning>,
}

/// The instrument class of a track: percussive if its first note event is on
/// the percussion channel. Tracks without notes are melodic.
pub fn detect_instrument(events: &[TrackEvent]) -> InstrumentClass {
    events
        .iter()
        .find_map(|event| event.channel_message().filter(|m| m.is_note_event()))
        .map(|message| InstrumentClass::from_channel(message.channel()))
        .unwrap_or(InstrumentClass::Melodic)
}

#[doc = r#"
Extract the notes of a track.

# Example
```rust
# use notematrix::prelude::*;
let key = Key::new(60).unwrap();
let events = [
    TrackEvent::new(96, ChannelMessage::note_on(Channel::DEFAULT, key, 100)),
    TrackEvent::new(48, ChannelMessage::note_off(Channel::DEFAULT, key, 0)),
    TrackEvent::end_of_track(0),
];
let timing = TicksPerQuarterNote::new(96).unwrap();

let conversion = events_to_notes(&events, timing, &ConversionConfig::default());
let notes = conversion.track.notes();
assert_eq!(notes.len(), 1);
// 96 ticks is a quarter note, 48 units
assert_eq!(notes[0].delta_time(), 48.);
assert_eq!(notes[0].duration(), 24.);
```
"#]
pub fn events_to_notes(
    events: &[TrackEvent],
    timing: TicksPerQuarterNote,
    config: &ConversionConfig,
) -> NoteConversion {
    let (pairs, warnings) = pairing::pair_up(events);
    let max_interval = config.max_interval(timing.ticks());

    let mut notes = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        let (delta, pauses) = pauses::trim_delta_time(pair.delta, max_interval);
        notes.extend(pauses);
        notes.push(TickNote::new(Pitch::Key(pair.key), delta, pair.duration()));
    }

    if config.snap_chords {
        chords::snap_chords(&mut notes, config.minimal_interval(timing.ticks()));
    }
    chords::trim_chord_durations(&mut notes);
    if config.fill_rests {
        notes = pauses::fill_rests(notes);
    }

    let instrument = detect_instrument(events);
    let ticks_per_unit = timing.ticks_per_unit(config.time_units_per_quarter_note);
    let notes: Vec<Note> = notes
        .into_iter()
        .map(|n| {
            Note::new(
                instrument,
                n.pitch,
                n.delta as f64 / ticks_per_unit,
                n.duration as f64 / ticks_per_unit,
            )
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Extracted {} {instrument} note(s) from {} pair(s), {} warning(s)",
        notes.len(),
        pairs.len(),
        warnings.len()
    );

    NoteConversion {
        track: NoteTrack::from_parts(timing, instrument, notes),
        warnings,
    }
}

#[doc = r#"
Turn notes back into note-on and note-off events.

Notes go to the instrument class's channel with the configured velocities.
No end-of-track event is added.

# Example
```rust
# use notematrix::prelude::*;
let timing = TicksPerQuarterNote::new(96).unwrap();
let key = Key::new(60).unwrap();
let track = NoteTrack::from_notes(
    timing,
    InstrumentClass::Melodic,
    vec![
        Note::new(InstrumentClass::Melodic, key, 0., 24.),
        Note::new(InstrumentClass::Melodic, key, 24., 24.),
    ],
)
.unwrap();

let events = notes_to_events(&track, &ConversionConfig::default()).unwrap();
let deltas: Vec<_> = events.iter().map(|e| e.delta_time()).collect();
// the first note's release and the second's onset share tick 48
assert_eq!(deltas, [0, 48, 0, 48]);
assert!(events[1].is_note_off() && events[2].is_note_on());
```
"#]
pub fn notes_to_events(track: &NoteTrack, config: &ConversionConfig) -> Result<Vec<TrackEvent>> {
    let ticks_per_unit = track
        .timing()
        .ticks_per_unit(config.time_units_per_quarter_note);

    let mut queue = TokenQueue::new();
    queue.extend_from_notes(track.notes(), ticks_per_unit);
    queue.into_events(TokenOutput {
        channel: track.instrument().channel(),
        on_velocity: config.on_velocity,
        off_velocity: config.off_velocity,
    })
}

#[cfg(test)]
use crate::{
    events::{Channel, ChannelMessage},
    pitch::Key,
};
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn event(delta: u32, status: u8, key: u8, velocity: u8) -> TrackEvent {
    let channel = Channel::new(status);
    let key = Key::new(key).unwrap();
    let message = if status & 0xF0 == 0x90 {
        ChannelMessage::note_on(channel, key, velocity)
    } else {
        ChannelMessage::note_off(channel, key, velocity)
    };
    TrackEvent::new(delta, message)
}

/// Two overlapping notes and a repeat of the first, with meta events between
#[cfg(test)]
fn sample_events(on: u8, off: u8) -> Vec<TrackEvent> {
    vec![
        TrackEvent::end_of_track(0x20),
        event(0x10, on, 0x20, 0x40),
        event(0x30, off, 0x20, 0x00),
        event(0x10, on, 0x30, 0x40),
        TrackEvent::end_of_track(0x20),
        event(0x10, on, 0x20, 0x40),
        event(0x10, off, 0x30, 0x00),
        event(0x30, off, 0x20, 0x00),
    ]
}

#[cfg(test)]
fn shape(notes: &[Note]) -> Vec<(Pitch, f64, f64)> {
    notes
        .iter()
        .map(|n| (n.pitch(), n.delta_time(), n.duration()))
        .collect()
}

#[cfg(test)]
fn key(byte: u8) -> Pitch {
    Pitch::Key(Key::new(byte).unwrap())
}

#[test]
fn melodic_events_to_notes() {
    // 48 ticks per quarter note makes one tick one unit
    let timing = TicksPerQuarterNote::new(48).unwrap();
    let conversion = events_to_notes(&sample_events(0x90, 0x80), timing, &ConversionConfig::default());

    assert!(conversion.warnings.is_empty());
    assert_eq!(conversion.track.instrument(), InstrumentClass::Melodic);
    assert_eq!(
        shape(conversion.track.notes()),
        vec![
            (key(0x20), 48., 48.),
            (key(0x30), 64., 48.),
            (key(0x20), 48., 64.),
        ]
    );
}

#[test]
fn drum_events_to_notes_rescaled() {
    // two ticks per unit
    let timing = TicksPerQuarterNote::new(96).unwrap();
    let conversion = events_to_notes(&sample_events(0x99, 0x89), timing, &ConversionConfig::default());

    assert_eq!(conversion.track.instrument(), InstrumentClass::Percussive);
    assert_eq!(
        shape(conversion.track.notes()),
        vec![
            (key(0x20), 24., 24.),
            (key(0x30), 32., 24.),
            (key(0x20), 24., 32.),
        ]
    );
}

#[test]
fn long_gap_becomes_pauses() {
    let timing = TicksPerQuarterNote::new(48).unwrap();
    // max interval is 4 quarter notes, 192 ticks
    let events = [
        event(0, 0x90, 60, 64),
        event(24, 0x80, 60, 0),
        event(400, 0x90, 62, 64),
        event(24, 0x80, 62, 0),
    ];
    let conversion = events_to_notes(&events, timing, &ConversionConfig::default());
    assert_eq!(
        shape(conversion.track.notes()),
        vec![
            (key(60), 0., 24.),
            (Pitch::Pause, 192., 192.),
            (Pitch::Pause, 192., 40.),
            (key(62), 40., 24.),
        ]
    );
}

#[test]
fn instrument_from_first_note_event() {
    let events = [
        TrackEvent::end_of_track(0),
        event(0, 0x89, 36, 0),
        event(0, 0x90, 60, 64),
    ];
    assert_eq!(detect_instrument(&events), InstrumentClass::Percussive);
    assert_eq!(detect_instrument(&events[..1]), InstrumentClass::Melodic);
}

#[test]
fn drum_notes_to_events() {
    let timing = TicksPerQuarterNote::new(96).unwrap();
    let drums = InstrumentClass::Percussive;
    let track = NoteTrack::from_notes(
        timing,
        drums,
        vec![
            Note::pause(drums, 0., 24.),
            Note::new(drums, Key::new(0x20).unwrap(), 24., 24.),
            Note::pause(drums, 24., 8.),
            Note::new(drums, Key::new(0x30).unwrap(), 8., 24.),
            Note::new(drums, Key::new(0x20).unwrap(), 24., 32.),
        ],
    )
    .unwrap();

    let events = notes_to_events(&track, &ConversionConfig::default()).unwrap();
    let encoded: Vec<_> = events
        .iter()
        .map(|e| {
            let m = e.channel_message().unwrap();
            (e.delta_time(), m.status(), m.data().to_vec())
        })
        .collect();
    assert_eq!(
        encoded,
        vec![
            (0x30, 0x99, vec![0x20, 0x40]),
            (0x30, 0x89, vec![0x20, 0x00]),
            (0x10, 0x99, vec![0x30, 0x40]),
            (0x30, 0x89, vec![0x30, 0x00]),
            (0x00, 0x99, vec![0x20, 0x40]),
            (0x40, 0x89, vec![0x20, 0x00]),
        ]
    );
}

#[test]
fn repeated_pitch_keeps_its_length() {
    let timing = TicksPerQuarterNote::new(48).unwrap();
    let melodic = InstrumentClass::Melodic;
    let a = Key::new(57).unwrap();
    let track = NoteTrack::from_notes(
        timing,
        melodic,
        vec![
            Note::new(melodic, a, 0., 12.),
            Note::new(melodic, a, 12., 12.),
        ],
    )
    .unwrap();

    let events = notes_to_events(&track, &ConversionConfig::default()).unwrap();
    let back = events_to_notes(&events, timing, &ConversionConfig::default());
    assert_eq!(
        shape(back.track.notes()),
        vec![(Pitch::Key(a), 0., 12.), (Pitch::Key(a), 12., 12.)]
    );
}

#[test]
fn distant_onset_is_an_error() {
    let timing = TicksPerQuarterNote::new(48).unwrap();
    let melodic = InstrumentClass::Melodic;
    let a = Key::new(57).unwrap();
    let track = NoteTrack::from_notes(
        timing,
        melodic,
        vec![
            Note::new(melodic, a, 0., 12.),
            Note::new(melodic, a, 1e12, 12.),
        ],
    )
    .unwrap();

    assert!(matches!(
        notes_to_events(&track, &ConversionConfig::default()),
        Err(crate::Error::DeltaOverflow { .. })
    ));
}

#[test]
fn snapping_and_rests_are_opt_in() {
    let timing = TicksPerQuarterNote::new(48).unwrap();
    let events = [
        event(0, 0x90, 60, 64),
        event(1, 0x90, 64, 64),
        event(11, 0x80, 60, 0),
        event(0, 0x80, 64, 0),
        event(12, 0x90, 67, 64),
        event(12, 0x80, 67, 0),
    ];

    let plain = events_to_notes(&events, timing, &ConversionConfig::default());
    assert_eq!(
        shape(plain.track.notes()),
        vec![(key(60), 0., 1.), (key(64), 1., 11.), (key(67), 23., 12.)]
    );

    let config = ConversionConfig::default().with_snap_chords(true).with_fill_rests(true);
    let tidy = events_to_notes(&events, timing, &config);
    assert_eq!(
        shape(tidy.track.notes()),
        vec![
            (key(60), 0., 12.),
            (key(64), 0., 12.),
            (Pitch::Pause, 12., 12.),
            (key(67), 12., 12.),
        ]
    );
}
