#![warn(missing_docs)]
#![doc = r#"
Standard MIDI files as note matrices, and back.

# Overview

`notematrix` reads a MIDI file, extracts the notes of its first note-carrying
track, quantizes their timing onto 24 musical lengths and encodes each note as
a fixed-width one-hot vector. The result is a matrix a sequence model can be
trained on. The inverse path turns such a matrix into a playable file.

```text
bytes ──MidiFile──▶ events ──convert──▶ notes ──vector──▶ NoteMatrix ──frame──▶ frames
  ▲                                                           │
  └────────────────────────── import ◀────────────────────────┘
```

# Example
```rust
use notematrix::prelude::*;

let timing = TicksPerQuarterNote::new(480).unwrap();
let (c, e) = (Key::new(60).unwrap(), Key::new(64).unwrap());
let bytes = MidiFile::new(
    timing,
    vec![
        TrackEvent::new(0, ChannelMessage::note_on(Channel::DEFAULT, c, 64)),
        TrackEvent::new(480, ChannelMessage::note_off(Channel::DEFAULT, c, 0)),
        TrackEvent::new(0, ChannelMessage::note_on(Channel::DEFAULT, e, 64)),
        TrackEvent::new(240, ChannelMessage::note_off(Channel::DEFAULT, e, 0)),
        TrackEvent::end_of_track(0),
    ],
)
.to_bytes();

let matrix = export(&bytes[..]).unwrap();
assert_eq!(matrix.rows().dim(), (2, 41));

let rebuilt = import(matrix.rows(), timing, matrix.instrument()).unwrap();
assert_eq!(rebuilt, bytes);
```

# Features

- `tracing` (default): logs repaired anomalies and conversion summaries
- `serde`: `Serialize`/`Deserialize` for the value types
"#]

pub mod config;
pub mod convert;
pub mod cursor;
mod error;
pub mod events;
pub mod file;
pub mod frame;
pub mod matrix;
pub mod note;
pub mod notes_file;
pub mod pitch;
pub mod quantize;
pub mod transcode;
pub mod vector;

pub use error::*;

/// Everything needed to read, convert and write
pub mod prelude {
    pub use crate::{
        Error, Result, Warning,
        config::ConversionConfig,
        convert::{NoteConversion, events_to_notes, notes_to_events},
        cursor::{ByteCursor, ReadResult, ReaderError},
        events::{
            Channel, ChannelMessage, MetaKind, MetaMessage, SysexMessage, TrackEvent,
            TrackMessage, VoiceKind,
        },
        file::{FormatType, MidiFile, MidiFileHeader, TicksPerQuarterNote},
        frame::FrameGeometry,
        matrix::NoteMatrix,
        note::{InstrumentClass, Note, NoteTrack},
        notes_file::NotesFile,
        pitch::{Key, Octave, Pitch, PitchClass},
        quantize::{NoteLength, QuantizedTime, TimeKind, quantize},
        transcode::{export, export_with, import, import_with},
    };
}
