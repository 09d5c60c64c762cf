#![doc = r#"
Rusty representation of a [`MidiFile`]

# Overview

A container is a header chunk followed by any number of chunks:

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Unknown Chunk: "XFIH"]
...
```

This crate treats every file as a single effective track: chunks are read in
order until a track carrying at least one note event turns up, and that
track's events are kept. Unknown chunks and empty tracks along the way are
skipped and reported as [`Warning::UnrecognizedChunk`]. Reading stops after
the number of `MTrk` chunks the header announces; unknown chunks do not count
towards it, and bytes after the last announced track are never looked at.

A file whose chunks carry no note events still parses; it simply has no
events.
"#]

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{
    Warning,
    cursor::{ByteCursor, ReadResult},
    events::{TrackEvent, has_note_events},
};

#[doc = r#"
The header of a container and the events of its effective track.

# Example
```rust
# use notematrix::prelude::*;
let timing = TicksPerQuarterNote::new(96).unwrap();
let key = Key::new(60).unwrap();
let file = MidiFile::new(
    timing,
    vec![
        TrackEvent::new(0, ChannelMessage::note_on(Channel::DEFAULT, key, 64)),
        TrackEvent::new(96, ChannelMessage::note_off(Channel::DEFAULT, key, 0)),
        TrackEvent::end_of_track(0),
    ],
);

let bytes = file.to_bytes();
let parsed = MidiFile::parse(bytes).unwrap();
assert_eq!(parsed.events(), file.events());
assert!(parsed.warnings().is_empty());
```
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiFile {
    header: MidiFileHeader,
    events: Vec<TrackEvent>,
    warnings: Vec<Warning>,
}

impl MidiFile {
    /// A single-track file holding `events`
    pub fn new(timing: TicksPerQuarterNote, events: Vec<TrackEvent>) -> Self {
        Self {
            header: MidiFileHeader::single_track(timing),
            events,
            warnings: Vec::new(),
        }
    }

    /// Parse a set of bytes into a file struct
    pub fn parse<B>(bytes: B) -> ReadResult<Self>
    where
        B: Into<Vec<u8>>,
    {
        let mut cursor = ByteCursor::from_bytes(bytes);
        let header = MidiFileHeader::read(&mut cursor)?;

        let mut events = Vec::new();
        let mut warnings = Vec::new();
        let mut tracks_read = 0usize;

        while tracks_read < header.num_tracks() as usize && !cursor.is_exhausted() {
            let chunk = TrackChunk::read(&mut cursor)?;
            if chunk.is_track() {
                tracks_read += 1;
            }
            if let Some(warning) = chunk.warning() {
                #[cfg(feature = "tracing")]
                tracing::warn!("{warning}");
                warnings.push(warning);
                continue;
            }
            if let TrackChunk::Events(track) = chunk {
                if has_note_events(&track) {
                    events = track;
                    break;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Parsed format {:?} file: {} of {} track(s) read, {} event(s) kept, {} chunk(s) skipped",
            header.format(),
            tracks_read,
            header.num_tracks(),
            events.len(),
            warnings.len()
        );

        Ok(Self {
            header,
            events,
            warnings,
        })
    }

    /// Serialize as a format 1 file with a single track
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut cursor = ByteCursor::new();
        MidiFileHeader::single_track(self.header.timing()).write(&mut cursor);
        write_track(&self.events, &mut cursor);
        cursor.into_inner()
    }

    /// Returns header info
    pub const fn header(&self) -> &MidiFileHeader {
        &self.header
    }

    /// The division of the file
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.header.timing()
    }

    /// Events of the effective track, empty if no track carries notes
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// True if the effective track carries note events
    pub fn has_notes(&self) -> bool {
        has_note_events(&self.events)
    }

    /// Chunks skipped while looking for the effective track
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Take the events out of the file
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }
}

#[cfg(test)]
use crate::{
    events::{Channel, ChannelMessage, MetaKind, MetaMessage},
    pitch::Key,
};

#[cfg(test)]
fn header_bytes(num_tracks: u16) -> Vec<u8> {
    let mut cursor = ByteCursor::new();
    MidiFileHeader::new(
        FormatType::Simultaneous,
        num_tracks,
        TicksPerQuarterNote::new(480).unwrap(),
    )
    .write(&mut cursor);
    cursor.into_inner()
}

#[cfg(test)]
fn track(events: &[TrackEvent]) -> Vec<u8> {
    let mut cursor = ByteCursor::new();
    write_track(events, &mut cursor);
    cursor.into_inner()
}

#[test]
fn first_note_track_wins() {
    let key = Key::new(40).unwrap();
    let conductor = [
        TrackEvent::new(0, MetaMessage::new(MetaKind::Tempo, vec![0x07, 0xA1, 0x20])),
        TrackEvent::end_of_track(0),
    ];
    let lead = vec![
        TrackEvent::new(0, ChannelMessage::note_on(Channel::new(3), key, 80)),
        TrackEvent::new(480, ChannelMessage::note_off(Channel::new(3), key, 0)),
        TrackEvent::end_of_track(0),
    ];
    let bass = [
        TrackEvent::new(0, ChannelMessage::note_on(Channel::new(4), key, 80)),
        TrackEvent::end_of_track(10),
    ];

    let mut bytes = header_bytes(3);
    bytes.extend(track(&conductor));
    bytes.extend(b"XFIH\0\0\0\x01\x00");
    bytes.extend(track(&lead));
    bytes.extend(track(&bass));

    let file = MidiFile::parse(bytes).unwrap();
    assert_eq!(file.timing().ticks(), 480);
    assert_eq!(file.events(), lead.as_slice());
    assert_eq!(
        file.warnings(),
        [Warning::UnrecognizedChunk {
            tag: *b"XFIH",
            length: 1
        }]
    );
}

#[test]
fn no_note_track_means_no_events() {
    let mut bytes = header_bytes(1);
    bytes.extend(b"JUNK\0\0\0\x02ab");
    let file = MidiFile::parse(bytes).unwrap();
    assert!(file.events().is_empty());
    assert!(!file.has_notes());
    assert_eq!(file.warnings().len(), 1);
}

#[test]
fn written_header_is_single_track() {
    let file = MidiFile::new(TicksPerQuarterNote::new(960).unwrap(), vec![TrackEvent::end_of_track(0)]);
    let bytes = file.to_bytes();
    assert_eq!(&bytes[..14], b"MThd\0\0\0\x06\0\x01\0\x01\x03\xC0");
    assert_eq!(&bytes[14..], b"MTrk\0\0\0\x04\x00\xFF\x2F\x00");
}

#[test]
fn reading_stops_at_announced_track_count() {
    let key = Key::new(40).unwrap();
    let lead = [
        TrackEvent::new(0, ChannelMessage::note_on(Channel::DEFAULT, key, 80)),
        TrackEvent::new(480, ChannelMessage::note_off(Channel::DEFAULT, key, 0)),
        TrackEvent::end_of_track(0),
    ];

    // the note track comes after the single announced track
    let mut bytes = header_bytes(1);
    bytes.extend(track(&[TrackEvent::end_of_track(0)]));
    bytes.extend(b"XFIH\0\0\0\x01\x00");
    bytes.extend(track(&lead));
    let file = MidiFile::parse(bytes).unwrap();
    assert!(!file.has_notes());
    assert!(file.warnings().is_empty());

    // unknown chunks are not tracks
    let mut bytes = header_bytes(1);
    bytes.extend(b"XFIH\0\0\0\x01\x00");
    bytes.extend(track(&lead));
    bytes.extend([0x00, 0x00]);
    let file = MidiFile::parse(bytes).unwrap();
    assert_eq!(file.events(), lead.as_slice());
}
