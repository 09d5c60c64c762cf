#![doc = r#"
Notes, the intermediate representation between events and vectors

A [`Note`] is a pitch (or a pause) with a delta-time since the previous note's
onset and a duration, both measured in note-time units. Every note belongs
to an [`InstrumentClass`], which fixes the pitch vocabulary used when the note
becomes a vector and the channel used when it becomes events again.
"#]

use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    Error, Result,
    events::Channel,
    file::TicksPerQuarterNote,
    pitch::Pitch,
};

#[doc = r#"
The two instrument classes a track can hold.

A track is percussive when its first note event is on the percussion channel
(channel 10, index 9), melodic otherwise.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum InstrumentClass {
    /// Pitched instruments, vectorized by pitch class and octave
    Melodic = 0,
    /// Drum kits, vectorized over a fixed list of drum keys
    Percussive = 1,
}

impl InstrumentClass {
    /// The class of notes played on `channel`
    pub const fn from_channel(channel: Channel) -> Self {
        if channel.is_percussion() {
            Self::Percussive
        } else {
            Self::Melodic
        }
    }

    /// The channel notes of this class are written to
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Melodic => Channel::DEFAULT,
            Self::Percussive => Channel::PERCUSSION,
        }
    }

    /// The tag stored in notes file headers
    pub fn tag(&self) -> i32 {
        u8::from(*self) as i32
    }

    /// Parse a notes file header tag
    pub fn from_tag(tag: i32) -> Result<Self> {
        u8::try_from(tag)
            .ok()
            .and_then(|byte| Self::try_from(byte).ok())
            .ok_or(Error::InstrumentTag(tag))
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Melodic => f.write_str("melodic"),
            Self::Percussive => f.write_str("percussive"),
        }
    }
}

#[doc = r#"
A single note.

`delta_time` is the distance from the previous note's onset, `duration` the
time the note sounds. Both are in note-time units (48 per quarter note by
default) and are fractional until the note is [quantized](Note::quantized).

# Example
```rust
# use notematrix::prelude::*;
let key = Key::new(64).unwrap();
let note = Note::new(InstrumentClass::Melodic, key, 17., 47.);

let quantized = note.quantized();
assert_eq!(quantized.delta_time(), 16.);
assert_eq!(quantized.duration(), 48.);
assert_eq!(quantized.pitch(), Pitch::Key(key));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    instrument: InstrumentClass,
    pitch: Pitch,
    delta_time: f64,
    duration: f64,
}

impl Note {
    /// Create a new note
    pub fn new(instrument: InstrumentClass, pitch: impl Into<Pitch>, delta_time: f64, duration: f64) -> Self {
        Self {
            instrument,
            pitch: pitch.into(),
            delta_time,
            duration,
        }
    }

    /// Create a pause
    pub const fn pause(instrument: InstrumentClass, delta_time: f64, duration: f64) -> Self {
        Self {
            instrument,
            pitch: Pitch::Pause,
            delta_time,
            duration,
        }
    }

    /// The instrument class
    pub const fn instrument(&self) -> InstrumentClass {
        self.instrument
    }

    /// The pitch
    pub const fn pitch(&self) -> Pitch {
        self.pitch
    }

    /// True for pauses
    pub const fn is_pause(&self) -> bool {
        self.pitch.is_pause()
    }

    /// Units since the previous note's onset
    pub const fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Units the note sounds for
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Replace the delta-time
    pub const fn set_delta_time(&mut self, delta_time: f64) {
        self.delta_time = delta_time;
    }

    /// Replace the duration
    pub const fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }
}

#[doc = r#"
The note-domain view of a track: its tick rate, its instrument class and its
notes, all of that class.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteTrack {
    timing: TicksPerQuarterNote,
    instrument: InstrumentClass,
    notes: Vec<Note>,
}

impl NoteTrack {
    /// An empty track
    pub const fn new(timing: TicksPerQuarterNote, instrument: InstrumentClass) -> Self {
        Self {
            timing,
            instrument,
            notes: Vec::new(),
        }
    }

    /// A track holding `notes`, which must all be of class `instrument`
    pub fn from_notes(
        timing: TicksPerQuarterNote,
        instrument: InstrumentClass,
        notes: Vec<Note>,
    ) -> Result<Self> {
        if let Some(note) = notes.iter().find(|n| n.instrument() != instrument) {
            return Err(Error::InstrumentMismatch {
                expected: instrument,
                found: note.instrument(),
            });
        }
        Ok(Self {
            timing,
            instrument,
            notes,
        })
    }

    pub(crate) const fn from_parts(
        timing: TicksPerQuarterNote,
        instrument: InstrumentClass,
        notes: Vec<Note>,
    ) -> Self {
        Self {
            timing,
            instrument,
            notes,
        }
    }

    /// Append a note of the track's class
    pub fn push(&mut self, note: Note) -> Result<()> {
        if note.instrument() != self.instrument {
            return Err(Error::InstrumentMismatch {
                expected: self.instrument,
                found: note.instrument(),
            });
        }
        self.notes.push(note);
        Ok(())
    }

    /// The tick rate of the track
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.timing
    }

    /// The instrument class shared by every note
    pub const fn instrument(&self) -> InstrumentClass {
        self.instrument
    }

    /// The notes
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// True if the track holds no notes
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Take the notes out of the track
    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }
}

#[cfg(test)]
use crate::pitch::Key;

#[test]
fn instrument_tags() {
    assert_eq!(InstrumentClass::Melodic.tag(), 0);
    assert_eq!(InstrumentClass::from_tag(1).unwrap(), InstrumentClass::Percussive);
    assert!(matches!(InstrumentClass::from_tag(2), Err(Error::InstrumentTag(2))));
    assert!(matches!(InstrumentClass::from_tag(-1), Err(Error::InstrumentTag(-1))));
}

#[test]
fn instrument_from_channel() {
    assert_eq!(InstrumentClass::from_channel(Channel::new(9)), InstrumentClass::Percussive);
    assert_eq!(InstrumentClass::from_channel(Channel::new(8)), InstrumentClass::Melodic);
    assert_eq!(InstrumentClass::Percussive.channel(), Channel::PERCUSSION);
}

#[test]
fn track_rejects_other_class() {
    let timing = TicksPerQuarterNote::new(96).unwrap();
    let mut track = NoteTrack::new(timing, InstrumentClass::Percussive);
    track.push(Note::pause(InstrumentClass::Percussive, 0., 6.)).unwrap();

    let err = track
        .push(Note::pause(InstrumentClass::Melodic, 0., 6.))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InstrumentMismatch {
            expected: InstrumentClass::Percussive,
            found: InstrumentClass::Melodic
        }
    ));
    assert_eq!(track.notes().len(), 1);
}
