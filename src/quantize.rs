#![doc = r#"
Snapping times onto the 24 allowed note lengths

# Overview

Every delta-time and duration is stored as one of 24 values: eight base
lengths, each in a normal, triplet or dotted variant. With 48 note-time units
per quarter note the table reads

| length        | normal (×3) | triplet (×2) | dotted (×4.5) |
|---------------|-------------|--------------|---------------|
| zero          | 0           | 0            | 0             |
| 1/64          | 3           | 2            | 4.5           |
| 1/32          | 6           | 4            | 9             |
| 1/16          | 12          | 8            | 18            |
| 1/8           | 24          | 16           | 36            |
| 1/4           | 48          | 32           | 72            |
| 1/2           | 96          | 64           | 144           |
| whole         | 192         | 128          | 288           |

A time is replaced by the nearest entry. Ties go to the entry met first when
scanning the normal row, then the triplet row, then the dotted row, each from
short to long.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::note::Note;

/// Base lengths in note-time units, before the kind multiplier
pub const BASE_LENGTHS: [f64; 8] = [0., 1., 2., 4., 8., 16., 32., 64.];

/// The allowed timings, one row per [`TimeKind`], one column per [`NoteLength`]
pub const POSSIBLE_TIMINGS: [[f64; 8]; 3] = [
    timing_row(TimeKind::Normal),
    timing_row(TimeKind::Triplet),
    timing_row(TimeKind::Dotted),
];

const fn timing_row(kind: TimeKind) -> [f64; 8] {
    let mut row = [0.; 8];
    let mut i = 0;
    while i < 8 {
        row[i] = BASE_LENGTHS[i] * kind.multiplier();
        i += 1;
    }
    row
}

/// The length part of a quantized time, shortest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NoteLength {
    /// No time at all
    Zero = 0,
    /// 1/64
    SixtyFourth,
    /// 1/32
    ThirtySecond,
    /// 1/16
    Sixteenth,
    /// 1/8
    Eighth,
    /// 1/4
    Quarter,
    /// 1/2
    Half,
    /// A whole note
    Whole,
}

impl NoteLength {
    /// Number of lengths
    pub const COUNT: usize = 8;

    /// Slot of this length in a time vector
    pub fn index(&self) -> usize {
        u8::from(*self) as usize
    }

    /// The length in slot `index`, if there is one
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(|i| Self::try_from(i).ok())
    }
}

/// The rhythmic variant of a quantized time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TimeKind {
    /// Plain lengths
    Normal = 0,
    /// Two thirds of the plain length
    Triplet,
    /// One and a half times the plain length
    Dotted,
}

impl TimeKind {
    /// Number of kinds
    pub const COUNT: usize = 3;

    /// Multiplier applied to [`BASE_LENGTHS`]
    pub const fn multiplier(&self) -> f64 {
        match self {
            Self::Normal => 3.,
            Self::Triplet => 2.,
            Self::Dotted => 4.5,
        }
    }

    /// Slot of this kind in the type part of a time vector
    pub fn index(&self) -> usize {
        u8::from(*self) as usize
    }

    /// The kind in slot `index`, if there is one
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(|i| Self::try_from(i).ok())
    }
}

#[doc = r#"
One entry of the timing table.

# Example
```rust
# use notematrix::prelude::*;
let time = QuantizedTime::nearest(35.);
assert_eq!(time, QuantizedTime::new(NoteLength::Eighth, TimeKind::Dotted));
assert_eq!(time.units(), 36.);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizedTime {
    length: NoteLength,
    kind: TimeKind,
}

impl QuantizedTime {
    /// Create a quantized time
    pub const fn new(length: NoteLength, kind: TimeKind) -> Self {
        Self { length, kind }
    }

    /// The table entry nearest to `units`
    pub fn nearest(units: f64) -> Self {
        let mut best = Self::new(NoteLength::Zero, TimeKind::Normal);
        let mut best_distance = f64::INFINITY;
        for kind in [TimeKind::Normal, TimeKind::Triplet, TimeKind::Dotted] {
            for (i, value) in POSSIBLE_TIMINGS[kind.index()].iter().enumerate() {
                let distance = (value - units).abs();
                if distance < best_distance {
                    best_distance = distance;
                    // i < 8
                    best = Self::new(NoteLength::from_index(i).unwrap_or(NoteLength::Zero), kind);
                }
            }
        }
        best
    }

    /// The length part
    pub const fn length(&self) -> NoteLength {
        self.length
    }

    /// The kind part
    pub const fn kind(&self) -> TimeKind {
        self.kind
    }

    /// The value in note-time units
    pub fn units(&self) -> f64 {
        POSSIBLE_TIMINGS[self.kind.index()][self.length.index()]
    }
}

/// Snap `units` onto the nearest allowed timing
pub fn quantize(units: f64) -> f64 {
    QuantizedTime::nearest(units).units()
}

impl Note {
    /// The note with delta-time and duration snapped onto allowed timings
    pub fn quantized(&self) -> Note {
        let mut note = *self;
        note.set_delta_time(quantize(self.delta_time()));
        note.set_duration(quantize(self.duration()));
        note
    }
}

#[test]
fn table_rows() {
    assert_eq!(POSSIBLE_TIMINGS[0], [0., 3., 6., 12., 24., 48., 96., 192.]);
    assert_eq!(POSSIBLE_TIMINGS[1], [0., 2., 4., 8., 16., 32., 64., 128.]);
    assert_eq!(POSSIBLE_TIMINGS[2], [0., 4.5, 9., 18., 36., 72., 144., 288.]);
}

#[test]
fn nearest_entries() {
    assert_eq!(QuantizedTime::nearest(96.), QuantizedTime::new(NoteLength::Half, TimeKind::Normal));
    assert_eq!(QuantizedTime::nearest(32.), QuantizedTime::new(NoteLength::Quarter, TimeKind::Triplet));
    assert_eq!(QuantizedTime::nearest(36.), QuantizedTime::new(NoteLength::Eighth, TimeKind::Dotted));
    assert_eq!(QuantizedTime::nearest(0.4), QuantizedTime::new(NoteLength::Zero, TimeKind::Normal));
    assert_eq!(QuantizedTime::nearest(10_000.), QuantizedTime::new(NoteLength::Whole, TimeKind::Dotted));
}

#[test]
fn ties_prefer_earlier_rows() {
    // 17 is one unit from both 16 (triplet) and 18 (dotted)
    assert_eq!(QuantizedTime::nearest(17.).kind(), TimeKind::Triplet);
    // 5 is one unit from 4 (triplet) and 6 (normal)
    assert_eq!(QuantizedTime::nearest(5.).kind(), TimeKind::Normal);
}

#[test]
fn quarter_note_of_ticks() {
    // 96 ticks at 96 ticks per quarter note is 48 units
    let units = 96. / (96. / 48.);
    assert_eq!(QuantizedTime::nearest(units), QuantizedTime::new(NoteLength::Quarter, TimeKind::Normal));
}

#[test]
fn quantize_is_idempotent() {
    let mut t = 0.;
    while t < 400. {
        let once = quantize(t);
        assert_eq!(quantize(once), once, "time {t}");
        t += 0.25;
    }
}

#[test]
fn every_entry_maps_to_itself() {
    for kind in [TimeKind::Normal, TimeKind::Triplet, TimeKind::Dotted] {
        for i in 1..NoteLength::COUNT {
            let time = QuantizedTime::new(NoteLength::from_index(i).unwrap(), kind);
            assert_eq!(QuantizedTime::nearest(time.units()), time);
        }
    }
}
