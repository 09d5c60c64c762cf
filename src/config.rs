#![doc = r#"
Parameters of the conversion pipeline
"#]

use crate::frame::FrameGeometry;

/// Note-time units per quarter note. A 1/64 note is 3 units, a 1/64 triplet 2.
pub const NOTES_TIME_UNITS_PER_QUARTER_NOTE: u16 = 48;

/// Tick rate of files written when the caller has none to offer
pub const DEFAULT_TICKS_PER_QUARTER_NOTE: u16 = 960;

/// Longest gap between onsets, in quarter notes, before pauses are carved out
pub const MAX_QUARTER_NOTES_INTERVAL: u32 = 4;

/// Onsets closer than `tpqn / MINIMAL_NOTE_DIVISOR` ticks count as one chord when snapping
pub const MINIMAL_NOTE_DIVISOR: u32 = 24;

/// Velocity of generated note-on events
pub const DEFAULT_ON_VELOCITY: u8 = 64;

/// Velocity of generated note-off events
pub const DEFAULT_OFF_VELOCITY: u8 = 0;

#[doc = r#"
Settings shared by the forward (events to notes) and backward (notes to
events) conversions.

# Example
```rust
# use notematrix::prelude::*;
let config = ConversionConfig::new()
    .with_snap_chords(true)
    .with_frame(FrameGeometry::new(25, 50).unwrap());

assert_eq!(config.time_units_per_quarter_note, 48);
assert!(config.snap_chords && !config.fill_rests);
assert_eq!(config.frame.width(), 50);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionConfig {
    /// Note-time units per quarter note
    pub time_units_per_quarter_note: u16,
    /// Longest onset gap in quarter notes; longer gaps become pauses
    pub max_quarter_notes_interval: u32,
    /// Tick rate used when writing files without an explicit one
    pub output_ticks_per_quarter_note: u16,
    /// Velocity of written note-on events
    pub on_velocity: u8,
    /// Velocity of written note-off events
    pub off_velocity: u8,
    /// Move onsets closer than `tpqn / 24` ticks onto the previous onset
    pub snap_chords: bool,
    /// Insert pauses into the silence between a note's end and the next onset
    pub fill_rests: bool,
    /// Frame geometry of notes files
    pub frame: FrameGeometry,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionConfig {
    /// The default settings
    pub const fn new() -> Self {
        Self {
            time_units_per_quarter_note: NOTES_TIME_UNITS_PER_QUARTER_NOTE,
            max_quarter_notes_interval: MAX_QUARTER_NOTES_INTERVAL,
            output_ticks_per_quarter_note: DEFAULT_TICKS_PER_QUARTER_NOTE,
            on_velocity: DEFAULT_ON_VELOCITY,
            off_velocity: DEFAULT_OFF_VELOCITY,
            snap_chords: false,
            fill_rests: false,
            frame: FrameGeometry::DEFAULT,
        }
    }

    /// Set the note-time resolution
    pub const fn with_time_units_per_quarter_note(mut self, units: u16) -> Self {
        self.time_units_per_quarter_note = units;
        self
    }

    /// Set the longest onset gap in quarter notes
    pub const fn with_max_quarter_notes_interval(mut self, quarter_notes: u32) -> Self {
        self.max_quarter_notes_interval = quarter_notes;
        self
    }

    /// Set the tick rate of written files
    pub const fn with_output_ticks_per_quarter_note(mut self, ticks: u16) -> Self {
        self.output_ticks_per_quarter_note = ticks;
        self
    }

    /// Set the velocities of written note-on and note-off events
    pub const fn with_velocities(mut self, on: u8, off: u8) -> Self {
        self.on_velocity = on;
        self.off_velocity = off;
        self
    }

    /// Toggle chord snapping
    pub const fn with_snap_chords(mut self, snap: bool) -> Self {
        self.snap_chords = snap;
        self
    }

    /// Toggle rest filling
    pub const fn with_fill_rests(mut self, fill: bool) -> Self {
        self.fill_rests = fill;
        self
    }

    /// Set the frame geometry
    pub const fn with_frame(mut self, frame: FrameGeometry) -> Self {
        self.frame = frame;
        self
    }

    /// Longest onset gap in ticks at the given tick rate
    pub const fn max_interval(&self, ticks_per_quarter_note: u16) -> u64 {
        ticks_per_quarter_note as u64 * self.max_quarter_notes_interval as u64
    }

    /// Chord snapping threshold in ticks at the given tick rate
    pub const fn minimal_interval(&self, ticks_per_quarter_note: u16) -> u64 {
        ticks_per_quarter_note as u64 / MINIMAL_NOTE_DIVISOR as u64
    }
}
