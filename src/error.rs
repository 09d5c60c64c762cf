#![doc = r#"
Error and warning types for the crate

Fatal conditions are [`Error`]s (and, below the file level, [`ReaderError`]s).
Conditions the pipeline recovers from locally are reported as [`Warning`]s
next to the successful result, so a caller can decide whether a repaired
input is still worth keeping.
"#]

use crate::{
    cursor::ReaderError,
    note::InstrumentClass,
    pitch::Pitch,
};
use thiserror::Error;

/// Malformed bytes inside an otherwise readable buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A variable-length quantity needed more than 32 bits
    #[error("Variable length quantity does not fit in 32 bits")]
    VlqOverflow,
    /// A data byte showed up where a status byte was required
    #[error("Data byte {0:#04X} in status position with no running status")]
    MissingRunningStatus(u8),
    /// A system exclusive event was given a channel, meta or data status byte
    #[error("Status {0:#04X} cannot introduce a system exclusive event")]
    SysexStatus(u8),
    /// A value needed a clear leading bit
    #[error("Invalid data byte {0:#04X}, must be within 0..=127")]
    InvalidDataByte(u8),
    /// The file header was malformed
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// A chunk was malformed
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
}

/// Problems with the `MThd` chunk
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The first chunk is not `MThd`
    #[error("Expected MThd, found {0:?}")]
    InvalidTag([u8; 4]),
    /// The declared length cannot hold format, track count and division
    #[error("Header length {0} is shorter than 6 bytes")]
    Length(u32),
    /// The format word is not 0, 1 or 2
    #[error("Unknown file format {0}")]
    UnknownFormat(u16),
    /// Time code based division is not supported
    #[error("SMPTE timing ({0:#06X}) is not supported, expected ticks per quarter note")]
    SmpteTiming(u16),
    /// A division of zero ticks per quarter note
    #[error("Ticks per quarter note must be positive")]
    ZeroTicks,
}

/// Problems inside a track chunk
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The chunk body ran out before an end-of-track event
    #[error("Track ended without an end-of-track event")]
    MissingEndOfTrack,
}

#[doc = r#"
Anomalies that were repaired instead of aborting the conversion.

Each one is also logged through `tracing` when the `tracing` feature is enabled.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// A chunk that is not `MTrk`, or that has no body, was skipped
    #[error("Skipped chunk {tag:?} of {length} bytes")]
    UnrecognizedChunk {
        /// The four tag bytes
        tag: [u8; 4],
        /// Declared body length
        length: u32,
    },
    /// A note-off arrived for a key with no open note-on, and was ignored
    #[error("Release of key {key} at tick {tick} has no open onset")]
    UnmatchedRelease {
        /// Key number of the release
        key: u8,
        /// Absolute tick of the release
        tick: u64,
    },
    /// A note-on was still open when the track ended and was closed there
    #[error("Onset of key {key} still open at track end, closed at tick {tick}")]
    DanglingOnset {
        /// Key number of the onset
        key: u8,
        /// Absolute tick the note was closed at
        tick: u64,
    },
}

/// Every fatal error the crate reports
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the container or a notes file failed
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// A parameter was out of range, such as a zero tick rate
    #[error("Invalid parameter: {0}")]
    Parse(#[from] ParseError),
    /// A pitch has no slot in the instrument's pitch vocabulary
    #[error("{pitch} has no {instrument} pitch slot")]
    UnknownPitch {
        /// The instrument class whose vocabulary was searched
        instrument: InstrumentClass,
        /// The offending pitch
        pitch: Pitch,
    },
    /// No track in the container carries a note event
    #[error("Container has no track with note events")]
    UnsupportedContainer,
    /// Frame parameters must satisfy `i32::MAX >= width >= stride > 0`
    #[error("Invalid frame geometry: stride {stride}, width {width}")]
    FrameGeometry {
        /// Unique notes advanced per frame
        stride: usize,
        /// Notes per frame
        width: usize,
    },
    /// A note vector has the wrong number of values
    #[error("Note vector has {found} values, expected {expected}")]
    VectorWidth {
        /// Width required by the instrument class
        expected: usize,
        /// Width that was supplied
        found: usize,
    },
    /// A flat value array does not divide into whole note vectors
    #[error("{values} values do not divide into rows of {width}")]
    MatrixShape {
        /// Number of values read
        values: usize,
        /// Expected row width
        width: usize,
    },
    /// A notes file header names an unknown instrument class
    #[error("Unknown instrument tag {0}")]
    InstrumentTag(i32),
    /// A note of one instrument class was mixed into a sequence of another
    #[error("Expected a {expected} note, found a {found} note")]
    InstrumentMismatch {
        /// Instrument class of the sequence
        expected: InstrumentClass,
        /// Instrument class of the offending note
        found: InstrumentClass,
    },
    /// Two consecutive note events lie further apart than a delta-time can encode
    #[error("Gap of {gap} ticks before tick {tick} exceeds the delta-time range")]
    DeltaOverflow {
        /// Absolute tick of the later event
        tick: u64,
        /// Ticks since the previous event
        gap: u64,
    },
    /// File system errors from the path helpers
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias defaulting to the crate [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;
