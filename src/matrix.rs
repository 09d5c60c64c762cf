#![doc = r#"
Note matrices: one note vector per row
"#]

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::{
    Error, Result,
    file::TicksPerQuarterNote,
    frame::FrameGeometry,
    note::{InstrumentClass, Note, NoteTrack},
};

#[doc = r#"
The notes of a track as a `(notes, vector_len)` matrix, tagged with the
instrument class that gives the columns their meaning.

# Example
```rust
# use notematrix::prelude::*;
let drums = InstrumentClass::Percussive;
let notes = [
    Note::new(drums, Key::new(36).unwrap(), 0., 24.),
    Note::pause(drums, 24., 48.),
];
let matrix = NoteMatrix::from_notes(drums, &notes).unwrap();
assert_eq!(matrix.rows().dim(), (2, 45));
assert_eq!(matrix.to_notes().unwrap(), notes);
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteMatrix {
    instrument: InstrumentClass,
    rows: Array2<f64>,
}

impl NoteMatrix {
    /// Wrap a matrix whose rows are note vectors of `instrument`
    pub fn new(instrument: InstrumentClass, rows: Array2<f64>) -> Result<Self> {
        let expected = instrument.vector_len();
        if rows.ncols() != expected {
            return Err(Error::VectorWidth {
                expected,
                found: rows.ncols(),
            });
        }
        Ok(Self { instrument, rows })
    }

    /// A matrix with no rows
    pub fn empty(instrument: InstrumentClass) -> Self {
        Self {
            instrument,
            rows: Array2::zeros((0, instrument.vector_len())),
        }
    }

    /// Vectorize notes, which must all be of class `instrument`
    pub fn from_notes(instrument: InstrumentClass, notes: &[Note]) -> Result<Self> {
        let mut rows = Array2::<f64>::zeros((notes.len(), instrument.vector_len()));
        for (note, mut row) in notes.iter().zip(rows.outer_iter_mut()) {
            if note.instrument() != instrument {
                return Err(Error::InstrumentMismatch {
                    expected: instrument,
                    found: note.instrument(),
                });
            }
            row.assign(&note.to_vector()?);
        }
        Ok(Self { instrument, rows })
    }

    /// Vectorize the notes of a track
    pub fn from_track(track: &NoteTrack) -> Result<Self> {
        Self::from_notes(track.instrument(), track.notes())
    }

    /// Rebuild a matrix from frames, see [`FrameGeometry::unwrap`]
    pub fn from_frames(
        instrument: InstrumentClass,
        frames: ArrayView3<f64>,
        geometry: &FrameGeometry,
    ) -> Result<Self> {
        Self::new(instrument, geometry.unwrap(frames)?)
    }

    /// Decode every row
    pub fn to_notes(&self) -> Result<Vec<Note>> {
        self.rows
            .outer_iter()
            .map(|row| Note::from_vector(self.instrument, row))
            .collect()
    }

    /// Decode every row into a track with the given tick rate
    pub fn to_track(&self, timing: TicksPerQuarterNote) -> Result<NoteTrack> {
        Ok(NoteTrack::from_parts(timing, self.instrument, self.to_notes()?))
    }

    /// Cut the rows into frames, see [`FrameGeometry::wrap`]
    pub fn wrap(&self, geometry: &FrameGeometry) -> Array3<f64> {
        geometry.wrap(self.rows.view())
    }

    /// Append the rows of another matrix of the same class
    pub fn append(&mut self, other: &NoteMatrix) -> Result<()> {
        if other.instrument != self.instrument {
            return Err(Error::InstrumentMismatch {
                expected: self.instrument,
                found: other.instrument,
            });
        }
        // widths match because the classes do
        self.rows
            .append(Axis(0), other.rows.view())
            .map_err(|_| Error::VectorWidth {
                expected: self.rows.ncols(),
                found: other.rows.ncols(),
            })
    }

    /// The instrument class of every row
    pub const fn instrument(&self) -> InstrumentClass {
        self.instrument
    }

    /// The note vectors
    pub fn rows(&self) -> ArrayView2<'_, f64> {
        self.rows.view()
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    /// True if the matrix holds no notes
    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    /// Take the rows out of the matrix
    pub fn into_rows(self) -> Array2<f64> {
        self.rows
    }
}

#[cfg(test)]
use crate::pitch::Key;

#[test]
fn rejects_wrong_width() {
    let rows = Array2::zeros((3, 44));
    assert!(matches!(
        NoteMatrix::new(InstrumentClass::Percussive, rows),
        Err(Error::VectorWidth {
            expected: 45,
            found: 44
        })
    ));
}

#[test]
fn rejects_mixed_classes() {
    let notes = [
        Note::pause(InstrumentClass::Melodic, 0., 3.),
        Note::pause(InstrumentClass::Percussive, 0., 3.),
    ];
    assert!(matches!(
        NoteMatrix::from_notes(InstrumentClass::Melodic, &notes),
        Err(Error::InstrumentMismatch { .. })
    ));
}

#[test]
fn frames_round_trip_through_matrix() {
    let melodic = InstrumentClass::Melodic;
    let notes: Vec<_> = (0..12)
        .map(|i| Note::new(melodic, Key::new(40 + i).unwrap(), 12., 24.))
        .collect();
    let matrix = NoteMatrix::from_notes(melodic, &notes).unwrap();

    let geometry = FrameGeometry::new(4, 6).unwrap();
    let frames = matrix.wrap(&geometry);
    assert_eq!(frames.dim(), (2, 6, 41));

    let back = NoteMatrix::from_frames(melodic, frames.view(), &geometry).unwrap();
    assert_eq!(back.to_notes().unwrap(), notes[..8]);
}

#[test]
fn append_same_class() {
    let drums = InstrumentClass::Percussive;
    let mut matrix = NoteMatrix::empty(drums);
    let other = NoteMatrix::from_notes(drums, &[Note::pause(drums, 0., 6.)]).unwrap();
    matrix.append(&other).unwrap();
    matrix.append(&other).unwrap();
    assert_eq!(matrix.len(), 2);

    let melodic = NoteMatrix::empty(InstrumentClass::Melodic);
    assert!(matrix.append(&melodic).is_err());
}
