#![doc = r#"
The notes file format

```text
<instrument tag: i32 LE> <frame stride: i32 LE> <frame width: i32 LE>
<note vectors: f64 LE, row-major, instrument.vector_len() values per note>
```

The note vectors are stored unframed; the stride and width only record how a
consumer should frame them.
"#]

use std::{fs, path::Path};

use ndarray::Array2;

use crate::{
    Error, Result,
    cursor::ByteCursor,
    frame::FrameGeometry,
    matrix::NoteMatrix,
    note::InstrumentClass,
};

/// Conventional file extension of notes files
pub const NOTES_FILE_EXTENSION: &str = "notes";

/// Bytes taken by the three header integers
pub const NOTES_HEADER_LEN: usize = 12;

#[doc = r#"
A note matrix and the framing it is meant to be read with.

# Example
```rust
# use notematrix::prelude::*;
let melodic = InstrumentClass::Melodic;
let matrix = NoteMatrix::from_notes(melodic, &[Note::pause(melodic, 0., 48.)]).unwrap();
let file = NotesFile::new(matrix, FrameGeometry::DEFAULT);

let bytes = file.to_bytes();
assert_eq!(bytes.len(), 12 + 41 * 8);
assert_eq!(&bytes[..12], [0, 0, 0, 0, 50, 0, 0, 0, 100, 0, 0, 0]);
assert_eq!(NotesFile::from_bytes(bytes).unwrap(), file);
```
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct NotesFile {
    matrix: NoteMatrix,
    frame: FrameGeometry,
}

impl NotesFile {
    /// Pair a matrix with its framing
    pub const fn new(matrix: NoteMatrix, frame: FrameGeometry) -> Self {
        Self { matrix, frame }
    }

    /// Parse a notes file
    pub fn from_bytes<B>(bytes: B) -> Result<Self>
    where
        B: Into<Vec<u8>>,
    {
        let mut cursor = ByteCursor::from_bytes(bytes);
        let tag = i32::from_le_bytes(cursor.read_exact_size()?);
        let stride = i32::from_le_bytes(cursor.read_exact_size()?);
        let width = i32::from_le_bytes(cursor.read_exact_size()?);

        let instrument = InstrumentClass::from_tag(tag)?;
        let frame = FrameGeometry::new(
            usize::try_from(stride).unwrap_or(0),
            usize::try_from(width).unwrap_or(0),
        )?;

        let mut values = Vec::with_capacity(cursor.remaining() / 8);
        while !cursor.is_exhausted() {
            values.push(f64::from_le_bytes(cursor.read_exact_size()?));
        }

        let vector_len = instrument.vector_len();
        if values.len() % vector_len != 0 {
            return Err(Error::MatrixShape {
                values: values.len(),
                width: vector_len,
            });
        }
        let rows = Array2::from_shape_vec((values.len() / vector_len, vector_len), values).map_err(|_| {
            Error::MatrixShape {
                values: 0,
                width: vector_len,
            }
        })?;

        Ok(Self {
            matrix: NoteMatrix::new(instrument, rows)?,
            frame,
        })
    }

    /// Serialize the file
    pub fn to_bytes(&self) -> Vec<u8> {
        let rows = self.matrix.rows();
        let mut bytes = Vec::with_capacity(NOTES_HEADER_LEN + rows.len() * 8);
        bytes.extend(self.matrix.instrument().tag().to_le_bytes());
        // FrameGeometry keeps both fields within i32
        bytes.extend((self.frame.stride() as i32).to_le_bytes());
        bytes.extend((self.frame.width() as i32).to_le_bytes());
        // iter() walks in logical row-major order whatever the memory layout
        for value in rows.iter() {
            bytes.extend(value.to_le_bytes());
        }
        bytes
    }

    /// Read a notes file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Write the notes file to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// The note matrix
    pub const fn matrix(&self) -> &NoteMatrix {
        &self.matrix
    }

    /// The framing recorded in the header
    pub const fn frame(&self) -> FrameGeometry {
        self.frame
    }

    /// Take the matrix out of the file
    pub fn into_matrix(self) -> NoteMatrix {
        self.matrix
    }
}

#[cfg(test)]
use crate::{note::Note, pitch::Key};

#[cfg(test)]
fn drum_file() -> NotesFile {
    let drums = InstrumentClass::Percussive;
    let notes = [
        Note::new(drums, Key::new(36).unwrap(), 0., 12.),
        Note::new(drums, Key::new(42).unwrap(), 12., 12.),
        Note::pause(drums, 12., 24.),
    ];
    NotesFile::new(
        NoteMatrix::from_notes(drums, &notes).unwrap(),
        FrameGeometry::new(2, 3).unwrap(),
    )
}

#[test]
fn header_and_values() {
    let bytes = drum_file().to_bytes();
    assert_eq!(bytes.len(), NOTES_HEADER_LEN + 3 * 45 * 8);
    assert_eq!(&bytes[..12], [1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]);
    // first slot of the kick drum row is hot
    assert_eq!(&bytes[12 + 8..12 + 16], 1f64.to_le_bytes());
}

#[test]
fn reads_back() {
    let file = drum_file();
    assert_eq!(NotesFile::from_bytes(file.to_bytes()).unwrap(), file);
}

#[test]
fn partial_row_is_rejected() {
    let mut bytes = drum_file().to_bytes();
    bytes.truncate(bytes.len() - 8);
    assert!(matches!(
        NotesFile::from_bytes(bytes),
        Err(Error::MatrixShape {
            values: 134,
            width: 45
        })
    ));
}

#[test]
fn partial_value_is_truncated() {
    let mut bytes = drum_file().to_bytes();
    bytes.truncate(bytes.len() - 3);
    match NotesFile::from_bytes(bytes) {
        Err(Error::Read(e)) => assert!(e.is_truncated()),
        other => panic!("expected a truncated read, got {other:?}"),
    }
}

#[test]
fn bad_header_fields() {
    let mut bytes = drum_file().to_bytes();
    bytes[0] = 7;
    assert!(matches!(NotesFile::from_bytes(bytes), Err(Error::InstrumentTag(7))));

    let mut bytes = drum_file().to_bytes();
    bytes[4] = 9;
    assert!(matches!(
        NotesFile::from_bytes(bytes),
        Err(Error::FrameGeometry { stride: 9, width: 3 })
    ));
}

#[test]
fn save_and_load() {
    let path = std::env::temp_dir().join(format!("notematrix-{}.{NOTES_FILE_EXTENSION}", std::process::id()));
    let file = drum_file();
    file.save(&path).unwrap();
    let loaded = NotesFile::load(&path);
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.unwrap(), file);
}
