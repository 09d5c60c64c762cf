use crate::{
    HeaderError,
    cursor::{ByteCursor, ReadResult, ReaderError, ReaderErrorKind},
};

use super::{FormatType, TicksPerQuarterNote};

/// Tag of the header chunk
pub const HEADER_TAG: [u8; 4] = *b"MThd";

/// Body length of every header this crate writes
pub const HEADER_LENGTH: u32 = 6;

#[doc = r#"
The contents of the `MThd` chunk.

```text
"MThd" <length: u32 BE> <format: u16 BE> <track count: u16 BE> <division: u16 BE> [extra bytes]
```

Bytes past the first six of a longer header body are skipped.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFileHeader {
    format: FormatType,
    num_tracks: u16,
    timing: TicksPerQuarterNote,
}

impl MidiFileHeader {
    /// Create a new header
    pub const fn new(format: FormatType, num_tracks: u16, timing: TicksPerQuarterNote) -> Self {
        Self {
            format,
            num_tracks,
            timing,
        }
    }

    /// The header of a format 1 file with a single track
    pub const fn single_track(timing: TicksPerQuarterNote) -> Self {
        Self::new(FormatType::Simultaneous, 1, timing)
    }

    /// Read the header chunk at the cursor position
    pub fn read(cursor: &mut ByteCursor) -> ReadResult<Self> {
        let start = cursor.position();
        let tag: [u8; 4] = cursor.read_exact_size()?;
        if tag != HEADER_TAG {
            return Err(ReaderError::new(
                start,
                ReaderErrorKind::header(HeaderError::InvalidTag(tag)),
            ));
        }

        let length_position = cursor.position();
        let length = cursor.read_u32()?;
        if length < HEADER_LENGTH {
            return Err(ReaderError::new(
                length_position,
                ReaderErrorKind::header(HeaderError::Length(length)),
            ));
        }

        let format_position = cursor.position();
        let format_word = cursor.read_u16()?;
        let format = FormatType::try_from(format_word).map_err(|_| {
            ReaderError::new(
                format_position,
                ReaderErrorKind::header(HeaderError::UnknownFormat(format_word)),
            )
        })?;

        let num_tracks = cursor.read_u16()?;

        let division_position = cursor.position();
        let timing = TicksPerQuarterNote::from_division(cursor.read_u16()?)
            .map_err(|e| ReaderError::parse_error(division_position, e))?;

        cursor.skip((length - HEADER_LENGTH) as usize)?;

        Ok(Self {
            format,
            num_tracks,
            timing,
        })
    }

    /// Write the header chunk
    pub fn write(&self, cursor: &mut ByteCursor) {
        cursor.write(&HEADER_TAG);
        cursor.write_u32(HEADER_LENGTH);
        cursor.write_u16(self.format.word());
        cursor.write_u16(self.num_tracks);
        cursor.write_u16(self.timing.ticks());
    }

    /// The file format
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// Number of track chunks the header announces
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// Get the timing props
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.timing
    }
}

#[test]
fn header_layout() {
    let timing = TicksPerQuarterNote::new(960).unwrap();
    let mut cursor = ByteCursor::new();
    MidiFileHeader::single_track(timing).write(&mut cursor);
    assert_eq!(
        cursor.as_bytes(),
        [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0x03, 0xC0]
    );

    cursor.seek(0);
    let header = MidiFileHeader::read(&mut cursor).unwrap();
    assert_eq!(header.format(), FormatType::Simultaneous);
    assert_eq!(header.num_tracks(), 1);
    assert_eq!(header.timing().ticks(), 960);
}

#[test]
fn long_header_body_is_skipped() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 8, 0, 0, 0, 1, 0, 96, 0xAA, 0xBB, b'M',
    ];
    let mut cursor = ByteCursor::from_bytes(bytes);
    let header = MidiFileHeader::read(&mut cursor).unwrap();
    assert_eq!(header.format(), FormatType::SingleMultiChannel);
    assert_eq!(cursor.position(), 16);
}

#[test]
fn rejected_headers() {
    use crate::ParseError;

    let read = |bytes: &[u8]| MidiFileHeader::read(&mut ByteCursor::from_bytes(bytes)).unwrap_err();

    let err = read(b"RIFF\0\0\0\x06\0\x01\0\x01\x03\xC0");
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Parse(ParseError::Header(HeaderError::InvalidTag(*b"RIFF")))
    );

    let err = read(b"MThd\0\0\0\x06\0\x03\0\x01\x03\xC0");
    assert_eq!(err.position(), 8);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Parse(ParseError::Header(HeaderError::UnknownFormat(3)))
    );

    let err = read(b"MThd\0\0\0\x06\0\x01\0\x01\xE7\x28");
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Parse(ParseError::Header(HeaderError::SmpteTiming(0xE728)))
    );

    assert!(read(b"MThd\0\0\0\x06\0\x01").is_truncated());
}
