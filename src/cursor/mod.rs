#![doc = r#"
A seekable byte buffer for reading and writing MIDI container data

# Overview

Everything in a Standard MIDI File is either a fixed-width big-endian integer,
a raw run of bytes, or a variable-length quantity (VLQ). [`ByteCursor`] owns a
buffer and a position and supports all three in both directions, so the same
type backs parsing (`read_*`) and serialization (`write_*`).

## Variable-length quantities

A VLQ stores 7 value bits per byte, most significant group first. Every byte
except the last has its top bit set:

```text
0x00000000 -> 00
0x0000007F -> 7F
0x00000080 -> 81 00
0x001E038C -> F8 87 0C
0x0FFFFFFF -> FF FF FF 7F
```

# Example
```rust
# use notematrix::prelude::*;
let mut cursor = ByteCursor::new();
cursor.write_vlq(0x1E038C);
cursor.write_u16(960);

cursor.seek(0);
assert_eq!(cursor.read_vlq().unwrap(), 0x1E038C);
assert_eq!(cursor.read_u16().unwrap(), 960);
assert!(cursor.is_exhausted());
```
"#]

mod error;
pub use error::*;

use crate::ParseError;

const VLQ_VALUE_BITS: u32 = 7;
const VLQ_VALUE_MASK: u8 = 0b0111_1111;
const VLQ_CONTINUATION_BIT: u8 = 0b1000_0000;
/// A `u32` never needs more than five 7-bit groups.
const VLQ_MAX_BYTES: usize = 5;

#[doc = r#"
An owned byte buffer with a read/write position.

Reads fail with [`ReaderErrorKind::TruncatedInput`] when fewer bytes remain
than requested; the position is left untouched in that case. Writes overwrite
bytes at the position and grow the buffer as needed.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    buffer: Vec<u8>,
    position: usize,
}

impl ByteCursor {
    /// Create an empty cursor, ready for writing
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            position: 0,
        }
    }

    /// Create a cursor over the provided bytes, positioned at the start
    pub fn from_bytes<B>(bytes: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        Self {
            buffer: bytes.into(),
            position: 0,
        }
    }

    /// Current offset into the buffer
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Move the position. Seeking past the end is allowed; a later write zero-fills the gap.
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Number of bytes between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// True if no bytes are left to read
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the whole buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the cursor, returning its buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Read the next `len` bytes.
    pub fn read(&mut self, len: usize) -> ReadResult<&[u8]> {
        let remaining = self.remaining();
        // a position past the end has nothing to read, not even zero bytes
        if len > remaining || self.position > self.buffer.len() {
            return Err(ReaderError::truncated(self.position, len, remaining));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.buffer[start..self.position])
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Advance past `len` bytes without looking at them
    pub fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.read(len).map(|_| ())
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let [byte] = self.read_exact_size()?;
        Ok(byte)
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Read a variable-length quantity.
    ///
    /// Fails with [`ParseError::VlqOverflow`] if the value does not fit in a `u32`.
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        for _ in 0..VLQ_MAX_BYTES {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.position = start;
                    return Err(e);
                }
            };
            if value > (u32::MAX >> VLQ_VALUE_BITS) {
                break;
            }
            value = (value << VLQ_VALUE_BITS) | (byte & VLQ_VALUE_MASK) as u32;
            if byte & VLQ_CONTINUATION_BIT == 0 {
                return Ok(value);
            }
        }
        let err = ReaderError::parse_error(start, ParseError::VlqOverflow);
        self.position = start;
        Err(err)
    }

    /// Write raw bytes at the position, overwriting or extending the buffer.
    pub fn write(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Write one byte
    pub fn write_u8(&mut self, value: u8) {
        self.write(&[value]);
    }

    /// Write a big-endian `u16`
    pub fn write_u16(&mut self, value: u16) {
        self.write(&value.to_be_bytes());
    }

    /// Write a big-endian `u32`
    pub fn write_u32(&mut self, value: u32) {
        self.write(&value.to_be_bytes());
    }

    /// Write `value` as a variable-length quantity.
    pub fn write_vlq(&mut self, value: u32) {
        let (bytes, len) = encode_vlq(value);
        self.write(&bytes[..len]);
    }
}

/// Groups are produced least significant first and flipped before returning.
fn encode_vlq(mut value: u32) -> ([u8; VLQ_MAX_BYTES], usize) {
    let mut bytes = [0; VLQ_MAX_BYTES];
    bytes[0] = value as u8 & VLQ_VALUE_MASK;
    value >>= VLQ_VALUE_BITS;
    let mut len = 1;
    while value > 0 {
        bytes[len] = VLQ_CONTINUATION_BIT | (value as u8 & VLQ_VALUE_MASK);
        value >>= VLQ_VALUE_BITS;
        len += 1;
    }
    bytes[..len].reverse();
    (bytes, len)
}

#[cfg(test)]
fn vlq_bytes(value: u32) -> Vec<u8> {
    let mut cursor = ByteCursor::new();
    cursor.write_vlq(value);
    cursor.into_inner()
}

#[test]
fn vlq_boundaries() {
    assert_eq!(vlq_bytes(0), [0x00]);
    assert_eq!(vlq_bytes(0x40), [0x40]);
    assert_eq!(vlq_bytes(0x7F), [0x7F]);
    assert_eq!(vlq_bytes(0x80), [0x81, 0x00]);
    assert_eq!(vlq_bytes(0x2000), [0xC0, 0x00]);
    assert_eq!(vlq_bytes(0x3FFF), [0xFF, 0x7F]);
    assert_eq!(vlq_bytes(0x4000), [0x81, 0x80, 0x00]);
    assert_eq!(vlq_bytes(0x1E038C), [0xF8, 0x87, 0x0C]);
    assert_eq!(vlq_bytes(0x0FFFFFFF), [0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(vlq_bytes(u32::MAX), [0x8F, 0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn vlq_reads_back() {
    for value in [
        0,
        1,
        0x7F,
        0x80,
        0x3FFF,
        0x4000,
        0x1E038C,
        0x1FFFFF,
        0x200000,
        0x0FFFFFFF,
        0x10000000,
        u32::MAX,
    ] {
        let mut cursor = ByteCursor::from_bytes(vlq_bytes(value));
        assert_eq!(cursor.read_vlq().unwrap(), value);
        assert!(cursor.is_exhausted());
    }
}

#[test]
fn vlq_rejects_overflow() {
    let mut cursor = ByteCursor::from_bytes([0x90, 0x80, 0x80, 0x80, 0x00]);
    let err = cursor.read_vlq().unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Parse(ParseError::VlqOverflow)
    );
    assert_eq!(cursor.position(), 0);

    let mut cursor = ByteCursor::from_bytes([0x81, 0x81, 0x81, 0x81, 0x81, 0x00]);
    assert!(cursor.read_vlq().is_err());
}

#[test]
fn vlq_truncated() {
    let mut cursor = ByteCursor::from_bytes([0x81, 0x80]);
    let err = cursor.read_vlq().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(cursor.position(), 0);
}

#[test]
fn fixed_width_round_trip() {
    let mut cursor = ByteCursor::new();
    cursor.write(b"MThd");
    cursor.write_u32(6);
    cursor.write_u16(1);
    cursor.write_u8(0x2F);
    assert_eq!(
        cursor.as_bytes(),
        [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0x2F]
    );

    cursor.seek(0);
    assert_eq!(cursor.read(4).unwrap(), b"MThd");
    assert_eq!(cursor.read_u32().unwrap(), 6);
    assert_eq!(cursor.read_u16().unwrap(), 1);
    assert_eq!(cursor.read_u8().unwrap(), 0x2F);
    assert!(cursor.read_u8().unwrap_err().is_truncated());
}

#[test]
fn truncated_read_keeps_position() {
    let mut cursor = ByteCursor::from_bytes([0x00, 0x01, 0x02]);
    cursor.skip(1).unwrap();
    let err = cursor.read_u32().unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::TruncatedInput {
            requested: 4,
            remaining: 2
        }
    );
    assert_eq!(err.position(), 1);
    assert_eq!(cursor.position(), 1);
    assert_eq!(cursor.read_u16().unwrap(), 0x0102);
}

#[test]
fn write_overwrites_then_extends() {
    let mut cursor = ByteCursor::from_bytes([0xAA, 0xBB, 0xCC]);
    cursor.seek(2);
    cursor.write(&[0x01, 0x02]);
    assert_eq!(cursor.as_bytes(), [0xAA, 0xBB, 0x01, 0x02]);

    cursor.seek(6);
    cursor.write_u8(0xFF);
    assert_eq!(cursor.as_bytes(), [0xAA, 0xBB, 0x01, 0x02, 0x00, 0x00, 0xFF]);
}

#[test]
fn read_past_the_end() {
    let mut cursor = ByteCursor::from_bytes([0x01, 0x02, 0x03]);
    cursor.seek(10);
    assert!(cursor.is_exhausted());

    let err = cursor.read(0).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::TruncatedInput {
            requested: 0,
            remaining: 0
        }
    );
    assert_eq!(err.position(), 10);
    assert!(cursor.read_exact_size::<0>().is_err());
    assert!(cursor.read_vlq().unwrap_err().is_truncated());
    assert_eq!(cursor.position(), 10);

    cursor.seek(3);
    assert!(cursor.read(0).unwrap().is_empty());
}
