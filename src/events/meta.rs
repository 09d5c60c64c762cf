use num_enum::{FromPrimitive, IntoPrimitive};

use crate::cursor::{ByteCursor, ReadResult};

#[doc = r#"
The type byte following a `0xFF` status.

Only the types this crate looks at are named; everything else is carried
through untouched as [`MetaKind::Other`].
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// `FF 00`
    SequenceNumber = 0x00,
    /// `FF 01`
    Text = 0x01,
    /// `FF 03`
    TrackName = 0x03,
    /// `FF 2F 00`, the last event of every track
    EndOfTrack = 0x2F,
    /// `FF 51`
    Tempo = 0x51,
    /// `FF 58`
    TimeSignature = 0x58,
    /// `FF 59`
    KeySignature = 0x59,
    /// Any other meta type
    #[num_enum(catch_all)]
    Other(u8),
}

/// A meta event: a type byte and a length-prefixed payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaMessage {
    kind: MetaKind,
    data: Vec<u8>,
}

impl MetaMessage {
    /// Create a meta message
    pub fn new(kind: MetaKind, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// The end-of-track marker
    pub const fn end_of_track() -> Self {
        Self {
            kind: MetaKind::EndOfTrack,
            data: Vec::new(),
        }
    }

    /// Reads the type byte, VLQ length and payload following a `0xFF` status
    pub(crate) fn read(cursor: &mut ByteCursor) -> ReadResult<Self> {
        let kind = MetaKind::from(cursor.read_u8()?);
        let len = cursor.read_vlq()? as usize;
        let data = cursor.read(len)?.to_vec();
        Ok(Self { kind, data })
    }

    pub(crate) fn write_body(&self, cursor: &mut ByteCursor) {
        cursor.write_u8(self.kind.into());
        cursor.write_vlq(self.data.len() as u32);
        cursor.write(&self.data);
    }

    /// The meta type
    pub const fn kind(&self) -> MetaKind {
        self.kind
    }

    /// The payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True for `FF 2F`
    pub const fn is_end_of_track(&self) -> bool {
        matches!(self.kind, MetaKind::EndOfTrack)
    }
}

#[test]
fn meta_kind_bytes() {
    assert_eq!(MetaKind::from(0x2F), MetaKind::EndOfTrack);
    assert_eq!(MetaKind::from(0x7F), MetaKind::Other(0x7F));
    assert_eq!(u8::from(MetaKind::Other(0x21)), 0x21);
    assert_eq!(u8::from(MetaKind::Tempo), 0x51);
}
