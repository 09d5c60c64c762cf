use core::ops::RangeInclusive;

use crate::{
    ParseError,
    cursor::{ByteCursor, ReadResult},
};

/// Status of a complete system exclusive message
pub const SYSEX_START: u8 = 0xF0;
/// Status of a continuation or escaped system exclusive packet
pub const SYSEX_ESCAPE: u8 = 0xF7;
/// Status bytes read back as system exclusive events. `0xFF` introduces a meta event.
pub const SYSEX_STATUSES: RangeInclusive<u8> = 0xF0..=0xFE;

#[doc = r#"
A system exclusive event: its status byte and a length-prefixed payload.

The payload is opaque to this crate and written back byte for byte.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysexMessage {
    status: u8,
    data: Vec<u8>,
}

impl SysexMessage {
    /// Create a system exclusive message.
    ///
    /// Fails with [`ParseError::SysexStatus`] unless `status` is in [`SYSEX_STATUSES`].
    pub fn new(status: u8, data: impl Into<Vec<u8>>) -> Result<Self, ParseError> {
        if !SYSEX_STATUSES.contains(&status) {
            return Err(ParseError::SysexStatus(status));
        }
        Ok(Self {
            status,
            data: data.into(),
        })
    }

    pub(crate) fn read(cursor: &mut ByteCursor, status: u8) -> ReadResult<Self> {
        let len = cursor.read_vlq()? as usize;
        let data = cursor.read(len)?.to_vec();
        Ok(Self { status, data })
    }

    pub(crate) fn write_body(&self, cursor: &mut ByteCursor) {
        cursor.write_vlq(self.data.len() as u32);
        cursor.write(&self.data);
    }

    /// The status byte, usually [`SYSEX_START`] or [`SYSEX_ESCAPE`]
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// The payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[test]
fn sysex_status_range() {
    for status in 0..=u8::MAX {
        let message = SysexMessage::new(status, vec![0x01, 0x02]);
        if (0xF0..=0xFE).contains(&status) {
            assert_eq!(message.unwrap().status(), status);
        } else {
            assert_eq!(message, Err(ParseError::SysexStatus(status)));
        }
    }
}
