use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The format word of the `MThd` chunk.

 - Format 0: a single track holding every channel
 - Format 1: simultaneous tracks sharing one timeline
 - Format 2: sequentially independent patterns

Reading treats every format the same way: tracks are scanned in order and the
first one carrying note events becomes the effective track. Files written by
this crate are format 1 with a single track.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// Returns the format word as written in the header
    pub fn word(&self) -> u16 {
        (*self).into()
    }
}
