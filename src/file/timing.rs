use crate::{HeaderError, ParseError};

/// Division words with the top bit set describe SMPTE time code.
const SMPTE_BIT: u16 = 0x8000;

/// The header timing type.
///
/// Only the ticks-per-quarter-note division is usable for note extraction; a
/// time code division is rejected when the header is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote(u16);

impl TicksPerQuarterNote {
    /// The tick rate per quarter note defines what a "quarter note" means.
    ///
    /// Valid values are 1-32767.
    pub const fn new(ticks: u16) -> Result<Self, ParseError> {
        if ticks & SMPTE_BIT != 0 {
            return Err(ParseError::Header(HeaderError::SmpteTiming(ticks)));
        }
        if ticks == 0 {
            return Err(ParseError::Header(HeaderError::ZeroTicks));
        }
        Ok(Self(ticks))
    }

    /// Parse the division word of a header
    pub const fn from_division(division: u16) -> Result<Self, ParseError> {
        Self::new(division)
    }

    /// Returns the ticks per quarter note.
    pub const fn ticks(&self) -> u16 {
        self.0
    }

    /// Ticks per note-time unit when a quarter note is split into `units_per_quarter_note` units
    pub fn ticks_per_unit(&self, units_per_quarter_note: u16) -> f64 {
        self.0 as f64 / units_per_quarter_note.max(1) as f64
    }
}

#[test]
fn division_words() {
    assert_eq!(TicksPerQuarterNote::from_division(960).unwrap().ticks(), 960);
    assert_eq!(
        TicksPerQuarterNote::from_division(0xE728),
        Err(ParseError::Header(HeaderError::SmpteTiming(0xE728)))
    );
    assert_eq!(
        TicksPerQuarterNote::from_division(0),
        Err(ParseError::Header(HeaderError::ZeroTicks))
    );
    assert_eq!(TicksPerQuarterNote::new(96).unwrap().ticks_per_unit(48), 2.0);
}
