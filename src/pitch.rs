use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::ParseError;

#[doc = r#"
A MIDI key number.

Keys are interpreted as a 7-bit number.

Each value corresponds to some [`PitchClass`] and [`Octave`].

[`Key`] `0` is `C(-1)`, and [`Key`] `127` is `G9`.

# Example
```rust
# use notematrix::prelude::*;
let key = Key::new(63).unwrap(); // 63 is between 0-127

assert_eq!(key.pitch_class(), PitchClass::DSharp);
assert_eq!(key.octave(), Octave::new(4))
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key(u8);

impl Key {
    /// Highest key number
    pub const MAX: u8 = 127;

    /// Create a new key.
    ///
    /// Checks for correctness (leading 0 bit).
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte > Self::MAX {
            return Err(ParseError::InvalidDataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Creates a new key, discarding the leading bit of the byte
    pub const fn from_byte_lossy(byte: u8) -> Self {
        Self(byte & Self::MAX)
    }

    /// Identifies the pitch class of the key
    #[inline]
    pub const fn pitch_class(&self) -> PitchClass {
        PitchClass::from_key_byte(self.0)
    }

    /// Identifies the octave of the key
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave::from_key_byte(self.0)
    }

    /// Returns the underlying byte of the key
    pub const fn byte(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Key {
    type Error = ParseError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class(), self.octave())
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[doc = r#"
One of the twelve pitch classes, `C` being index 0.

# Example
```rust
# use notematrix::prelude::*;
let key = Key::new(66).unwrap();

assert_eq!(key.pitch_class(), PitchClass::FSharp);
assert_eq!(PitchClass::from_key_byte(6), PitchClass::FSharp);
assert_eq!(key.to_string(), "F#4");
```
"#]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    /// Identify the pitch class from a key byte.
    #[inline]
    pub const fn from_key_byte(byte: u8) -> Self {
        use PitchClass::*;
        match byte % 12 {
            0 => C,
            1 => CSharp,
            2 => D,
            3 => DSharp,
            4 => E,
            5 => F,
            6 => FSharp,
            7 => G,
            8 => GSharp,
            9 => A,
            10 => ASharp,
            _ => B,
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PitchClass::*;
        let name = match self {
            C => "C",
            CSharp => "C#",
            D => "D",
            DSharp => "D#",
            E => "E",
            F => "F",
            FSharp => "F#",
            G => "G",
            GSharp => "G#",
            A => "A",
            ASharp => "A#",
            B => "B",
        };
        f.write_str(name)
    }
}

#[doc = r#"
Identifies the octave for a [`Key`]. Values range from -1 to 9.

# Example

```rust
# use notematrix::prelude::*;
let octave = Octave::new(12); // clamps to 9

assert_eq!(octave.value(), 9);
```
"#]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octave(i8);

impl Octave {
    /// Identify an octave from a key byte.
    pub const fn from_key_byte(byte: u8) -> Self {
        Self((byte / 12) as i8 - 1)
    }

    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(mut octave: i8) -> Self {
        if octave < -1 {
            octave = -1
        } else if octave > 9 {
            octave = 9;
        }
        Self(octave)
    }

    /// The octave, from `[-1,9]`
    pub const fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[doc = r#"
The pitch of a [`Note`](crate::note::Note): either a sounding key or the pause sentinel.

Pauses are synthetic silences. They occupy a slot in every pitch vocabulary
but never produce events.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pitch {
    /// A sounding key
    Key(Key),
    /// Silence
    Pause,
}

impl Pitch {
    /// Returns true for the pause sentinel
    pub const fn is_pause(&self) -> bool {
        matches!(self, Pitch::Pause)
    }

    /// The key, if this pitch sounds
    pub const fn key(&self) -> Option<Key> {
        match self {
            Pitch::Key(key) => Some(*key),
            Pitch::Pause => None,
        }
    }
}

impl From<Key> for Pitch {
    fn from(value: Key) -> Self {
        Self::Key(value)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pitch::Key(key) => write!(f, "key {} ({key})", key.byte()),
            Pitch::Pause => f.write_str("pause"),
        }
    }
}

#[test]
fn key_rejects_leading_bit() {
    assert_eq!(Key::new(128), Err(ParseError::InvalidDataByte(128)));
    assert_eq!(Key::from_byte_lossy(0x80 | 60).byte(), 60);
}

#[test]
fn octave_of_c1() {
    let c1 = Key::new(24).unwrap();
    assert_eq!(c1.pitch_class(), PitchClass::C);
    assert_eq!(c1.octave().value(), 1);
    assert_eq!(c1.to_string(), "C1");
}

#[test]
fn pitch_display() {
    let top = Key::new(127).unwrap();
    assert_eq!(top.pitch_class(), PitchClass::G);
    assert_eq!(top.octave(), Octave::new(9));
    assert_eq!(Pitch::Key(top).to_string(), "key 127 (G9)");
    assert_eq!(Pitch::Pause.to_string(), "pause");
    assert_eq!(Key::new(0).unwrap().to_string(), "C-1");
}
