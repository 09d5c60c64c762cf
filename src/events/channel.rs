#![doc = r#"
Contains the channel voice message types

# Status bytes
```text
|--------|--------|
| 1 kind | channel|   status byte, 0x80..=0xEF
|--------|--------|
  7....4   3....0
```
The high nibble picks the [`VoiceKind`], which also fixes how many data
bytes follow. The low nibble is the [`Channel`].
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    cursor::{ByteCursor, ReadResult},
    pitch::Key,
};

const KIND_MASK: u8 = 0b1111_0000;
const CHANNEL_MASK: u8 = 0b0000_1111;

#[doc = r#"
The set of channel voice messages, keyed by the high nibble of their status byte
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum VoiceKind {
    /// Key released
    NoteOff = 0x80,
    /// Key pressed. A velocity of 0 means released.
    NoteOn = 0x90,
    /// Per-key aftertouch
    PolyPressure = 0xA0,
    /// Control change
    Controller = 0xB0,
    /// Instrument selection
    ProgramChange = 0xC0,
    /// Channel-wide aftertouch
    ChannelPressure = 0xD0,
    /// Pitch wheel
    PitchBend = 0xE0,
}

impl VoiceKind {
    /// The voice kind encoded in a status byte, if it is a channel status
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status & KIND_MASK).ok()
    }

    /// Number of data bytes following the status byte
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// A MIDI channel, `0..=15` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel(u8);

impl Channel {
    /// The channel melodic output is written to
    pub const DEFAULT: Channel = Channel(0);
    /// General MIDI reserves channel 10 (index 9) for percussion
    pub const PERCUSSION: Channel = Channel(9);

    /// Creates a channel from the low nibble of `index`
    pub const fn new(index: u8) -> Self {
        Self(index & CHANNEL_MASK)
    }

    /// Zero based channel index
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// True for the General MIDI percussion channel
    pub const fn is_percussion(&self) -> bool {
        self.0 == Self::PERCUSSION.0
    }
}

#[doc = r#"
A channel voice message: kind, channel and one or two data bytes.

# Example
```rust
# use notematrix::prelude::*;
let key = Key::new(60).unwrap();
let on = ChannelMessage::note_on(Channel::DEFAULT, key, 64);
assert!(on.is_note_on());
assert_eq!(on.status(), 0x90);
assert_eq!(on.data(), [60, 64]);

// note-on with velocity 0 is a release
let off = ChannelMessage::note_on(Channel::PERCUSSION, key, 0);
assert!(off.is_note_off());
assert_eq!(off.status(), 0x99);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelMessage {
    kind: VoiceKind,
    channel: Channel,
    data: [u8; 2],
}

impl ChannelMessage {
    /// Build a message. Only the first [`VoiceKind::data_len`] bytes of `data` are kept.
    pub const fn new(kind: VoiceKind, channel: Channel, mut data: [u8; 2]) -> Self {
        if kind.data_len() == 1 {
            data[1] = 0;
        }
        Self {
            kind,
            channel,
            data,
        }
    }

    /// Key pressed
    pub const fn note_on(channel: Channel, key: Key, velocity: u8) -> Self {
        Self::new(VoiceKind::NoteOn, channel, [key.byte(), velocity])
    }

    /// Key released
    pub const fn note_off(channel: Channel, key: Key, velocity: u8) -> Self {
        Self::new(VoiceKind::NoteOff, channel, [key.byte(), velocity])
    }

    pub(crate) fn read(cursor: &mut ByteCursor, kind: VoiceKind, channel: Channel) -> ReadResult<Self> {
        let mut data = [0; 2];
        let len = kind.data_len();
        data[..len].copy_from_slice(cursor.read(len)?);
        Ok(Self::new(kind, channel, data))
    }

    pub(crate) fn write_data(&self, cursor: &mut ByteCursor) {
        cursor.write(self.data());
    }

    /// The voice kind
    pub const fn kind(&self) -> VoiceKind {
        self.kind
    }

    /// The channel
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The full status byte
    pub const fn status(&self) -> u8 {
        self.kind as u8 | self.channel.0
    }

    /// The data bytes, one or two depending on the kind
    pub fn data(&self) -> &[u8] {
        &self.data[..self.kind.data_len()]
    }

    /// True for note-on and note-off messages, whatever their velocity
    pub const fn is_note_event(&self) -> bool {
        matches!(self.kind, VoiceKind::NoteOn | VoiceKind::NoteOff)
    }

    /// True for a note-on with a non-zero velocity
    pub const fn is_note_on(&self) -> bool {
        matches!(self.kind, VoiceKind::NoteOn) && self.data[1] != 0
    }

    /// True for a note-off, or a note-on with zero velocity
    pub const fn is_note_off(&self) -> bool {
        match self.kind {
            VoiceKind::NoteOff => true,
            VoiceKind::NoteOn => self.data[1] == 0,
            _ => false,
        }
    }

    /// The key of a note message
    pub const fn key(&self) -> Option<Key> {
        if self.is_note_event() {
            Some(Key::from_byte_lossy(self.data[0]))
        } else {
            None
        }
    }

    /// The velocity of a note message
    pub const fn velocity(&self) -> Option<u8> {
        if self.is_note_event() {
            Some(self.data[1])
        } else {
            None
        }
    }
}

#[test]
fn data_lengths() {
    use VoiceKind::*;
    for kind in [NoteOff, NoteOn, PolyPressure, Controller, PitchBend] {
        assert_eq!(kind.data_len(), 2);
    }
    for kind in [ProgramChange, ChannelPressure] {
        assert_eq!(kind.data_len(), 1);
    }
}

#[test]
fn status_split() {
    assert_eq!(VoiceKind::from_status(0x9A), Some(VoiceKind::NoteOn));
    assert_eq!(VoiceKind::from_status(0xC3), Some(VoiceKind::ProgramChange));
    assert_eq!(VoiceKind::from_status(0xF0), None);
    assert_eq!(VoiceKind::from_status(0x45), None);

    let message = ChannelMessage::new(VoiceKind::ProgramChange, Channel::new(3), [25, 99]);
    assert_eq!(message.status(), 0xC3);
    assert_eq!(message.data(), [25]);
    assert!(!message.is_note_event());
    assert_eq!(message.key(), None);
}

#[test]
fn zero_velocity_note_on_is_release() {
    let key = Key::new(0x20).unwrap();
    let on = ChannelMessage::note_on(Channel::DEFAULT, key, 0x40);
    let silent = ChannelMessage::note_on(Channel::DEFAULT, key, 0);
    let off = ChannelMessage::note_off(Channel::DEFAULT, key, 0x40);

    assert!(on.is_note_on() && !on.is_note_off());
    assert!(silent.is_note_off() && !silent.is_note_on());
    assert!(off.is_note_off() && !off.is_note_on());
    assert_eq!(silent.key(), Some(key));
}
