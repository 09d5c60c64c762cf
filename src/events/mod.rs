#![doc = r#"
Track events and their byte codec

# Overview

A track chunk body is a sequence of events, each written as

```text
<delta-time VLQ> <status byte> <payload>
```

The status byte selects one of three shapes:

| status         | message              | payload                                  |
|----------------|----------------------|------------------------------------------|
| `0x80..=0xEF`  | [`ChannelMessage`]   | 1 or 2 data bytes, fixed by the kind      |
| `0xFF`         | [`MetaMessage`]      | type byte, VLQ length, that many bytes   |
| `0xF0..=0xFE`  | [`SysexMessage`]     | VLQ length, that many bytes              |

A data byte (`< 0x80`) in status position reuses the previous channel status
("running status") when reading through a track; meta and sysex events clear
it. Written events always carry an explicit status byte.
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;

mod sysex;
pub use sysex::*;

use crate::{
    ParseError,
    cursor::{ByteCursor, ReadResult, ReaderError},
};

/// Status byte introducing a meta event
pub const META_STATUS: u8 = 0xFF;

/// The three shapes an event can take
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A channel voice message
    Channel(ChannelMessage),
    /// A meta event
    Meta(MetaMessage),
    /// A system exclusive event
    Sysex(SysexMessage),
}

impl From<ChannelMessage> for TrackMessage {
    fn from(value: ChannelMessage) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaMessage> for TrackMessage {
    fn from(value: MetaMessage) -> Self {
        Self::Meta(value)
    }
}

impl From<SysexMessage> for TrackMessage {
    fn from(value: SysexMessage) -> Self {
        Self::Sysex(value)
    }
}

#[doc = r#"
A message and the number of ticks since the previous event in the track.

# Example
```rust
# use notematrix::prelude::*;
let key = Key::new(60).unwrap();
let event = TrackEvent::new(96, ChannelMessage::note_on(Channel::DEFAULT, key, 64));

let mut cursor = ByteCursor::new();
event.write(&mut cursor);
assert_eq!(cursor.as_bytes(), [0x60, 0x90, 60, 64]);

cursor.seek(0);
assert_eq!(TrackEvent::read(&mut cursor).unwrap(), event);
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_time: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create an event `delta_time` ticks after the previous one
    pub fn new(delta_time: u32, message: impl Into<TrackMessage>) -> Self {
        Self {
            delta_time,
            message: message.into(),
        }
    }

    /// An end-of-track event
    pub fn end_of_track(delta_time: u32) -> Self {
        Self::new(delta_time, MetaMessage::end_of_track())
    }

    /// Read a single event, without running status.
    pub fn read(cursor: &mut ByteCursor) -> ReadResult<Self> {
        Self::read_running(cursor, &mut None)
    }

    /// Read a single event, resolving running status against `running_status`
    /// and updating it for the next event.
    pub fn read_running(cursor: &mut ByteCursor, running_status: &mut Option<u8>) -> ReadResult<Self> {
        let delta_time = cursor.read_vlq()?;
        let status_position = cursor.position();
        let mut status = cursor.read_u8()?;

        if status < 0x80 {
            let Some(running) = *running_status else {
                return Err(ReaderError::parse_error(
                    status_position,
                    ParseError::MissingRunningStatus(status),
                ));
            };
            // the byte just read is the first data byte
            cursor.seek(status_position);
            status = running;
        }

        let message = if let Some(kind) = VoiceKind::from_status(status) {
            *running_status = Some(status);
            TrackMessage::Channel(ChannelMessage::read(cursor, kind, Channel::new(status))?)
        } else if status == META_STATUS {
            *running_status = None;
            TrackMessage::Meta(MetaMessage::read(cursor)?)
        } else {
            *running_status = None;
            TrackMessage::Sysex(SysexMessage::read(cursor, status)?)
        };

        Ok(Self {
            delta_time,
            message,
        })
    }

    /// Write the event with an explicit status byte.
    pub fn write(&self, cursor: &mut ByteCursor) {
        cursor.write_vlq(self.delta_time);
        cursor.write_u8(self.status());
        match &self.message {
            TrackMessage::Channel(c) => c.write_data(cursor),
            TrackMessage::Meta(m) => m.write_body(cursor),
            TrackMessage::Sysex(s) => s.write_body(cursor),
        }
    }

    /// Ticks since the previous event
    pub const fn delta_time(&self) -> u32 {
        self.delta_time
    }

    /// The message
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }

    /// The status byte this event is written with
    pub const fn status(&self) -> u8 {
        match &self.message {
            TrackMessage::Channel(c) => c.status(),
            TrackMessage::Meta(_) => META_STATUS,
            TrackMessage::Sysex(s) => s.status(),
        }
    }

    /// The channel message, if this is one
    pub const fn channel_message(&self) -> Option<&ChannelMessage> {
        match &self.message {
            TrackMessage::Channel(c) => Some(c),
            _ => None,
        }
    }

    /// True for note-on and note-off channel messages
    pub const fn is_note_event(&self) -> bool {
        matches!(&self.message, TrackMessage::Channel(c) if c.is_note_event())
    }

    /// True for a note-on with non-zero velocity
    pub const fn is_note_on(&self) -> bool {
        matches!(&self.message, TrackMessage::Channel(c) if c.is_note_on())
    }

    /// True for a note-off or a zero-velocity note-on
    pub const fn is_note_off(&self) -> bool {
        matches!(&self.message, TrackMessage::Channel(c) if c.is_note_off())
    }

    /// True for channel messages on the percussion channel
    pub const fn is_percussion(&self) -> bool {
        matches!(&self.message, TrackMessage::Channel(c) if c.channel().is_percussion())
    }

    /// True for the end-of-track meta event
    pub const fn is_end_of_track(&self) -> bool {
        matches!(&self.message, TrackMessage::Meta(m) if m.is_end_of_track())
    }
}

/// True if any event in the list is a note-on or note-off
pub fn has_note_events(events: &[TrackEvent]) -> bool {
    events.iter().any(TrackEvent::is_note_event)
}

#[cfg(test)]
fn read_back(event: &TrackEvent) -> TrackEvent {
    let mut cursor = ByteCursor::new();
    event.write(&mut cursor);
    cursor.seek(0);
    let read = TrackEvent::read(&mut cursor).unwrap();
    assert!(cursor.is_exhausted());
    read
}

#[test]
fn every_event_shape_reads_back() {
    let key = crate::pitch::Key::new(0x3C).unwrap();
    let events = [
        TrackEvent::new(0, ChannelMessage::note_on(Channel::new(2), key, 100)),
        TrackEvent::new(0x1E038C, ChannelMessage::note_off(Channel::PERCUSSION, key, 0)),
        TrackEvent::new(7, ChannelMessage::new(VoiceKind::PitchBend, Channel::new(15), [0x00, 0x40])),
        TrackEvent::new(7, ChannelMessage::new(VoiceKind::ProgramChange, Channel::new(1), [30, 0])),
        TrackEvent::new(0x80, MetaMessage::new(MetaKind::Tempo, vec![0x07, 0xA1, 0x20])),
        TrackEvent::new(0, MetaMessage::new(MetaKind::Other(0x7F), vec![0xAB; 200])),
        TrackEvent::new(1, SysexMessage::new(SYSEX_START, vec![0x7E, 0x7F, 0x09, 0x01, 0xF7]).unwrap()),
        TrackEvent::new(2, SysexMessage::new(SYSEX_ESCAPE, Vec::new()).unwrap()),
        TrackEvent::end_of_track(0),
    ];
    for event in &events {
        assert_eq!(&read_back(event), event);
    }
}

#[test]
fn meta_layout() {
    let mut cursor = ByteCursor::new();
    TrackEvent::end_of_track(0x20).write(&mut cursor);
    assert_eq!(cursor.as_bytes(), [0x20, 0xFF, 0x2F, 0x00]);

    cursor.seek(0);
    let event = TrackEvent::read(&mut cursor).unwrap();
    assert!(event.is_end_of_track());
    assert!(!event.is_note_event());
}

#[test]
fn running_status() {
    // note-on 0x3C, then a running-status note-on 0x40, then an explicit note-off
    let bytes = [0x00, 0x91, 0x3C, 0x40, 0x10, 0x40, 0x50, 0x10, 0x81, 0x3C, 0x00];
    let mut cursor = ByteCursor::from_bytes(bytes);
    let mut running = None;

    let first = TrackEvent::read_running(&mut cursor, &mut running).unwrap();
    let second = TrackEvent::read_running(&mut cursor, &mut running).unwrap();
    let third = TrackEvent::read_running(&mut cursor, &mut running).unwrap();
    assert!(cursor.is_exhausted());

    assert_eq!(first.status(), 0x91);
    assert_eq!(second.delta_time(), 0x10);
    assert_eq!(second.status(), 0x91);
    assert_eq!(second.channel_message().unwrap().data(), [0x40, 0x50]);
    assert!(third.is_note_off());
}

#[test]
fn data_byte_without_running_status() {
    let mut cursor = ByteCursor::from_bytes([0x00, 0x3C, 0x40]);
    let err = TrackEvent::read(&mut cursor).unwrap_err();
    assert_eq!(err.position(), 1);
    assert!(!err.is_truncated());
}

#[test]
fn truncated_channel_payload() {
    let mut cursor = ByteCursor::from_bytes([0x00, 0x90, 0x3C]);
    assert!(TrackEvent::read(&mut cursor).unwrap_err().is_truncated());
}

#[test]
fn note_predicates() {
    let key = crate::pitch::Key::new(36).unwrap();
    let drum = TrackEvent::new(0, ChannelMessage::note_on(Channel::PERCUSSION, key, 90));
    let bass = TrackEvent::new(0, ChannelMessage::note_on(Channel::new(1), key, 0));
    assert!(drum.is_percussion() && drum.is_note_on());
    assert!(!bass.is_percussion() && bass.is_note_off());
    assert!(has_note_events(&[TrackEvent::end_of_track(0), bass]));
    assert!(!has_note_events(&[TrackEvent::end_of_track(0)]));
}

#[test]
fn every_event_status_reads_back() {
    for status in 0x80..=u8::MAX {
        let message: TrackMessage = match VoiceKind::from_status(status) {
            Some(kind) => ChannelMessage::new(kind, Channel::new(status), [0x30, 0x40]).into(),
            None if status == META_STATUS => MetaMessage::new(MetaKind::Text, vec![0x41]).into(),
            None => SysexMessage::new(status, vec![0x01, 0x02]).unwrap().into(),
        };
        let event = TrackEvent::new(3, message);
        assert_eq!(event.status(), status);
        assert_eq!(read_back(&event), event, "status {status:#04X}");
    }
}
