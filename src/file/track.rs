use crate::{
    ChunkError, Warning,
    cursor::{ByteCursor, ReadResult, ReaderError, ReaderErrorKind},
    events::TrackEvent,
};

/// Tag of a track chunk
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

#[doc = r#"
One chunk following the header.

Chunks tagged anything other than `MTrk`, and track chunks with an empty body,
are skipped without looking at their contents.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackChunk {
    /// An `MTrk` chunk and its events, end-of-track included
    Events(Vec<TrackEvent>),
    /// A chunk whose body was skipped
    Skipped {
        /// The four tag bytes
        tag: [u8; 4],
        /// Declared body length
        length: u32,
    },
}

impl TrackChunk {
    /// Read a chunk at the cursor position.
    ///
    /// A track body is decoded event by event, with running status, until its
    /// end-of-track event. Bytes the declared length covers past that event
    /// are ignored. A body that ends before an end-of-track event is an error.
    pub fn read(cursor: &mut ByteCursor) -> ReadResult<Self> {
        let tag: [u8; 4] = cursor.read_exact_size()?;
        let length = cursor.read_u32()?;

        if tag != TRACK_TAG || length == 0 {
            cursor.skip(length as usize)?;
            return Ok(Self::Skipped { tag, length });
        }

        let body_start = cursor.position();
        let body = cursor.read(length as usize)?;
        read_events(body).map(Self::Events).map_err(|e| {
            // body positions are relative to the chunk body
            ReaderError::new(body_start + e.position(), e.kind)
        })
    }

    /// The events, if this chunk is a track
    pub fn events(&self) -> Option<&[TrackEvent]> {
        match self {
            Self::Events(events) => Some(events),
            Self::Skipped { .. } => None,
        }
    }

    /// True for `MTrk` chunks, including skipped empty ones
    pub fn is_track(&self) -> bool {
        match self {
            Self::Events(_) => true,
            Self::Skipped { tag, .. } => *tag == TRACK_TAG,
        }
    }

    /// The warning describing a skipped chunk
    pub fn warning(&self) -> Option<Warning> {
        match self {
            Self::Events(_) => None,
            Self::Skipped { tag, length } => Some(Warning::UnrecognizedChunk {
                tag: *tag,
                length: *length,
            }),
        }
    }
}

fn read_events(body: &[u8]) -> ReadResult<Vec<TrackEvent>> {
    let mut cursor = ByteCursor::from_bytes(body);
    let mut running_status = None;
    let mut events = Vec::new();

    loop {
        if cursor.is_exhausted() {
            return Err(ReaderError::new(
                cursor.position(),
                ReaderErrorKind::chunk(ChunkError::MissingEndOfTrack),
            ));
        }
        let event = TrackEvent::read_running(&mut cursor, &mut running_status)?;
        let done = event.is_end_of_track();
        events.push(event);
        if done {
            return Ok(events);
        }
    }
}

/// Write an `MTrk` chunk holding `events` in order.
///
/// The events are written as given; callers append the end-of-track event.
pub fn write_track(events: &[TrackEvent], cursor: &mut ByteCursor) {
    let mut body = ByteCursor::new();
    for event in events {
        event.write(&mut body);
    }
    let body = body.into_inner();

    cursor.write(&TRACK_TAG);
    cursor.write_u32(body.len() as u32);
    cursor.write(&body);
}

#[cfg(test)]
use crate::{
    ParseError,
    events::{Channel, ChannelMessage},
    pitch::Key,
};

#[cfg(test)]
fn track_bytes(body: &[u8]) -> Vec<u8> {
    let mut bytes = TRACK_TAG.to_vec();
    bytes.extend((body.len() as u32).to_be_bytes());
    bytes.extend(body);
    bytes
}

#[test]
fn track_reads_back() {
    let key = Key::new(60).unwrap();
    let events = vec![
        TrackEvent::new(0, ChannelMessage::note_on(Channel::DEFAULT, key, 64)),
        TrackEvent::new(960, ChannelMessage::note_on(Channel::DEFAULT, key, 0)),
        TrackEvent::end_of_track(0),
    ];
    let mut cursor = ByteCursor::new();
    write_track(&events, &mut cursor);
    assert_eq!(&cursor.as_bytes()[..8], b"MTrk\0\0\0\x0D");

    cursor.seek(0);
    assert_eq!(TrackChunk::read(&mut cursor).unwrap(), TrackChunk::Events(events));
    assert!(cursor.is_exhausted());
}

#[test]
fn bytes_after_end_of_track_are_ignored() {
    let bytes = track_bytes(&[0x00, 0xFF, 0x2F, 0x00, 0xDE, 0xAD]);
    let mut cursor = ByteCursor::from_bytes(bytes);
    let chunk = TrackChunk::read(&mut cursor).unwrap();
    assert_eq!(chunk.events().unwrap().len(), 1);
    assert!(cursor.is_exhausted());
}

#[test]
fn unknown_and_empty_chunks_are_skipped() {
    let mut bytes = b"XFIH\0\0\0\x03abc".to_vec();
    bytes.extend(track_bytes(&[]));
    let mut cursor = ByteCursor::from_bytes(bytes);

    let first = TrackChunk::read(&mut cursor).unwrap();
    assert!(!first.is_track());
    assert_eq!(
        first.warning(),
        Some(Warning::UnrecognizedChunk {
            tag: *b"XFIH",
            length: 3
        })
    );
    let second = TrackChunk::read(&mut cursor).unwrap();
    assert!(second.is_track());
    assert_eq!(
        second,
        TrackChunk::Skipped {
            tag: TRACK_TAG,
            length: 0
        }
    );
    assert!(cursor.is_exhausted());
}

#[test]
fn missing_end_of_track() {
    let bytes = track_bytes(&[0x00, 0x90, 0x3C, 0x40]);
    let err = TrackChunk::read(&mut ByteCursor::from_bytes(bytes)).unwrap_err();
    assert_eq!(err.position(), 12);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Parse(ParseError::Chunk(ChunkError::MissingEndOfTrack))
    );
}

#[test]
fn declared_length_past_the_end() {
    let mut bytes = track_bytes(&[0x00, 0xFF, 0x2F, 0x00]);
    bytes.truncate(10);
    let err = TrackChunk::read(&mut ByteCursor::from_bytes(bytes)).unwrap_err();
    assert!(err.is_truncated());
}
