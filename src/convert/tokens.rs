use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{
    events::{Channel, ChannelMessage, TrackEvent},
    note::Note,
    pitch::Key,
    Error, Result,
};

/// Which end of a note a token marks.
///
/// `Stop` sorts first so a release at some tick is written before an onset at
/// the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Edge {
    Stop,
    Start,
}

/// One end of a note at an absolute tick.
///
/// Tokens order by tick, then edge, then the order they were created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct NoteToken {
    pub tick: u64,
    pub edge: Edge,
    pub sequence: usize,
    pub key: Key,
}

/// Settings for turning tokens into events
#[derive(Debug, Clone, Copy)]
pub(crate) struct TokenOutput {
    pub channel: Channel,
    pub on_velocity: u8,
    pub off_velocity: u8,
}

/// A min-heap of note tokens
pub(crate) struct TokenQueue {
    heap: BinaryHeap<Reverse<NoteToken>>,
    sequence: usize,
}

impl TokenQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            sequence: 0,
        }
    }

    fn push(&mut self, tick: u64, edge: Edge, key: Key) {
        self.heap.push(Reverse(NoteToken {
            tick,
            edge,
            sequence: self.sequence,
            key,
        }));
        self.sequence += 1;
    }

    /// Queue a start and a stop token for every sounding note.
    ///
    /// Onsets accumulate from delta-times in note-time units and are turned
    /// into ticks by rounding. Pauses only move time forward.
    pub fn extend_from_notes(&mut self, notes: &[Note], ticks_per_unit: f64) {
        let mut time = 0.;
        for note in notes {
            time += note.delta_time().max(0.);
            let Some(key) = note.pitch().key() else {
                continue;
            };
            let start = to_ticks(time, ticks_per_unit);
            let stop = to_ticks(time + note.duration().max(0.), ticks_per_unit);
            self.push(start, Edge::Start, key);
            self.push(stop, Edge::Stop, key);
        }
    }

    /// Drain the queue in order, one event per token.
    ///
    /// Fails with [`Error::DeltaOverflow`] if two tokens are more than
    /// `u32::MAX` ticks apart.
    pub fn into_events(mut self, output: TokenOutput) -> Result<Vec<TrackEvent>> {
        let mut events = Vec::with_capacity(self.heap.len());
        let mut previous = 0;
        while let Some(Reverse(token)) = self.heap.pop() {
            let gap = token.tick - previous;
            let delta = u32::try_from(gap).map_err(|_| Error::DeltaOverflow {
                tick: token.tick,
                gap,
            })?;
            let message = match token.edge {
                Edge::Start => ChannelMessage::note_on(output.channel, token.key, output.on_velocity),
                Edge::Stop => ChannelMessage::note_off(output.channel, token.key, output.off_velocity),
            };
            events.push(TrackEvent::new(delta, message));
            previous = token.tick;
        }
        Ok(events)
    }
}

fn to_ticks(units: f64, ticks_per_unit: f64) -> u64 {
    (units * ticks_per_unit).round() as u64
}

#[cfg(test)]
const OUTPUT: TokenOutput = TokenOutput {
    channel: Channel::DEFAULT,
    on_velocity: 64,
    off_velocity: 0,
};

#[test]
fn stop_sorts_before_start() {
    let key = Key::new(60).unwrap();
    let mut queue = TokenQueue::new();
    queue.push(10, Edge::Start, key);
    queue.push(10, Edge::Stop, key);
    queue.push(0, Edge::Start, key);

    let order: Vec<_> = core::iter::from_fn(|| queue.heap.pop())
        .map(|Reverse(t)| (t.tick, t.edge))
        .collect();
    assert_eq!(order, vec![(0, Edge::Start), (10, Edge::Stop), (10, Edge::Start)]);
}

#[test]
fn equal_tokens_keep_creation_order() {
    let mut queue = TokenQueue::new();
    queue.push(5, Edge::Start, Key::new(70).unwrap());
    queue.push(5, Edge::Start, Key::new(30).unwrap());

    let events = queue.into_events(OUTPUT).unwrap();
    let keys: Vec<_> = events
        .iter()
        .filter_map(|e| e.channel_message().and_then(ChannelMessage::key))
        .map(|k| k.byte())
        .collect();
    assert_eq!(keys, vec![70, 30]);
}

#[test]
fn gap_beyond_delta_range() {
    let key = Key::new(60).unwrap();
    let far = u64::from(u32::MAX) + 1;

    let mut queue = TokenQueue::new();
    queue.push(0, Edge::Start, key);
    queue.push(u64::from(u32::MAX), Edge::Stop, key);
    let events = queue.into_events(OUTPUT).unwrap();
    assert_eq!(events[1].delta_time(), u32::MAX);

    let mut queue = TokenQueue::new();
    queue.push(0, Edge::Start, key);
    queue.push(far, Edge::Stop, key);
    assert!(matches!(
        queue.into_events(OUTPUT),
        Err(Error::DeltaOverflow { tick, gap }) if tick == far && gap == far
    ));
}
