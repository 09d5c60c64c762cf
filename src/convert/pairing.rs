use crate::{Warning, events::TrackEvent, pitch::Key};

/// An onset and its release, in absolute ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotePair {
    /// Absolute tick of the note-on
    pub onset: u64,
    /// Ticks since the previous onset, or since tick 0 for the first one
    pub delta: u64,
    pub key: Key,
    /// Absolute tick of the release
    pub release: u64,
}

impl NotePair {
    pub fn duration(&self) -> u64 {
        self.release.saturating_sub(self.onset)
    }
}

/// Walks a track keeping one open onset per key.
///
/// Pairs are kept in onset order; `open[key]` indexes the pair a key's next
/// release will close.
pub(crate) struct NotePairer {
    onsets: Vec<(u64, u64, Key)>,
    releases: Vec<Option<u64>>,
    open: [Option<usize>; 128],
    current_tick: u64,
    previous_onset: u64,
    warnings: Vec<Warning>,
}

impl NotePairer {
    pub fn new() -> Self {
        Self {
            onsets: Vec::new(),
            releases: Vec::new(),
            open: [None; 128],
            current_tick: 0,
            previous_onset: 0,
            warnings: Vec::new(),
        }
    }

    pub fn push(&mut self, event: &TrackEvent) {
        self.current_tick += event.delta_time() as u64;
        let Some(message) = event.channel_message() else {
            return;
        };
        let Some(key) = message.key() else {
            return;
        };
        if message.is_note_on() {
            self.note_on(key);
        } else if message.is_note_off() {
            self.note_off(key);
        }
    }

    fn note_on(&mut self, key: Key) {
        let slot = key.byte() as usize;
        if let Some(index) = self.open[slot].take() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Key {} struck again at tick {} while open, closing the previous onset",
                key.byte(),
                self.current_tick
            );
            self.releases[index] = Some(self.current_tick);
        }

        let delta = self.current_tick - self.previous_onset;
        self.open[slot] = Some(self.onsets.len());
        self.onsets.push((self.current_tick, delta, key));
        self.releases.push(None);
        self.previous_onset = self.current_tick;
    }

    fn note_off(&mut self, key: Key) {
        match self.open[key.byte() as usize].take() {
            Some(index) => self.releases[index] = Some(self.current_tick),
            None => {
                let warning = Warning::UnmatchedRelease {
                    key: key.byte(),
                    tick: self.current_tick,
                };
                #[cfg(feature = "tracing")]
                tracing::warn!("{warning}");
                self.warnings.push(warning);
            }
        }
    }

    /// Close every onset still open at the last event's tick
    pub fn finish(mut self) -> (Vec<NotePair>, Vec<Warning>) {
        for slot in self.open.iter_mut() {
            let Some(index) = slot.take() else {
                continue;
            };
            let warning = Warning::DanglingOnset {
                key: self.onsets[index].2.byte(),
                tick: self.current_tick,
            };
            #[cfg(feature = "tracing")]
            tracing::warn!("{warning}");
            self.warnings.push(warning);
            self.releases[index] = Some(self.current_tick);
        }

        let end = self.current_tick;
        let pairs = self
            .onsets
            .into_iter()
            .zip(self.releases)
            .map(|((onset, delta, key), release)| NotePair {
                onset,
                delta,
                key,
                release: release.unwrap_or(end),
            })
            .collect();
        (pairs, self.warnings)
    }
}

/// Pair every note-on of `events` with its release
pub(crate) fn pair_up(events: &[TrackEvent]) -> (Vec<NotePair>, Vec<Warning>) {
    let mut pairer = NotePairer::new();
    for event in events {
        pairer.push(event);
    }
    pairer.finish()
}

#[cfg(test)]
use crate::events::{Channel, ChannelMessage};
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn on(delta: u32, key: u8) -> TrackEvent {
    TrackEvent::new(delta, ChannelMessage::note_on(Channel::DEFAULT, Key::new(key).unwrap(), 64))
}

#[cfg(test)]
fn off(delta: u32, key: u8) -> TrackEvent {
    TrackEvent::new(delta, ChannelMessage::note_off(Channel::DEFAULT, Key::new(key).unwrap(), 0))
}

#[cfg(test)]
fn tuples(pairs: &[NotePair]) -> Vec<(u64, u64, u8, u64)> {
    pairs
        .iter()
        .map(|p| (p.onset, p.delta, p.key.byte(), p.release))
        .collect()
}

#[test]
fn interleaved_pairs() {
    let pattern = [on(0, 0x0A), on(0x30, 0x10), off(0x20, 0x0A), off(0x30, 0x10)];
    let events: Vec<_> = pattern.iter().cycle().take(12).cloned().collect();

    let (pairs, warnings) = pair_up(&events);
    assert!(warnings.is_empty());
    assert_eq!(
        tuples(&pairs),
        vec![
            (0x00, 0x00, 0x0A, 0x50),
            (0x30, 0x30, 0x10, 0x80),
            (0x80, 0x50, 0x0A, 0xD0),
            (0xB0, 0x30, 0x10, 0x100),
            (0x100, 0x50, 0x0A, 0x150),
            (0x130, 0x30, 0x10, 0x180),
        ]
    );
}

#[test]
fn zero_velocity_note_on_releases() {
    let release = TrackEvent::new(
        24,
        ChannelMessage::note_on(Channel::DEFAULT, Key::new(60).unwrap(), 0),
    );
    let (pairs, _) = pair_up(&[on(12, 60), release]);
    assert_eq!(tuples(&pairs), vec![(12, 12, 60, 36)]);
}

#[test]
fn unmatched_release_is_ignored() {
    let (pairs, warnings) = pair_up(&[off(5, 40), on(5, 41), off(5, 41)]);
    assert_eq!(tuples(&pairs), vec![(10, 10, 41, 15)]);
    assert_eq!(warnings, vec![Warning::UnmatchedRelease { key: 40, tick: 5 }]);
}

#[test]
fn dangling_onset_closes_at_track_end() {
    let (pairs, warnings) = pair_up(&[on(0, 50), TrackEvent::end_of_track(96)]);
    assert_eq!(tuples(&pairs), vec![(0, 0, 50, 96)]);
    assert_eq!(warnings, vec![Warning::DanglingOnset { key: 50, tick: 96 }]);
}

#[test]
fn restrike_closes_previous_onset() {
    let (pairs, warnings) = pair_up(&[on(0, 60), on(10, 60), off(10, 60)]);
    assert!(warnings.is_empty());
    assert_eq!(tuples(&pairs), vec![(0, 0, 60, 10), (10, 10, 60, 20)]);
}
