use super::TickNote;

/// Move near-simultaneous onsets onto the previous onset.
///
/// A note starting less than `minimal_interval` ticks after the previous onset
/// gets a delta-time of zero. Its duration grows by the removed delta so it
/// still ends at the same tick, and the following note's delta grows by the
/// same amount so it still starts at the same tick.
pub(crate) fn snap_chords(notes: &mut [TickNote], minimal_interval: u64) {
    for i in 0..notes.len() {
        let delta = notes[i].delta;
        if delta >= minimal_interval {
            continue;
        }
        notes[i].duration += delta;
        if let Some(next) = notes.get_mut(i + 1) {
            next.delta += delta;
        }
        notes[i].delta = 0;
    }
}

/// Stop notes from sounding past the next onset.
///
/// Notes sharing an onset (a note and the zero-delta notes after it) form a
/// chord. Every chord note's duration is capped at the shortest duration in
/// the chord and at the delta-time of the note after the chord. The final
/// chord has no next onset and is left as it is.
pub(crate) fn trim_chord_durations(notes: &mut [TickNote]) {
    let mut chord_start = 0;
    let mut shortest = u64::MAX;

    for i in 0..notes.len() {
        if notes[i].delta == 0 {
            shortest = shortest.min(notes[i].duration);
            continue;
        }
        if i > chord_start {
            let cap = shortest.min(notes[i].delta);
            for note in &mut notes[chord_start..i] {
                note.duration = cap;
            }
        }
        chord_start = i;
        shortest = notes[i].duration;
    }
}

#[cfg(test)]
use crate::pitch::{Key, Pitch};
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn notes(values: &[(u64, u64)]) -> Vec<TickNote> {
    let key = Pitch::Key(Key::new(60).unwrap());
    values.iter().map(|&(d, l)| TickNote::new(key, d, l)).collect()
}

#[cfg(test)]
fn durations(notes: &[TickNote]) -> Vec<u64> {
    notes.iter().map(|n| n.duration).collect()
}

#[test]
fn single_notes_stop_at_next_onset() {
    let mut n = notes(&[(24, 192), (48, 192), (96, 192), (192, 192)]);
    trim_chord_durations(&mut n);
    assert_eq!(durations(&n), vec![48, 96, 192, 192]);
}

#[test]
fn chord_capped_by_next_onset() {
    let mut n = notes(&[(24, 192), (0, 192), (0, 192), (48, 192)]);
    trim_chord_durations(&mut n);
    assert_eq!(durations(&n), vec![48, 48, 48, 192]);
}

#[test]
fn chord_capped_by_shortest_member() {
    let mut n = notes(&[(24, 24), (0, 192), (0, 192), (48, 192)]);
    trim_chord_durations(&mut n);
    assert_eq!(durations(&n), vec![24, 24, 24, 192]);
}

#[test]
fn leading_zero_delta_chord() {
    let mut n = notes(&[(0, 96), (0, 48), (24, 192)]);
    trim_chord_durations(&mut n);
    assert_eq!(durations(&n), vec![24, 24, 192]);
}

#[test]
fn snapping_keeps_ends_and_next_onset() {
    let mut n = notes(&[(480, 480), (10, 470), (470, 480)]);
    snap_chords(&mut n, 40);
    let shape: Vec<_> = n.iter().map(|n| (n.delta, n.duration)).collect();
    assert_eq!(shape, vec![(480, 480), (0, 480), (480, 480)]);
}
