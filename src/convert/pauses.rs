use super::TickNote;

/// Cap an onset gap at `max_interval`, carving the excess into pauses.
///
/// The pauses come back in the order they precede the note. All of them
/// start `max_interval` after the one before; all but the last last
/// `max_interval`, the last one lasts the remainder of the gap. The note's
/// delta-time becomes that remainder, or `max_interval` when the gap divides
/// evenly.
pub(crate) fn trim_delta_time(delta: u64, max_interval: u64) -> (u64, Vec<TickNote>) {
    if delta <= max_interval || max_interval == 0 {
        return (delta, Vec::new());
    }

    let full_pauses = delta / max_interval - 1;
    let remainder = delta % max_interval;

    let mut pauses: Vec<TickNote> = (0..full_pauses)
        .map(|_| TickNote::pause(max_interval, max_interval))
        .collect();

    if remainder != 0 {
        pauses.push(TickNote::pause(max_interval, remainder));
        (remainder, pauses)
    } else {
        (max_interval, pauses)
    }
}

/// Insert a pause into every silence between one note's end and the next onset.
///
/// A note whose delta-time exceeds the previous note's duration gets a pause
/// in front of it, starting where the previous note ends and lasting until
/// the note's onset. The note's delta-time shrinks to the pause's duration.
pub(crate) fn fill_rests(notes: Vec<TickNote>) -> Vec<TickNote> {
    let mut filled = Vec::with_capacity(notes.len());
    let mut previous_duration = 0;

    for mut note in notes {
        if note.delta > previous_duration {
            let gap = note.delta - previous_duration;
            filled.push(TickNote::pause(previous_duration, gap));
            note.delta = gap;
        }
        previous_duration = note.duration;
        filled.push(note);
    }
    filled
}

#[cfg(test)]
use crate::pitch::{Key, Pitch};
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn triples(notes: &[TickNote]) -> Vec<(Pitch, u64, u64)> {
    notes.iter().map(|n| (n.pitch, n.delta, n.duration)).collect()
}

#[test]
fn gap_with_remainder() {
    let (delta, pauses) = trim_delta_time(1922, 960);
    assert_eq!(delta, 2);
    assert_eq!(
        triples(&pauses),
        vec![(Pitch::Pause, 960, 960), (Pitch::Pause, 960, 2)]
    );
}

#[test]
fn gap_of_whole_intervals() {
    let (delta, pauses) = trim_delta_time(2880, 960);
    assert_eq!(delta, 960);
    assert_eq!(
        triples(&pauses),
        vec![(Pitch::Pause, 960, 960), (Pitch::Pause, 960, 960)]
    );
}

#[test]
fn short_gaps_are_untouched() {
    assert_eq!(trim_delta_time(480, 960).0, 480);
    assert!(trim_delta_time(960, 960).1.is_empty());
}

#[test]
fn rests_between_notes() {
    let key = Pitch::Key(Key::new(20).unwrap());
    let notes = vec![
        TickNote::new(key, 24, 24),
        TickNote::new(key, 0, 24),
        TickNote::new(key, 0, 24),
        TickNote::new(key, 48, 192),
    ];
    assert_eq!(
        triples(&fill_rests(notes)),
        vec![
            (Pitch::Pause, 0, 24),
            (key, 24, 24),
            (key, 0, 24),
            (key, 0, 24),
            (Pitch::Pause, 24, 24),
            (key, 24, 192),
        ]
    );
}
