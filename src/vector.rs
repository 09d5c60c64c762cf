#![doc = r#"
Notes as fixed-width one-hot vectors

# Layout

```text
[ pitch block | delta-time block (11) | duration block (11) ]
```

The pitch block depends on the instrument class:

* melodic (19 slots): 12 pitch-class slots starting at C1 (key 24), one pause
  slot, then 6 octave slots. Keys outside C1..B6 keep their pitch class and
  are clamped into the nearest octave.
* percussive (23 slots): one slot per drum key in [`DRUM_KEYS`], then a pause
  slot. Other keys cannot be represented.

A time block is an 8-slot [`NoteLength`] one-hot followed by a 3-slot
[`TimeKind`] one-hot, describing the quantized time.

Decoding takes the largest value of each one-hot group, the first one on
ties, so model outputs that are not strictly one-hot decode too. A melodic
pitch whose class group peaks at the pause slot is a pause, whatever its
octave group holds.
"#]

use ndarray::{Array1, ArrayView1, ArrayViewMut1, s};

use crate::{
    Error, Result,
    note::{InstrumentClass, Note},
    pitch::{Key, Pitch},
    quantize::{NoteLength, QuantizedTime, TimeKind},
};

/// Lowest key of the melodic vocabulary, C1
pub const MIN_MELODIC_KEY: u8 = 24;

/// Pitch-class slots per octave
pub const PITCHES_PER_OCTAVE: usize = 12;

/// Octaves of the melodic vocabulary
pub const NUMBER_OF_OCTAVES: usize = 6;

/// Index of the pause slot in a melodic pitch block
pub const MELODIC_PAUSE_SLOT: usize = PITCHES_PER_OCTAVE;

/// Width of a melodic pitch block
pub const MELODIC_PITCH_LEN: usize = PITCHES_PER_OCTAVE + 1 + NUMBER_OF_OCTAVES;

/// Drum keys with a slot in the percussive vocabulary, in slot order
pub const DRUM_KEYS: [u8; 22] = [
    35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 55, 57, 59,
];

/// Width of a percussive pitch block, pause slot included
pub const PERCUSSIVE_PITCH_LEN: usize = DRUM_KEYS.len() + 1;

/// Width of one time block
pub const TIME_VECTOR_LEN: usize = NoteLength::COUNT + TimeKind::COUNT;

impl InstrumentClass {
    /// Width of the pitch block
    pub const fn pitch_block_len(&self) -> usize {
        match self {
            Self::Melodic => MELODIC_PITCH_LEN,
            Self::Percussive => PERCUSSIVE_PITCH_LEN,
        }
    }

    /// Width of a whole note vector
    pub const fn vector_len(&self) -> usize {
        self.pitch_block_len() + 2 * TIME_VECTOR_LEN
    }
}

/// Index of the first largest value, 0 for an empty view
fn arg_max(values: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

/// Write the pitch block of `pitch` into `block`
fn encode_pitch(
    instrument: InstrumentClass,
    pitch: Pitch,
    mut block: ArrayViewMut1<f64>,
) -> Result<()> {
    match (instrument, pitch) {
        (InstrumentClass::Melodic, Pitch::Pause) => {
            block[MELODIC_PAUSE_SLOT] = 1.;
            block[MELODIC_PAUSE_SLOT + 1] = 1.;
        }
        (InstrumentClass::Melodic, Pitch::Key(key)) => {
            let offset = key.byte() as i32 - MIN_MELODIC_KEY as i32;
            let class = offset.rem_euclid(PITCHES_PER_OCTAVE as i32) as usize;
            let octave = offset
                .div_euclid(PITCHES_PER_OCTAVE as i32)
                .clamp(0, NUMBER_OF_OCTAVES as i32 - 1) as usize;
            block[class] = 1.;
            block[MELODIC_PAUSE_SLOT + 1 + octave] = 1.;
        }
        (InstrumentClass::Percussive, Pitch::Pause) => {
            block[DRUM_KEYS.len()] = 1.;
        }
        (InstrumentClass::Percussive, Pitch::Key(key)) => {
            let slot = DRUM_KEYS
                .iter()
                .position(|&drum| drum == key.byte())
                .ok_or(Error::UnknownPitch { instrument, pitch })?;
            block[slot] = 1.;
        }
    }
    Ok(())
}

fn decode_pitch(instrument: InstrumentClass, block: ArrayView1<f64>) -> Pitch {
    match instrument {
        InstrumentClass::Melodic => {
            let class = arg_max(block.slice(s![..=MELODIC_PAUSE_SLOT]));
            if class == MELODIC_PAUSE_SLOT {
                return Pitch::Pause;
            }
            let octave = arg_max(block.slice(s![MELODIC_PAUSE_SLOT + 1..]));
            let byte = MIN_MELODIC_KEY as usize + class + PITCHES_PER_OCTAVE * octave;
            Pitch::Key(Key::from_byte_lossy(byte as u8))
        }
        InstrumentClass::Percussive => match DRUM_KEYS.get(arg_max(block)) {
            Some(&drum) => Pitch::Key(Key::from_byte_lossy(drum)),
            None => Pitch::Pause,
        },
    }
}

/// The time block of `units`, after quantizing
pub fn time_to_vector(units: f64) -> Array1<f64> {
    let mut block = Array1::<f64>::zeros(TIME_VECTOR_LEN);
    write_time(units, block.view_mut());
    block
}

fn write_time(units: f64, mut block: ArrayViewMut1<f64>) {
    let time = QuantizedTime::nearest(units);
    block[time.length().index()] = 1.;
    block[NoteLength::COUNT + time.kind().index()] = 1.;
}

/// The quantized time a time block describes
pub fn time_from_vector(block: ArrayView1<f64>) -> f64 {
    let length = arg_max(block.slice(s![..NoteLength::COUNT]));
    let kind = arg_max(block.slice(s![NoteLength::COUNT..TIME_VECTOR_LEN]));
    // both indices come from slices of the right width
    QuantizedTime::new(
        NoteLength::from_index(length).unwrap_or(NoteLength::Zero),
        TimeKind::from_index(kind).unwrap_or(TimeKind::Normal),
    )
    .units()
}

impl Note {
    /// Encode the note as a vector of [`InstrumentClass::vector_len`] values.
    ///
    /// Times are quantized on the way. Fails with [`Error::UnknownPitch`] for a
    /// percussive key without a drum slot.
    ///
    /// # Example
    /// ```rust
    /// # use notematrix::prelude::*;
    /// let note = Note::new(InstrumentClass::Melodic, Key::new(32).unwrap(), 96., 36.);
    /// let vector = note.to_vector().unwrap();
    /// assert_eq!(vector.len(), 41);
    ///
    /// let hot: Vec<usize> = vector
    ///     .iter()
    ///     .enumerate()
    ///     .filter(|(_, v)| **v == 1.)
    ///     .map(|(i, _)| i)
    ///     .collect();
    /// // G#, first octave, half note, normal, eighth note, dotted
    /// assert_eq!(hot, [8, 13, 19 + 6, 19 + 8, 30 + 4, 30 + 10]);
    /// ```
    pub fn to_vector(&self) -> Result<Array1<f64>> {
        let instrument = self.instrument();
        let pitch_len = instrument.pitch_block_len();
        let mut vector = Array1::<f64>::zeros(instrument.vector_len());

        encode_pitch(instrument, self.pitch(), vector.slice_mut(s![..pitch_len]))?;
        write_time(
            self.delta_time(),
            vector.slice_mut(s![pitch_len..pitch_len + TIME_VECTOR_LEN]),
        );
        write_time(self.duration(), vector.slice_mut(s![pitch_len + TIME_VECTOR_LEN..]));
        Ok(vector)
    }

    /// Decode a vector produced by [`Note::to_vector`], or a model output of the same width
    pub fn from_vector(instrument: InstrumentClass, vector: ArrayView1<f64>) -> Result<Self> {
        let expected = instrument.vector_len();
        if vector.len() != expected {
            return Err(Error::VectorWidth {
                expected,
                found: vector.len(),
            });
        }
        let pitch_len = instrument.pitch_block_len();
        let pitch = decode_pitch(instrument, vector.slice(s![..pitch_len]));
        let delta_time = time_from_vector(vector.slice(s![pitch_len..pitch_len + TIME_VECTOR_LEN]));
        let duration = time_from_vector(vector.slice(s![pitch_len + TIME_VECTOR_LEN..]));
        Ok(Note::new(instrument, pitch, delta_time, duration))
    }
}

#[cfg(test)]
use crate::quantize::POSSIBLE_TIMINGS;
#[cfg(test)]
use ndarray::array;

#[cfg(test)]
fn hot_slots(vector: &Array1<f64>) -> Vec<usize> {
    vector
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == 1.)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn vector_widths() {
    assert_eq!(InstrumentClass::Melodic.pitch_block_len(), 19);
    assert_eq!(InstrumentClass::Percussive.pitch_block_len(), 23);
    assert_eq!(InstrumentClass::Melodic.vector_len(), 41);
    assert_eq!(InstrumentClass::Percussive.vector_len(), 45);
}

#[test]
fn time_blocks() {
    assert_eq!(hot_slots(&time_to_vector(96.)), vec![6, 8]);
    assert_eq!(hot_slots(&time_to_vector(32.)), vec![5, 9]);
    assert_eq!(hot_slots(&time_to_vector(36.)), vec![4, 10]);

    let block = |length: usize, kind: usize| {
        let mut b = Array1::<f64>::zeros(TIME_VECTOR_LEN);
        b[length] = 1.;
        b[NoteLength::COUNT + kind] = 1.;
        b
    };
    assert_eq!(time_from_vector(block(7, 0).view()), 192.);
    assert_eq!(time_from_vector(block(1, 1).view()), 2.);
    assert_eq!(time_from_vector(block(2, 2).view()), 9.);
}

#[test]
fn soft_time_block() {
    let soft = array![0.1, 0.0, 0.2, 0.9, 0.3, 0.9, 0.0, 0.0, 0.2, 0.7, 0.1];
    // first of the two 0.9 peaks wins
    assert_eq!(time_from_vector(soft.view()), 8.);
}

#[test]
fn melodic_pitch_slots() {
    let note = Note::new(InstrumentClass::Melodic, Key::new(32).unwrap(), 0., 0.);
    let vector = note.to_vector().unwrap();
    let pitch_slots: Vec<_> = hot_slots(&vector).into_iter().filter(|&i| i < 19).collect();
    assert_eq!(pitch_slots, vec![8, 13]);

    let pause = Note::pause(InstrumentClass::Melodic, 0., 0.).to_vector().unwrap();
    assert_eq!(hot_slots(&pause)[..2], [12, 13]);
}

#[test]
fn melodic_octaves_clamp() {
    let high = Note::new(InstrumentClass::Melodic, Key::new(120).unwrap(), 0., 0.);
    let decoded = Note::from_vector(InstrumentClass::Melodic, high.to_vector().unwrap().view()).unwrap();
    // C in the top octave
    assert_eq!(decoded.pitch(), Pitch::Key(Key::new(84).unwrap()));

    let low = Note::new(InstrumentClass::Melodic, Key::new(3).unwrap(), 0., 0.);
    let decoded = Note::from_vector(InstrumentClass::Melodic, low.to_vector().unwrap().view()).unwrap();
    assert_eq!(decoded.pitch(), Pitch::Key(Key::new(27).unwrap()));
}

#[test]
fn melodic_pause_ignores_octave_block() {
    let mut vector = Array1::<f64>::zeros(InstrumentClass::Melodic.vector_len());
    vector[MELODIC_PAUSE_SLOT] = 1.;
    vector[MELODIC_PITCH_LEN - 1] = 1.;
    let note = Note::from_vector(InstrumentClass::Melodic, vector.view()).unwrap();
    assert!(note.is_pause());
}

#[test]
fn drum_pitch_slots() {
    let snare = Note::new(InstrumentClass::Percussive, Key::new(53).unwrap(), 0., 0.);
    assert_eq!(hot_slots(&snare.to_vector().unwrap())[0], 18);

    let pause = Note::pause(InstrumentClass::Percussive, 0., 0.);
    assert_eq!(hot_slots(&pause.to_vector().unwrap())[0], 22);

    let unknown = Note::new(InstrumentClass::Percussive, Key::new(54).unwrap(), 0., 0.);
    assert!(matches!(
        unknown.to_vector(),
        Err(Error::UnknownPitch {
            instrument: InstrumentClass::Percussive,
            ..
        })
    ));
}

#[test]
fn wrong_width_is_rejected() {
    let vector = Array1::<f64>::zeros(41);
    assert!(matches!(
        Note::from_vector(InstrumentClass::Percussive, vector.view()),
        Err(Error::VectorWidth {
            expected: 45,
            found: 41
        })
    ));
}

#[test]
fn quantized_notes_survive_vectors() {
    let times: Vec<f64> = POSSIBLE_TIMINGS.iter().flatten().copied().collect();
    let mut melodic: Vec<Pitch> = (24..96).map(|k| Pitch::Key(Key::new(k).unwrap())).collect();
    melodic.push(Pitch::Pause);
    let mut drums: Vec<Pitch> = DRUM_KEYS.iter().map(|&k| Pitch::Key(Key::new(k).unwrap())).collect();
    drums.push(Pitch::Pause);

    for (instrument, pitches) in [(InstrumentClass::Melodic, melodic), (InstrumentClass::Percussive, drums)] {
        for (i, pitch) in pitches.iter().enumerate() {
            let delta = times[i % times.len()];
            let duration = times[(i * 7 + 3) % times.len()];
            let note = Note::new(instrument, *pitch, delta, duration);
            let vector = note.to_vector().unwrap();
            assert_eq!(Note::from_vector(instrument, vector.view()).unwrap(), note);
        }
    }
}
