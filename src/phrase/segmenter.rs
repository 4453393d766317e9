//! Phrase segmentation
//!
//! Splits a melody at cadence markers and reduces each phrase to a sequence
//! of key-normalized base-40 pitches.

use num_rational::Ratio;

use super::{Phrase, START_LABEL};
use crate::encoding::{encode, encode_at_octave, PitchError};
use crate::models::{MelodyNote, QuarterLength};
use crate::transposition::normalize_to_no_alterations;

/// Options for [`segment_phrases`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmenterOptions {
    /// Only the first `n` phrases collect notes; later ones stay empty.
    /// `None` collects every phrase.
    pub max_phrases: Option<usize>,
    /// Encode every pitch in this octave instead of its own
    pub fold_to_octave: Option<i32>,
}

impl SegmenterOptions {
    /// Collect only the first `n` phrases
    pub fn first_phrases(n: usize) -> Self {
        Self {
            max_phrases: Some(n),
            ..Self::default()
        }
    }
}

/// Notes gathered under one phrase label, before grid filtering
#[derive(Debug, Clone)]
pub struct PhraseBucket<'a> {
    pub label: String,
    pub notes: Vec<&'a MelodyNote>,
}

/// Most frequent note duration
///
/// On a tie the duration seen first wins.
pub fn dominant_duration(notes: &[MelodyNote]) -> Option<QuarterLength> {
    let mut tally: Vec<(QuarterLength, usize)> = Vec::new();
    for note in notes {
        match tally.iter_mut().find(|(duration, _)| *duration == note.duration) {
            Some((_, count)) => *count += 1,
            None => tally.push((note.duration, 1)),
        }
    }

    let mut best: Option<(QuarterLength, usize)> = None;
    for (duration, count) in tally {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((duration, count));
        }
    }
    best.map(|(duration, _)| duration)
}

/// Whether `offset` is an exact multiple of `unit`
///
/// A zero unit accepts every offset.
fn is_on_grid(offset: QuarterLength, unit: QuarterLength) -> bool {
    if unit == Ratio::from_integer(0) {
        return true;
    }
    (offset / unit).is_integer()
}

/// Group notes into phrases separated by cadence markers
///
/// The first phrase is labelled [`START_LABEL`]. A note carrying a cadence
/// marker stays in the current phrase; the next phrase is labelled with the
/// position of the note that follows it (or the marked note's own position
/// when it is the last note). Phrases that end up with the same label are
/// merged.
pub fn bucket_by_cadence(notes: &[MelodyNote], max_phrases: Option<usize>) -> Vec<PhraseBucket<'_>> {
    let mut buckets: Vec<PhraseBucket<'_>> = Vec::new();
    let mut label = START_LABEL.to_string();

    for (i, note) in notes.iter().enumerate() {
        let index = match buckets.iter().position(|b| b.label == label) {
            Some(index) => index,
            None => {
                buckets.push(PhraseBucket {
                    label: label.clone(),
                    notes: Vec::new(),
                });
                buckets.len() - 1
            }
        };

        if max_phrases.map_or(true, |max| buckets.len() <= max) {
            buckets[index].notes.push(note);
        }

        if note.has_cadence_marker {
            label = notes.get(i + 1).unwrap_or(note).position.clone();
        }
    }

    buckets
}

/// Cut a melody into normalized phrases
///
/// Only notes whose in-measure offset lies on the dominant-duration grid are
/// kept. Pitches are normalized with the key of the first note. Phrases with
/// no surviving notes are left out.
pub fn segment_phrases(notes: &[MelodyNote], options: &SegmenterOptions) -> Result<Vec<Phrase>, PitchError> {
    let Some(first) = notes.first() else {
        return Ok(Vec::new());
    };
    let key = first.key;
    let unit = dominant_duration(notes).unwrap_or_else(|| Ratio::from_integer(0));

    let mut phrases = Vec::new();
    for bucket in bucket_by_cadence(notes, options.max_phrases) {
        let mut pitches = Vec::with_capacity(bucket.notes.len());
        for note in bucket.notes.iter().filter(|n| is_on_grid(n.measure_offset, unit)) {
            let encoded = match options.fold_to_octave {
                Some(octave) => encode_at_octave(&note.pitch, octave)?,
                None => encode(&note.pitch)?,
            };
            let normalized = normalize_to_no_alterations(encoded, key.sharps);
            // Must still spell as a real pitch
            normalized.decode()?;
            pitches.push(normalized);
        }

        if !pitches.is_empty() {
            phrases.push(Phrase::new(bucket.label, pitches));
        }
    }

    log::debug!(
        "Segmented {} notes into {} phrases (grid {}, key {})",
        notes.len(),
        phrases.len(),
        unit,
        key.major_tonic()
    );

    Ok(phrases)
}
