//! Phrase similarity scoring
//!
//! Three measures are computed in order of cost:
//!
//! 1. **Count difference** `max(len) / min(len) - 1`. Above its threshold the
//!    comparison stops here.
//! 2. **Pitch histogram** similarity over the first `min(len)` pitches.
//! 3. **Sequence equality**: fraction of positions, over the same prefix,
//!    whose letter names agree.
//!
//! A candidate matches when both 2 and 3 reach their thresholds.

use serde::{Deserialize, Serialize};

use super::histogram::{HistogramMetric, PitchHistogram};
use super::Phrase;
use crate::encoding::{letter_of, PitchError};

/// Gates applied to the three similarity measures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Maximum allowed count difference ratio
    pub count_diff: f64,
    /// Minimum histogram similarity
    pub histogram: f64,
    /// Minimum sequence equality
    pub sequence: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            count_diff: 0.25,
            histogram: 0.5,
            sequence: 0.7,
        }
    }
}

/// Outcome of comparing one candidate phrase with the reference
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub count_diff: f64,
    pub pitch_histogram: f64,
    pub sequence_equality: f64,
    pub is_match: bool,
}

impl SimilarityResult {
    fn rejected(count_diff: f64) -> Self {
        Self {
            count_diff,
            ..Self::default()
        }
    }
}

/// Compare `candidate` against `reference`
///
/// An empty phrase on either side is a non-match with an infinite count
/// difference. Fails only if a pitch in either phrase does not decode.
pub fn score(
    reference: &Phrase,
    candidate: &Phrase,
    thresholds: &Thresholds,
    metric: HistogramMetric,
) -> Result<SimilarityResult, PitchError> {
    let shorter = reference.len().min(candidate.len());
    let longer = reference.len().max(candidate.len());
    if shorter == 0 {
        return Ok(SimilarityResult::rejected(f64::INFINITY));
    }

    let count_diff = longer as f64 / shorter as f64 - 1.0;
    if count_diff > thresholds.count_diff {
        return Ok(SimilarityResult::rejected(count_diff));
    }

    let reference_prefix = &reference.pitches[..shorter];
    let candidate_prefix = &candidate.pitches[..shorter];

    let pitch_histogram = metric.similarity(
        &PitchHistogram::from_pitches(reference_prefix),
        &PitchHistogram::from_pitches(candidate_prefix),
    );

    let mut equal = 0usize;
    for (a, b) in reference_prefix.iter().zip(candidate_prefix) {
        if letter_of(*a)? == letter_of(*b)? {
            equal += 1;
        }
    }
    let sequence_equality = equal as f64 / shorter as f64;

    Ok(SimilarityResult {
        count_diff,
        pitch_histogram,
        sequence_equality,
        is_match: pitch_histogram >= thresholds.histogram && sequence_equality >= thresholds.sequence,
    })
}
