//! Phrase detection
//!
//! A melody is cut into phrases at fermatas, each phrase is reduced to the
//! notes sitting on the piece's dominant rhythmic grid, and the remaining
//! pitches are encoded in base-40 and transposed to a key without
//! accidentals. Candidate phrases are then compared against a reference
//! phrase with three independent measures.
//!
//! ```text
//! Vec<MelodyNote>
//!   ↓ segmenter (cadence buckets, grid filter, key normalization)
//! Vec<Phrase>
//!   ↓ similarity (count ratio → histogram → letter sequence)
//! SimilarityResult per phrase
//! ```

pub mod detector;
pub mod histogram;
pub mod segmenter;
pub mod similarity;

pub use detector::{compute_reference_phrase, PhraseDetection, PhraseDetector, PhraseDetectorSettings, PhraseScore};
pub use histogram::{HistogramMetric, PitchHistogram};
pub use segmenter::{bucket_by_cadence, dominant_duration, segment_phrases, PhraseBucket, SegmenterOptions};
pub use similarity::{score, SimilarityResult, Thresholds};

use serde::{Deserialize, Serialize};

use crate::encoding::EncodedPitch;

/// Label of the phrase that opens a piece, before any fermata has been seen
pub const START_LABEL: &str = "1, 1.0";

/// Normalized pitch sequence of one phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// "measure, beat" position where the phrase starts
    pub label: String,
    pub pitches: Vec<EncodedPitch>,
}

impl Phrase {
    pub fn new(label: impl Into<String>, pitches: Vec<EncodedPitch>) -> Self {
        Self {
            label: label.into(),
            pitches,
        }
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}
