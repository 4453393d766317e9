//! Melody note record handed from the score parser to the phrase core

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use super::{KeySignature, Pitch};

/// Durations and offsets measured in quarter notes, kept exact
pub type QuarterLength = Ratio<i64>;

/// Shorthand for building a quarter length from a numerator/denominator pair
pub fn ql(numer: i64, denom: i64) -> QuarterLength {
    Ratio::new(numer, denom)
}

/// One sounding note of a melodic part
///
/// Everything the phrase core needs is resolved by the parser up front,
/// including whether the note carries a fermata and which key it sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyNote {
    pub pitch: Pitch,
    pub duration: QuarterLength,
    /// Offset from the start of the piece
    pub offset: QuarterLength,
    /// Offset from the start of the enclosing measure
    pub measure_offset: QuarterLength,
    /// "measure, beat" label, e.g. `"12, 2.5"`
    pub position: String,
    pub has_cadence_marker: bool,
    /// Key signature in force at this note
    pub key: KeySignature,
}

impl MelodyNote {
    /// Note with no cadence marker in C major, positioned by its offsets
    pub fn new(
        pitch: Pitch,
        duration: QuarterLength,
        offset: QuarterLength,
        measure_offset: QuarterLength,
        position: impl Into<String>,
    ) -> Self {
        Self {
            pitch,
            duration,
            offset,
            measure_offset,
            position: position.into(),
            has_cadence_marker: false,
            key: KeySignature::default(),
        }
    }

    pub fn with_cadence(mut self) -> Self {
        self.has_cadence_marker = true;
        self
    }

    pub fn with_key(mut self, key: KeySignature) -> Self {
        self.key = key;
        self
    }
}
