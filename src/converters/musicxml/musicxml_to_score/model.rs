//! Lean score model for analysis
//!
//! Not a notation model: rests, ties, beams and layout are gone. Each part
//! is just the ordered list of sounding notes.

use serde::{Deserialize, Serialize};

use crate::models::{MelodyNote, QuarterLength};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    pub title: Option<String>,
    pub composer: Option<String>,
    pub parts: Vec<Part>,     // One per MusicXML <part>
    pub measures: MeasureMap, // Built from the first part
}

impl Score {
    pub fn part(&self, index: usize) -> Option<&Part> {
        self.parts.get(index)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub name: String,
    pub notes: Vec<MelodyNote>,
}

impl Part {
    /// Notes carrying a fermata
    pub fn cadence_notes(&self) -> impl Iterator<Item = &MelodyNote> {
        self.notes.iter().filter(|n| n.has_cadence_marker)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureInfo {
    pub number: String,         // Raw number attribute
    pub name: String,           // Unique display name ("12", "12 (1)", ...)
    pub offset: QuarterLength,  // From the start of the piece
    pub length: QuarterLength,
}

/// Measure offsets to unique measure names
///
/// Measure numbers repeat after volta endings or in hand-numbered
/// editions; later occurrences get a ` (n)` suffix so every measure has a
/// distinct name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasureMap {
    entries: Vec<MeasureInfo>,
}

impl MeasureMap {
    pub fn new(entries: Vec<MeasureInfo>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MeasureInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the measure containing `offset`
    pub fn name_at(&self, offset: QuarterLength) -> Option<&str> {
        self.entries
            .iter()
            .take_while(|m| m.offset <= offset)
            .last()
            .map(|m| m.name.as_str())
    }
}
