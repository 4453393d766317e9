//! MusicXML format converters
//!
//! This module contains converters for MusicXML format.

pub mod musicxml_to_score;

// Re-export for convenience
pub use musicxml_to_score::{
    load_score,
    parse_score,
    read_composer,
    MeasureInfo,
    MeasureMap,
    Part,
    Score,
    ScoreParseError,
    ScoreParseResult,
};
