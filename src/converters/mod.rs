//! Format converters
//!
//! This module contains converters from score file formats into the
//! analysis model.

pub mod musicxml;

// Re-export for convenience
pub use musicxml::{load_score, parse_score, read_composer, Score, ScoreParseError};
