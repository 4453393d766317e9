//! MusicXML to analysis score converter
//!
//! Reads a partwise MusicXML document into per-part note streams carrying
//! exactly what the analysis core needs: spelled pitch, exact durations and
//! offsets, fermata flags, the key in force and a "measure, beat" label.
//!
//! # Architecture
//!
//! ```text
//! MusicXML String
//!   ↓ [Parse with roxmltree]
//! XML DOM
//!   ↓ [Walk measures with a time cursor]
//! Score { parts: Vec<Part>, measures: MeasureMap }
//! ```

pub mod model;
pub mod parser;

pub use model::{MeasureInfo, MeasureMap, Part, Score};
pub use parser::{parse_score, read_composer};

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::encoding::PitchError;

/// Errors that can occur while reading a score
#[derive(Debug, Error)]
pub enum ScoreParseError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Invalid value '{value}' for element '{element}'")]
    InvalidValue { element: String, value: String },

    #[error(transparent)]
    Pitch(#[from] PitchError),
}

/// Result type for score parsing operations
pub type ScoreParseResult<T> = Result<T, ScoreParseError>;

/// Read and parse a MusicXML file
pub fn load_score(path: &Path) -> ScoreParseResult<Score> {
    let xml = std::fs::read_to_string(path).map_err(|source| ScoreParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_score(&xml)
}
