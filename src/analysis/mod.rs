//! Analysis methods
//!
//! An analysis method turns one score file into one row of a catalogue
//! report. The corpus driver runs a method over every piece of every
//! catalogue, in parallel, so methods must be shareable between threads.

pub mod closures;

pub use closures::CountClosures;

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::converters::{load_score, ScoreParseError};
use crate::encoding::PitchError;
use crate::models::MelodyNote;

/// Errors from analysing a single piece
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ScoreParseError,
    },

    #[error("{path} has no part {index}")]
    MissingPart { path: PathBuf, index: usize },

    #[error(transparent)]
    Pitch(#[from] PitchError),

    #[error("no reference phrase could be extracted from {0}")]
    EmptyReference(PathBuf),
}

impl AnalysisError {
    /// True for encodings that should be impossible after normalization
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, AnalysisError::Pitch(PitchError::InvalidEncoding { .. }))
    }
}

/// A per-piece analysis with a tabular result
pub trait AnalysisMethod: Sync {
    type Output: Send + Debug;

    /// Short name, used for default report file names
    fn name(&self) -> &str;

    fn analyze(&self, path: &Path) -> Result<Self::Output, AnalysisError>;

    /// Column names this method contributes to a catalogue report
    fn output_header(&self) -> Vec<String>;

    /// One report row; same length as [`AnalysisMethod::output_header`]
    fn output_entry(&self, output: &Self::Output) -> Vec<String>;
}

/// Notes of part `part` of the score at `path`
pub fn load_melody(path: &Path, part: usize) -> Result<Vec<MelodyNote>, AnalysisError> {
    let score = load_score(path).map_err(|source| match source {
        ScoreParseError::Io { path, source } => AnalysisError::Io { path, source },
        source => AnalysisError::Parse {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut parts = score.parts;
    if part >= parts.len() {
        return Err(AnalysisError::MissingPart {
            path: path.to_path_buf(),
            index: part,
        });
    }
    Ok(parts.swap_remove(part).notes)
}
