//! Corpus driver
//!
//! A corpus is a directory tree of MusicXML files grouped into catalogues.
//! The driver finds the catalogues, runs an [`AnalysisMethod`] over every
//! piece and collects the results per catalogue.
//!
//! [`AnalysisMethod`]: crate::analysis::AnalysisMethod

pub mod catalogue;
pub mod procedure;
pub mod scanner;

pub use catalogue::{catalogue_id, file_stem, piece_number, specifiers};
pub use procedure::{analyse_catalogue_corpus, Catalogue, CorpusAnalysis, CorpusParams, PieceResult, SkippedPiece};
pub use scanner::scan_corpus;

use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a whole corpus run
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus directory not found: {0}")]
    CorpusNotFound(PathBuf),

    #[error("corpus path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("the corpus at {0} contains no catalogues")]
    NoCatalogues(PathBuf),
}
