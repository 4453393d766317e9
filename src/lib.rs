//! musicau: corpus-based musicological analysis
//!
//! Reads catalogues of MusicXML scores and runs analysis methods over every
//! piece. The main method is phrase detection: each piece is cut into
//! phrases at its fermatas, the phrases are reduced to key-independent
//! base-40 pitch sequences and compared against a reference phrase.

pub mod analysis;
pub mod config;
pub mod converters;
pub mod corpus;
pub mod encoding;
pub mod models;
pub mod phrase;
pub mod report;
pub mod transposition;

// Re-export commonly used types
pub use analysis::{AnalysisError, AnalysisMethod, CountClosures};
pub use config::AnalysisConfig;
pub use encoding::{decode, encode, EncodedPitch, PitchError};
pub use models::*;
pub use phrase::{Phrase, PhraseDetector, SimilarityResult, Thresholds};
