//! Closure counting

use std::path::Path;

use super::{load_melody, AnalysisError, AnalysisMethod};

/// Counts the fermatas in a piece's melody
#[derive(Debug, Clone, Copy, Default)]
pub struct CountClosures {
    pub melody_part: usize,
}

impl CountClosures {
    pub fn new(melody_part: usize) -> Self {
        Self { melody_part }
    }
}

impl AnalysisMethod for CountClosures {
    type Output = usize;

    fn name(&self) -> &str {
        "CountClosures"
    }

    fn analyze(&self, path: &Path) -> Result<usize, AnalysisError> {
        let notes = load_melody(path, self.melody_part)?;
        Ok(notes.iter().filter(|n| n.has_cadence_marker).count())
    }

    fn output_header(&self) -> Vec<String> {
        vec!["# of closures".to_string()]
    }

    fn output_entry(&self, output: &usize) -> Vec<String> {
        vec![output.to_string()]
    }
}
