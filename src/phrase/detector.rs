//! Phrase detection against a reference phrase

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::histogram::HistogramMetric;
use super::segmenter::{segment_phrases, SegmenterOptions};
use super::similarity::{score, SimilarityResult, Thresholds};
use super::Phrase;
use crate::analysis::{load_melody, AnalysisError, AnalysisMethod};
use crate::models::MelodyNote;

/// Everything a [`PhraseDetector`] needs besides the reference phrase
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhraseDetectorSettings {
    pub thresholds: Thresholds,
    pub metric: HistogramMetric,
    /// Index of the part holding the melody
    pub melody_part: usize,
    pub fold_to_octave: Option<i32>,
}

impl PhraseDetectorSettings {
    fn segmenter_options(&self) -> SegmenterOptions {
        SegmenterOptions {
            max_phrases: None,
            fold_to_octave: self.fold_to_octave,
        }
    }
}

/// Score of one phrase of a piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseScore {
    pub label: String,
    pub result: SimilarityResult,
}

/// Result of running the detector over one piece
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhraseDetection {
    /// Labels of matching phrases, in phrase order
    pub matches: Vec<String>,
    /// One entry per phrase, in phrase order
    pub results: Vec<PhraseScore>,
}

impl PhraseDetection {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// First phrase of the melody in `path`
pub fn compute_reference_phrase(
    path: &Path,
    melody_part: usize,
    fold_to_octave: Option<i32>,
) -> Result<Phrase, AnalysisError> {
    let notes = load_melody(path, melody_part)?;
    let options = SegmenterOptions {
        max_phrases: Some(1),
        fold_to_octave,
    };
    segment_phrases(&notes, &options)?
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::EmptyReference(path.to_path_buf()))
}

/// Finds phrases that resemble a reference phrase
///
/// Immutable once built, so one detector can serve every worker thread.
#[derive(Debug, Clone)]
pub struct PhraseDetector {
    reference: Phrase,
    reference_path: Option<PathBuf>,
    settings: PhraseDetectorSettings,
}

impl PhraseDetector {
    /// Extract the reference phrase from `reference_path`
    pub fn new(reference_path: &Path, settings: PhraseDetectorSettings) -> Result<Self, AnalysisError> {
        let reference = compute_reference_phrase(reference_path, settings.melody_part, settings.fold_to_octave)?;
        log::info!(
            "Reference phrase from {}: {} pitches",
            reference_path.display(),
            reference.len()
        );
        Ok(Self {
            reference,
            reference_path: Some(reference_path.to_path_buf()),
            settings,
        })
    }

    /// Use an already computed reference phrase
    pub fn with_reference(reference: Phrase, settings: PhraseDetectorSettings) -> Self {
        Self {
            reference,
            reference_path: None,
            settings,
        }
    }

    pub fn reference(&self) -> &Phrase {
        &self.reference
    }

    pub fn reference_path(&self) -> Option<&Path> {
        self.reference_path.as_deref()
    }

    pub fn settings(&self) -> &PhraseDetectorSettings {
        &self.settings
    }

    /// Compare one candidate phrase with the reference
    pub fn detect(&self, candidate: &Phrase) -> Result<SimilarityResult, AnalysisError> {
        Ok(score(
            &self.reference,
            candidate,
            &self.settings.thresholds,
            self.settings.metric,
        )?)
    }

    /// Segment a melody and score every phrase
    pub fn detect_in_notes(&self, notes: &[MelodyNote]) -> Result<PhraseDetection, AnalysisError> {
        let phrases = segment_phrases(notes, &self.settings.segmenter_options())?;

        let mut detection = PhraseDetection::default();
        for phrase in phrases {
            let result = self.detect(&phrase)?;
            if result.is_match {
                detection.matches.push(phrase.label.clone());
            }
            detection.results.push(PhraseScore {
                label: phrase.label,
                result,
            });
        }
        Ok(detection)
    }

    pub fn analyze_piece(&self, path: &Path) -> Result<PhraseDetection, AnalysisError> {
        let notes = load_melody(path, self.settings.melody_part)?;
        let detection = self.detect_in_notes(&notes)?;
        log::debug!(
            "{}: {} phrases, {} matches",
            path.display(),
            detection.results.len(),
            detection.matches.len()
        );
        Ok(detection)
    }
}

impl AnalysisMethod for PhraseDetector {
    type Output = PhraseDetection;

    fn name(&self) -> &str {
        "PhraseDetection"
    }

    fn analyze(&self, path: &Path) -> Result<PhraseDetection, AnalysisError> {
        self.analyze_piece(path)
    }

    fn output_header(&self) -> Vec<String> {
        vec![
            "Phrase Matches".to_string(),
            "Detection Results per Phrase".to_string(),
        ]
    }

    fn output_entry(&self, output: &PhraseDetection) -> Vec<String> {
        // Infinite count differences serialize as null
        let details = serde_json::to_string(&output.results).unwrap_or_default();
        vec![output.matches.join("; "), details]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode;
    use crate::models::{ql, Pitch};

    fn quarters(names: &[&str]) -> Vec<MelodyNote> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                MelodyNote::new(
                    Pitch::parse(name).unwrap(),
                    ql(1, 1),
                    ql(i as i64, 1),
                    ql((i % 4) as i64, 1),
                    format!("{}, {}.0", i / 4 + 1, i % 4 + 1),
                )
            })
            .collect()
    }

    fn phrase(names: &[&str]) -> Phrase {
        let pitches = names
            .iter()
            .map(|n| encode(&Pitch::parse(n).unwrap()).unwrap())
            .collect();
        Phrase::new("1, 1.0", pitches)
    }

    #[test]
    fn test_detect_in_notes_reports_each_phrase() {
        let mut notes = quarters(&["C4", "D4", "E4", "F4", "G4", "B4", "G4", "B4"]);
        notes[3] = notes[3].clone().with_cadence();
        let detector = PhraseDetector::with_reference(phrase(&["C4", "D4", "E4", "F4"]), PhraseDetectorSettings::default());

        let detection = detector.detect_in_notes(&notes).unwrap();
        assert_eq!(detection.results.len(), 2);
        assert_eq!(detection.matches, vec!["1, 1.0"]);
        assert_eq!(detection.results[1].label, "2, 1.0");
        assert!(!detection.results[1].result.is_match);
        assert!(detection.has_matches());
    }

    #[test]
    fn test_output_entry() {
        let detector = PhraseDetector::with_reference(phrase(&["C4", "D4"]), PhraseDetectorSettings::default());
        let detection = PhraseDetection {
            matches: vec!["1, 1.0".to_string(), "5, 3.0".to_string()],
            results: vec![PhraseScore {
                label: "1, 1.0".to_string(),
                result: SimilarityResult {
                    count_diff: 0.0,
                    pitch_histogram: 1.0,
                    sequence_equality: 1.0,
                    is_match: true,
                },
            }],
        };

        let entry = detector.output_entry(&detection);
        assert_eq!(entry.len(), detector.output_header().len());
        assert_eq!(entry[0], "1, 1.0; 5, 3.0");
        let parsed: serde_json::Value = serde_json::from_str(&entry[1]).unwrap();
        assert_eq!(parsed[0]["label"], "1, 1.0");
        assert_eq!(parsed[0]["result"]["is_match"], true);
    }

    #[test]
    fn test_empty_melody_has_no_results() {
        let detector = PhraseDetector::with_reference(phrase(&["C4"]), PhraseDetectorSettings::default());
        let detection = detector.detect_in_notes(&[]).unwrap();
        assert!(detection.results.is_empty());
        assert!(!detection.has_matches());
    }
}
