//! Analysis configuration
//!
//! Loaded from a YAML file; every key is optional.
//!
//! ```yaml
//! corpus_path: corpus
//! output_dir: reports
//! catalogues_to_ignore: [AP1832]
//! thresholds:
//!   count_diff: 0.25
//!   histogram: 0.5
//!   sequence: 0.7
//! histogram_metric: hellinger
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::corpus::CorpusParams;
use crate::phrase::{HistogramMetric, PhraseDetectorSettings, Thresholds};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("threshold {name} must be a non-negative number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub corpus_path: PathBuf,
    pub output_dir: PathBuf,
    pub catalogues_to_ignore: Vec<String>,
    pub output_file_specifiers: bool,
    /// Part index holding the melody
    pub melody_part: usize,
    pub thresholds: Thresholds,
    pub histogram_metric: HistogramMetric,
    /// Encode every pitch at this octave
    pub fold_to_octave: Option<i32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("corpus"),
            output_dir: PathBuf::from("."),
            catalogues_to_ignore: Vec::new(),
            output_file_specifiers: true,
            melody_part: 0,
            thresholds: Thresholds::default(),
            histogram_metric: HistogramMetric::default(),
            fold_to_octave: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&yaml)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("count_diff", self.thresholds.count_diff),
            ("histogram", self.thresholds.histogram),
            ("sequence", self.thresholds.sequence),
        ];
        for (name, value) in thresholds {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }

    pub fn corpus_params(&self) -> CorpusParams {
        CorpusParams::new(&self.corpus_path).ignoring(self.catalogues_to_ignore.iter().cloned())
    }

    pub fn detector_settings(&self) -> PhraseDetectorSettings {
        PhraseDetectorSettings {
            thresholds: self.thresholds,
            metric: self.histogram_metric,
            melody_part: self.melody_part,
            fold_to_octave: self.fold_to_octave,
        }
    }
}
