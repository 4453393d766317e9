//! CSV reports
//!
//! Every corpus run produces one CSV per catalogue:
//!
//! ```text
//! ID, [Specifiers,] <method columns...>
//! 2,  SID082,       ...
//! ```
//!
//! File names are `{base}_{YYYYmmdd-HHMMSS}_{catalogue}.csv`. Phrase
//! detection additionally writes `{base}_{timestamp}_AllMatches.csv` listing
//! every piece with at least one match.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::AnalysisMethod;
use crate::corpus::CorpusAnalysis;
use crate::phrase::PhraseDetection;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Where and how reports are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    /// File name prefix; an extension, if any, is dropped
    pub base_name: String,
    /// Add the file-name specifiers column
    pub with_specifiers: bool,
    pub timestamp: String,
}

impl ReportOptions {
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
            with_specifiers: true,
            timestamp: timestamp_now(),
        }
    }

    fn path_for(&self, method_name: &str, suffix: &str) -> PathBuf {
        self.output_dir
            .join(report_file_name(&self.base_name, method_name, &self.timestamp, suffix))
    }
}

/// Local time formatted for report file names
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// `{base}_{timestamp}_{suffix}.csv`
///
/// An empty base falls back to `generic_{method_name}`.
pub fn report_file_name(base: &str, method_name: &str, timestamp: &str, suffix: &str) -> String {
    let stem = Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty());
    let stem = match stem {
        Some(stem) => stem,
        None => {
            log::warn!("Empty report name, using generic name instead");
            format!("generic_{}", method_name)
        }
    };
    format!("{}_{}_{}.csv", stem, timestamp, suffix)
}

/// One CSV per catalogue; returns the paths written
pub fn write_catalogue_reports<M: AnalysisMethod>(
    analysis: &CorpusAnalysis<M::Output>,
    method: &M,
    options: &ReportOptions,
) -> Result<Vec<PathBuf>, ReportError> {
    ensure_dir(&options.output_dir)?;

    let mut header = vec!["ID".to_string()];
    if options.with_specifiers {
        header.push("Specifiers".to_string());
    }
    header.extend(method.output_header());

    let mut written = Vec::new();
    for catalogue in &analysis.catalogues {
        let path = options.path_for(method.name(), &catalogue.id);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&header)?;

        for result in analysis.results_for(&catalogue.id) {
            let mut row = vec![result.piece_number.clone()];
            if options.with_specifiers {
                row.push(result.specifiers.clone());
            }
            row.extend(method.output_entry(&result.output));
            writer.write_record(&row)?;
        }

        writer.flush().map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Pieces with at least one phrase match, across all catalogues
pub fn write_phrase_match_summary(
    analysis: &CorpusAnalysis<PhraseDetection>,
    options: &ReportOptions,
) -> Result<PathBuf, ReportError> {
    ensure_dir(&options.output_dir)?;

    let path = options.path_for("PhraseDetection", "AllMatches");
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["Catalogue and Piece ID", "Matches", "Detailed Results"])?;

    for result in analysis.results.iter().filter(|r| r.output.has_matches()) {
        let details = serde_json::to_string(&result.output.results).unwrap_or_default();
        writer.write_record([
            format!("{}, {}", result.catalogue_id, result.piece_number),
            result.output.matches.join("; "),
            details,
        ])?;
    }

    writer.flush().map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

fn ensure_dir(dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CountClosures;
    use crate::corpus::{Catalogue, PieceResult};
    use crate::phrase::{PhraseScore, SimilarityResult};

    fn piece<T>(catalogue: &str, number: &str, specifiers: &str, output: T) -> PieceResult<T> {
        PieceResult {
            path: PathBuf::from(format!("{}-{}.musicxml", catalogue, number)),
            catalogue_id: catalogue.to_string(),
            piece_number: number.to_string(),
            specifiers: specifiers.to_string(),
            output,
        }
    }

    fn catalogue(id: &str) -> Catalogue {
        Catalogue {
            id: id.to_string(),
            composer: "Anon.".to_string(),
            metadata_path: PathBuf::from(format!("{}_META.musicxml", id)),
        }
    }

    fn options(dir: &Path) -> ReportOptions {
        ReportOptions {
            output_dir: dir.to_path_buf(),
            base_name: "Closures.csv".to_string(),
            with_specifiers: true,
            timestamp: "20240102-030405".to_string(),
        }
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name("PhraseDetection", "PhraseDetection", "20240102-030405", "KI1803"),
            "PhraseDetection_20240102-030405_KI1803.csv"
        );
        assert_eq!(
            report_file_name("out/Closures.csv", "CountClosures", "20240102-030405", "KI1803"),
            "Closures_20240102-030405_KI1803.csv"
        );
        assert_eq!(
            report_file_name("", "CountClosures", "20240102-030405", "KI1803"),
            "generic_CountClosures_20240102-030405_KI1803.csv"
        );
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "-");
    }

    #[test]
    fn test_write_catalogue_reports() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = CorpusAnalysis {
            catalogues: vec![catalogue("KI1803"), catalogue("AP1832")],
            results: vec![piece("KI1803", "1", "SID082", 3usize), piece("KI1803", "2", "", 0usize)],
            skipped: Vec::new(),
        };

        let written = write_catalogue_reports(&analysis, &CountClosures::default(), &options(dir.path())).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("Closures_20240102-030405_KI1803.csv"));

        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(content, "ID,Specifiers,# of closures\n1,SID082,3\n2,,0\n");

        let empty = std::fs::read_to_string(&written[1]).unwrap();
        assert_eq!(empty, "ID,Specifiers,# of closures\n");
    }

    #[test]
    fn test_reports_without_specifiers() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = CorpusAnalysis {
            catalogues: vec![catalogue("KI1803")],
            results: vec![piece("KI1803", "1", "SID082", 3usize)],
            skipped: Vec::new(),
        };
        let mut options = options(dir.path());
        options.with_specifiers = false;

        let written = write_catalogue_reports(&analysis, &CountClosures::default(), &options).unwrap();
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(content, "ID,# of closures\n1,3\n");
    }

    #[test]
    fn test_phrase_match_summary() {
        let dir = tempfile::tempdir().unwrap();
        let matched = PhraseDetection {
            matches: vec!["1, 1.0".to_string()],
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
        let analysis = CorpusAnalysis {
            catalogues: vec![catalogue("KI1803")],
            results: vec![
                piece("KI1803", "1", "", matched),
                piece("KI1803", "2", "", PhraseDetection::default()),
            ],
            skipped: Vec::new(),
        };

        let path = write_phrase_match_summary(&analysis, &options(dir.path())).unwrap();
        assert!(path.ends_with("Closures_20240102-030405_AllMatches.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Catalogue and Piece ID");
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "KI1803, 1");
        assert_eq!(&rows[0][1], "1, 1.0");
        assert!(rows[0][2].contains("\"is_match\":true"));
    }

    #[test]
    fn test_missing_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports/2024");
        let analysis: CorpusAnalysis<usize> = CorpusAnalysis {
            catalogues: vec![catalogue("KI1803")],
            results: Vec::new(),
            skipped: Vec::new(),
        };
        let written = write_catalogue_reports(&analysis, &CountClosures::default(), &options(&nested)).unwrap();
        assert!(written[0].exists());
    }
}
