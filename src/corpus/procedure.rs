//! Running an analysis method over a catalogue corpus

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use super::catalogue::{self, is_expanded_file, is_metadata_file, piece_sort_key};
use super::{scan_corpus, CorpusError};
use crate::analysis::{AnalysisError, AnalysisMethod};
use crate::converters::read_composer;

/// Which part of the corpus to analyse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusParams {
    pub corpus_path: PathBuf,
    /// Catalogue IDs to leave out
    pub catalogues_to_ignore: Vec<String>,
}

impl CorpusParams {
    pub fn new(corpus_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            catalogues_to_ignore: Vec::new(),
        }
    }

    pub fn ignoring(mut self, catalogues: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.catalogues_to_ignore.extend(catalogues.into_iter().map(Into::into));
        self
    }
}

/// A catalogue found through its metadata file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalogue {
    pub id: String,
    pub composer: String,
    pub metadata_path: PathBuf,
}

/// Analysis output for one piece
#[derive(Debug, Clone, Serialize)]
pub struct PieceResult<T> {
    pub path: PathBuf,
    pub catalogue_id: String,
    pub piece_number: String,
    pub specifiers: String,
    pub output: T,
}

/// A piece that could not be analysed
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPiece {
    pub path: PathBuf,
    pub reason: String,
}

/// Results of one corpus run
#[derive(Debug, Clone)]
pub struct CorpusAnalysis<T> {
    pub catalogues: Vec<Catalogue>,
    /// Ordered by catalogue, then piece number
    pub results: Vec<PieceResult<T>>,
    pub skipped: Vec<SkippedPiece>,
}

impl<T> CorpusAnalysis<T> {
    pub fn catalogue(&self, id: &str) -> Option<&Catalogue> {
        self.catalogues.iter().find(|c| c.id == id)
    }

    pub fn results_for<'a>(&'a self, catalogue_id: &'a str) -> impl Iterator<Item = &'a PieceResult<T>> + 'a {
        self.results.iter().filter(move |r| r.catalogue_id == catalogue_id)
    }
}

/// Run `method` over every piece of every catalogue under `params.corpus_path`
///
/// Fails only when the corpus cannot be read or holds no catalogues. Pieces
/// that fail are logged, recorded in [`CorpusAnalysis::skipped`] and do not
/// stop the run.
pub fn analyse_catalogue_corpus<M: AnalysisMethod>(
    params: &CorpusParams,
    method: &M,
) -> Result<CorpusAnalysis<M::Output>, CorpusError> {
    let files = scan_corpus(&params.corpus_path)?;
    let catalogues = discover_catalogues(&files, params)?;
    let catalogue_ids: HashSet<&str> = catalogues.iter().map(|c| c.id.as_str()).collect();

    let mut skipped = Vec::new();
    let mut pieces = Vec::new();
    for path in &files {
        if is_metadata_file(path) || is_expanded_file(path) {
            continue;
        }
        let stem = catalogue::file_stem(path);
        if !catalogue_ids.contains(catalogue::catalogue_id(&stem)) {
            continue;
        }
        match catalogue::piece_number(&stem) {
            Some(number) => pieces.push(PieceRef {
                path: path.as_path(),
                catalogue_id: catalogue::catalogue_id(&stem).to_string(),
                piece_number: number.to_string(),
                specifiers: catalogue::specifiers(&stem).to_string(),
            }),
            None => {
                log::warn!("Skipping {}: no piece number in file name", path.display());
                skipped.push(SkippedPiece {
                    path: path.clone(),
                    reason: "no piece number in file name".to_string(),
                });
            }
        }
    }

    log::info!(
        "Analysing {} pieces in {} catalogues with {}",
        pieces.len(),
        catalogues.len(),
        method.name()
    );

    let outcomes: Vec<(PieceRef, Result<M::Output, AnalysisError>)> = pieces
        .into_par_iter()
        .map(|piece| {
            let outcome = method.analyze(piece.path);
            (piece, outcome)
        })
        .collect();

    let mut results = Vec::new();
    for (piece, outcome) in outcomes {
        match outcome {
            Ok(output) => {
                log::info!(
                    "{} ({}), No. {} ({}): {:?}",
                    composer_of(&catalogues, &piece.catalogue_id),
                    piece.catalogue_id,
                    piece.piece_number,
                    piece.specifiers,
                    output
                );
                results.push(PieceResult {
                    path: piece.path.to_path_buf(),
                    catalogue_id: piece.catalogue_id,
                    piece_number: piece.piece_number,
                    specifiers: piece.specifiers,
                    output,
                });
            }
            Err(e) => {
                if e.is_invalid_encoding() {
                    log::error!("Invalid pitch encoding in {}: {}", piece.path.display(), e);
                } else {
                    log::warn!("Skipping {}: {}", piece.path.display(), e);
                }
                skipped.push(SkippedPiece {
                    path: piece.path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let catalogue_rank = |id: &str| catalogues.iter().position(|c| c.id == id).unwrap_or(usize::MAX);
    results.sort_by(|a, b| {
        catalogue_rank(&a.catalogue_id)
            .cmp(&catalogue_rank(&b.catalogue_id))
            .then_with(|| piece_sort_key(&a.piece_number).cmp(&piece_sort_key(&b.piece_number)))
            .then_with(|| a.path.cmp(&b.path))
    });

    Ok(CorpusAnalysis {
        catalogues,
        results,
        skipped,
    })
}

/// Pending piece with its identifiers already split out
struct PieceRef<'a> {
    path: &'a Path,
    catalogue_id: String,
    piece_number: String,
    specifiers: String,
}

fn composer_of<'a>(catalogues: &'a [Catalogue], id: &str) -> &'a str {
    catalogues
        .iter()
        .find(|c| c.id == id)
        .map_or("Unknown composer", |c| c.composer.as_str())
}

/// Catalogues named by metadata files, minus the ignored ones
fn discover_catalogues(files: &[PathBuf], params: &CorpusParams) -> Result<Vec<Catalogue>, CorpusError> {
    let metadata_files: Vec<&PathBuf> = files.iter().filter(|p| is_metadata_file(p)).collect();
    if metadata_files.is_empty() {
        return Err(CorpusError::NoCatalogues(params.corpus_path.clone()));
    }

    let mut catalogues: Vec<Catalogue> = Vec::new();
    for path in metadata_files {
        let stem = catalogue::file_stem(path);
        let id = catalogue::catalogue_id(&stem).to_string();
        if params.catalogues_to_ignore.contains(&id) {
            log::info!("Ignoring catalogue {}", id);
            continue;
        }
        if catalogues.iter().any(|c| c.id == id) {
            log::warn!("Duplicate metadata file for catalogue {}: {}", id, path.display());
            continue;
        }

        let composer = metadata_composer(path).unwrap_or_else(|| id.clone());
        log::info!("Found catalogue: {} ({})", composer, id);
        catalogues.push(Catalogue {
            id,
            composer,
            metadata_path: path.clone(),
        });
    }
    Ok(catalogues)
}

fn metadata_composer(path: &Path) -> Option<String> {
    let xml = match std::fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) => {
            log::warn!("Cannot read metadata file {}: {}", path.display(), e);
            return None;
        }
    };
    match read_composer(&xml) {
        Ok(composer) => composer,
        Err(e) => {
            log::warn!("Cannot parse metadata file {}: {}", path.display(), e);
            None
        }
    }
}
