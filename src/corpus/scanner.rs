//! Corpus file discovery

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::CorpusError;

/// Extensions treated as MusicXML
const SCORE_EXTENSIONS: &[&str] = &["xml", "musicxml"];

/// All score files below `root`, sorted by path
///
/// Hidden files and directories are skipped. Unreadable entries are logged
/// and skipped.
pub fn scan_corpus(root: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    if !root.exists() {
        return Err(CorpusError::CorpusNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CorpusError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_score_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log::warn!("Error accessing corpus entry: {}", e),
        }
    }

    files.sort();
    log::debug!("Found {} score files under {}", files.len(), root.display());
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_score_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map_or(false, |ext| SCORE_EXTENSIONS.contains(&ext.as_str()))
}
