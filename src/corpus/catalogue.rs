//! Catalogue and piece identifiers encoded in file names
//!
//! Corpus files are named `<catalogue>-<piece>[_<specifiers>].<ext>`, e.g.
//! `KI1803-12_SID082.musicxml`. Each catalogue also has one metadata file
//! whose name contains `_META`.

use std::path::Path;

/// Marker in the name of a catalogue's metadata file
pub const METADATA_MARKER: &str = "_META";

/// Marker in the name of cached repeat-expanded scores
pub const EXPANDED_MARKER: &str = ".expanded.";

/// File name without directory and without anything after the first `.`
pub fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

/// `KI1803-12_SID082` → `KI1803`
pub fn catalogue_id(stem: &str) -> &str {
    let head = stem.split('_').next().unwrap_or(stem);
    head.split('-').next().unwrap_or(head)
}

/// `KI1803-12_SID082` → `12`; `None` when there is no `-`
pub fn piece_number(stem: &str) -> Option<&str> {
    let head = stem.split('_').next().unwrap_or(stem);
    head.split('-').nth(1)
}

/// `KI1803-12_SID082` → `SID082`; empty when there is no `_`
pub fn specifiers(stem: &str) -> &str {
    stem.split('_').nth(1).unwrap_or("")
}

pub fn is_metadata_file(path: &Path) -> bool {
    path.to_string_lossy().contains(METADATA_MARKER)
}

pub fn is_expanded_file(path: &Path) -> bool {
    path.to_string_lossy().contains(EXPANDED_MARKER)
}

/// Ordering key for piece numbers: numeric ones first, by value
pub(crate) fn piece_sort_key(number: &str) -> (u8, u64, String) {
    match number.parse::<u64>() {
        Ok(n) => (0, n, String::new()),
        Err(_) => (1, 0, number.to_string()),
    }
}
