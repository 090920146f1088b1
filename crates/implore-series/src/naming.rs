//! Per-step naming conventions
//!
//! Step entries are named `<prefix>_<N>` (directories) or
//! `<prefix>_<N><suffix>` (flat files). These helpers are pure and never
//! fail: anything that does not fit the convention yields `None`.

use std::path::{Path, PathBuf};

use crate::error::SeriesResult;

/// Separator between a prefix and the step number
pub const SEPARATOR: char = '_';

/// Position of a step in the simulation's time order
pub type StepIndex = u64;

/// A directory entry with the bits discovery cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List a directory, sorted by name.
///
/// Entries whose names are not valid UTF-8 cannot match any prefix and are
/// skipped.
pub fn read_entries(dir: &Path) -> SeriesResult<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let path = entry.path();
        entries.push(Entry {
            is_dir: path.is_dir(),
            name,
            path,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Leading token of a name, e.g. "snapdir" for "snapdir_012"
pub fn first_segment(name: &str) -> &str {
    name.split(SEPARATOR).next().unwrap_or(name)
}

/// Trailing token of a name, e.g. "012" for "snapdir_012"
pub fn last_segment(name: &str) -> &str {
    name.rsplit(SEPARATOR).next().unwrap_or(name)
}

/// Whether a name looks like a per-step entry: a purely numeric trailing
/// token, or a flat file carrying the step suffix.
pub fn is_step_name(name: &str, suffix: &str) -> bool {
    let last = last_segment(name);
    (!last.is_empty() && last.bytes().all(|b| b.is_ascii_digit())) || name.ends_with(suffix)
}

/// Step index of a name: suffix stripped, trailing token parsed
pub fn step_index_of_name(name: &str, suffix: &str) -> Option<StepIndex> {
    let stem = name.strip_suffix(suffix).unwrap_or(name);
    let last = last_segment(stem);
    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    last.parse().ok()
}

/// Step index of a path's final component
pub fn step_index(path: &Path, suffix: &str) -> Option<StepIndex> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| step_index_of_name(n, suffix))
}
