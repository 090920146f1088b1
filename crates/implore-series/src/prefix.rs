//! Per-step prefix inference
//!
//! Simulation outputs rarely agree on what the per-step folders are called
//! (`snapdir_NNN`, `snapshot_NNN`, ...). The dominant leading token among a
//! directory's subfolders is taken as the prefix.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{SeriesError, SeriesResult};
use crate::naming::{first_segment, read_entries};

/// Infer the dominant per-step folder prefix of `dir`.
///
/// Returns an empty string when `dir` has no subdirectories. Ties go to
/// the token seen first in name order.
pub fn infer_prefix(dir: &Path) -> SeriesResult<String> {
    if !dir.exists() {
        return Err(SeriesError::invalid_path(dir, "directory does not exist"));
    }

    let entries = read_entries(dir)?;
    let prefix = dominant_token(
        entries
            .iter()
            .filter(|e| e.is_dir)
            .map(|e| first_segment(&e.name)),
    )
    .unwrap_or_default();

    tracing::debug!("Inferred step prefix '{}' for {:?}", prefix, dir);
    Ok(prefix)
}

/// Most frequent token, ties broken by first occurrence
pub(crate) fn dominant_token<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for token in tokens {
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for token in order {
        let count = counts[token];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((token, count));
        }
    }
    best.map(|(token, _)| token.to_string())
}
