//! Candidate scoring for the series convention
//!
//! An external dispatcher asks every registered convention how confident
//! it is that a path belongs to it and opens the path with the most
//! confident one. This module only produces the score.

use std::path::Path;
use std::sync::Arc;

use implore_io::HeaderReader;
use serde::{Deserialize, Serialize};

use crate::config::{CandidateConfig, DEFAULT_SUBDIR};
use crate::naming::{read_entries, Entry};
use crate::prefix::dominant_token;

/// Confidence that a path follows a convention, ordered `No < Maybe < Yes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CandidateStatus {
    No,
    Maybe,
    Yes,
}

impl CandidateStatus {
    /// Whether this status alone justifies constructing a series
    pub fn is_match(&self) -> bool {
        *self == CandidateStatus::Yes
    }
}

/// Scores directories against the series layout
pub struct CandidateValidator {
    config: CandidateConfig,
    suffix: String,
    reader: Arc<dyn HeaderReader>,
}

impl CandidateValidator {
    pub fn new(
        config: CandidateConfig,
        suffix: impl Into<String>,
        reader: Arc<dyn HeaderReader>,
    ) -> Self {
        Self {
            config,
            suffix: suffix.into(),
            reader,
        }
    }

    /// Score `path`. Never fails: anything unreadable lowers confidence.
    /// Step prefixes are matched against files as well as folders.
    pub fn validate(&self, path: &Path) -> CandidateStatus {
        if !path.is_dir() {
            return CandidateStatus::No;
        }
        let Ok(entries) = read_entries(path) else {
            return CandidateStatus::No;
        };
        if let Some(marker) = entries
            .iter()
            .find(|e| self.config.disqualifying_markers.contains(&e.name))
        {
            tracing::debug!("{:?} disqualified by marker {}", path, marker.name);
            return CandidateStatus::No;
        }

        let output = entries
            .iter()
            .find(|e| e.is_dir && e.name == DEFAULT_SUBDIR)
            .map(|e| e.path.clone());
        let entries = match output {
            Some(output) => match read_entries(&output) {
                Ok(entries) => entries,
                Err(_) => return CandidateStatus::No,
            },
            None => entries,
        };

        let mut status = CandidateStatus::No;
        if entries.iter().any(|e| {
            self.config
                .step_prefixes
                .iter()
                .any(|prefix| e.name.starts_with(prefix.as_str()))
        }) {
            status = CandidateStatus::Maybe;
        }

        if self.confirms_single_file_series(&entries) {
            status = CandidateStatus::Yes;
        }
        status
    }

    /// Flat files form a series of single-part snapshots
    fn confirms_single_file_series(&self, entries: &[Entry]) -> bool {
        let files: Vec<&Entry> = entries
            .iter()
            .filter(|e| !e.is_dir && e.name.ends_with(&self.suffix))
            .collect();
        if files.is_empty() {
            return false;
        }

        let names: Vec<&str> = files.iter().map(|e| e.name.as_str()).collect();
        let Some((prefix, members)) = dominant_group(&names, &self.suffix) else {
            return false;
        };
        if members < 2 {
            return false;
        }

        let representative = files
            .iter()
            .find(|e| common_stem(&e.name, &self.suffix) == prefix);
        let Some(representative) = representative else {
            return false;
        };

        // The handle is closed before read_header returns, on every path
        match self
            .reader
            .read_header(&representative.path, &self.config.header_group)
        {
            Ok(header) => {
                let attribute = &self.config.single_part_attribute;
                if let Some(raw) = header.attr(attribute).filter(|v| v.as_i64().is_none()) {
                    tracing::debug!(
                        "{} in {:?} is {}, expected int",
                        attribute,
                        representative.path,
                        raw.type_name()
                    );
                    return false;
                }
                let value = header.attr_i64(attribute);
                tracing::debug!("{} = {:?} in {:?}", attribute, value, representative.path);
                value == Some(1)
            }
            Err(e) => {
                tracing::debug!("Could not inspect {:?}: {}", representative.path, e);
                false
            }
        }
    }
}

/// Name with the step suffix and trailing step number removed,
/// e.g. "snap_" for "snap_012.hdf5" and "fof_subhalo_tab_" for
/// "fof_subhalo_tab_012.hdf5".
pub fn common_stem<'a>(name: &'a str, suffix: &str) -> &'a str {
    let stem = name.strip_suffix(suffix).unwrap_or(name);
    stem.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.')
}

/// Group file names by their common stem; returns the largest group's stem
/// and size. Ties go to the stem that sorts first.
pub fn dominant_group(names: &[&str], suffix: &str) -> Option<(String, usize)> {
    let mut sorted: Vec<&str> = names.to_vec();
    sorted.sort_unstable();
    let stem = dominant_token(sorted.iter().map(|n| common_stem(n, suffix)))?;
    let count = names
        .iter()
        .filter(|n| common_stem(n, suffix) == stem)
        .count();
    Some((stem, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use implore_io::{FileHeader, MemoryHeaderReader};
    use std::fs;
    use std::path::PathBuf;

    fn header(num_files: i64) -> FileHeader {
        FileHeader::default()
            .with_header_group("Header")
            .with_attr("NumFilesPerSnapshot", num_files)
    }

    fn flat_run(dir: &Path, prefix: &str, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("{}_{:03}.hdf5", prefix, i));
                fs::write(&path, "").unwrap();
                path
            })
            .collect()
    }

    fn validator(reader: MemoryHeaderReader) -> CandidateValidator {
        CandidateValidator::new(CandidateConfig::default(), ".hdf5", Arc::new(reader))
    }

    #[test]
    fn test_status_ordering() {
        assert!(CandidateStatus::No < CandidateStatus::Maybe);
        assert!(CandidateStatus::Maybe < CandidateStatus::Yes);
        assert!(CandidateStatus::Yes.is_match());
        assert!(!CandidateStatus::Maybe.is_match());
    }

    #[test]
    fn test_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("snap_000.hdf5");
        fs::write(&file, "").unwrap();

        let v = validator(MemoryHeaderReader::new());
        assert_eq!(v.validate(&file), CandidateStatus::No);
        assert_eq!(v.validate(&dir.path().join("missing")), CandidateStatus::No);
    }

    #[test]
    fn test_marker_disqualifies() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gizmo_parameters.txt"), "").unwrap();
        let output = dir.path().join("output");
        fs::create_dir(&output).unwrap();
        fs::create_dir(output.join("snapdir_000")).unwrap();
        let files = flat_run(&output, "snapshot", 3);

        let reader = MemoryHeaderReader::new().with_header(&files[0], header(1));
        assert_eq!(validator(reader).validate(dir.path()), CandidateStatus::No);
    }

    #[test]
    fn test_step_folders_maybe() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        for i in 0..3 {
            fs::create_dir_all(output.join(format!("snapdir_{:03}", i))).unwrap();
        }

        let v = validator(MemoryHeaderReader::new());
        assert_eq!(v.validate(dir.path()), CandidateStatus::Maybe);
        // pointing at the output folder itself works too
        assert_eq!(v.validate(&output), CandidateStatus::Maybe);
    }

    #[test]
    fn test_unrelated_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(
            validator(MemoryHeaderReader::new()).validate(dir.path()),
            CandidateStatus::No
        );
    }

    #[test]
    fn test_single_file_series_yes() {
        let dir = tempfile::tempdir().unwrap();
        let files = flat_run(dir.path(), "snapshot", 4);

        let reader = MemoryHeaderReader::new().with_header(&files[0], header(1));
        assert_eq!(validator(reader).validate(dir.path()), CandidateStatus::Yes);
    }

    #[test]
    fn test_multi_part_caps_at_maybe() {
        let dir = tempfile::tempdir().unwrap();
        let files = flat_run(dir.path(), "snapshot", 4);

        for value in [0, 2, 16] {
            let reader = MemoryHeaderReader::new().with_header(&files[0], header(value));
            assert_eq!(validator(reader).validate(dir.path()), CandidateStatus::Maybe);
        }
    }

    #[test]
    fn test_unreadable_header_stays_maybe() {
        let dir = tempfile::tempdir().unwrap();
        let files = flat_run(dir.path(), "snapshot", 2);

        // no header registered at all
        assert_eq!(
            validator(MemoryHeaderReader::new()).validate(dir.path()),
            CandidateStatus::Maybe
        );

        // header group present, attribute missing
        let reader = MemoryHeaderReader::new()
            .with_header(&files[0], FileHeader::default().with_header_group("Header"));
        assert_eq!(validator(reader).validate(dir.path()), CandidateStatus::Maybe);
    }

    #[test]
    fn test_non_integer_attribute_stays_maybe() {
        let dir = tempfile::tempdir().unwrap();
        let files = flat_run(dir.path(), "snapshot", 3);

        let reader = MemoryHeaderReader::new().with_header(
            &files[0],
            FileHeader::default()
                .with_header_group("Header")
                .with_attr("NumFilesPerSnapshot", "1"),
        );
        assert_eq!(validator(reader).validate(dir.path()), CandidateStatus::Maybe);
    }

    #[test]
    fn test_step_prefix_matches_flat_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("snapshot_000.txt"), "").unwrap();

        assert_eq!(
            validator(MemoryHeaderReader::new()).validate(dir.path()),
            CandidateStatus::Maybe
        );
    }

    #[test]
    fn test_single_file_is_not_enough() {
        let dir = tempfile::tempdir().unwrap();
        let files = flat_run(dir.path(), "snapshot", 1);

        let reader = MemoryHeaderReader::new().with_header(&files[0], header(1));
        assert_eq!(validator(reader).validate(dir.path()), CandidateStatus::Maybe);
    }

    #[test]
    fn test_dominant_group_representative() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        fs::create_dir(&output).unwrap();
        flat_run(&output, "fof_subhalo_tab", 2);
        let snaps = flat_run(&output, "snap", 3);

        let reader = MemoryHeaderReader::new().with_header(&snaps[0], header(1));
        assert_eq!(validator(reader).validate(dir.path()), CandidateStatus::Yes);
    }

    #[test]
    fn test_common_stem() {
        assert_eq!(common_stem("snap_012.hdf5", ".hdf5"), "snap_");
        assert_eq!(common_stem("snap_012.3.hdf5", ".hdf5"), "snap_");
        assert_eq!(common_stem("fof_subhalo_tab_012.hdf5", ".hdf5"), "fof_subhalo_tab_");
        assert_eq!(common_stem("ics.hdf5", ".hdf5"), "ics");
    }

    #[test]
    fn test_dominant_group() {
        let names = ["snap_001.hdf5", "group_000.hdf5", "snap_000.hdf5", "group_001.hdf5"];
        assert_eq!(
            dominant_group(&names, ".hdf5"),
            Some(("group_".to_string(), 2))
        );
        assert_eq!(dominant_group(&[], ".hdf5"), None);
    }
}
