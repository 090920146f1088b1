//! Per-role path resolution
//!
//! For every configured role this finds the directory holding its entries,
//! settles on a prefix and returns the per-step paths ordered by step
//! index. Optional roles that find nothing are skipped; the primary role
//! must resolve or discovery fails.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{RoleSpec, SeriesConfig};
use crate::error::{SeriesError, SeriesResult};
use crate::naming::{first_segment, is_step_name, read_entries, step_index, Entry, SEPARATOR};
use crate::prefix::{dominant_token, infer_prefix};

/// Ordered per-step paths of one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    /// Role key
    pub role: String,

    /// Directory the entries were found in
    pub directory: PathBuf,

    /// Token the entries start with
    pub prefix: String,

    /// Entries, ascending by step index when `sorted`
    pub paths: Vec<PathBuf>,

    /// Whether every entry had a step index and the set was sorted by it
    pub sorted: bool,
}

impl PathSet {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Resolved path sets of all present roles
#[derive(Debug, Clone, Default)]
pub struct ResolvedRoles {
    /// Key of the primary role
    pub primary: String,

    /// Path sets by role key
    pub sets: BTreeMap<String, PathSet>,
}

impl ResolvedRoles {
    pub fn primary_set(&self) -> Option<&PathSet> {
        self.sets.get(&self.primary)
    }

    pub fn get(&self, role: &str) -> Option<&PathSet> {
        self.sets.get(role)
    }

    /// Remove and return the primary path set
    pub fn take_primary(&mut self) -> Option<PathSet> {
        self.sets.remove(&self.primary)
    }
}

/// Resolves role path sets below a simulation root
pub struct PathResolver<'a> {
    config: &'a SeriesConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a SeriesConfig) -> Self {
        Self { config }
    }

    /// Resolve every configured role below `root`
    pub fn resolve_all(&self, root: &Path) -> SeriesResult<ResolvedRoles> {
        if !root.exists() {
            return Err(SeriesError::invalid_path(root, "path does not exist"));
        }

        let mut resolved = ResolvedRoles {
            primary: self.config.primary.clone(),
            sets: BTreeMap::new(),
        };
        for role in &self.config.roles {
            let required = self.config.is_primary(&role.key);
            if let Some(set) = self.resolve_role(root, role, required)? {
                resolved.sets.insert(role.key.clone(), set);
            }
        }
        Ok(resolved)
    }

    /// Resolve one role. `Ok(None)` means an optional role was not found.
    pub fn resolve_role(
        &self,
        root: &Path,
        role: &RoleSpec,
        required: bool,
    ) -> SeriesResult<Option<PathSet>> {
        let suffix = self.config.suffix.as_str();

        // Runs without the conventional subfolder (e.g. subboxes) keep their
        // entries directly below the root.
        let candidate = root.join(&role.subdir);
        let dir = if candidate.exists() {
            candidate
        } else {
            root.to_path_buf()
        };

        if !dir.is_dir() {
            if !required {
                tracing::debug!("Skipping role '{}': {:?} is not a directory", role.key, dir);
                return Ok(None);
            }
            return Err(SeriesError::invalid_path(&dir, "directory does not exist"));
        }

        let prefix = match &role.prefix {
            Some(prefix) => prefix.clone(),
            None => infer_prefix(&dir)?,
        };

        let entries = read_entries(&dir)?;
        let token = match matching_token(&entries, &prefix, role.alternate_prefix.as_deref()) {
            Some(token) => token,
            None if !required => {
                tracing::debug!(
                    "Skipping role '{}': no entries with prefix '{}' in {:?}",
                    role.key,
                    prefix,
                    dir
                );
                return Ok(None);
            }
            None => match flat_file_prefix(&entries, role.alternate_prefix.as_deref(), suffix) {
                Some(alternate) => {
                    tracing::info!(
                        "No entries with prefix '{}' in {:?}, using single-file prefix '{}'",
                        prefix,
                        dir,
                        alternate
                    );
                    alternate
                }
                None => {
                    return Err(SeriesError::invalid_path(
                        &dir,
                        format!("could not find any files with prefix '{}'", prefix),
                    ));
                }
            },
        };

        let (paths, sorted) = collect_step_paths(&entries, &token, suffix);
        if !sorted {
            tracing::warn!(
                "Could not parse step indices for role '{}' in {:?}, keeping listing order",
                role.key,
                dir
            );
        }
        tracing::debug!(
            "Resolved role '{}' with prefix '{}': {} entries",
            role.key,
            token,
            paths.len()
        );

        Ok(Some(PathSet {
            role: role.key.clone(),
            directory: dir,
            prefix: token,
            paths,
            sorted,
        }))
    }
}

/// Leading token of the entries that start with `prefix`.
///
/// An entry whose token equals the prefix (or the alternate prefix) wins;
/// otherwise the most frequent token is used.
fn matching_token(entries: &[Entry], prefix: &str, alternate: Option<&str>) -> Option<String> {
    let tokens: Vec<&str> = entries
        .iter()
        .filter(|e| e.name.starts_with(prefix))
        .map(|e| first_segment(&e.name))
        .collect();

    if tokens.is_empty() {
        return None;
    }
    for preferred in std::iter::once(prefix).chain(alternate) {
        if tokens.contains(&preferred) {
            return Some(preferred.to_string());
        }
    }
    dominant_token(tokens.into_iter())
}

/// Alternate prefix, if more than one flat `<alternate>_*<suffix>` file exists
fn flat_file_prefix(entries: &[Entry], alternate: Option<&str>, suffix: &str) -> Option<String> {
    let alternate = alternate?;
    let start = format!("{}{}", alternate, SEPARATOR);
    let count = entries
        .iter()
        .filter(|e| !e.is_dir && e.name.ends_with(suffix) && e.name.starts_with(&start))
        .count();
    (count > 1).then(|| alternate.to_string())
}

/// Step entries starting with `<token>_`, sorted by step index when every
/// entry has one. Returns the paths and whether they were sorted.
fn collect_step_paths(entries: &[Entry], token: &str, suffix: &str) -> (Vec<PathBuf>, bool) {
    let start = format!("{}{}", token, SEPARATOR);
    let paths: Vec<PathBuf> = entries
        .iter()
        .filter(|e| e.name.starts_with(&start) && is_step_name(&e.name, suffix))
        .map(|e| e.path.clone())
        .collect();

    let indices: Option<Vec<_>> = paths.iter().map(|p| step_index(p, suffix)).collect();
    match indices {
        Some(indices) => {
            let mut indexed: Vec<_> = indices.into_iter().zip(paths).collect();
            indexed.sort();
            (indexed.into_iter().map(|(_, p)| p).collect(), true)
        }
        None => (paths, false),
    }
}
