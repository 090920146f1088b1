//! Step alignment across roles
//!
//! Runs often have catalogs for only some snapshots (or stray catalogs
//! without a snapshot). The primary role defines which steps exist; every
//! other role is cut down to the steps the primary role has.

use std::collections::HashSet;

use crate::error::{SeriesError, SeriesResult};
use crate::naming::{step_index, StepIndex};
use crate::resolve::ResolvedRoles;

/// Align all non-primary roles to the primary role's step indices.
///
/// A no-op when every present role has the same length. Returns the number
/// of entries dropped. Fails when the primary role is missing or empty.
pub fn align_roles(resolved: &mut ResolvedRoles, suffix: &str) -> SeriesResult<usize> {
    let primary = match resolved.primary_set() {
        Some(set) if !set.is_empty() => set,
        Some(set) => {
            return Err(SeriesError::invalid_path(
                &set.directory,
                "could not find any snapshot paths",
            ))
        }
        None => {
            return Err(SeriesError::InvalidPath {
                path: Default::default(),
                message: format!("primary role '{}' was not resolved", resolved.primary),
            })
        }
    };

    let length = primary.len();
    if resolved.sets.values().all(|set| set.len() == length) {
        return Ok(0);
    }

    tracing::info!(
        "Mismatch between number of entries per role. Only keeping entries that have a '{}' step associated.",
        resolved.primary
    );

    let ids: HashSet<StepIndex> = primary
        .paths
        .iter()
        .filter_map(|p| step_index(p, suffix))
        .collect();

    let primary_key = resolved.primary.clone();
    let mut dropped = 0;
    for (key, set) in resolved.sets.iter_mut() {
        if *key == primary_key {
            continue;
        }
        let before = set.paths.len();
        set.paths
            .retain(|p| step_index(p, suffix).is_some_and(|id| ids.contains(&id)));
        let removed = before - set.paths.len();
        if removed > 0 {
            tracing::debug!("Dropped {} unaligned entries from role '{}'", removed, key);
        }
        dropped += removed;
    }
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::PathSet;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn set(role: &str, prefix: &str, ids: &[u64]) -> PathSet {
        PathSet {
            role: role.to_string(),
            directory: PathBuf::from("/sim/output"),
            prefix: prefix.to_string(),
            paths: ids
                .iter()
                .map(|i| PathBuf::from(format!("/sim/output/{}_{:03}", prefix, i)))
                .collect(),
            sorted: true,
        }
    }

    fn resolved(sets: Vec<PathSet>) -> ResolvedRoles {
        ResolvedRoles {
            primary: "paths".to_string(),
            sets: sets.into_iter().map(|s| (s.role.clone(), s)).collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_equal_lengths_untouched() {
        let mut roles = resolved(vec![
            set("paths", "snapdir", &[0, 1, 2]),
            set("gpaths", "groups", &[5, 6, 7]),
        ]);
        assert_eq!(align_roles(&mut roles, ".hdf5").unwrap(), 0);
        assert_eq!(roles.get("gpaths").unwrap().len(), 3);
    }

    #[test]
    fn test_missing_catalog_step() {
        let mut roles = resolved(vec![
            set("paths", "snapdir", &[0, 1, 2, 3]),
            set("gpaths", "groups", &[0, 1, 3]),
        ]);
        align_roles(&mut roles, ".hdf5").unwrap();

        let catalog = roles.get("gpaths").unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.paths[2], PathBuf::from("/sim/output/groups_003"));
        assert_eq!(roles.primary_set().unwrap().len(), 4);
    }

    #[test]
    fn test_extra_catalog_steps_dropped() {
        let mut roles = resolved(vec![
            set("paths", "snapdir", &[2, 4]),
            set("gpaths", "groups", &[0, 1, 2, 3, 4]),
        ]);
        assert_eq!(align_roles(&mut roles, ".hdf5").unwrap(), 3);

        let catalog = roles.get("gpaths").unwrap();
        assert_eq!(
            catalog.paths,
            vec![
                PathBuf::from("/sim/output/groups_002"),
                PathBuf::from("/sim/output/groups_004")
            ]
        );
    }

    #[test]
    fn test_flat_files_aligned_by_stem() {
        let mut roles = resolved(vec![
            PathSet {
                paths: vec![
                    PathBuf::from("/sim/snap_000.hdf5"),
                    PathBuf::from("/sim/snap_001.hdf5"),
                ],
                ..set("paths", "snap", &[])
            },
            PathSet {
                paths: vec![
                    PathBuf::from("/sim/group_000.hdf5"),
                    PathBuf::from("/sim/group_001.hdf5"),
                    PathBuf::from("/sim/group_002.hdf5"),
                ],
                ..set("gpaths", "group", &[])
            },
        ]);
        align_roles(&mut roles, ".hdf5").unwrap();
        assert_eq!(roles.get("gpaths").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_primary_fails() {
        let mut roles = resolved(vec![set("paths", "snapdir", &[]), set("gpaths", "groups", &[0])]);
        let err = align_roles(&mut roles, ".hdf5").unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_missing_primary_fails() {
        let mut roles = resolved(vec![set("gpaths", "groups", &[0])]);
        let err = align_roles(&mut roles, ".hdf5").unwrap_err();
        assert!(err.is_invalid_path());
    }
}
