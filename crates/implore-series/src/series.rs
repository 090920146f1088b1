//! The assembled dataset series
//!
//! A `DatasetSeries` is the ordered list of per-step dataset handles plus
//! the auxiliary role paths bound to their keywords. Handles are lazy:
//! nothing below is opened until the dataset layer loads a step.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::naming::{step_index, StepIndex};
use crate::types::ComposedDatasetType;

/// Keyword argument forwarded to per-step construction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesArg {
    /// Aligned paths of an auxiliary role
    Paths(Vec<PathBuf>),
    /// Caller-supplied passthrough value
    Value(serde_json::Value),
}

impl SeriesArg {
    pub fn as_paths(&self) -> Option<&[PathBuf]> {
        match self {
            SeriesArg::Paths(paths) => Some(paths),
            SeriesArg::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            SeriesArg::Value(value) => Some(value),
            SeriesArg::Paths(_) => None,
        }
    }
}

/// Keyword arguments shared by all steps of a series
pub type SeriesArgs = BTreeMap<String, SeriesArg>;

/// One step of a series, ready to be opened by the dataset layer
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    path: PathBuf,
    step: Option<StepIndex>,
    dataset_type: Arc<ComposedDatasetType>,
    lazy: bool,
    args: Arc<SeriesArgs>,
    suffix: Arc<str>,
}

impl DatasetHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Step index parsed from the path, if it has one
    pub fn step(&self) -> Option<StepIndex> {
        self.step
    }

    pub fn dataset_type(&self) -> &Arc<ComposedDatasetType> {
        &self.dataset_type
    }

    pub fn lazy(&self) -> bool {
        self.lazy
    }

    /// Keyword arguments forwarded to the dataset constructor
    pub fn args(&self) -> &SeriesArgs {
        &self.args
    }

    /// Entry of an auxiliary role belonging to this step, e.g. its group
    /// catalog. Matched on step index, so gaps in the role are handled.
    pub fn role_path(&self, keyword: &str) -> Option<&Path> {
        let step = self.step?;
        self.args
            .get(keyword)?
            .as_paths()?
            .iter()
            .find(|p| step_index(p, &self.suffix) == Some(step))
            .map(PathBuf::as_path)
    }
}

/// Time-ordered series of datasets
#[derive(Debug, Clone)]
pub struct DatasetSeries {
    root: PathBuf,
    name: String,
    steps: Vec<DatasetHandle>,
    dataset_type: Arc<ComposedDatasetType>,
    args: Arc<SeriesArgs>,
    lazy: bool,
}

impl DatasetSeries {
    /// Build a series from ordered step paths. Every step shares
    /// `dataset_type` and `args`.
    pub fn new(
        root: impl Into<PathBuf>,
        paths: Vec<PathBuf>,
        dataset_type: Arc<ComposedDatasetType>,
        args: SeriesArgs,
        lazy: bool,
        suffix: &str,
    ) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let args = Arc::new(args);
        let suffix: Arc<str> = Arc::from(suffix);

        let steps = paths
            .into_iter()
            .map(|path| DatasetHandle {
                step: step_index(&path, &suffix),
                path,
                dataset_type: Arc::clone(&dataset_type),
                lazy,
                args: Arc::clone(&args),
                suffix: Arc::clone(&suffix),
            })
            .collect();

        Self {
            root,
            name,
            steps,
            dataset_type,
            args,
            lazy,
        }
    }

    /// Simulation root the series was discovered under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the run (final component of the root)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DatasetHandle> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatasetHandle> {
        self.steps.iter()
    }

    pub fn steps(&self) -> &[DatasetHandle] {
        &self.steps
    }

    /// Step with the given step index
    pub fn step(&self, step: StepIndex) -> Option<&DatasetHandle> {
        self.steps.iter().find(|h| h.step == Some(step))
    }

    /// Primary paths in step order
    pub fn paths(&self) -> Vec<&Path> {
        self.steps.iter().map(|h| h.path()).collect()
    }

    /// Step indices, `None` where a path carried none
    pub fn step_indices(&self) -> Vec<Option<StepIndex>> {
        self.steps.iter().map(|h| h.step).collect()
    }

    pub fn dataset_type(&self) -> &Arc<ComposedDatasetType> {
        &self.dataset_type
    }

    pub fn lazy(&self) -> bool {
        self.lazy
    }

    pub fn args(&self) -> &SeriesArgs {
        &self.args
    }

    /// Paths bound to an auxiliary role keyword
    pub fn role_paths(&self, keyword: &str) -> Option<&[PathBuf]> {
        self.args.get(keyword).and_then(SeriesArg::as_paths)
    }

    /// Passthrough value by keyword
    pub fn arg(&self, keyword: &str) -> Option<&serde_json::Value> {
        self.args.get(keyword).and_then(SeriesArg::as_value)
    }
}

impl<'a> IntoIterator for &'a DatasetSeries {
    type Item = &'a DatasetHandle;
    type IntoIter = std::slice::Iter<'a, DatasetHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatasetKind;

    fn series() -> DatasetSeries {
        let mut args = SeriesArgs::new();
        args.insert(
            "catalog".to_string(),
            SeriesArg::Paths(vec![
                PathBuf::from("/sim/run1/output/groups_000"),
                PathBuf::from("/sim/run1/output/groups_002"),
            ]),
        );
        args.insert("units".to_string(), SeriesArg::Value(serde_json::json!(false)));

        DatasetSeries::new(
            "/sim/run1",
            vec![
                PathBuf::from("/sim/run1/output/snapdir_000"),
                PathBuf::from("/sim/run1/output/snapdir_001"),
                PathBuf::from("/sim/run1/output/snapdir_002"),
            ],
            Arc::new(ComposedDatasetType::new(DatasetKind::ArepoSnapshot)),
            args,
            true,
            ".hdf5",
        )
    }

    #[test]
    fn test_series_accessors() {
        let series = series();
        assert_eq!(series.name(), "run1");
        assert_eq!(series.len(), 3);
        assert_eq!(series.step_indices(), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(series.role_paths("catalog").unwrap().len(), 2);
        assert_eq!(series.arg("units"), Some(&serde_json::json!(false)));
        assert!(series.arg("catalog").is_none());
        assert!(series.role_paths("units").is_none());
    }

    #[test]
    fn test_type_shared_across_steps() {
        let series = series();
        for handle in &series {
            assert!(Arc::ptr_eq(handle.dataset_type(), series.dataset_type()));
            assert!(handle.lazy());
        }
    }

    #[test]
    fn test_role_path_by_step() {
        let series = series();
        assert_eq!(
            series.get(0).unwrap().role_path("catalog"),
            Some(Path::new("/sim/run1/output/groups_000"))
        );
        assert_eq!(series.get(1).unwrap().role_path("catalog"), None);
        assert_eq!(
            series.step(2).unwrap().role_path("catalog"),
            Some(Path::new("/sim/run1/output/groups_002"))
        );
    }
}
