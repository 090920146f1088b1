//! Series conventions as seen by a format dispatcher
//!
//! A dispatcher holds several `SeriesConvention`s, asks each to score a
//! path and opens it with the best one. Choosing between conventions is
//! the dispatcher's business.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use implore_io::HeaderReader;

use crate::candidate::CandidateStatus;
use crate::config::{SeriesConfig, DEFAULT_SUBDIR};
use crate::error::SeriesResult;
use crate::factory::{DiscoverOptions, SeriesFactory};
use crate::series::DatasetSeries;

/// A directory layout convention for simulation series
pub trait SeriesConvention: Send + Sync {
    /// Name of the convention
    fn name(&self) -> &'static str;

    /// Confidence that `path` follows this convention
    fn validate_path(&self, path: &Path) -> CandidateStatus;

    /// Discover the series at `path`
    fn open(&self, path: &Path, options: &DiscoverOptions) -> SeriesResult<DatasetSeries>;
}

/// Arepo runs: `output/snapdir_NNN` snapshots with `output/groups_NNN`
/// catalogs, or flat `snap_NNN.hdf5` files.
pub struct ArepoConvention {
    factory: SeriesFactory,
}

impl ArepoConvention {
    pub fn new() -> Self {
        Self {
            factory: SeriesFactory::new(SeriesConfig::arepo()),
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn HeaderReader>) -> Self {
        self.factory = self.factory.with_reader(reader);
        self
    }

    pub fn factory(&self) -> &SeriesFactory {
        &self.factory
    }

    /// Simulation root for `path`; being handed the output folder itself
    /// is accepted.
    pub fn run_root(path: &Path) -> PathBuf {
        match (path.file_name(), path.parent()) {
            (Some(name), Some(parent)) if name == DEFAULT_SUBDIR => parent.to_path_buf(),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ArepoConvention {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesConvention for ArepoConvention {
    fn name(&self) -> &'static str {
        "arepo"
    }

    fn validate_path(&self, path: &Path) -> CandidateStatus {
        self.factory.validate(path)
    }

    fn open(&self, path: &Path, options: &DiscoverOptions) -> SeriesResult<DatasetSeries> {
        self.factory.discover(&Self::run_root(path), options)
    }
}
