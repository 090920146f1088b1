//! Dataset type resolution
//!
//! A series is assumed structurally homogeneous: the type is resolved from
//! the first step only and shared by every step. A step that does not fit
//! surfaces when the dataset layer opens it, not here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use implore_io::HeaderReader;
use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};
use crate::naming::read_entries;
use crate::registry::TypeRegistry;

/// Base dataset implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    ArepoSnapshot,
    GadgetStyleSnapshot,
    GroupCatalog,
    GenericHdf5,
    /// Registered by callers
    Custom(String),
}

impl DatasetKind {
    pub fn name(&self) -> &str {
        match self {
            DatasetKind::ArepoSnapshot => "ArepoSnapshot",
            DatasetKind::GadgetStyleSnapshot => "GadgetStyleSnapshot",
            DatasetKind::GroupCatalog => "GroupCatalog",
            DatasetKind::GenericHdf5 => "GenericHdf5",
            DatasetKind::Custom(name) => name,
        }
    }
}

/// Optional behavior layered onto a base dataset kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Redshift / scale factor aware
    Cosmology,
    /// Periodic cartesian box
    Spatial3D,
    /// Code units declared in the header
    Units,
    Custom(String),
}

impl Capability {
    pub fn name(&self) -> &str {
        match self {
            Capability::Cosmology => "Cosmology",
            Capability::Spatial3D => "Spatial3D",
            Capability::Units => "Units",
            Capability::Custom(name) => name,
        }
    }
}

/// A base kind decorated with capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedDatasetType {
    base: DatasetKind,
    capabilities: Vec<Capability>,
}

impl ComposedDatasetType {
    pub fn new(base: DatasetKind) -> Self {
        Self {
            base,
            capabilities: Vec::new(),
        }
    }

    /// Add a capability. Adding one that is already present is a no-op.
    pub fn decorate(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    pub fn base(&self) -> &DatasetKind {
        &self.base
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn has(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }
}

impl fmt::Display for ComposedDatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base.name())?;
        for capability in &self.capabilities {
            write!(f, "+{}", capability.name())?;
        }
        Ok(())
    }
}

/// Resolves the composed dataset type of a series from one representative path
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
    reader: &'a dyn HeaderReader,
    header_group: &'a str,
    suffix: &'a str,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        reader: &'a dyn HeaderReader,
        header_group: &'a str,
        suffix: &'a str,
    ) -> Self {
        Self {
            registry,
            reader,
            header_group,
            suffix,
        }
    }

    /// Resolve the type of the step at `path` (a step directory or flat file)
    pub fn resolve(&self, path: &Path) -> SeriesResult<Arc<ComposedDatasetType>> {
        let file = representative_file(path, self.suffix)?;
        let header = self
            .reader
            .read_header(&file, self.header_group)
            .map_err(|e| SeriesError::unknown_format(&file, e.to_string()))?;

        let kind = self.registry.detect_kind(&header).ok_or_else(|| {
            SeriesError::unknown_format(&file, "no registered dataset signature matches")
        })?;

        let composed = self
            .registry
            .detect_capabilities(&header)
            .into_iter()
            .fold(ComposedDatasetType::new(kind), ComposedDatasetType::decorate);

        tracing::info!("Resolved dataset type {} from {:?}", composed, file);
        Ok(Arc::new(composed))
    }
}

/// File to inspect for a step: the path itself, or the first data file of
/// a step directory.
pub fn representative_file(path: &Path, suffix: &str) -> SeriesResult<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }
    read_entries(path)?
        .into_iter()
        .find(|e| !e.is_dir && e.name.ends_with(suffix))
        .map(|e| e.path)
        .ok_or_else(|| {
            SeriesError::unknown_format(path, format!("no '{}' files in step directory", suffix))
        })
}
