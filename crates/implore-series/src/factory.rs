//! Series construction
//!
//! `SeriesFactory::discover` runs the whole pipeline: role paths are
//! resolved and aligned, the dataset type is resolved from the first step,
//! and the series is assembled with the auxiliary roles bound to their
//! output keywords.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use implore_io::{ExtensionHeaderReader, HeaderReader};

use crate::align::align_roles;
use crate::candidate::{CandidateStatus, CandidateValidator};
use crate::config::{SeriesConfig, DEFAULT_OUTPUT_NAME};
use crate::error::{SeriesError, SeriesResult};
use crate::registry::TypeRegistry;
use crate::resolve::PathResolver;
use crate::series::{DatasetSeries, SeriesArg, SeriesArgs};
use crate::types::TypeResolver;

/// Per-call discovery parameters
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Forwarded unchanged to every step
    pub lazy: bool,
    /// Subdirectory per role key
    pub subdirs: HashMap<String, String>,
    /// Fixed prefix per role key
    pub prefixes: HashMap<String, String>,
    /// Output keyword per role key
    pub output_names: HashMap<String, String>,
    /// Passthrough arguments; these win over role keywords
    pub args: BTreeMap<String, serde_json::Value>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            lazy: true,
            subdirs: HashMap::new(),
            prefixes: HashMap::new(),
            output_names: HashMap::new(),
            args: BTreeMap::new(),
        }
    }
}

impl DiscoverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn with_subdir(mut self, role: impl Into<String>, subdir: impl Into<String>) -> Self {
        self.subdirs.insert(role.into(), subdir.into());
        self
    }

    pub fn with_prefix(mut self, role: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(role.into(), prefix.into());
        self
    }

    pub fn with_output_name(mut self, role: impl Into<String>, name: impl Into<String>) -> Self {
        self.output_names.insert(role.into(), name.into());
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    /// Config with the per-role overrides applied. Roles named only in an
    /// override are added as optional roles.
    pub fn apply(&self, config: &SeriesConfig) -> SeriesConfig {
        let mut config = config.clone();
        for (role, subdir) in &self.subdirs {
            config.role_mut(role).subdir = subdir.clone();
        }
        for (role, prefix) in &self.prefixes {
            config.role_mut(role).prefix = Some(prefix.clone());
        }
        for (role, name) in &self.output_names {
            config.role_mut(role).output_name = name.clone();
        }
        config
    }
}

/// Discovers and assembles dataset series
pub struct SeriesFactory {
    config: SeriesConfig,
    reader: Arc<dyn HeaderReader>,
    registry: Arc<TypeRegistry>,
}

impl SeriesFactory {
    /// Factory reading headers by file extension with the built-in registry
    pub fn new(config: SeriesConfig) -> Self {
        Self {
            config,
            reader: Arc::new(ExtensionHeaderReader),
            registry: Arc::new(TypeRegistry::new()),
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn HeaderReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    /// Candidate validator sharing this factory's reader and conventions
    pub fn validator(&self) -> CandidateValidator {
        CandidateValidator::new(
            self.config.candidate.clone(),
            self.config.suffix.clone(),
            Arc::clone(&self.reader),
        )
    }

    /// Score `root` against this factory's conventions
    pub fn validate(&self, root: &Path) -> CandidateStatus {
        self.validator().validate(root)
    }

    /// Discover the series below `root`
    pub fn discover(&self, root: &Path, options: &DiscoverOptions) -> SeriesResult<DatasetSeries> {
        if !root.exists() {
            return Err(SeriesError::invalid_path(root, "path does not exist"));
        }
        let config = options.apply(&self.config);
        config.validate()?;

        let mut resolved = PathResolver::new(&config).resolve_all(root)?;
        align_roles(&mut resolved, &config.suffix)?;

        let primary = match resolved.take_primary() {
            Some(set) if !set.is_empty() => set,
            _ => {
                return Err(SeriesError::invalid_path(
                    root,
                    "could not find any snapshot paths",
                ))
            }
        };

        let dataset_type = TypeResolver::new(
            &self.registry,
            self.reader.as_ref(),
            &config.candidate.header_group,
            &config.suffix,
        )
        .resolve(&primary.paths[0])?;

        let mut args = SeriesArgs::new();
        for (key, set) in resolved.sets {
            let output_name = config
                .role(&key)
                .map(|r| r.output_name.clone())
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
            args.insert(output_name, SeriesArg::Paths(set.paths));
        }
        for (key, value) in &options.args {
            args.insert(key.clone(), SeriesArg::Value(value.clone()));
        }

        tracing::info!(
            "Discovered series of {} {} steps in {:?}",
            primary.len(),
            dataset_type,
            root
        );

        Ok(DatasetSeries::new(
            root,
            primary.paths,
            dataset_type,
            args,
            options.lazy,
            &config.suffix,
        ))
    }
}
