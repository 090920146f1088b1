//! implore-series - Simulation output series discovery
//!
//! A simulation run writes several kinds of files per time step (particle
//! snapshots, group catalogs, ...) under loosely followed naming
//! conventions. This crate finds them, lines them up by step and returns
//! a single `DatasetSeries` that the dataset layer can open step by step.
//!
//! # Key Components
//!
//! - **Prefix inference**: dominant per-step folder prefix of a directory
//! - **PathResolver**: per-role directory, prefix and ordered step paths
//! - **Alignment**: non-primary roles cut to the primary role's steps
//! - **TypeResolver**: dataset kind plus capabilities from one header
//! - **CandidateValidator**: `No`/`Maybe`/`Yes` score for a dispatcher
//! - **SeriesFactory**: the whole pipeline, producing a `DatasetSeries`
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use implore_series::{DiscoverOptions, SeriesConfig, SeriesFactory};
//!
//! let factory = SeriesFactory::new(SeriesConfig::arepo());
//! let series = factory.discover(Path::new("/sims/L35n270"), &DiscoverOptions::default())?;
//! for step in &series {
//!     println!("{:?} -> {:?}", step.path(), step.role_path("catalog"));
//! }
//! # Ok::<(), implore_series::SeriesError>(())
//! ```

pub mod align;
pub mod candidate;
pub mod config;
pub mod convention;
pub mod error;
pub mod factory;
pub mod naming;
pub mod prefix;
pub mod registry;
pub mod resolve;
pub mod series;
pub mod types;

pub use align::align_roles;
pub use candidate::{CandidateStatus, CandidateValidator};
pub use config::{CandidateConfig, RoleSpec, SeriesConfig};
pub use convention::{ArepoConvention, SeriesConvention};
pub use error::{SeriesError, SeriesResult};
pub use factory::{DiscoverOptions, SeriesFactory};
pub use naming::StepIndex;
pub use prefix::infer_prefix;
pub use registry::{CapabilityDetector, DatasetSignature, TypeRegistry};
pub use resolve::{PathResolver, PathSet, ResolvedRoles};
pub use series::{DatasetHandle, DatasetSeries, SeriesArg, SeriesArgs};
pub use types::{Capability, ComposedDatasetType, DatasetKind, TypeResolver};
