//! Configuration for series discovery
//!
//! A `SeriesConfig` names the roles a simulation run writes per step and
//! the conventions used to find them. Configs can be built in code from
//! the presets or loaded from TOML:
//!
//! ```toml
//! primary = "paths"
//! suffix = ".hdf5"
//!
//! [[roles]]
//! key = "paths"
//! prefix = "snapdir"
//! alternate_prefix = "snap"
//!
//! [[roles]]
//! key = "gpaths"
//! prefix = "group"
//! output_name = "catalog"
//!
//! [candidate]
//! step_prefixes = ["snapdir", "snapshot"]
//! disqualifying_markers = ["gizmo_parameters.txt"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};

/// Subdirectory that holds per-step entries by convention
pub const DEFAULT_SUBDIR: &str = "output";

/// Keyword under which auxiliary role paths are passed on by default
pub const DEFAULT_OUTPUT_NAME: &str = "catalog";

/// Key of the primary (snapshot) role
pub const PRIMARY_ROLE: &str = "paths";

/// Key of the group catalog role
pub const CATALOG_ROLE: &str = "gpaths";

/// Suffix of flat single-file-per-step outputs
pub const DEFAULT_SUFFIX: &str = ".hdf5";

/// One logical category of per-step files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Role key, e.g. "paths"
    pub key: String,

    /// Subdirectory below the root holding this role's entries
    #[serde(default = "default_subdir")]
    pub subdir: String,

    /// Fixed prefix; inferred from the directory when unset
    #[serde(default)]
    pub prefix: Option<String>,

    /// Keyword the resolved paths are bound to downstream
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// Prefix tried for flat single-file outputs when `prefix` finds nothing
    #[serde(default)]
    pub alternate_prefix: Option<String>,
}

fn default_subdir() -> String {
    DEFAULT_SUBDIR.to_string()
}
fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}
fn default_primary() -> String {
    PRIMARY_ROLE.to_string()
}
fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

impl RoleSpec {
    /// Create a role with default subdirectory and output name
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            subdir: default_subdir(),
            prefix: None,
            output_name: default_output_name(),
            alternate_prefix: None,
        }
    }

    pub fn with_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.subdir = subdir.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    pub fn with_alternate_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.alternate_prefix = Some(prefix.into());
        self
    }
}

/// Settings for scoring a directory as a candidate series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Entry prefixes that mark a per-step layout
    #[serde(default = "default_step_prefixes")]
    pub step_prefixes: Vec<String>,

    /// Files whose presence rules this convention out
    #[serde(default = "default_markers")]
    pub disqualifying_markers: Vec<String>,

    /// Group holding the structural header attributes
    #[serde(default = "default_header_group")]
    pub header_group: String,

    /// Header attribute that must equal 1 for single-part files
    #[serde(default = "default_single_part_attribute")]
    pub single_part_attribute: String,
}

fn default_step_prefixes() -> Vec<String> {
    vec!["snapdir".to_string(), "snapshot".to_string()]
}
fn default_markers() -> Vec<String> {
    vec!["gizmo_parameters.txt".to_string()]
}
fn default_header_group() -> String {
    "Header".to_string()
}
fn default_single_part_attribute() -> String {
    "NumFilesPerSnapshot".to_string()
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            step_prefixes: default_step_prefixes(),
            disqualifying_markers: default_markers(),
            header_group: default_header_group(),
            single_part_attribute: default_single_part_attribute(),
        }
    }
}

/// Full discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Key of the required role whose entries define the steps
    #[serde(default = "default_primary")]
    pub primary: String,

    /// Roles to resolve
    #[serde(default)]
    pub roles: Vec<RoleSpec>,

    /// Suffix of flat single-file outputs
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Candidate scoring settings
    #[serde(default)]
    pub candidate: CandidateConfig,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self::gadget_style()
    }
}

impl SeriesConfig {
    /// Generic Gadget-style layout: a single snapshot role whose prefix is
    /// inferred from the output directory.
    pub fn gadget_style() -> Self {
        Self {
            primary: default_primary(),
            roles: vec![RoleSpec::new(PRIMARY_ROLE).with_alternate_prefix("snap")],
            suffix: default_suffix(),
            candidate: CandidateConfig::default(),
        }
    }

    /// Arepo layout: `snapdir_NNN` snapshot folders and `groups_NNN` catalogs
    pub fn arepo() -> Self {
        let mut config = Self::gadget_style();
        config.role_mut(PRIMARY_ROLE).prefix = Some("snapdir".to_string());
        config.roles.push(
            RoleSpec::new(CATALOG_ROLE)
                .with_prefix("group")
                .with_output_name(DEFAULT_OUTPUT_NAME)
                .with_alternate_prefix("group"),
        );
        config
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> SeriesResult<Self> {
        let config: SeriesConfig =
            toml::from_str(content).map_err(|e| SeriesError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> SeriesResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SeriesError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Check internal consistency
    pub fn validate(&self) -> SeriesResult<()> {
        if self.primary.is_empty() {
            return Err(SeriesError::Config("primary role key is empty".to_string()));
        }
        for (i, role) in self.roles.iter().enumerate() {
            if self.roles[..i].iter().any(|r| r.key == role.key) {
                return Err(SeriesError::Config(format!("duplicate role '{}'", role.key)));
            }
        }
        if self.role(&self.primary).is_none() {
            return Err(SeriesError::Config(format!(
                "primary role '{}' has no [[roles]] entry",
                self.primary
            )));
        }
        Ok(())
    }

    /// Look up a role by key
    pub fn role(&self, key: &str) -> Option<&RoleSpec> {
        self.roles.iter().find(|r| r.key == key)
    }

    /// Look up a role by key, adding one with defaults if missing
    pub fn role_mut(&mut self, key: &str) -> &mut RoleSpec {
        let index = match self.roles.iter().position(|r| r.key == key) {
            Some(index) => index,
            None => {
                self.roles.push(RoleSpec::new(key));
                self.roles.len() - 1
            }
        };
        &mut self.roles[index]
    }

    /// Whether `key` names the primary role
    pub fn is_primary(&self, key: &str) -> bool {
        self.primary == key
    }
}
