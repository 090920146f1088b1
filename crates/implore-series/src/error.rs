//! Error types for implore-series
//!
//! Fatal configuration problems (missing root, unresolvable required role,
//! empty primary sequence) all surface as [`SeriesError::InvalidPath`].
//! Recoverable inconsistencies are logged and never reach this type.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for series discovery
#[derive(Error, Debug)]
pub enum SeriesError {
    /// A path that discovery depends on is missing or yields nothing usable
    #[error("Invalid path '{}': {message}", path.display())]
    InvalidPath { path: PathBuf, message: String },

    /// The representative file could not be matched to a dataset kind
    #[error("Could not determine dataset type of '{}': {message}", path.display())]
    UnknownFormat { path: PathBuf, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeriesError {
    pub fn invalid_path(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        SeriesError::InvalidPath {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn unknown_format(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        SeriesError::UnknownFormat {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Whether this is the configuration-error kind
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, SeriesError::InvalidPath { .. })
    }
}

/// Result type for series operations
pub type SeriesResult<T> = Result<T, SeriesError>;
