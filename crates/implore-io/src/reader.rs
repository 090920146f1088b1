//! Header reader trait and common types
//!
//! The `HeaderReader` trait provides a uniform interface for inspecting
//! the structural header of a file without reading any field data.

use crate::header::FileHeader;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for reading the structural header of a data file
///
/// Implementations open the file read-only, collect what they need and
/// release the handle before returning, on success and on error alike.
pub trait HeaderReader: Send + Sync {
    /// Read top-level group names and the attributes of `header_group`.
    ///
    /// A missing header group is not an error: the returned header simply
    /// has `header_group == None` and no attributes.
    fn read_header(&self, path: &Path, header_group: &str) -> IoResult<FileHeader>;

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// Read a file header, picking the reader from the file extension
pub fn open_header(path: &Path, header_group: &str) -> IoResult<FileHeader> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "hdf5")]
        "h5" | "hdf5" | "hdf" => {
            use crate::hdf5_reader::Hdf5HeaderReader;
            Hdf5HeaderReader.read_header(path, header_group)
        }

        #[cfg(not(feature = "hdf5"))]
        "h5" | "hdf5" | "hdf" => {
            let _ = header_group;
            Err(IoError::UnsupportedFormat(
                "HDF5 support not compiled. Enable the 'hdf5' feature.".to_string(),
            ))
        }

        _ => Err(IoError::InvalidFormat(format!(
            "Unknown file extension: {}",
            extension
        ))),
    }
}

/// Reader that dispatches on file extension via [`open_header`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionHeaderReader;

impl HeaderReader for ExtensionHeaderReader {
    fn read_header(&self, path: &Path, header_group: &str) -> IoResult<FileHeader> {
        open_header(path, header_group)
    }

    fn format_name(&self) -> &'static str {
        "auto"
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    if cfg!(feature = "hdf5") {
        vec!["h5", "hdf5", "hdf"]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_supported_extensions() {
        let extensions = supported_extensions();
        #[cfg(feature = "hdf5")]
        assert!(extensions.contains(&"hdf5"));
        #[cfg(not(feature = "hdf5"))]
        assert!(extensions.is_empty());
    }

    #[test]
    fn test_open_header_missing_file() {
        let result = open_header(Path::new("/nonexistent/snap_000.hdf5"), "Header");
        assert!(matches!(result, Err(IoError::FileNotFound(_))));
    }

    #[test]
    fn test_open_header_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "not a data file").unwrap();

        let result = ExtensionHeaderReader.read_header(&path, "Header");
        assert!(matches!(result, Err(IoError::InvalidFormat(_))));
    }
}
