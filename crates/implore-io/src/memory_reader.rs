//! In-memory header reader
//!
//! Serves pre-registered headers keyed by path. Used where the real file
//! format is not available, e.g. synthetic directory layouts in tests or
//! callers that already hold header metadata from a catalog.

use crate::header::FileHeader;
use crate::reader::{HeaderReader, IoError, IoResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Header reader backed by a path → header map
#[derive(Debug, Clone, Default)]
pub struct MemoryHeaderReader {
    headers: HashMap<PathBuf, FileHeader>,
}

impl MemoryHeaderReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the header returned for `path`
    pub fn insert(&mut self, path: impl AsRef<Path>, header: FileHeader) {
        self.headers.insert(path.as_ref().to_path_buf(), header);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_header(mut self, path: impl AsRef<Path>, header: FileHeader) -> Self {
        self.insert(path, header);
        self
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl HeaderReader for MemoryHeaderReader {
    fn read_header(&self, path: &Path, header_group: &str) -> IoResult<FileHeader> {
        let mut header = self
            .headers
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::FileNotFound(path.display().to_string()))?;

        // Mirror file readers: attributes only exist under the requested group
        if header.header_group.as_deref() != Some(header_group) {
            header.header_group = None;
            header.attributes.clear();
        }
        header.path = path.to_path_buf();
        Ok(header)
    }

    fn format_name(&self) -> &'static str {
        "memory"
    }
}
