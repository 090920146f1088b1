//! Structural header of a scientific data file
//!
//! A `FileHeader` is the small amount of metadata needed to decide what
//! kind of dataset a file holds: the names of its top-level groups and the
//! attributes attached to its header group. It never contains field data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A single header attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
}

impl AttrValue {
    /// Interpret the value as a scalar integer.
    ///
    /// Single-element arrays are accepted since several simulation codes
    /// write scalars as arrays of length one. Floats are accepted only when
    /// they hold an integral value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            AttrValue::IntArray(v) if v.len() == 1 => Some(v[0]),
            AttrValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            AttrValue::FloatArray(v) if v.len() == 1 && v[0].fract() == 0.0 => Some(v[0] as i64),
            _ => None,
        }
    }

    /// Interpret the value as a scalar float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            AttrValue::IntArray(v) if v.len() == 1 => Some(v[0] as f64),
            AttrValue::FloatArray(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// Get the string value, if this is a string attribute
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "string",
            AttrValue::IntArray(_) => "int[]",
            AttrValue::FloatArray(_) => "float[]",
        }
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

/// Structural header read from one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileHeader {
    /// File the header was read from
    pub path: PathBuf,

    /// Top-level group names, in file order
    pub groups: Vec<String>,

    /// Name of the header group the attributes were read from, if present
    pub header_group: Option<String>,

    /// Attributes of the header group
    pub attributes: HashMap<String, AttrValue>,
}

impl FileHeader {
    /// Create an empty header for a path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Add a top-level group
    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        self.groups.push(name.into());
        self
    }

    /// Mark a group as the header group and add it if missing
    pub fn with_header_group(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.groups.contains(&name) {
            self.groups.push(name.clone());
        }
        self.header_group = Some(name);
        self
    }

    /// Set a header attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Whether a top-level group with this exact name exists
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g == name)
    }

    /// Whether any top-level group starts with the given prefix
    pub fn has_group_prefix(&self, prefix: &str) -> bool {
        self.groups.iter().any(|g| g.starts_with(prefix))
    }

    /// Whether the header group was found
    pub fn has_header(&self) -> bool {
        self.header_group.is_some()
    }

    /// Get a header attribute
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Whether a header attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Get a header attribute as a scalar integer
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(AttrValue::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_as_i64() {
        assert_eq!(AttrValue::Int(1).as_i64(), Some(1));
        assert_eq!(AttrValue::IntArray(vec![4]).as_i64(), Some(4));
        assert_eq!(AttrValue::IntArray(vec![4, 5]).as_i64(), None);
        assert_eq!(AttrValue::Float(2.0).as_i64(), Some(2));
        assert_eq!(AttrValue::Float(2.5).as_i64(), None);
        assert_eq!(AttrValue::Str("1".into()).as_i64(), None);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(AttrValue::from(1).type_name(), "int");
        assert_eq!(AttrValue::from(0.5).type_name(), "float");
        assert_eq!(AttrValue::from("a").type_name(), "string");
        assert_eq!(AttrValue::FloatArray(vec![1.0]).type_name(), "float[]");
    }

    #[test]
    fn test_header_builder() {
        let header = FileHeader::new("/data/snap_000.hdf5")
            .with_header_group("Header")
            .with_group("PartType0")
            .with_attr("NumFilesPerSnapshot", 1)
            .with_attr("BoxSize", 35000.0);

        assert!(header.has_header());
        assert!(header.has_group("Header"));
        assert!(header.has_group_prefix("PartType"));
        assert!(!header.has_group("Config"));
        assert_eq!(header.attr_i64("NumFilesPerSnapshot"), Some(1));
        assert_eq!(header.attr("BoxSize").and_then(AttrValue::as_f64), Some(35000.0));
    }

    #[test]
    fn test_header_group_not_duplicated() {
        let header = FileHeader::new("x.hdf5")
            .with_group("Header")
            .with_header_group("Header");
        assert_eq!(header.groups, vec!["Header".to_string()]);
    }
}
