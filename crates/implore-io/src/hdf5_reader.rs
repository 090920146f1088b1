//! HDF5 header reader
//!
//! Reads the top-level layout of an HDF5 file and the attributes of its
//! header group. Field datasets are never touched. The file handle lives
//! only for the duration of `read_header` and is closed when it drops.

#[cfg(feature = "hdf5")]
use hdf5::{types::TypeDescriptor, Attribute, File as Hdf5File, Group};

use crate::header::FileHeader;
#[cfg(feature = "hdf5")]
use crate::header::AttrValue;
use crate::reader::{HeaderReader, IoError, IoResult};
use std::path::Path;

/// HDF5 header reader
#[cfg(feature = "hdf5")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5HeaderReader;

#[cfg(feature = "hdf5")]
impl Hdf5HeaderReader {
    fn read_attributes(group: &Group, header: &mut FileHeader) -> IoResult<()> {
        let names = group
            .attr_names()
            .map_err(|e| IoError::ReadFailed(e.to_string()))?;

        for name in names {
            let attr = match group.attr(&name) {
                Ok(attr) => attr,
                Err(_) => continue,
            };
            // Attributes of types we do not model are skipped, not fatal
            if let Some(value) = Self::read_attr_value(&attr) {
                header.attributes.insert(name, value);
            }
        }
        Ok(())
    }

    fn read_attr_value(attr: &Attribute) -> Option<AttrValue> {
        let descriptor = attr.dtype().ok()?.to_descriptor().ok()?;

        match descriptor {
            TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
                if attr.is_scalar() {
                    attr.read_scalar::<i64>().ok().map(AttrValue::Int)
                } else {
                    attr.read_raw::<i64>().ok().map(AttrValue::IntArray)
                }
            }
            TypeDescriptor::Float(_) => {
                if attr.is_scalar() {
                    attr.read_scalar::<f64>().ok().map(AttrValue::Float)
                } else {
                    attr.read_raw::<f64>().ok().map(AttrValue::FloatArray)
                }
            }
            TypeDescriptor::VarLenUnicode => attr
                .read_scalar::<hdf5::types::VarLenUnicode>()
                .ok()
                .map(|v| AttrValue::Str(v.to_string())),
            TypeDescriptor::VarLenAscii => attr
                .read_scalar::<hdf5::types::VarLenAscii>()
                .ok()
                .map(|v| AttrValue::Str(v.to_string())),
            _ => None,
        }
    }
}

#[cfg(feature = "hdf5")]
impl HeaderReader for Hdf5HeaderReader {
    fn read_header(&self, path: &Path, header_group: &str) -> IoResult<FileHeader> {
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let file = Hdf5File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;

        let mut header = FileHeader::new(path);
        header.groups = file
            .member_names()
            .map_err(|e| IoError::ReadFailed(e.to_string()))?;

        if header.has_group(header_group) {
            let group = file
                .group(header_group)
                .map_err(|e| IoError::InvalidFormat(format!("{}: {}", header_group, e)))?;
            Self::read_attributes(&group, &mut header)?;
            header.header_group = Some(header_group.to_string());
        }

        Ok(header)
    }

    fn format_name(&self) -> &'static str {
        "HDF5"
    }
}

/// Stub implementation when HDF5 feature is not enabled
#[cfg(not(feature = "hdf5"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5HeaderReader;

#[cfg(not(feature = "hdf5"))]
impl HeaderReader for Hdf5HeaderReader {
    fn read_header(&self, _path: &Path, _header_group: &str) -> IoResult<FileHeader> {
        Err(IoError::UnsupportedFormat(
            "HDF5 support not compiled. Enable the 'hdf5' feature.".to_string(),
        ))
    }

    fn format_name(&self) -> &'static str {
        "HDF5"
    }
}
