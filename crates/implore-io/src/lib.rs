//! implore-io - Data I/O for scientific datasets
//!
//! This crate provides structural inspection of scientific data files:
//!
//! - **HDF5**: Hierarchical Data Format (primary simulation output format)
//! - **Memory**: pre-registered headers, for synthetic layouts
//!
//! # Design
//!
//! All readers implement the `HeaderReader` trait for uniform access.
//! Only top-level layout and header attributes are read; field data is
//! left to the dataset layer.

pub mod header;
pub mod memory_reader;
pub mod reader;

pub mod hdf5_reader;

pub use header::*;
pub use memory_reader::MemoryHeaderReader;
pub use reader::*;
