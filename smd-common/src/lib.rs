//! Struct codec and binary file format for SMD static models
//!
//! This crate is shared between:
//! - `smd-export` (asset pipeline and inspection tool)
//! - any runtime that loads `.smd` files
//!
//! # Modules
//!
//! - [`codec`] - Generic fixed-layout record pack/unpack
//! - [`formats`] - SMD record schemas and whole-file read/write
//! - [`format_info`] - Extension, magic tag and version constants

pub mod codec;
pub mod error;
pub mod format_info;
pub mod formats;

pub use error::{Result, SmdError};
pub use format_info::{SMD_FORMAT, SmdFormat};

// Re-export commonly used format items
pub use formats::{
    NAME_WIDTH, SmdFile, SmdHeader, SmdMaterial, SmdMesh, SmdMeshHeader, St, Vertex, read_smd,
    write_smd,
};

pub use codec::Record;
