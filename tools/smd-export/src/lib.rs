//! smd-export library
//!
//! Builds `.smd` files from OBJ sources and a TOML manifest, and inspects
//! existing files. The binary in `main.rs` is a thin CLI over these modules.

pub mod inspect;
pub mod manifest;
pub mod obj;
pub mod sample;

// Re-export the format crate for callers that only depend on the tool
pub use smd_common::{SMD_FORMAT, SmdFile, SmdMaterial, SmdMesh};

pub use manifest::{Manifest, build, load_manifest, validate};
pub use obj::{convert_obj, load_obj};
