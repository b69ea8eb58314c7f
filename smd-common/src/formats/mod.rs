//! SMD record schemas and the whole-file reader/writer.
//!
//! Every record implements [`Record`](crate::codec::Record), so each block can
//! be packed, unpacked or streamed on its own. [`write_smd`] and [`read_smd`]
//! sequence them into a complete file.
//!
//! All multi-byte values are little-endian. String slots are fixed width and
//! NUL padded.

mod header;
mod material;
mod mesh;
mod smd_file;
mod vertex;

pub use header::SmdHeader;
pub use material::SmdMaterial;
pub use mesh::{SmdMesh, SmdMeshHeader};
pub use smd_file::{SmdFile, read_smd, write_smd};
pub use vertex::{St, Vertex};

use crate::SMD_FORMAT;

/// Width of the name and texture path slots
pub const NAME_WIDTH: usize = SMD_FORMAT.name_width;
