//! SMD file header (16 bytes)
//!
//! # Layout
//! ```text
//! 0x00: magic [u8; 4] ("SMD0")
//! 0x04: version i32
//! 0x08: num_meshes i32
//! 0x0C: num_materials i32
//! ```

use serde::{Deserialize, Serialize};

use crate::SMD_FORMAT;
use crate::codec::{FieldReader, FieldSpec, FieldValue, Record, RecordSchema};
use crate::error::{Result, SmdError};

const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::tag("magic", 4),
    FieldSpec::int("version"),
    FieldSpec::int("num_meshes"),
    FieldSpec::int("num_materials"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmdHeader {
    pub magic: [u8; 4],
    pub version: i32,
    pub num_meshes: i32,
    /// Number of material records following the mesh blocks
    pub num_materials: i32,
}

impl SmdHeader {
    pub const SIZE: usize = 16;

    /// Header for the current format version
    pub fn new(num_meshes: i32, num_materials: i32) -> Self {
        Self {
            magic: *SMD_FORMAT.magic,
            version: SMD_FORMAT.version,
            num_meshes,
            num_materials,
        }
    }

    /// Check magic and version against [`SMD_FORMAT`]
    pub fn validate(&self) -> Result<()> {
        if &self.magic != SMD_FORMAT.magic {
            return Err(SmdError::BadMagic {
                found: self.magic.to_vec(),
                expected: *SMD_FORMAT.magic,
            });
        }
        if !SMD_FORMAT.supports_version(self.version) {
            return Err(SmdError::UnsupportedVersion {
                found: self.version,
                supported: SMD_FORMAT.version,
            });
        }
        if self.num_meshes < 0 {
            return Err(SmdError::InvalidCount {
                record: "Header",
                field: "num_meshes",
                value: self.num_meshes,
            });
        }
        if self.num_materials < 0 {
            return Err(SmdError::InvalidCount {
                record: "Header",
                field: "num_materials",
                value: self.num_materials,
            });
        }
        Ok(())
    }
}

impl Record for SmdHeader {
    const SCHEMA: RecordSchema = RecordSchema::new("Header", HEADER_FIELDS);

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Bytes(self.magic.to_vec()),
            FieldValue::Int(self.version),
            FieldValue::Int(self.num_meshes),
            FieldValue::Int(self.num_materials),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new(Self::SCHEMA, values);
        Ok(Self {
            magic: r.bytes()?,
            version: r.int()?,
            num_meshes: r.int()?,
            num_materials: r.int()?,
        })
    }
}
