//! Mesh block: a fixed record followed by per-loop attribute arrays.
//!
//! # Layout
//! ```text
//! 0x00: name [u8; 64] (NUL-terminated UTF-8)
//! 0x40: index i32 (1-based material ordinal)
//! 0x44: num_verts i32
//! 0x48: num_st i32
//! 0x4C: num_normals i32
//! 0x50: Vertex * num_verts, Vertex * num_normals, ST * num_st
//! ```

use serde::{Deserialize, Serialize};

use super::{NAME_WIDTH, St, Vertex};
use crate::codec::{FieldReader, FieldSpec, FieldValue, Record, RecordSchema};
use crate::error::{Result, SmdError};

const MESH_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", NAME_WIDTH),
    FieldSpec::int("index"),
    FieldSpec::int("num_verts"),
    FieldSpec::int("num_st"),
    FieldSpec::int("num_normals"),
];

/// Fixed part of a mesh block (80 bytes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmdMeshHeader {
    pub name: String,
    pub index: i32,
    pub num_verts: i32,
    pub num_st: i32,
    pub num_normals: i32,
}

impl SmdMeshHeader {
    pub const SIZE: usize = 80;

    /// Counts as lengths, rejecting negative values
    pub fn counts(&self) -> Result<(usize, usize, usize)> {
        let count = |field: &'static str, value: i32| {
            usize::try_from(value).map_err(|_| SmdError::InvalidCount {
                record: "Mesh",
                field,
                value,
            })
        };
        Ok((
            count("num_verts", self.num_verts)?,
            count("num_normals", self.num_normals)?,
            count("num_st", self.num_st)?,
        ))
    }
}

impl Record for SmdMeshHeader {
    const SCHEMA: RecordSchema = RecordSchema::new("Mesh", MESH_FIELDS);

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name.clone()),
            FieldValue::Int(self.index),
            FieldValue::Int(self.num_verts),
            FieldValue::Int(self.num_st),
            FieldValue::Int(self.num_normals),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new(Self::SCHEMA, values);
        Ok(Self {
            name: r.text()?,
            index: r.int()?,
            num_verts: r.int()?,
            num_st: r.int()?,
            num_normals: r.int()?,
        })
    }
}

/// A mesh with its flattened per-loop attributes.
///
/// Each triangle corner contributes one entry to `vertices`, `normals` and
/// `st`. The format stores the three counts separately, so they may differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmdMesh {
    pub name: String,
    /// 1-based index into the file's material list
    pub material_index: i32,
    pub vertices: Vec<Vertex>,
    pub normals: Vec<Vertex>,
    pub st: Vec<St>,
}

impl SmdMesh {
    pub fn new(name: impl Into<String>, material_index: i32) -> Self {
        Self {
            name: name.into(),
            material_index,
            ..Default::default()
        }
    }

    /// Number of triangle corners, when all three arrays agree
    pub fn loop_count(&self) -> Option<usize> {
        let n = self.vertices.len();
        (self.normals.len() == n && self.st.len() == n).then_some(n)
    }

    /// Build the fixed record, deriving counts from the array lengths
    pub fn header(&self) -> Result<SmdMeshHeader> {
        let count = |field: &'static str, len: usize| {
            i32::try_from(len).map_err(|_| {
                SmdError::schema("Mesh", field, format!("{} records exceed i32 range", len))
            })
        };
        Ok(SmdMeshHeader {
            name: self.name.clone(),
            index: self.material_index,
            num_verts: count("num_verts", self.vertices.len())?,
            num_st: count("num_st", self.st.len())?,
            num_normals: count("num_normals", self.normals.len())?,
        })
    }

    /// Encoded size of the whole block (record plus arrays)
    pub fn byte_size(&self) -> usize {
        SmdMeshHeader::SIZE
            + (self.vertices.len() + self.normals.len()) * Vertex::size()
            + self.st.len() * St::size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SmdMesh {
        SmdMesh {
            name: "quad".into(),
            material_index: 1,
            vertices: vec![Vertex::new(0.0, 0.0, 0.0); 6],
            normals: vec![Vertex::new(0.0, 0.0, 1.0); 6],
            st: vec![St::new(0.0, 1.0); 6],
        }
    }

    #[test]
    fn test_mesh_header_size() {
        assert_eq!(SmdMeshHeader::SCHEMA.size(), SmdMeshHeader::SIZE);
    }

    #[test]
    fn test_mesh_header_from_arrays() {
        let mut mesh = quad();
        mesh.st.truncate(4);
        let header = mesh.header().unwrap();
        assert_eq!(header.name, "quad");
        assert_eq!(header.index, 1);
        assert_eq!(header.num_verts, 6);
        assert_eq!(header.num_normals, 6);
        assert_eq!(header.num_st, 4);
        assert_eq!(mesh.loop_count(), None);
        assert_eq!(quad().loop_count(), Some(6));
    }

    #[test]
    fn test_mesh_header_field_order() {
        let header = SmdMeshHeader {
            name: "m".into(),
            index: 2,
            num_verts: 3,
            num_st: 4,
            num_normals: 5,
        };
        let bytes = header.pack().unwrap();
        assert_eq!(bytes[0], b'm');
        assert!(bytes[1..64].iter().all(|&b| b == 0));
        assert_eq!(&bytes[64..68], &2i32.to_le_bytes());
        assert_eq!(&bytes[68..72], &3i32.to_le_bytes());
        assert_eq!(&bytes[72..76], &4i32.to_le_bytes());
        assert_eq!(&bytes[76..80], &5i32.to_le_bytes());
        assert_eq!(SmdMeshHeader::unpack(&bytes).unwrap(), header);
    }

    #[test]
    fn test_mesh_name_truncation() {
        let exact = "n".repeat(63);
        let header = SmdMeshHeader {
            name: exact.clone(),
            index: 1,
            num_verts: 0,
            num_st: 0,
            num_normals: 0,
        };
        let bytes = header.pack().unwrap();
        assert_eq!(bytes.len(), SmdMeshHeader::SIZE);
        assert_eq!(&bytes[..63], exact.as_bytes());
        assert_eq!(bytes[63], 0);

        let long = SmdMeshHeader {
            name: "L".repeat(90),
            ..header
        };
        let bytes = long.pack().unwrap();
        assert_eq!(bytes.len(), SmdMeshHeader::SIZE);
        assert_eq!(bytes[63], 0);
        assert_eq!(SmdMeshHeader::unpack(&bytes).unwrap().name, "L".repeat(63));
    }

    #[test]
    fn test_negative_counts_rejected() {
        let header = SmdMeshHeader {
            name: "bad".into(),
            index: 1,
            num_verts: 3,
            num_st: -1,
            num_normals: 3,
        };
        assert!(matches!(
            header.counts(),
            Err(SmdError::InvalidCount { field: "num_st", .. })
        ));
    }

    #[test]
    fn test_mesh_byte_size() {
        assert_eq!(quad().byte_size(), 80 + 12 * 12 + 6 * 8);
    }
}
