//! Whole-file SMD reader and writer.
//!
//! # Layout
//! ```text
//! Header
//! for each of num_meshes:
//!     Mesh record
//!     Vertex * num_verts     (positions)
//!     Vertex * num_normals   (normals)
//!     ST     * num_st        (texture coordinates)
//! Material * num_materials
//! ```
//!
//! Both directions are a single sequential pass. A failed write leaves the
//! destination incomplete; callers discard it and write again.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::{SmdHeader, SmdMaterial, SmdMesh, SmdMeshHeader, St, Vertex};
use crate::codec::Record;
use crate::error::{Result, SmdError};


/// A fully decoded SMD file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmdFile {
    pub header: SmdHeader,
    pub meshes: Vec<SmdMesh>,
    pub materials: Vec<SmdMaterial>,
}

impl SmdFile {
    /// Assemble a file for the current format version
    pub fn new(meshes: Vec<SmdMesh>, materials: Vec<SmdMaterial>) -> Result<Self> {
        let header = SmdHeader::new(
            list_count("num_meshes", meshes.len())?,
            list_count("num_materials", materials.len())?,
        );
        Ok(Self {
            header,
            meshes,
            materials,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        read_smd(&mut reader)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.byte_size());
        write_smd(&mut out, &self.meshes, &self.materials)?;
        Ok(out)
    }

    /// Exact encoded size in bytes
    pub fn byte_size(&self) -> usize {
        SmdHeader::SIZE
            + self.meshes.iter().map(SmdMesh::byte_size).sum::<usize>()
            + self.materials.len() * SmdMaterial::SIZE
    }

    /// Resolve a mesh's 1-based material index
    pub fn material_for(&self, mesh: &SmdMesh) -> Option<&SmdMaterial> {
        let index = usize::try_from(mesh.material_index).ok()?.checked_sub(1)?;
        self.materials.get(index)
    }
}

fn list_count(field: &'static str, len: usize) -> Result<i32> {
    i32::try_from(len)
        .map_err(|_| SmdError::schema("Header", field, format!("{} entries exceed i32 range", len)))
}

/// Write a complete SMD file.
///
/// `num_materials` in the header is the length of `materials`. Mesh material
/// indices are written as given; out-of-range indices are logged, not
/// rejected.
pub fn write_smd<W: Write>(w: &mut W, meshes: &[SmdMesh], materials: &[SmdMaterial]) -> Result<()> {
    let header = SmdHeader::new(
        list_count("num_meshes", meshes.len())?,
        list_count("num_materials", materials.len())?,
    );
    w.write_all(&header.pack()?)?;

    for mesh in meshes {
        let record = mesh.header()?;
        if record.index < 1 || record.index > header.num_materials {
            tracing::warn!(
                "mesh {:?} references material {} but the file has {} materials",
                mesh.name,
                record.index,
                header.num_materials
            );
        }
        if mesh.loop_count().is_none() {
            tracing::warn!(
                "mesh {:?} has mismatched attribute counts: {} verts, {} normals, {} st",
                mesh.name,
                record.num_verts,
                record.num_normals,
                record.num_st
            );
        }

        w.write_all(&record.pack()?)?;
        for vertex in &mesh.vertices {
            w.write_all(&vertex.pack()?)?;
        }
        for normal in &mesh.normals {
            w.write_all(&normal.pack()?)?;
        }
        for st in &mesh.st {
            w.write_all(&st.pack()?)?;
        }

        tracing::debug!(
            "wrote mesh {:?}: {} verts, {} normals, {} st",
            mesh.name,
            record.num_verts,
            record.num_normals,
            record.num_st
        );
    }

    for material in materials {
        w.write_all(&material.pack()?)?;
        tracing::debug!("wrote material {:?}", material.name);
    }

    Ok(())
}

/// Read a complete SMD file.
///
/// The header is validated before any mesh or material record is read.
pub fn read_smd<R: Read>(r: &mut R) -> Result<SmdFile> {
    let header = SmdHeader::read_from(r)?;
    header.validate()?;
    tracing::debug!(
        "SMD v{}: {} meshes, {} materials",
        header.version,
        header.num_meshes,
        header.num_materials
    );

    // Counts are untrusted: no preallocation
    let mut meshes = Vec::new();
    for _ in 0..header.num_meshes {
        meshes.push(read_mesh(r)?);
    }

    let mut materials = Vec::new();
    for _ in 0..header.num_materials {
        materials.push(SmdMaterial::read_from(r)?);
    }

    Ok(SmdFile {
        header,
        meshes,
        materials,
    })
}

fn read_mesh<R: Read>(r: &mut R) -> Result<SmdMesh> {
    let record = SmdMeshHeader::read_from(r)?;
    let (num_verts, num_normals, num_st) = record.counts()?;

    let vertices = read_records::<_, Vertex>(r, num_verts)?;
    let normals = read_records::<_, Vertex>(r, num_normals)?;
    let st = read_records::<_, St>(r, num_st)?;

    tracing::debug!(
        "read mesh {:?}: {} verts, {} normals, {} st",
        record.name,
        num_verts,
        num_normals,
        num_st
    );

    Ok(SmdMesh {
        name: record.name,
        material_index: record.index,
        vertices,
        normals,
        st,
    })
}

fn read_records<R: Read, T: Record>(r: &mut R, count: usize) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for _ in 0..count {
        records.push(T::read_from(r)?);
    }
    Ok(records)
}
