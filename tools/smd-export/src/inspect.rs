//! Reading and summarizing existing `.smd` files

use anyhow::{Context, Result};
use smd_common::{SmdFile, read_smd};
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn load_smd(path: &Path) -> Result<SmdFile> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut reader = BufReader::new(file);
    read_smd(&mut reader).with_context(|| format!("Failed to read SMD file {:?}", path))
}

/// Human-readable summary of a decoded file
pub fn summarize(file: &SmdFile) -> String {
    let mut out = String::new();
    let header = &file.header;
    let _ = writeln!(
        out,
        "{} v{}: {} meshes, {} materials, {} bytes",
        String::from_utf8_lossy(&header.magic),
        header.version,
        header.num_meshes,
        header.num_materials,
        file.byte_size()
    );

    for (i, mesh) in file.meshes.iter().enumerate() {
        let material = file
            .material_for(mesh)
            .map_or("<missing>", |m| m.name.as_str());
        let _ = writeln!(
            out,
            "  mesh {} {:?}: material {} ({}), {} verts, {} normals, {} st",
            i,
            mesh.name,
            mesh.material_index,
            material,
            mesh.vertices.len(),
            mesh.normals.len(),
            mesh.st.len()
        );
    }

    for (i, material) in file.materials.iter().enumerate() {
        let _ = writeln!(
            out,
            "  material {} {:?}: spec_exp {}, diffuse {:?}, diffuse_texture {:?}, normal_texture {:?}",
            i + 1,
            material.name,
            material.spec_exp,
            material.diffuse,
            material.diffuse_texture,
            material.normal_texture
        );
    }

    out
}

/// Pretty JSON view of a decoded file
pub fn to_json(file: &SmdFile) -> Result<String> {
    serde_json::to_string_pretty(file).context("Failed to serialize SMD file as JSON")
}
