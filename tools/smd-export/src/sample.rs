//! Reference model: one textured mesh with one material

use anyhow::{Context, Result};
use smd_common::{SmdFile, SmdMaterial, SmdMesh, St, Vertex};
use std::path::Path;

pub fn sample_mesh() -> SmdMesh {
    SmdMesh {
        name: "mesh-root".into(),
        material_index: 1,
        vertices: vec![Vertex::new(1.1, 1.1, 1.1); 4],
        normals: vec![Vertex::new(0.5, 0.5, 0.5); 4],
        st: vec![St::new(0.0, 0.0); 4],
    }
}

pub fn sample_material() -> SmdMaterial {
    SmdMaterial {
        name: "material-root".into(),
        spec_exp: 0.5,
        ambient: [0.5, 0.5, 0.5],
        diffuse: [1.0, 1.0, 1.0],
        specular: [0.1, 0.1, 0.1],
        diffuse_texture: "texture/material-root-diff.tga".into(),
        normal_texture: "texture/material-root-bump.tga".into(),
    }
}

pub fn sample_file() -> Result<SmdFile> {
    Ok(SmdFile::new(vec![sample_mesh()], vec![sample_material()])?)
}

pub fn write_sample(output: &Path) -> Result<()> {
    let bytes = sample_file()?.to_bytes()?;
    std::fs::write(output, &bytes).with_context(|| format!("Failed to write {:?}", output))?;
    tracing::info!("Wrote sample model to {:?} ({} bytes)", output, bytes.len());
    Ok(())
}
