//! Build manifest (`smd.toml`)
//!
//! ```toml
//! output = "build/level.smd"
//!
//! [[mesh]]
//! name = "crate"
//! source = "meshes/crate.obj"
//! material = "wood"
//!
//! [[material]]
//! name = "wood"
//! diffuse = [0.8, 0.6, 0.4]
//! diffuse_texture = "texture/wood-diff.tga"
//! ```
//!
//! Mesh sources are resolved relative to the manifest's directory. Each
//! mesh's `material` name becomes its 1-based index into the material list.

use anyhow::{Context, Result, bail};
use hashbrown::HashMap;
use serde::Deserialize;
use smd_common::{SMD_FORMAT, SmdMaterial, SmdMesh, write_smd};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::obj::{check_scale, load_obj};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Output `.smd` path, relative to the manifest
    pub output: PathBuf,

    #[serde(default, rename = "mesh")]
    pub meshes: Vec<MeshEntry>,

    #[serde(default, rename = "material")]
    pub materials: Vec<MaterialEntry>,

    /// Directory the manifest was loaded from
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshEntry {
    pub name: String,
    pub source: PathBuf,
    pub material: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialEntry {
    pub name: String,
    #[serde(default = "default_spec_exp")]
    pub spec_exp: f32,
    #[serde(default = "default_white")]
    pub ambient: [f32; 3],
    #[serde(default = "default_white")]
    pub diffuse: [f32; 3],
    #[serde(default)]
    pub specular: [f32; 3],
    #[serde(default)]
    pub diffuse_texture: String,
    #[serde(default)]
    pub normal_texture: String,
}

fn default_scale() -> f32 {
    1.0
}

fn default_spec_exp() -> f32 {
    0.5
}

fn default_white() -> [f32; 3] {
    [1.0; 3]
}

impl From<&MaterialEntry> for SmdMaterial {
    fn from(entry: &MaterialEntry) -> Self {
        SmdMaterial {
            name: entry.name.clone(),
            spec_exp: entry.spec_exp,
            ambient: entry.ambient,
            diffuse: entry.diffuse,
            specular: entry.specular,
            diffuse_texture: entry.diffuse_texture.clone(),
            normal_texture: entry.normal_texture.clone(),
        }
    }
}

impl Manifest {
    /// Parse manifest text; `base_dir` anchors relative paths
    pub fn parse(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(text).context("Invalid manifest")?;
        manifest.base_dir = base_dir.into();
        Ok(manifest)
    }

    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(&self.output)
    }

    /// Material name -> 1-based index
    fn material_indices(&self) -> HashMap<&str, i32> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.as_str(), i as i32 + 1))
            .collect()
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
    Manifest::parse(&text, base_dir).with_context(|| format!("In manifest {:?}", path))
}

/// Check names, references and slot widths without touching mesh sources
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.meshes.is_empty() {
        bail!("Manifest declares no meshes");
    }

    let max_len = SMD_FORMAT.max_name_len();
    let mut seen = HashMap::new();
    for (i, material) in manifest.materials.iter().enumerate() {
        if let Some(first) = seen.insert(material.name.as_str(), i) {
            bail!(
                "Material {:?} declared twice (entries {} and {})",
                material.name,
                first + 1,
                i + 1
            );
        }
        for (field, text) in [
            ("name", &material.name),
            ("diffuse_texture", &material.diffuse_texture),
            ("normal_texture", &material.normal_texture),
        ] {
            if text.len() > max_len {
                tracing::warn!(
                    "material {:?}: {} is {} bytes and will be truncated to {}",
                    material.name,
                    field,
                    text.len(),
                    max_len
                );
            }
        }
    }

    let indices = manifest.material_indices();
    for mesh in &manifest.meshes {
        if !indices.contains_key(mesh.material.as_str()) {
            bail!(
                "Mesh {:?} references unknown material {:?}",
                mesh.name,
                mesh.material
            );
        }
        check_scale(mesh.scale).with_context(|| format!("Mesh {:?}", mesh.name))?;
        if mesh.name.len() > max_len {
            tracing::warn!(
                "mesh name {:?} is {} bytes and will be truncated to {}",
                mesh.name,
                mesh.name.len(),
                max_len
            );
        }
    }

    Ok(())
}

/// Load every mesh source and resolve material references
pub fn collect(manifest: &Manifest) -> Result<(Vec<SmdMesh>, Vec<SmdMaterial>)> {
    validate(manifest)?;
    let indices = manifest.material_indices();

    let meshes = manifest
        .meshes
        .iter()
        .map(|entry| {
            let index = indices[entry.material.as_str()];
            let source = manifest.base_dir.join(&entry.source);
            load_obj(&source, &entry.name, index, entry.scale)
                .with_context(|| format!("Mesh {:?}", entry.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let materials = manifest.materials.iter().map(SmdMaterial::from).collect();
    Ok((meshes, materials))
}

/// Build the manifest's `.smd`, returning the path written
pub fn build(manifest: &Manifest, output_override: Option<&Path>) -> Result<PathBuf> {
    let (meshes, materials) = collect(manifest)?;
    let output = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest.output_path());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }

    let file =
        File::create(&output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_smd(&mut writer, &meshes, &materials)
        .with_context(|| format!("Failed to write {:?}", output))?;
    writer.flush()?;

    tracing::info!(
        "Wrote {:?}: {} meshes, {} materials",
        output,
        meshes.len(),
        materials.len()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
output = "out/level.smd"

[[mesh]]
name = "floor"
source = "floor.obj"
material = "stone"

[[mesh]]
name = "crate"
source = "crate.obj"
material = "wood"
scale = 0.5

[[material]]
name = "wood"
diffuse = [0.8, 0.6, 0.4]
diffuse_texture = "texture/wood-diff.tga"

[[material]]
name = "stone"
spec_exp = 0.9
specular = [0.2, 0.2, 0.2]
"#;

    #[test]
    fn test_parse_manifest_defaults() {
        let manifest = Manifest::parse(MANIFEST, "assets").unwrap();
        assert_eq!(manifest.output_path(), Path::new("assets/out/level.smd"));
        assert_eq!(manifest.meshes.len(), 2);
        assert_eq!(manifest.meshes[0].scale, 1.0);
        assert_eq!(manifest.meshes[1].scale, 0.5);

        let wood = SmdMaterial::from(&manifest.materials[0]);
        assert_eq!(wood.spec_exp, 0.5);
        assert_eq!(wood.ambient, [1.0; 3]);
        assert_eq!(wood.specular, [0.0; 3]);
        assert_eq!(wood.normal_texture, "");
        assert!(validate(&manifest).is_ok());
    }

    #[test]
    fn test_material_indices_are_one_based() {
        let manifest = Manifest::parse(MANIFEST, "").unwrap();
        let indices = manifest.material_indices();
        assert_eq!(indices["wood"], 1);
        assert_eq!(indices["stone"], 2);
    }

    #[test]
    fn test_unknown_material_rejected() {
        let text = MANIFEST.replace("material = \"wood\"", "material = \"glass\"");
        let manifest = Manifest::parse(&text, "").unwrap();
        let err = validate(&manifest).unwrap_err();
        assert!(err.to_string().contains("unknown material"));
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let text = MANIFEST.replace("name = \"stone\"", "name = \"wood\"");
        let manifest = Manifest::parse(&text, "").unwrap();
        // The "floor" mesh now references a missing name, but duplicates are checked first
        let err = validate(&manifest).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let text = MANIFEST.replace("scale = 0.5", "scale = -0.5");
        let manifest = Manifest::parse(&text, "").unwrap();
        let err = validate(&manifest).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("crate"), "{}", message);
        assert!(message.contains("invalid scale"), "{}", message);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = format!("{}\nbogus = 1\n", "output = \"a.smd\"");
        assert!(Manifest::parse(&text, "").is_err());
    }

    #[test]
    fn test_build_from_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let tri = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        std::fs::write(dir.path().join("floor.obj"), tri).unwrap();
        std::fs::write(dir.path().join("crate.obj"), tri).unwrap();

        let manifest = Manifest::parse(MANIFEST, dir.path()).unwrap();
        let output = build(&manifest, None).unwrap();
        assert_eq!(output, dir.path().join("out/level.smd"));

        let bytes = std::fs::read(&output).unwrap();
        let file = smd_common::SmdFile::from_bytes(&bytes).unwrap();
        assert_eq!(file.header.num_meshes, 2);
        assert_eq!(file.header.num_materials, 2);
        assert_eq!(file.meshes[0].name, "floor");
        assert_eq!(file.meshes[0].material_index, 2);
        assert_eq!(file.meshes[1].material_index, 1);
        assert_eq!(file.meshes[1].vertices[1].x, 0.5);
        assert_eq!(file.material_for(&file.meshes[0]).unwrap().name, "stone");
    }

    #[test]
    fn test_build_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::parse(MANIFEST, dir.path()).unwrap();
        let err = build(&manifest, None).unwrap_err();
        assert!(format!("{:#}", err).contains("floor"));
    }
}
