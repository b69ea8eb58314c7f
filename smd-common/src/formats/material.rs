//! Material record (232 bytes)
//!
//! # Layout
//! ```text
//! 0x000: name [u8; 64]
//! 0x040: spec_exp f32
//! 0x044: ambient [f32; 3]
//! 0x050: diffuse [f32; 3]
//! 0x05C: specular [f32; 3]
//! 0x068: diffuse_texture [u8; 64] (empty if none)
//! 0x0A8: normal_texture [u8; 64] (empty if none)
//! ```

use serde::{Deserialize, Serialize};

use super::NAME_WIDTH;
use crate::codec::{FieldReader, FieldSpec, FieldValue, Record, RecordSchema};
use crate::error::Result;

const MATERIAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", NAME_WIDTH),
    FieldSpec::float("spec_exp"),
    FieldSpec::floats("ambient", 3),
    FieldSpec::floats("diffuse", 3),
    FieldSpec::floats("specular", 3),
    FieldSpec::text("diffuse_texture", NAME_WIDTH),
    FieldSpec::text("normal_texture", NAME_WIDTH),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmdMaterial {
    pub name: String,
    /// Specular exponent (the exporter stores roughness here)
    pub spec_exp: f32,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    #[serde(default)]
    pub diffuse_texture: String,
    #[serde(default)]
    pub normal_texture: String,
}

impl SmdMaterial {
    pub const SIZE: usize = 232;

    /// Untextured white material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec_exp: 0.5,
            ambient: [1.0; 3],
            diffuse: [1.0; 3],
            specular: [0.0; 3],
            diffuse_texture: String::new(),
            normal_texture: String::new(),
        }
    }
}

impl Record for SmdMaterial {
    const SCHEMA: RecordSchema = RecordSchema::new("Material", MATERIAL_FIELDS);

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name.clone()),
            FieldValue::Float(self.spec_exp),
            FieldValue::Floats(self.ambient.to_vec()),
            FieldValue::Floats(self.diffuse.to_vec()),
            FieldValue::Floats(self.specular.to_vec()),
            FieldValue::Text(self.diffuse_texture.clone()),
            FieldValue::Text(self.normal_texture.clone()),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new(Self::SCHEMA, values);
        Ok(Self {
            name: r.text()?,
            spec_exp: r.float()?,
            ambient: r.floats()?,
            diffuse: r.floats()?,
            specular: r.floats()?,
            diffuse_texture: r.text()?,
            normal_texture: r.text()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_material() -> SmdMaterial {
        SmdMaterial {
            name: "material-root".into(),
            spec_exp: 0.5,
            ambient: [0.5; 3],
            diffuse: [1.0; 3],
            specular: [0.1; 3],
            diffuse_texture: "texture/material-root-diff.tga".into(),
            normal_texture: "texture/material-root-bump.tga".into(),
        }
    }

    #[test]
    fn test_material_size() {
        assert_eq!(SmdMaterial::SCHEMA.size(), SmdMaterial::SIZE);
        assert_eq!(SmdMaterial::SIZE, 64 + 4 + 3 * 12 + 2 * 64);
    }

    #[test]
    fn test_material_roundtrip() {
        let material = root_material();
        let bytes = material.pack().unwrap();
        assert_eq!(bytes.len(), SmdMaterial::SIZE);
        assert_eq!(SmdMaterial::unpack(&bytes).unwrap(), material);
    }

    #[test]
    fn test_material_field_offsets() {
        let bytes = root_material().pack().unwrap();
        assert_eq!(&bytes[..13], b"material-root");
        assert_eq!(&bytes[64..68], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[68..72], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[80..84], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[92..96], &0.1f32.to_le_bytes());
        assert_eq!(&bytes[104..134], b"texture/material-root-diff.tga");
        assert_eq!(&bytes[168..198], b"texture/material-root-bump.tga");
    }

    #[test]
    fn test_material_without_textures() {
        let material = SmdMaterial::new("plain");
        let parsed = SmdMaterial::unpack(&material.pack().unwrap()).unwrap();
        assert_eq!(parsed.diffuse_texture, "");
        assert_eq!(parsed.normal_texture, "");
    }

    #[test]
    fn test_material_lossy_name() {
        let mut bytes = SmdMaterial::new("ok").pack().unwrap();
        bytes[2] = 0xFF;
        bytes[3] = b'!';
        let parsed = SmdMaterial::unpack(&bytes).unwrap();
        assert_eq!(parsed.name, "ok!");
    }
}
