//! Per-loop attribute records.
//!
//! `Vertex` (12 bytes) carries both positions and normals; `St` (8 bytes)
//! carries one texture coordinate pair.

use serde::{Deserialize, Serialize};

use crate::codec::{FieldReader, FieldSpec, FieldValue, Record, RecordSchema};
use crate::error::Result;

const VERTEX_FIELDS: &[FieldSpec] = &[
    FieldSpec::float("x"),
    FieldSpec::float("y"),
    FieldSpec::float("z"),
];

const ST_FIELDS: &[FieldSpec] = &[FieldSpec::float("u"), FieldSpec::float("v")];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vertex {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vertex> for [f32; 3] {
    fn from(v: Vertex) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Record for Vertex {
    const SCHEMA: RecordSchema = RecordSchema::new("Vertex", VERTEX_FIELDS);

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Float(self.x),
            FieldValue::Float(self.y),
            FieldValue::Float(self.z),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new(Self::SCHEMA, values);
        Ok(Self {
            x: r.float()?,
            y: r.float()?,
            z: r.float()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct St {
    pub u: f32,
    pub v: f32,
}

impl St {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

impl From<[f32; 2]> for St {
    fn from([u, v]: [f32; 2]) -> Self {
        Self { u, v }
    }
}

impl Record for St {
    const SCHEMA: RecordSchema = RecordSchema::new("ST", ST_FIELDS);

    fn to_values(&self) -> Vec<FieldValue> {
        vec![FieldValue::Float(self.u), FieldValue::Float(self.v)]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self> {
        let mut r = FieldReader::new(Self::SCHEMA, values);
        Ok(Self {
            u: r.float()?,
            v: r.float()?,
        })
    }
}
