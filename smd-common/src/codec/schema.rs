//! Record schemas: ordered field lists with pack/unpack.

use super::field::{
    FieldKind, FieldSpec, FieldValue, decode_fixed_string, encode_fixed_string, encode_tag,
};
use crate::error::{Result, SmdError};

/// Fixed binary layout of one record type.
///
/// Fields are laid out in declaration order with no padding between them.
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    /// Total encoded size in bytes
    pub const fn size(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].size();
            i += 1;
        }
        total
    }

    /// Look up a field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Encode one value per declared field, in declaration order.
    ///
    /// The output is always exactly [`RecordSchema::size`] bytes. Text longer
    /// than its slot is truncated; every other mismatch is a schema error.
    pub fn pack(&self, values: &[FieldValue]) -> Result<Vec<u8>> {
        if values.len() > self.fields.len() {
            return Err(SmdError::schema(
                self.name,
                "*",
                format!(
                    "{} values given for {} fields",
                    values.len(),
                    self.fields.len()
                ),
            ));
        }

        let mut out = Vec::with_capacity(self.size());
        for (i, spec) in self.fields.iter().enumerate() {
            let value = values
                .get(i)
                .ok_or_else(|| SmdError::schema(self.name, spec.name(), "missing value"))?;
            self.pack_field(spec, value, &mut out)?;
        }

        debug_assert_eq!(out.len(), self.size());
        Ok(out)
    }

    fn pack_field(&self, spec: &FieldSpec, value: &FieldValue, out: &mut Vec<u8>) -> Result<()> {
        let mismatch = || {
            SmdError::schema(
                self.name,
                spec.name(),
                format!(
                    "expected {} x{}, got {}",
                    kind_name(spec.kind()),
                    spec.count(),
                    value.shape()
                ),
            )
        };
        let check_len = |len: usize| {
            if len == spec.count() {
                Ok(())
            } else {
                Err(SmdError::schema(
                    self.name,
                    spec.name(),
                    format!("expected {} elements, got {}", spec.count(), len),
                ))
            }
        };

        match (spec.kind(), value) {
            (FieldKind::Int32, FieldValue::Int(v)) if spec.count() == 1 => {
                out.extend_from_slice(&v.to_le_bytes());
            }
            (FieldKind::Int32, FieldValue::Ints(vs)) if spec.count() > 1 => {
                check_len(vs.len())?;
                for v in vs {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
            (FieldKind::Float32, FieldValue::Float(v)) if spec.count() == 1 => {
                out.extend_from_slice(&v.to_le_bytes());
            }
            (FieldKind::Float32, FieldValue::Floats(vs)) if spec.count() > 1 => {
                check_len(vs.len())?;
                for v in vs {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
            (FieldKind::FixedString(width), FieldValue::Text(text)) => {
                if text.len() >= width {
                    tracing::debug!(
                        "{}.{}: truncating {} bytes of text to fit {}-byte slot",
                        self.name,
                        spec.name(),
                        text.len(),
                        width
                    );
                }
                encode_fixed_string(text, width, out);
            }
            (FieldKind::Tag(width), FieldValue::Bytes(bytes)) => {
                encode_tag(bytes, width, out);
            }
            (FieldKind::Tag(width), FieldValue::Text(text)) => {
                encode_tag(text.as_bytes(), width, out);
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Decode a record from the start of `bytes`
    pub fn unpack(&self, bytes: &[u8]) -> Result<Vec<FieldValue>> {
        self.unpack_at(bytes, 0)
    }

    /// Decode a record starting at `offset` within a larger buffer
    pub fn unpack_at(&self, bytes: &[u8], offset: usize) -> Result<Vec<FieldValue>> {
        let size = self.size();
        let available = bytes.len().saturating_sub(offset);
        if available < size {
            return Err(SmdError::Truncated {
                record: self.name,
                needed: size,
                available,
            });
        }

        let mut pos = offset;
        let mut values = Vec::with_capacity(self.fields.len());
        for spec in self.fields {
            let raw = &bytes[pos..pos + spec.size()];
            pos += spec.size();
            values.push(self.unpack_field(spec, raw));
        }
        Ok(values)
    }

    fn unpack_field(&self, spec: &FieldSpec, raw: &[u8]) -> FieldValue {
        match spec.kind() {
            FieldKind::Int32 => {
                let mut ints = raw.chunks_exact(4).map(|c| i32::from_le_bytes(word(c)));
                if spec.count() == 1 {
                    FieldValue::Int(ints.next().unwrap_or_default())
                } else {
                    FieldValue::Ints(ints.collect())
                }
            }
            FieldKind::Float32 => {
                let mut floats = raw.chunks_exact(4).map(|c| f32::from_le_bytes(word(c)));
                if spec.count() == 1 {
                    FieldValue::Float(floats.next().unwrap_or_default())
                } else {
                    FieldValue::Floats(floats.collect())
                }
            }
            FieldKind::FixedString(_) => {
                let (text, lossy) = decode_fixed_string(raw);
                if lossy {
                    tracing::warn!(
                        "{}.{}: dropped invalid UTF-8 bytes, decoded as {:?}",
                        self.name,
                        spec.name(),
                        text
                    );
                }
                FieldValue::Text(text)
            }
            FieldKind::Tag(_) => FieldValue::Bytes(raw.to_vec()),
        }
    }
}

fn word(chunk: &[u8]) -> [u8; 4] {
    [chunk[0], chunk[1], chunk[2], chunk[3]]
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Int32 => "int32",
        FieldKind::Float32 => "float32",
        FieldKind::FixedString(_) => "fixed string",
        FieldKind::Tag(_) => "tag",
    }
}
