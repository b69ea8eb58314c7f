//! Struct codec: fixed-layout binary records.
//!
//! A [`RecordSchema`] is a static, ordered list of [`FieldSpec`]s. Typed
//! records implement [`Record`] to convert to and from the schema's
//! [`FieldValue`] list, which gives them `pack`, `unpack` and `read_from`.
//!
//! # Example
//!
//! ```
//! use smd_common::codec::{FieldSpec, FieldValue, RecordSchema};
//!
//! const PAIR_FIELDS: &[FieldSpec] = &[FieldSpec::int("a"), FieldSpec::float("b")];
//! const PAIR: RecordSchema = RecordSchema::new("Pair", PAIR_FIELDS);
//!
//! let bytes = PAIR.pack(&[FieldValue::Int(1), FieldValue::Float(2.0)]).unwrap();
//! assert_eq!(bytes.len(), PAIR.size());
//! assert_eq!(PAIR.unpack(&bytes).unwrap()[0], FieldValue::Int(1));
//! ```

mod field;
mod schema;

pub use field::{FieldKind, FieldSpec, FieldValue};
pub use schema::RecordSchema;

use std::io::{ErrorKind, Read};

use crate::error::{Result, SmdError};

/// A strongly-typed record bound to a static schema.
pub trait Record: Sized {
    const SCHEMA: RecordSchema;

    /// Field values in schema order
    fn to_values(&self) -> Vec<FieldValue>;

    /// Build the record from values produced by [`RecordSchema::unpack`]
    fn from_values(values: Vec<FieldValue>) -> Result<Self>;

    /// Encoded size in bytes
    fn size() -> usize {
        Self::SCHEMA.size()
    }

    fn pack(&self) -> Result<Vec<u8>> {
        Self::SCHEMA.pack(&self.to_values())
    }

    fn unpack(bytes: &[u8]) -> Result<Self> {
        Self::from_values(Self::SCHEMA.unpack(bytes)?)
    }

    /// Read exactly one record from a stream.
    ///
    /// A stream that ends early yields [`SmdError::Truncated`].
    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = vec![0u8; Self::size()];
        let filled = read_full(reader, &mut buf)?;
        if filled < buf.len() {
            return Err(SmdError::Truncated {
                record: Self::SCHEMA.name,
                needed: buf.len(),
                available: filled,
            });
        }
        Self::unpack(&buf)
    }
}

/// Fill `buf` from `reader`, returning how many bytes were read before EOF.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Consumes decoded values in schema order while building a typed record.
pub struct FieldReader {
    schema: RecordSchema,
    values: std::vec::IntoIter<FieldValue>,
    index: usize,
}

impl FieldReader {
    pub fn new(schema: RecordSchema, values: Vec<FieldValue>) -> Self {
        Self {
            schema,
            values: values.into_iter(),
            index: 0,
        }
    }

    fn next(&mut self) -> Result<(&'static str, FieldValue)> {
        let name = self
            .schema
            .fields
            .get(self.index)
            .map_or("*", |spec| spec.name());
        self.index += 1;
        let value = self
            .values
            .next()
            .ok_or_else(|| SmdError::schema(self.schema.name, name, "missing value"))?;
        Ok((name, value))
    }

    fn mismatch(&self, field: &'static str, expected: &str, got: &FieldValue) -> SmdError {
        SmdError::schema(
            self.schema.name,
            field,
            format!("expected {}, got {}", expected, got.shape()),
        )
    }

    pub fn int(&mut self) -> Result<i32> {
        match self.next()? {
            (_, FieldValue::Int(v)) => Ok(v),
            (name, other) => Err(self.mismatch(name, "int", &other)),
        }
    }

    pub fn float(&mut self) -> Result<f32> {
        match self.next()? {
            (_, FieldValue::Float(v)) => Ok(v),
            (name, other) => Err(self.mismatch(name, "float", &other)),
        }
    }

    pub fn floats<const N: usize>(&mut self) -> Result<[f32; N]> {
        match self.next()? {
            (name, FieldValue::Floats(vs)) => {
                let len = vs.len();
                vs.try_into().map_err(|_| {
                    SmdError::schema(
                        self.schema.name,
                        name,
                        format!("expected {} floats, got {}", N, len),
                    )
                })
            }
            (name, other) => Err(self.mismatch(name, "float array", &other)),
        }
    }

    pub fn text(&mut self) -> Result<String> {
        match self.next()? {
            (_, FieldValue::Text(v)) => Ok(v),
            (name, other) => Err(self.mismatch(name, "text", &other)),
        }
    }

    pub fn bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        match self.next()? {
            (name, FieldValue::Bytes(vs)) => {
                let len = vs.len();
                vs.try_into().map_err(|_| {
                    SmdError::schema(
                        self.schema.name,
                        name,
                        format!("expected {} bytes, got {}", N, len),
                    )
                })
            }
            (name, other) => Err(self.mismatch(name, "bytes", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Debug, PartialEq)]
    struct Probe {
        id: i32,
        scale: [f32; 2],
        label: String,
    }

    const PROBE_FIELDS: &[FieldSpec] = &[
        FieldSpec::int("id"),
        FieldSpec::floats("scale", 2),
        FieldSpec::text("label", 8),
    ];

    impl Record for Probe {
        const SCHEMA: RecordSchema = RecordSchema::new("Probe", PROBE_FIELDS);

        fn to_values(&self) -> Vec<FieldValue> {
            vec![
                FieldValue::Int(self.id),
                FieldValue::Floats(self.scale.to_vec()),
                FieldValue::Text(self.label.clone()),
            ]
        }

        fn from_values(values: Vec<FieldValue>) -> Result<Self> {
            let mut r = FieldReader::new(Self::SCHEMA, values);
            Ok(Self {
                id: r.int()?,
                scale: r.floats()?,
                label: r.text()?,
            })
        }
    }

    fn probe() -> Probe {
        Probe {
            id: 9,
            scale: [1.5, -2.0],
            label: "probe".into(),
        }
    }

    #[test]
    fn test_record_roundtrip() {
        let bytes = probe().pack().unwrap();
        assert_eq!(bytes.len(), Probe::size());
        assert_eq!(Probe::unpack(&bytes).unwrap(), probe());
    }

    #[test]
    fn test_read_from_stream() {
        let mut data = probe().pack().unwrap();
        data.extend(probe().pack().unwrap());
        let mut cursor = Cursor::new(data);
        assert_eq!(Probe::read_from(&mut cursor).unwrap(), probe());
        assert_eq!(Probe::read_from(&mut cursor).unwrap(), probe());

        let err = Probe::read_from(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            SmdError::Truncated {
                record: "Probe",
                available: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_read_from_short_stream() {
        let data = probe().pack().unwrap();
        let mut cursor = Cursor::new(&data[..7]);
        let err = Probe::read_from(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            SmdError::Truncated {
                needed: 20,
                available: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_field_reader_mismatch() {
        let values = vec![
            FieldValue::Text("x".into()),
            FieldValue::Floats(vec![1.0, 2.0]),
            FieldValue::Text("y".into()),
        ];
        let err = Probe::from_values(values).unwrap_err();
        assert!(matches!(err, SmdError::Schema { field: "id", .. }));
    }

    #[test]
    fn test_field_reader_missing_value() {
        let values = vec![FieldValue::Int(1)];
        let err = Probe::from_values(values).unwrap_err();
        assert!(matches!(err, SmdError::Schema { field: "scale", .. }));
    }
}
