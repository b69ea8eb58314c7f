//! Field declarations and per-kind encode/decode rules.

use serde::{Deserialize, Serialize};

/// Primitive layout of one field element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed 32-bit integer, little-endian
    Int32,
    /// IEEE-754 single precision float, little-endian
    Float32,
    /// NUL-terminated UTF-8 text in a fixed slot of `width` bytes
    FixedString(usize),
    /// Raw byte tag of `width` bytes, zero padded, no terminator
    Tag(usize),
}

impl FieldKind {
    /// Width of one element in bytes
    pub const fn width(self) -> usize {
        match self {
            FieldKind::Int32 | FieldKind::Float32 => 4,
            FieldKind::FixedString(width) | FieldKind::Tag(width) => width,
        }
    }
}

/// One named field of a record schema.
///
/// `count` is the repetition of the primitive: 1 for scalars, `n` for a
/// fixed-size array such as a 3-float color. Text and tag fields always
/// have a count of 1. Declarations are only built through the constructors
/// below, which reject empty arrays and zero-width slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    count: usize,
}

impl FieldSpec {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Int32,
            count: 1,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Float32,
            count: 1,
        }
    }

    pub const fn floats(name: &'static str, count: usize) -> Self {
        assert!(count > 0, "float array field needs at least one element");
        Self {
            name,
            kind: FieldKind::Float32,
            count,
        }
    }

    pub const fn ints(name: &'static str, count: usize) -> Self {
        assert!(count > 0, "int array field needs at least one element");
        Self {
            name,
            kind: FieldKind::Int32,
            count,
        }
    }

    pub const fn text(name: &'static str, width: usize) -> Self {
        assert!(width > 0, "text field needs room for its terminator");
        Self {
            name,
            kind: FieldKind::FixedString(width),
            count: 1,
        }
    }

    pub const fn tag(name: &'static str, width: usize) -> Self {
        assert!(width > 0, "tag field needs a nonzero width");
        Self {
            name,
            kind: FieldKind::Tag(width),
            count: 1,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Element count; always 1 for text and tag fields
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Encoded size of this field in bytes
    pub const fn size(&self) -> usize {
        self.kind.width() * self.count
    }
}

/// A decoded (or to-be-encoded) field value.
///
/// Scalar numeric fields use `Int`/`Float`, repeated numeric fields use
/// `Ints`/`Floats` with exactly `count` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i32),
    Ints(Vec<i32>),
    Float(f32),
    Floats(Vec<f32>),
    Text(String),
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Short shape name used in schema error messages
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Int(_) => "int",
            FieldValue::Ints(_) => "int array",
            FieldValue::Float(_) => "float",
            FieldValue::Floats(_) => "float array",
            FieldValue::Text(_) => "text",
            FieldValue::Bytes(_) => "bytes",
        }
    }
}

/// Encode text into a fixed slot, keeping room for the NUL terminator.
///
/// Text longer than `width - 1` bytes is cut at the last UTF-8 character
/// boundary that fits.
pub(crate) fn encode_fixed_string(text: &str, width: usize, out: &mut Vec<u8>) {
    let limit = width.saturating_sub(1);
    let mut end = text.len().min(limit);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    out.extend_from_slice(&text.as_bytes()[..end]);
    out.resize(out.len() + (width - end), 0);
}

/// Decode a fixed string slot: strip trailing NULs, drop invalid UTF-8.
///
/// Returns the text and whether any bytes had to be dropped.
pub(crate) fn decode_fixed_string(bytes: &[u8]) -> (String, bool) {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let mut text = String::with_capacity(end);
    let mut lossy = false;
    for chunk in bytes[..end].utf8_chunks() {
        text.push_str(chunk.valid());
        lossy |= !chunk.invalid().is_empty();
    }
    (text, lossy)
}

/// Encode a raw tag, truncating or zero padding to `width`.
pub(crate) fn encode_tag(tag: &[u8], width: usize, out: &mut Vec<u8>) {
    let end = tag.len().min(width);
    out.extend_from_slice(&tag[..end]);
    out.resize(out.len() + (width - end), 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_sizes() {
        assert_eq!(FieldSpec::int("index").size(), 4);
        assert_eq!(FieldSpec::float("x").size(), 4);
        assert_eq!(FieldSpec::floats("ambient", 3).size(), 12);
        assert_eq!(FieldSpec::text("name", 64).size(), 64);
        assert_eq!(FieldSpec::tag("magic", 4).size(), 4);
        assert_eq!(FieldSpec::ints("bones", 4).size(), 16);
    }

    #[test]
    fn test_slot_fields_are_single() {
        let text = FieldSpec::text("name", 64);
        assert_eq!(text.count(), 1);
        assert_eq!(text.size(), text.kind().width());

        let tag = FieldSpec::tag("magic", 4);
        assert_eq!(tag.count(), 1);
        assert_eq!(tag.kind(), FieldKind::Tag(4));
    }

    #[test]
    #[should_panic(expected = "at least one element")]
    fn test_empty_float_array_rejected() {
        let _ = FieldSpec::floats("none", 0);
    }

    #[test]
    #[should_panic(expected = "at least one element")]
    fn test_empty_int_array_rejected() {
        let _ = FieldSpec::ints("none", 0);
    }

    #[test]
    #[should_panic(expected = "terminator")]
    fn test_zero_width_text_rejected() {
        let _ = FieldSpec::text("name", 0);
    }

    #[test]
    #[should_panic(expected = "nonzero width")]
    fn test_zero_width_tag_rejected() {
        let _ = FieldSpec::tag("magic", 0);
    }

    #[test]
    fn test_fixed_string_pads_with_nul() {
        let mut out = Vec::new();
        encode_fixed_string("abc", 8, &mut out);
        assert_eq!(out, b"abc\0\0\0\0\0");
    }

    #[test]
    fn test_fixed_string_keeps_terminator() {
        let name = "x".repeat(63);
        let mut out = Vec::new();
        encode_fixed_string(&name, 64, &mut out);
        assert_eq!(out.len(), 64);
        assert_eq!(&out[..63], name.as_bytes());
        assert_eq!(out[63], 0);

        let long = "y".repeat(100);
        let mut out = Vec::new();
        encode_fixed_string(&long, 64, &mut out);
        assert_eq!(out.len(), 64);
        assert_eq!(&out[..63], &long.as_bytes()[..63]);
        assert_eq!(out[63], 0);
    }

    #[test]
    fn test_fixed_string_truncates_on_char_boundary() {
        // 'é' is two bytes; 4 of them do not fit in 7 text bytes
        let mut out = Vec::new();
        encode_fixed_string("éééé", 8, &mut out);
        assert_eq!(out.len(), 8);
        let (text, lossy) = decode_fixed_string(&out);
        assert_eq!(text, "ééé");
        assert!(!lossy);
    }

    #[test]
    fn test_decode_strips_trailing_nul_only() {
        let (text, lossy) = decode_fixed_string(b"ab\0cd\0\0\0");
        assert_eq!(text, "ab\0cd");
        assert!(!lossy);

        let (text, _) = decode_fixed_string(&[0u8; 16]);
        assert_eq!(text, "");
    }

    #[test]
    fn test_decode_drops_invalid_utf8() {
        let (text, lossy) = decode_fixed_string(b"te\xffst\xc3\0\0");
        assert_eq!(text, "test");
        assert!(lossy);
    }

    #[test]
    fn test_tag_encoding() {
        let mut out = Vec::new();
        encode_tag(b"SMD0", 4, &mut out);
        assert_eq!(out, b"SMD0");

        let mut out = Vec::new();
        encode_tag(b"AB", 4, &mut out);
        assert_eq!(out, b"AB\0\0");

        let mut out = Vec::new();
        encode_tag(b"TOOLONG", 4, &mut out);
        assert_eq!(out, b"TOOL");
    }
}
