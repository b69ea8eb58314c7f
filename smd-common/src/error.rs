//! Error type shared by the struct codec and the SMD file reader/writer.

use std::io;

/// Errors raised while packing, unpacking, reading or writing SMD data.
///
/// Invalid UTF-8 inside a fixed string field is not an error: the offending
/// bytes are dropped during decoding and a warning is logged.
#[derive(Debug, thiserror::Error)]
pub enum SmdError {
    /// A record value does not match its field declaration
    #[error("{record}.{field}: {reason}")]
    Schema {
        record: &'static str,
        field: &'static str,
        reason: String,
    },

    /// Fewer bytes were available than the next record requires
    #[error("truncated {record} record: need {needed} bytes, only {available} available")]
    Truncated {
        record: &'static str,
        needed: usize,
        available: usize,
    },

    /// The header magic is not the SMD tag
    #[error("bad magic {found:?} (expected {expected:?})")]
    BadMagic { found: Vec<u8>, expected: [u8; 4] },

    /// The header carries a version this reader does not understand
    #[error("unsupported SMD version {found} (supported: {supported})")]
    UnsupportedVersion { found: i32, supported: i32 },

    /// A count field decoded to a value that cannot describe a record list
    #[error("{record}.{field} has invalid count {value}")]
    InvalidCount {
        record: &'static str,
        field: &'static str,
        value: i32,
    },

    /// Underlying stream failure other than a premature end of data
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SmdError {
    pub(crate) fn schema(
        record: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Schema {
            record,
            field,
            reason: reason.into(),
        }
    }

    /// True for [`SmdError::Truncated`]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// True for errors that mean the data is not a readable SMD file
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Self::BadMagic { .. } | Self::UnsupportedVersion { .. } | Self::InvalidCount { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SmdError>;
