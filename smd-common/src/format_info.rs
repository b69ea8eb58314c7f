//! SMD format constants.
//!
//! `SMD_FORMAT` is the single source of truth for the file extension, magic
//! tag and current version.
//!
//! ```
//! use smd_common::SMD_FORMAT;
//!
//! assert_eq!(SMD_FORMAT.extension, "smd");
//! assert_eq!(SMD_FORMAT.magic, b"SMD0");
//! assert_eq!(SMD_FORMAT.version, 1);
//! ```

/// Format specification for static model files.
#[derive(Debug, Clone, Copy)]
pub struct SmdFormat {
    /// File extension without dot
    pub extension: &'static str,

    /// Magic tag at the start of every file (4 bytes)
    pub magic: &'static [u8; 4],

    /// Version written by this crate
    pub version: i32,

    /// Width of fixed string slots (names, texture paths)
    pub name_width: usize,
}

impl SmdFormat {
    pub const fn new(
        extension: &'static str,
        magic: &'static [u8; 4],
        version: i32,
        name_width: usize,
    ) -> Self {
        Self {
            extension,
            magic,
            version,
            name_width,
        }
    }

    /// Whether a reader built against this format can decode `version`
    pub const fn supports_version(&self, version: i32) -> bool {
        version == self.version
    }

    /// Longest text (in bytes) a fixed string slot can hold
    pub const fn max_name_len(&self) -> usize {
        self.name_width - 1
    }
}

pub const SMD_FORMAT: SmdFormat = SmdFormat::new("smd", b"SMD0", 1, 64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smd_format_constants() {
        assert_eq!(SMD_FORMAT.extension, "smd");
        assert_eq!(SMD_FORMAT.magic, b"SMD0");
        assert_eq!(SMD_FORMAT.version, 1);
        assert_eq!(SMD_FORMAT.max_name_len(), 63);
    }

    #[test]
    fn test_supported_versions() {
        assert!(SMD_FORMAT.supports_version(1));
        assert!(!SMD_FORMAT.supports_version(0));
        assert!(!SMD_FORMAT.supports_version(2));
    }
}
