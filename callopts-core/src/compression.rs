//! Compressor names.
//!
//! A call carries only the *name* of the compressor it asks for; the
//! transport owns the codecs. [`CompressionEncoding`] lists the names the
//! Connect and gRPC transports agree on.

use std::fmt;

/// Well-known message compression encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionEncoding {
    #[default]
    Identity,
    Gzip,
    Deflate,
    Brotli,
    Zstd,
}

impl CompressionEncoding {
    /// Parse a compressor name as used in `Content-Encoding` style headers.
    ///
    /// An absent or empty name means identity. Unknown names yield `None`.
    pub fn from_name(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("identity") | Some("") => Some(Self::Identity),
            Some("gzip") => Some(Self::Gzip),
            Some("deflate") => Some(Self::Deflate),
            Some("br") => Some(Self::Brotli),
            Some("zstd") => Some(Self::Zstd),
            _ => None,
        }
    }

    /// The compressor name for this encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Brotli => "br",
            Self::Zstd => "zstd",
        }
    }

    /// Returns true if this encoding is identity (no compression).
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

impl fmt::Display for CompressionEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(
            CompressionEncoding::from_name(None),
            Some(CompressionEncoding::Identity)
        );
        assert_eq!(
            CompressionEncoding::from_name(Some("")),
            Some(CompressionEncoding::Identity)
        );
        assert_eq!(
            CompressionEncoding::from_name(Some("br")),
            Some(CompressionEncoding::Brotli)
        );
        assert_eq!(CompressionEncoding::from_name(Some("lz4")), None);
    }

    #[test]
    fn test_names_roundtrip() {
        for encoding in [
            CompressionEncoding::Identity,
            CompressionEncoding::Gzip,
            CompressionEncoding::Deflate,
            CompressionEncoding::Brotli,
            CompressionEncoding::Zstd,
        ] {
            assert_eq!(
                CompressionEncoding::from_name(Some(encoding.as_str())),
                Some(encoding)
            );
        }
        assert!(CompressionEncoding::default().is_identity());
    }
}
