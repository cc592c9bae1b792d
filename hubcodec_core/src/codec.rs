use std::fmt;

use crate::array::Array;
use crate::error::Result;

/// Broad class of data a codec is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecFamily {
    /// 8-bit images (PNG, JPEG, WebP). May be lossy.
    Image,
    /// General-purpose byte-stream compressors (LZ4, Zstd).
    Bytes,
    /// Uncompressed array serialization (NumPy `.npy`).
    Array,
}

impl fmt::Display for CodecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecFamily::Image => "image",
            CodecFamily::Bytes => "bytes",
            CodecFamily::Array => "array",
        })
    }
}

/// Every codec variant the registry knows about.
///
/// Identifiers are hand-maintained constants. `ALL` is the registry table:
/// adding a variant here is what makes it resolvable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Png,
    Jpeg,
    WebP,
    Lz4,
    Zstd,
    NumPy,
}

impl CodecKind {
    pub const ALL: [CodecKind; 6] = [
        CodecKind::Png,
        CodecKind::Jpeg,
        CodecKind::WebP,
        CodecKind::Lz4,
        CodecKind::Zstd,
        CodecKind::NumPy,
    ];

    /// Registered lowercase identifier.
    pub const fn name(self) -> &'static str {
        match self {
            CodecKind::Png => "png",
            CodecKind::Jpeg => "jpeg",
            CodecKind::WebP => "webp",
            CodecKind::Lz4 => "lz4",
            CodecKind::Zstd => "zstd",
            CodecKind::NumPy => "numpy",
        }
    }

    pub const fn family(self) -> CodecFamily {
        match self {
            CodecKind::Png | CodecKind::Jpeg | CodecKind::WebP => CodecFamily::Image,
            CodecKind::Lz4 | CodecKind::Zstd => CodecFamily::Bytes,
            CodecKind::NumPy => CodecFamily::Array,
        }
    }

    /// Exact, case-sensitive lookup of a registered identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Registered identifiers in table order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.name()).collect()
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Core compression abstraction.
///
/// Each `Codec` implementation:
/// - Is identified by a stable [`CodecKind`] whose name is the registry key.
/// - Carries its configuration from construction on; nothing is mutated by
///   `compress` or `decompress`, so one instance may serve many threads.
/// - Encodes a whole [`Array`] into a self-describing byte buffer: the dtype
///   and shape needed to rebuild the array travel inside the output.
pub trait Codec: Send + Sync {
    fn kind(&self) -> CodecKind;

    /// Registered identifier, for display.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Encode `data` into compressed bytes.
    fn compress(&self, data: &Array) -> Result<Vec<u8>>;

    /// Rebuild an array from bytes produced by [`Codec::compress`].
    ///
    /// Lossy codecs guarantee the shape and dtype, not the exact values.
    fn decompress(&self, compressed: &[u8]) -> Result<Array>;
}

/// Byte-stream codecs additionally compress raw buffers with no array framing.
///
/// `decompress_bytes(compress_bytes(x)) == x` for every input.
pub trait ByteCodec: Codec {
    fn compress_bytes(&self, raw: &[u8]) -> Result<Vec<u8>>;

    fn decompress_bytes(&self, compressed: &[u8]) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_lowercase() {
        let names = CodecKind::names();
        for (i, name) in names.iter().enumerate() {
            assert_eq!(*name, name.to_lowercase());
            assert!(!names[i + 1..].contains(name), "duplicate name {name}");
        }
    }

    #[test]
    fn from_name_is_exact() {
        for kind in CodecKind::ALL {
            assert_eq!(CodecKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CodecKind::from_name("LZ4"), None);
        assert_eq!(CodecKind::from_name(" lz4"), None);
        assert_eq!(CodecKind::from_name(""), None);
    }
}
