mod image_common;
mod jpeg_codec;
mod lz4_codec;
mod numpy_codec;
mod png_codec;
pub mod registry;
mod webp_codec;
mod zstd_codec;

pub use jpeg_codec::JpegCodec;
pub use lz4_codec::Lz4Codec;
pub use numpy_codec::NumPyCodec;
pub use png_codec::PngCodec;
pub use registry::{build, get_compressor, supported_names};
pub use webp_codec::WebPCodec;
pub use zstd_codec::ZstdCodec;

use hubcodec_core::{Array, ByteCodec, Codec, CodecFamily, CodecKind, Result};

/// A constructed codec of any registered kind.
///
/// Returned by [`get_compressor`]. Implements [`Codec`] by delegating to the
/// wrapped variant; match on it to reach variant-specific accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compressor {
    Png(PngCodec),
    Jpeg(JpegCodec),
    WebP(WebPCodec),
    Lz4(Lz4Codec),
    Zstd(ZstdCodec),
    NumPy(NumPyCodec),
}

impl Compressor {
    fn inner(&self) -> &dyn Codec {
        match self {
            Compressor::Png(c) => c,
            Compressor::Jpeg(c) => c,
            Compressor::WebP(c) => c,
            Compressor::Lz4(c) => c,
            Compressor::Zstd(c) => c,
            Compressor::NumPy(c) => c,
        }
    }

    pub fn family(&self) -> CodecFamily {
        self.kind().family()
    }

    /// The raw byte-stream interface, for LZ4 and Zstd only.
    pub fn as_byte_codec(&self) -> Option<&dyn ByteCodec> {
        match self {
            Compressor::Lz4(c) => Some(c),
            Compressor::Zstd(c) => Some(c),
            _ => None,
        }
    }
}

impl Codec for Compressor {
    fn kind(&self) -> CodecKind {
        self.inner().kind()
    }

    fn compress(&self, data: &Array) -> Result<Vec<u8>> {
        self.inner().compress(data)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Array> {
        self.inner().decompress(compressed)
    }
}
