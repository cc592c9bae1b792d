use hubcodec_core::{npy, Array, Codec, CodecConfig, CodecError, CodecKind, Result};

/// Stores arrays as uncompressed NumPy `.npy` payloads.
///
/// Useful for:
/// - Data that is already compressed or has no redundancy to exploit.
/// - Interchange: the output loads directly with `numpy.load`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumPyCodec;

impl NumPyCodec {
    pub const NAME: &'static str = CodecKind::NumPy.name();

    pub fn from_config(config: CodecConfig) -> Result<Self> {
        match config {
            CodecConfig::Default | CodecConfig::NumPy => Ok(Self),
            other => Err(CodecError::ConfigMismatch {
                codec: Self::NAME,
                config: other.label(),
            }),
        }
    }
}

impl Codec for NumPyCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::NumPy
    }

    fn compress(&self, data: &Array) -> Result<Vec<u8>> {
        Ok(npy::to_npy(data))
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Array> {
        npy::from_npy(compressed, Self::NAME)
    }
}
