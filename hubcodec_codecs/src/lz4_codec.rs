use hubcodec_core::config::Lz4Config;
use hubcodec_core::{npy, Array, ByteCodec, Codec, CodecConfig, CodecError, CodecKind, Result};
use lz4::block::{compress, decompress, CompressionMode};

/// Upper bound on how far one LZ4 block expands.
const MAX_BLOCK_RATIO: usize = 255;

/// LZ4 block codec.
///
/// Output is a single LZ4 block prefixed with the uncompressed length as a
/// 4-byte little-endian integer. Fastest decompression of the bundled codecs;
/// `acceleration` trades ratio for even faster compression.
///
/// Best for: hot chunks and low-latency random access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lz4Codec {
    config: Lz4Config,
}

impl Lz4Codec {
    pub const NAME: &'static str = CodecKind::Lz4.name();

    pub fn new(config: Lz4Config) -> Result<Self> {
        if config.acceleration < 1 {
            return Err(CodecError::InvalidArgument {
                codec: Self::NAME,
                option: "acceleration",
                value: config.acceleration.into(),
                reason: "Must be 1 or greater".into(),
            });
        }
        Ok(Self { config })
    }

    /// Build from registry options. Options tagged for another codec are rejected.
    pub fn from_config(config: CodecConfig) -> Result<Self> {
        match config {
            CodecConfig::Default => Ok(Self::default()),
            CodecConfig::Lz4(config) => Self::new(config),
            other => Err(CodecError::ConfigMismatch {
                codec: Self::NAME,
                config: other.label(),
            }),
        }
    }

    pub fn acceleration(&self) -> i32 {
        self.config.acceleration
    }
}

impl Default for Lz4Codec {
    fn default() -> Self {
        Self {
            config: Lz4Config::default(),
        }
    }
}

impl Codec for Lz4Codec {
    fn kind(&self) -> CodecKind {
        CodecKind::Lz4
    }

    fn compress(&self, data: &Array) -> Result<Vec<u8>> {
        self.compress_bytes(&npy::to_npy(data))
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Array> {
        npy::from_npy(&self.decompress_bytes(compressed)?, Self::NAME)
    }
}

impl ByteCodec for Lz4Codec {
    fn compress_bytes(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mode = CompressionMode::FAST(self.config.acceleration);
        let compressed = compress(raw, Some(mode), true)
            .map_err(|e| CodecError::encode(Self::NAME, e.to_string()))?;
        log::trace!("lz4 compressed {} -> {} bytes", raw.len(), compressed.len());
        Ok(compressed)
    }

    fn decompress_bytes(&self, compressed: &[u8]) -> Result<Vec<u8>> {
        let Some(prefix) = compressed.first_chunk::<4>() else {
            return Err(CodecError::decode(Self::NAME, "missing size prefix"));
        };
        let claimed = i32::from_le_bytes(*prefix);
        let limit = compressed.len().saturating_mul(MAX_BLOCK_RATIO);
        if claimed < 0 || (claimed as usize) > limit {
            return Err(CodecError::decode(
                Self::NAME,
                format!(
                    "size prefix claims {claimed} bytes, more than {} compressed bytes can hold",
                    compressed.len()
                ),
            ));
        }
        decompress(compressed, None).map_err(|e| CodecError::decode(Self::NAME, e.to_string()))
    }
}
