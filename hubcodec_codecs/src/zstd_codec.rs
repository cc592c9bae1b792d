use hubcodec_core::config::{ZstdConfig, ZSTD_LEVELS};
use hubcodec_core::{npy, Array, ByteCodec, Codec, CodecConfig, CodecError, CodecKind, Result};

/// Zstandard codec.
///
/// Each call produces one independent zstd frame at the configured level
/// (default: 3). The frame records its content size, so no extra length
/// prefix is needed.
///
/// Best for: general numeric arrays, text, mixed structured data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZstdCodec {
    config: ZstdConfig,
}

impl ZstdCodec {
    pub const NAME: &'static str = CodecKind::Zstd.name();

    pub fn new(config: ZstdConfig) -> Result<Self> {
        if !ZSTD_LEVELS.contains(&config.level) {
            return Err(CodecError::InvalidArgument {
                codec: Self::NAME,
                option: "level",
                value: config.level.into(),
                reason: format!(
                    "Must be between {} and {}",
                    ZSTD_LEVELS.start(),
                    ZSTD_LEVELS.end()
                )
                .into(),
            });
        }
        Ok(Self { config })
    }

    pub fn from_config(config: CodecConfig) -> Result<Self> {
        match config {
            CodecConfig::Default => Ok(Self::default()),
            CodecConfig::Zstd(config) => Self::new(config),
            other => Err(CodecError::ConfigMismatch {
                codec: Self::NAME,
                config: other.label(),
            }),
        }
    }

    pub fn level(&self) -> i32 {
        self.config.level
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self {
            config: ZstdConfig::default(),
        }
    }
}

impl Codec for ZstdCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Zstd
    }

    fn compress(&self, data: &Array) -> Result<Vec<u8>> {
        self.compress_bytes(&npy::to_npy(data))
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Array> {
        npy::from_npy(&self.decompress_bytes(compressed)?, Self::NAME)
    }
}

impl ByteCodec for ZstdCodec {
    fn compress_bytes(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let compressed = zstd::bulk::compress(raw, self.config.level)
            .map_err(|e| CodecError::encode(Self::NAME, e.to_string()))?;
        log::trace!(
            "zstd level {} compressed {} -> {} bytes",
            self.config.level,
            raw.len(),
            compressed.len()
        );
        Ok(compressed)
    }

    fn decompress_bytes(&self, compressed: &[u8]) -> Result<Vec<u8>> {
        // The frame carries its own content size, so decode into a fresh Vec
        // without a capacity hint.
        zstd::decode_all(compressed).map_err(|e| CodecError::decode(Self::NAME, e.to_string()))
    }
}
