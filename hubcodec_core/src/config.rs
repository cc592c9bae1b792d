use serde::{Deserialize, Serialize};

/// LZ4 fast-mode acceleration used when none is given.
pub const DEFAULT_LZ4_ACCELERATION: i32 = 1;

/// Zstd level used when none is given.
pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

/// Valid Zstd levels.
pub const ZSTD_LEVELS: std::ops::RangeInclusive<i32> = 1..=22;

/// JPEG quality used when none is given.
pub const DEFAULT_JPEG_QUALITY: i32 = 95;

/// Valid JPEG qualities (1 = worst, 95 = best).
pub const JPEG_QUALITIES: std::ops::RangeInclusive<i32> = 1..=95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lz4Config {
    /// Larger values compress faster but less. Must be at least 1.
    pub acceleration: i32,
}

impl Default for Lz4Config {
    fn default() -> Self {
        Self {
            acceleration: DEFAULT_LZ4_ACCELERATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZstdConfig {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_ZSTD_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PngConfig {
    /// Drop a trailing size-1 channel axis before encoding and restore it on
    /// decode. No effect on multi-channel images.
    pub single_channel: bool,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            single_channel: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegConfig {
    pub quality: i32,
    pub single_channel: bool,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            single_channel: true,
        }
    }
}

/// Construction options handed to the registry.
///
/// Tagged by the codec the options belong to; `Default` means "use the
/// variant's defaults". In TOML: `codec = "zstd"` plus the variant's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "lowercase")]
pub enum CodecConfig {
    #[default]
    Default,
    Png(PngConfig),
    Jpeg(JpegConfig),
    #[serde(rename = "webp")]
    WebP,
    Lz4(Lz4Config),
    Zstd(ZstdConfig),
    #[serde(rename = "numpy")]
    NumPy,
}

impl CodecConfig {
    /// Which variant these options were written for.
    pub fn label(&self) -> &'static str {
        match self {
            CodecConfig::Default => "default",
            CodecConfig::Png(_) => "png",
            CodecConfig::Jpeg(_) => "jpeg",
            CodecConfig::WebP => "webp",
            CodecConfig::Lz4(_) => "lz4",
            CodecConfig::Zstd(_) => "zstd",
            CodecConfig::NumPy => "numpy",
        }
    }
}
