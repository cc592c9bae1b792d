use hubcodec_core::config::PngConfig;
use hubcodec_core::{Array, Codec, CodecConfig, CodecError, CodecKind, Result};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, ImageFormat};

use crate::image_common::{
    compress_images, decode_err, decompress_images, encode_err, ImageFormatCodec, RawImage,
};

/// Lossless PNG codec for 8-bit images with 1 to 4 channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngCodec {
    config: PngConfig,
}

impl PngCodec {
    pub const NAME: &'static str = CodecKind::Png.name();

    pub fn new(config: PngConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn from_config(config: CodecConfig) -> Result<Self> {
        match config {
            CodecConfig::Default => Ok(Self::default()),
            CodecConfig::Png(config) => Self::new(config),
            other => Err(CodecError::ConfigMismatch {
                codec: Self::NAME,
                config: other.label(),
            }),
        }
    }
}

impl Default for PngCodec {
    fn default() -> Self {
        Self {
            config: PngConfig::default(),
        }
    }
}

impl ImageFormatCodec for PngCodec {
    const NAME: &'static str = PngCodec::NAME;
    const CHANNELS: &'static [usize] = &[1, 2, 3, 4];

    fn single_channel(&self) -> bool {
        self.config.single_channel
    }

    fn encode_image(&self, image: RawImage<'_>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(image.pixels, image.width, image.height, image.color)
            .map_err(|e| encode_err(Self::NAME, e))?;
        Ok(out)
    }

    fn decode_image(&self, encoded: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory_with_format(encoded, ImageFormat::Png)
            .map_err(|e| decode_err(Self::NAME, e))
    }
}

impl Codec for PngCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Png
    }

    fn compress(&self, data: &Array) -> Result<Vec<u8>> {
        compress_images(self, data)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Array> {
        decompress_images(self, compressed)
    }
}
