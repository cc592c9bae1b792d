use hubcodec_core::config::{JpegConfig, JPEG_QUALITIES};
use hubcodec_core::{Array, Codec, CodecConfig, CodecError, CodecKind, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, ImageFormat};

use crate::image_common::{
    compress_images, decode_err, decompress_images, encode_err, ImageFormatCodec, RawImage,
};

/// Lossy JPEG codec for 8-bit grayscale or RGB images.
///
/// Decoding restores the shape and dtype of the input; pixel values are only
/// approximated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegCodec {
    config: JpegConfig,
}

impl JpegCodec {
    pub const NAME: &'static str = CodecKind::Jpeg.name();

    pub fn new(config: JpegConfig) -> Result<Self> {
        if !JPEG_QUALITIES.contains(&config.quality) {
            return Err(CodecError::InvalidArgument {
                codec: Self::NAME,
                option: "quality",
                value: config.quality.into(),
                reason: format!(
                    "Must be between {} (worst) and {} (best)",
                    JPEG_QUALITIES.start(),
                    JPEG_QUALITIES.end()
                )
                .into(),
            });
        }
        Ok(Self { config })
    }

    pub fn from_config(config: CodecConfig) -> Result<Self> {
        match config {
            CodecConfig::Default => Ok(Self::default()),
            CodecConfig::Jpeg(config) => Self::new(config),
            other => Err(CodecError::ConfigMismatch {
                codec: Self::NAME,
                config: other.label(),
            }),
        }
    }

    pub fn quality(&self) -> i32 {
        self.config.quality
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self {
            config: JpegConfig::default(),
        }
    }
}

impl ImageFormatCodec for JpegCodec {
    const NAME: &'static str = JpegCodec::NAME;
    const CHANNELS: &'static [usize] = &[1, 3];

    fn single_channel(&self) -> bool {
        self.config.single_channel
    }

    fn encode_image(&self, image: RawImage<'_>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        // quality is validated to 1..=95 at construction
        JpegEncoder::new_with_quality(&mut out, self.config.quality as u8)
            .write_image(image.pixels, image.width, image.height, image.color)
            .map_err(|e| encode_err(Self::NAME, e))?;
        Ok(out)
    }

    fn decode_image(&self, encoded: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory_with_format(encoded, ImageFormat::Jpeg)
            .map_err(|e| decode_err(Self::NAME, e))
    }
}

impl Codec for JpegCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Jpeg
    }

    fn compress(&self, data: &Array) -> Result<Vec<u8>> {
        compress_images(self, data)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Array> {
        decompress_images(self, compressed)
    }
}
